//! The native format: ldvi's own compact textual notation for directory
//! records. Every record starts with a one-line header `key dn`, where
//! `key` is either a decimal index (assigned by the printer, one per entry
//! in the order entries were fetched) or one of the reserved verbs `add`,
//! `delete`, `modify`, `rename` a user can type to stage a new change.
//! Attribute values follow, one name per line, using the tagged encodings
//! documented on [`crate::codec`].

mod parser;
mod printer;

pub use parser::read_profile;

use crate::codec::PasswordHasher;
use crate::entry::Entry;
use crate::format::PrintConfig;
use crate::schema::Entroid;

/// The native [`crate::format::RecordParser`] implementation.
///
/// Holds a password hasher so that `userPassword:sha`/`:ssha`/... value
/// lines a user types by hand can be hashed while reading the record back.
pub struct NativeFormat<'h> {
    pub(crate) hasher: &'h dyn PasswordHasher,
}

impl<'h> NativeFormat<'h> {
    pub fn new(hasher: &'h dyn PasswordHasher) -> Self {
        NativeFormat { hasher }
    }

    /// Prints one entry with schema-derived commentary ahead of it - see
    /// [`printer::print_entry_annotated`]. Not part of [`crate::RecordParser`]
    /// since the diff engine never needs schema to compare two records.
    pub fn print_entry_annotated(
        &self,
        out: &mut dyn std::io::Write,
        index: u64,
        entry: &Entry,
        config: PrintConfig,
        entroid: &mut dyn Entroid,
    ) -> std::io::Result<()> {
        printer::print_entry_annotated(out, index, entry, config, entroid)
    }
}
