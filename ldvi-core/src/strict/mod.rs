//! The strict format: a standards-conforming textual record notation
//! (commonly known by the acronym LDIF) laid out as `attr: value` /
//! `attr:: base64value` / `attr:< file-url` lines, folded continuations, and
//! a `changetype:` field that selects add/delete/modify/modrdn semantics.
//!
//! Unlike the native format (`crate::native`), this format never invents
//! vendor tags: every value line is one of exactly three shapes, matching
//! what any other LDIF-consuming tool would also accept. The one ldvi-
//! specific extension is an optional `ldapvi-key:` field that associates a
//! record with the offset-index key the diff engine uses; everything else
//! is plain LDIF.

mod parser;
mod printer;

use crate::entry::Entry;
use crate::format::PrintConfig;
use crate::schema::Entroid;

/// The strict [`crate::format::RecordParser`] implementation. Carries no
/// state - unlike [`crate::native::NativeFormat`], this format has no
/// password-hash typing convenience (real LDIF has no such tag), so there
/// is nothing to configure.
#[derive(Debug, Default, Clone, Copy)]
pub struct StrictFormat;

impl StrictFormat {
    pub fn new() -> Self {
        StrictFormat
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
