//! The common record-level vocabulary shared by the native and strict
//! formats: what a record's key looks like, and the façade both parsers
//! implement so the diff engine never needs to know which syntax it's
//! reading.

use crate::codec::BinaryMode;
use crate::entry::{ChangeBatch, Entry, RenameDescriptor};
use crate::error::ParseError;
use crate::stream::ReadSeek;

/// Identifies what kind of record starts at a given offset, without having
/// parsed its body yet. Index/Label distinguish the two formats' framing:
/// the native format numbers its records (`0`, `1`, ...), while the strict
/// format names each non-entry record by its changetype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    Index(u64),
    Add,
    Modify,
    Delete,
    Rename,
    Label(String),
}

/// Printing options threaded through both printers in place of a global
/// "are we on a UTF-8 terminal" flag.
#[derive(Debug, Clone, Copy)]
pub struct PrintConfig {
    pub binary_mode: BinaryMode,
}

impl Default for PrintConfig {
    fn default() -> Self {
        PrintConfig { binary_mode: BinaryMode::Utf8 }
    }
}

/// The result of a non-consuming [`RecordParser::peek`]: the record's key,
/// and the byte offset its body actually starts at (after any leading
/// version line or blank lines have been skipped). The diff engine stores
/// this offset in its index and later passes it back as `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeekResult {
    pub key: RecordKey,
    pub offset: u64,
}

/// The parsing/printing façade implemented independently by the native and
/// strict formats. Every method takes the stream to operate on and an
/// optional starting offset (`None` continues from the stream's current
/// position, `Some(n)` seeks to `n` first) - this lets the diff engine
/// re-read arbitrary records from either the clean or the data copy of a
/// document through the same interface.
pub trait RecordParser {
    fn peek(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<Option<PeekResult>, ParseError>;

    /// Advances past one record's body without building its value, returning
    /// its key. Used while scanning for deletions during a diff.
    fn skip(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<Option<RecordKey>, ParseError>;

    fn read_entry(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<Entry, ParseError>;

    fn read_delete(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<String, ParseError>;

    fn read_modify(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<ChangeBatch, ParseError>;

    fn read_rename(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<RenameDescriptor, ParseError>;

    fn print_entry(&self, out: &mut dyn std::io::Write, index: u64, entry: &Entry, config: PrintConfig) -> std::io::Result<()>;
}
