//! Core library behind `ldvi`: the entry model, the byte-safe value codec,
//! the native and strict record parsers, and the stream-diff engine that
//! turns a user's hand-edited document back into directory modifications.
//!
//! This crate has no network code and no editor/terminal handling - those
//! live in the `ldvi` binary crate and talk to this one through the
//! [`RecordParser`] and [`ChangeHandler`] traits.

pub mod codec;
pub mod diff;
pub(crate) mod dn;
pub mod entry;
pub mod error;
pub mod format;
pub mod handler;
pub mod native;
pub mod schema;
pub(crate) mod stream;
pub mod strict;

pub use diff::{diff_streams, DiffOutcome, OffsetIndex};
pub use entry::{Attribute, ChangeBatch, Entry, ModOp, Modification, RenameDescriptor};
pub use format::{PeekResult, PrintConfig, RecordKey, RecordParser};
pub use handler::ChangeHandler;
pub use native::NativeFormat;
pub use schema::{Entroid, NullEntroid};
pub use strict::StrictFormat;
