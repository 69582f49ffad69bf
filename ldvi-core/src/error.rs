//! Error types shared by the parsers, codec, and diff engine.
//!
//! Parser errors always carry the byte offset in the stream at which the
//! trouble began, so a caller can seek the user's editor back to the
//! offending line (see the glue's retry loop).

use std::fmt;
use std::io;

/// A codec-level failure: bad base64, a hash scheme with no hasher configured.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("invalid base64 data")]
    InvalidBase64,
    #[error("no password hasher configured for the {0} scheme")]
    UnsupportedHash(&'static str),
    #[error("password hash generation failed: {0}")]
    HashFailed(String),
}

/// The specific thing that went wrong while parsing one record.
#[derive(Debug, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("unknown encoding tag {0:?}")]
    UnknownEncodingTag(String),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("unreadable file URL {0:?}: {1}")]
    UnreadableFileUrl(String, String),
    #[error("unsupported URL scheme {0:?}, only file: is accepted")]
    UnsupportedUrlScheme(String),
    #[error("NUL byte inside attribute description")]
    NulInAttributeDescription,
    #[error("line is missing its terminating newline")]
    MissingNewline,
    #[error("invalid distinguished name {0:?}")]
    InvalidDn(String),
    #[error("invalid modify operator {0:?}, expected add, delete or replace")]
    InvalidModifyVerb(String),
    #[error("unknown record verb {0:?}")]
    InvalidVerb(String),
    #[error("unexpected end of file")]
    UnexpectedEof,
    #[error("unexpected end of line")]
    UnexpectedEol,
    #[error("dash line outside a modify operation block")]
    DashOutsideModifyBlock,
    #[error("attribute description {got:?} does not match the operation's {expected:?}")]
    ModifyAdMismatch { expected: String, got: String },
    #[error("control lines are not supported")]
    UnsupportedControl,
    #[error("unsupported document version {0:?}")]
    UnsupportedVersion(String),
    #[error("{0}-byte length tag exceeds the remaining input")]
    NumericLengthOverflow(usize),
    #[error("missing required field {0:?}")]
    MissingField(&'static str),
    #[error("invalid deleteoldrdn value {0:?}, expected 0 or 1")]
    InvalidDeleteOldRdn(String),
    #[error("unexpected trailing content after the record")]
    TrailingGarbage,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A parse failure pinned to the byte offset where the offending record began.
#[derive(Debug)]
pub struct ParseError {
    pub offset: u64,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub fn new(offset: u64, kind: impl Into<ParseErrorKind>) -> Self {
        ParseError { offset, kind: kind.into() }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte offset {})", self.kind, self.offset)
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        ParseError { offset: 0, kind: ParseErrorKind::Io(e) }
    }
}
