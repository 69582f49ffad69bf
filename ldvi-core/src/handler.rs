//! The handler interface: five dispatch operations the diff engine invokes
//! as it walks the edited document. Implementing this trait is the only
//! thing a caller needs to do to turn text edits into directory writes -
//! the engine never touches a network connection itself.

use crate::entry::{ChangeBatch, Entry, Modification};

/// Consumed-only contract for turning one diffed record into a real
/// directory modification. Every method returns `false` on failure, which
/// aborts the enclosing [`crate::diff::diff_streams`] call with its `-2`
/// handler-failure code; the engine carries no payload for *why* a handler
/// refused a change; that detail is the implementation's own responsibility
/// to log or surface before returning.
pub trait ChangeHandler {
    /// An attribute-level edit to an existing entry. `old_dn == new_dn` for
    /// a pure attribute modify; a DN change alongside attribute changes is
    /// never dispatched through this method - `rename`/`rename0` carry that.
    fn change(&mut self, key: u64, old_dn: &str, new_dn: &str, modifications: &[crate::entry::Modification]) -> bool;

    /// A DN change discovered by comparing two full entries (the diff
    /// engine's `n`-keyed path). Carries the complete new entry so the
    /// handler can re-run [`crate::diff::validate_rename`]'s invariant
    /// itself if it wants to, though the engine has already validated it.
    fn rename(&mut self, key: u64, old_dn: &str, new_entry: &Entry) -> bool;

    /// A DN change expressed directly as a `rename` record rather than
    /// discovered by comparison - the immediate-dispatch path.
    fn rename0(&mut self, old_dn: &str, new_rdn: &str, new_superior: Option<&str>, delete_old_rdn: bool) -> bool;

    /// A brand-new entry, dispatched from either a synthesized `add` record
    /// (native key `add`) or an explicit `changetype: add` record.
    /// `modifications` is all-`add`, one entry per attribute, the same shape
    /// `change` uses for a pure attribute addition; `key` follows the same
    /// "0, synthesized from a verb record" convention as `change`'s.
    fn add(&mut self, key: u64, dn: &str, modifications: &[Modification]) -> bool;

    /// Removal of an existing entry, whether discovered by omission during
    /// the sweep phase or dispatched immediately from a `delete` record.
    fn delete(&mut self, key: Option<u64>, dn: &str) -> bool;
}

/// A [`ChangeHandler`] that records every call instead of dispatching
/// anything, for tests that only need to assert on dispatch order and
/// arguments rather than drive a real directory.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordingHandler {
    pub calls: Vec<HandlerCall>,
    /// If set, every call at or after this index (0-based, in call order)
    /// fails instead of succeeding - used to exercise the engine's `-2`
    /// handler-failure path.
    pub fail_from: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerCall {
    Change { key: u64, old_dn: String, new_dn: String, modifications: Vec<crate::entry::Modification> },
    Rename { key: u64, old_dn: String, new_entry: Entry },
    Rename0 { old_dn: String, new_rdn: String, new_superior: Option<String>, delete_old_rdn: bool },
    Add { key: u64, dn: String, modifications: Vec<Modification> },
    Delete { key: Option<u64>, dn: String },
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn ok(&mut self) -> bool {
        let idx = self.calls.len();
        !matches!(self.fail_from, Some(n) if idx >= n)
    }
}

impl ChangeHandler for RecordingHandler {
    fn change(&mut self, key: u64, old_dn: &str, new_dn: &str, modifications: &[crate::entry::Modification]) -> bool {
        let ok = self.ok();
        self.calls.push(HandlerCall::Change {
            key,
            old_dn: old_dn.to_string(),
            new_dn: new_dn.to_string(),
            modifications: modifications.to_vec(),
        });
        ok
    }

    fn rename(&mut self, key: u64, old_dn: &str, new_entry: &Entry) -> bool {
        let ok = self.ok();
        self.calls.push(HandlerCall::Rename { key, old_dn: old_dn.to_string(), new_entry: new_entry.clone() });
        ok
    }

    fn rename0(&mut self, old_dn: &str, new_rdn: &str, new_superior: Option<&str>, delete_old_rdn: bool) -> bool {
        let ok = self.ok();
        self.calls.push(HandlerCall::Rename0 {
            old_dn: old_dn.to_string(),
            new_rdn: new_rdn.to_string(),
            new_superior: new_superior.map(str::to_string),
            delete_old_rdn,
        });
        ok
    }

    fn add(&mut self, key: u64, dn: &str, modifications: &[Modification]) -> bool {
        let ok = self.ok();
        self.calls.push(HandlerCall::Add { key, dn: dn.to_string(), modifications: modifications.to_vec() });
        ok
    }

    fn delete(&mut self, key: Option<u64>, dn: &str) -> bool {
        let ok = self.ok();
        self.calls.push(HandlerCall::Delete { key, dn: dn.to_string() });
        ok
    }
}
