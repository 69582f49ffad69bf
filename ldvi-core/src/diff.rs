//! The stream-diff engine: the component that reconstructs a user's
//! semantic edits by comparing a byte-indexed "clean" document to a freely
//! edited "data" document and driving a [`ChangeHandler`] with the result.
//!
//! This is the one piece of the core with no direct analogue in either
//! textual format - it sits on top of the [`RecordParser`] façade and never
//! cares which concrete format produced the two documents, as long as both
//! were printed/edited under the same one.

use std::io::{Read, Seek, SeekFrom};

use crate::entry::{Entry, ModOp, Modification};
use crate::error::ParseError;
use crate::format::RecordKey;
use crate::handler::ChangeHandler;
use crate::stream::ReadSeek;
use crate::RecordParser;

/// Outcome of a [`diff_streams`] call, mirroring the four return codes the
/// original engine signals via an integer plus an out-parameter. Folding
/// them into one enum means a caller can't forget to check which offset
/// field is meaningful.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    /// Every record dispatched cleanly.
    Success,
    /// A semantic error in *data*: an out-of-range or duplicate key, or an
    /// invalid rename. Carries the byte offset of the offending record.
    Semantic(u64),
    /// The handler refused a change. Carries the byte offset of the record
    /// being dispatched when it happened.
    HandlerFailure(u64),
    /// *data* failed to parse under the given format. Carries the byte
    /// offset the parser reported.
    Syntax(u64),
}

/// The offset table: index *i* gives the byte position of the clean record
/// whose key is the decimal string `i`. A slot is "inverted" - marked
/// already claimed by a data record - using the `-(pos + 2)` sentinel
/// described in spec; this lets the same growable array double as both the
/// lookup table and the seen-set without a parallel bitset.
#[derive(Debug, Clone, Default)]
pub struct OffsetIndex {
    offsets: Vec<i64>,
}

impl OffsetIndex {
    pub fn new() -> Self {
        OffsetIndex { offsets: Vec::new() }
    }

    pub fn push(&mut self, offset: u64) {
        self.offsets.push(offset as i64);
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    fn is_inverted(&self, i: usize) -> bool {
        self.offsets[i] < 0
    }

    fn offset_at(&self, i: usize) -> u64 {
        let raw = self.offsets[i];
        if raw < 0 {
            (-raw - 2) as u64
        } else {
            raw as u64
        }
    }

    fn invert(&mut self, i: usize) {
        let raw = self.offsets[i];
        self.offsets[i] = -(raw + 2);
    }

    fn revert_all(&mut self, inverted: &[usize]) {
        for &i in inverted {
            let raw = self.offsets[i];
            self.offsets[i] = -raw - 2;
        }
    }
}

/// Compares the raw bytes of the clean record (from `clean_offset` for
/// `len` bytes) against the data record at its current position. If every
/// byte matches exactly the record is unchanged and no further structural
/// comparison is needed - a speed optimization only, never required for
/// correctness. Restores both stream positions unconditionally, including
/// on the short-read path where the two regions don't even have the same
/// length.
fn fastcmp(clean: &mut dyn ReadSeek, data: &mut dyn ReadSeek, clean_offset: u64, data_offset: u64, len: u64) -> std::io::Result<bool> {
    let clean_save = clean.seek(SeekFrom::Current(0))?;
    let data_save = data.seek(SeekFrom::Current(0))?;

    let result = (|| -> std::io::Result<bool> {
        clean.seek(SeekFrom::Start(clean_offset))?;
        data.seek(SeekFrom::Start(data_offset))?;
        let mut clean_buf = vec![0u8; len as usize];
        let mut data_buf = vec![0u8; len as usize];
        if clean.read_exact(&mut clean_buf).is_err() {
            return Ok(false);
        }
        if data.read_exact(&mut data_buf).is_err() {
            return Ok(false);
        }
        Ok(clean_buf == data_buf)
    })();

    clean.seek(SeekFrom::Start(clean_save))?;
    data.seek(SeekFrom::Start(data_save))?;
    result
}

/// Splits a DN's leading RDN into its AD and value, the way
/// [`validate_rename`] needs to inspect "does the new entry still carry the
/// old RDN's value".
fn split_ava(rdn: &str) -> Option<(&str, &str)> {
    let idx = rdn.find('=')?;
    Some((&rdn[..idx], &rdn[idx + 1..]))
}

/// Decides `delete_old_rdn` for a DN change discovered by comparison, and
/// rejects the rename outright (engine semantic error) when either DN is
/// empty, the old entry doesn't actually hold its own RDN value, or the
/// old RDN can't even be split into an AD and a value.
fn validate_rename(old_entry: &Entry, new_entry: &Entry) -> Result<bool, ()> {
    let old_dn = old_entry.dn();
    if old_dn.is_empty() || new_entry.dn().is_empty() {
        return Err(());
    }
    let old_rdn = old_dn.split(',').next().unwrap_or(old_dn);
    let Some((ad, value)) = split_ava(old_rdn) else { return Err(()) };
    if !old_entry.find_attribute(ad).is_some_and(|attr| attr.find_value(value.as_bytes())) {
        return Err(());
    }
    let held = new_entry.find_attribute(ad).is_some_and(|attr| attr.find_value(value.as_bytes()));
    if !held {
        return Ok(true);
    }
    Ok(false)
}

/// Computes the minimal modification list between two entries with the
/// same DN: one `replace` per attribute whose value set changed, one
/// `delete` (no values) per attribute present only in `old`, one `add` per
/// attribute present only in `new`. Attributes whose value multiset is
/// identical (regardless of order) produce no modification at all.
fn compute_modifications(old: &Entry, new: &Entry) -> Vec<Modification> {
    let mut mods = Vec::new();
    for old_attr in old.attributes() {
        match new.find_attribute(old_attr.ad()) {
            None => mods.push(Modification { op: ModOp::Delete, ad: old_attr.ad().to_string(), values: None }),
            Some(new_attr) => {
                if !same_value_set(old_attr.values(), new_attr.values()) {
                    mods.push(Modification {
                        op: ModOp::Replace,
                        ad: old_attr.ad().to_string(),
                        values: Some(new_attr.values().to_vec()),
                    });
                }
            }
        }
    }
    for new_attr in new.attributes() {
        if old.find_attribute(new_attr.ad()).is_none() {
            mods.push(Modification { op: ModOp::Add, ad: new_attr.ad().to_string(), values: Some(new_attr.values().to_vec()) });
        }
    }
    mods
}

fn same_value_set(a: &[Vec<u8>], b: &[Vec<u8>]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut a_sorted = a.to_vec();
    let mut b_sorted = b.to_vec();
    a_sorted.sort();
    b_sorted.sort();
    a_sorted == b_sorted
}

/// Walks *data* record-by-record against *clean* and `offsets`, dispatching
/// every change through `handler`, per spec.md §4.8's algorithm. `offsets`
/// is restored to its pre-call contents on every return path, success or
/// error.
pub fn diff_streams(
    clean: &mut dyn ReadSeek,
    data: &mut dyn ReadSeek,
    offsets: &mut OffsetIndex,
    parser: &dyn RecordParser,
    handler: &mut dyn ChangeHandler,
) -> DiffOutcome {
    let mut inverted = Vec::new();
    let outcome = run(clean, data, offsets, parser, handler, &mut inverted);
    offsets.revert_all(&inverted);
    outcome
}

fn run(
    clean: &mut dyn ReadSeek,
    data: &mut dyn ReadSeek,
    offsets: &mut OffsetIndex,
    parser: &dyn RecordParser,
    handler: &mut dyn ChangeHandler,
    inverted: &mut Vec<usize>,
) -> DiffOutcome {
    let mut cursor = match data.seek(SeekFrom::Start(0)) {
        Ok(p) => p,
        Err(_) => 0,
    };

    loop {
        let peeked = match parser.peek(data, Some(cursor)) {
            Ok(p) => p,
            Err(e) => return DiffOutcome::Syntax(parse_error_offset(&e)),
        };
        let Some(peeked) = peeked else { break };
        let record_offset = peeked.offset;

        match peeked.key {
            RecordKey::Add => {
                let entry = match parser.read_entry(data, Some(record_offset)) {
                    Ok(e) => e,
                    Err(e) => return DiffOutcome::Syntax(parse_error_offset(&e)),
                };
                cursor = match data.seek(SeekFrom::Current(0)) {
                    Ok(p) => p,
                    Err(_) => return DiffOutcome::Syntax(record_offset),
                };
                let modifications: Vec<Modification> = entry
                    .attributes()
                    .iter()
                    .map(|attr| Modification { op: ModOp::Add, ad: attr.ad().to_string(), values: Some(attr.values().to_vec()) })
                    .collect();
                // Synthesized from a verb record, not an offset-table key.
                if !handler.add(0, entry.dn(), &modifications) {
                    return DiffOutcome::HandlerFailure(record_offset);
                }
            }
            RecordKey::Delete => {
                let dn = match parser.read_delete(data, Some(record_offset)) {
                    Ok(dn) => dn,
                    Err(e) => return DiffOutcome::Syntax(parse_error_offset(&e)),
                };
                cursor = match data.seek(SeekFrom::Current(0)) {
                    Ok(p) => p,
                    Err(_) => return DiffOutcome::Syntax(record_offset),
                };
                if !handler.delete(None, &dn) {
                    return DiffOutcome::HandlerFailure(record_offset);
                }
            }
            RecordKey::Modify => {
                let batch = match parser.read_modify(data, Some(record_offset)) {
                    Ok(b) => b,
                    Err(e) => return DiffOutcome::Syntax(parse_error_offset(&e)),
                };
                cursor = match data.seek(SeekFrom::Current(0)) {
                    Ok(p) => p,
                    Err(_) => return DiffOutcome::Syntax(record_offset),
                };
                // Synthesized from a verb record, not an offset-table key.
                if !handler.change(0, &batch.dn, &batch.dn, &batch.modifications) {
                    return DiffOutcome::HandlerFailure(record_offset);
                }
            }
            RecordKey::Rename => {
                let rename = match parser.read_rename(data, Some(record_offset)) {
                    Ok(r) => r,
                    Err(e) => return DiffOutcome::Syntax(parse_error_offset(&e)),
                };
                cursor = match data.seek(SeekFrom::Current(0)) {
                    Ok(p) => p,
                    Err(_) => return DiffOutcome::Syntax(record_offset),
                };
                if !handler.rename0(&rename.old_dn, &rename.new_rdn, rename.new_superior.as_deref(), rename.delete_old_rdn) {
                    return DiffOutcome::HandlerFailure(record_offset);
                }
            }
            RecordKey::Index(n) => {
                let i = n as usize;
                if i >= offsets.len() {
                    return DiffOutcome::Semantic(record_offset);
                }
                if offsets.is_inverted(i) {
                    return DiffOutcome::Semantic(record_offset);
                }

                let clean_offset = offsets.offset_at(i);

                let data_entry = match parser.read_entry(data, Some(record_offset)) {
                    Ok(e) => e,
                    Err(e) => return DiffOutcome::Syntax(parse_error_offset(&e)),
                };
                let after_data = match data.seek(SeekFrom::Current(0)) {
                    Ok(p) => p,
                    Err(_) => return DiffOutcome::Syntax(record_offset),
                };
                cursor = after_data;
                let record_len = after_data.saturating_sub(record_offset);

                if matches!(fastcmp(clean, data, clean_offset, record_offset, record_len), Ok(true)) {
                    offsets.invert(i);
                    inverted.push(i);
                    continue;
                }

                let clean_entry = match parser.read_entry(clean, Some(clean_offset)) {
                    Ok(e) => e,
                    Err(e) => return DiffOutcome::Syntax(parse_error_offset(&e)),
                };

                if clean_entry.dn() != data_entry.dn() {
                    let delete_old_rdn = match validate_rename(&clean_entry, &data_entry) {
                        Ok(v) => v,
                        Err(()) => return DiffOutcome::Semantic(record_offset),
                    };
                    let _ = delete_old_rdn;
                    if !handler.rename(n, clean_entry.dn(), &data_entry) {
                        return DiffOutcome::HandlerFailure(record_offset);
                    }
                } else {
                    let mods = compute_modifications(&clean_entry, &data_entry);
                    if !mods.is_empty() && !handler.change(n, clean_entry.dn(), data_entry.dn(), &mods) {
                        return DiffOutcome::HandlerFailure(record_offset);
                    }
                }

                offsets.invert(i);
                inverted.push(i);
            }
            RecordKey::Label(_) => return DiffOutcome::Semantic(record_offset),
        }
    }

    for i in 0..offsets.len() {
        if !offsets.is_inverted(i) {
            let clean_offset = offsets.offset_at(i);
            match parser.read_entry(clean, Some(clean_offset)) {
                Ok(entry) => {
                    if !handler.delete(Some(i as u64), entry.dn()) {
                        return DiffOutcome::HandlerFailure(clean_offset);
                    }
                }
                Err(e) => return DiffOutcome::Syntax(parse_error_offset(&e)),
            }
        }
    }

    DiffOutcome::Success
}

fn parse_error_offset(e: &ParseError) -> u64 {
    e.offset
}
