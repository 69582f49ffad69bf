//! Process glue (component 10): orchestrates produce -> print -> edit ->
//! diff -> dispatch, including retry after a diagnostic. The edit-then-diff
//! loop is modeled as an explicit state machine per the REDESIGN FLAG in
//! spec.md §9 - `Prompted -> Edited -> Parsed -> (Dispatched |
//! Failed:PromptRetry) -> End` - rather than buried in exception flow.

use std::io::{Cursor, Write as _};
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use ldvi_core::{diff_streams, ChangeHandler, DiffOutcome, OffsetIndex, PrintConfig, RecordParser};

use crate::directory::EntryProducer;
use crate::editor::{Chooser, Editor};

/// Which header line (if any) introduces the printed document. Not part of
/// the core's [`RecordParser`] façade - printing the document as a whole,
/// rather than one record at a time, is the glue's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Native,
    Strict,
}

impl DocumentFormat {
    fn header(self) -> &'static str {
        match self {
            DocumentFormat::Native => "version ldapvi\n",
            DocumentFormat::Strict => "version: 1\n",
        }
    }
}

/// The edit-then-diff state machine's states.
#[derive(Debug, Clone, PartialEq, Eq)]
enum GlueState {
    Prompted,
    Edited,
    Parsed,
    Dispatched,
    /// A diagnostic was reported and the user chose to re-edit, carrying
    /// the byte offset to seek the editor back to.
    FailedRetry(u64),
    End(GlueOutcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlueOutcome {
    /// Every change dispatched, possibly zero of them.
    Success,
    /// The user chose to abort after a syntactic/semantic diagnostic.
    Aborted,
    /// The handler refused a change partway through; no retry per spec.md
    /// §7 ("no partial rollback" - the already-committed calls stand).
    HandlerFailure,
}

/// Builds the clean document and its offset index from every entry the
/// producer yields, printed through `parser` under `config`.
fn build_clean_document(
    producer: &mut dyn EntryProducer,
    parser: &dyn RecordParser,
    format: DocumentFormat,
    config: PrintConfig,
) -> Result<(Vec<u8>, OffsetIndex)> {
    let mut buf = Vec::new();
    buf.extend_from_slice(format.header().as_bytes());
    buf.extend_from_slice(b"\n");
    let mut offsets = OffsetIndex::new();

    let mut index = 0u64;
    while let Some((dn, attributes)) = producer.next_entry().context("reading entries from the directory")? {
        let mut entry = ldvi_core::Entry::new(dn);
        *entry.attributes_mut() = attributes;
        offsets.push(buf.len() as u64);
        parser.print_entry(&mut buf, index, &entry, config).context("printing entry")?;
        index += 1;
    }
    Ok((buf, offsets))
}

/// Converts a byte offset in `text` to a 1-based line number, for seeking
/// the editor back to the record an error was reported against.
fn offset_to_line(text: &[u8], offset: u64) -> u64 {
    let offset = (offset as usize).min(text.len());
    1 + text[..offset].iter().filter(|&&b| b == b'\n').count() as u64
}

/// Runs one full edit-then-diff cycle: builds the clean document, writes a
/// scratch copy to `data_path` for the user to edit, repeatedly invokes the
/// editor and diff engine until the user dispatches or aborts.
pub fn run_edit_cycle(
    producer: &mut dyn EntryProducer,
    parser: &dyn RecordParser,
    format: DocumentFormat,
    config: PrintConfig,
    handler: &mut dyn ChangeHandler,
    editor: &dyn Editor,
    chooser: &dyn Chooser,
    data_path: &Path,
) -> Result<GlueOutcome> {
    let (clean, mut offsets) = build_clean_document(producer, parser, format, config)?;

    {
        let mut file = std::fs::File::create(data_path).with_context(|| format!("creating scratch file {}", data_path.display()))?;
        file.write_all(&clean)?;
    }

    let mut state = GlueState::Prompted;
    loop {
        state = match state {
            GlueState::Prompted => {
                editor.edit(data_path, None)?;
                GlueState::Edited
            }
            GlueState::FailedRetry(offset) => {
                let data = std::fs::read(data_path)?;
                let line = offset_to_line(&data, offset);
                warn!("reopening editor at line {line} after diagnostic");
                editor.edit(data_path, Some(line))?;
                GlueState::Edited
            }
            GlueState::Edited => GlueState::Parsed,
            GlueState::Parsed => {
                let data_bytes = std::fs::read(data_path).with_context(|| format!("reading scratch file {}", data_path.display()))?;
                let mut clean_cursor = Cursor::new(clean.clone());
                let mut data_cursor = Cursor::new(data_bytes);
                match diff_streams(&mut clean_cursor, &mut data_cursor, &mut offsets, parser, handler) {
                    DiffOutcome::Success => GlueState::Dispatched,
                    DiffOutcome::Syntax(offset) | DiffOutcome::Semantic(offset) => {
                        let answer = chooser.choose(
                            &format!("parse error at byte offset {offset}; (e)dit again or (a)bort?"),
                            &['e', 'a'],
                        )?;
                        if answer == 'e' {
                            GlueState::FailedRetry(offset)
                        } else {
                            GlueState::End(GlueOutcome::Aborted)
                        }
                    }
                    DiffOutcome::HandlerFailure(offset) => {
                        warn!("handler refused a change at byte offset {offset}; stopping (no rollback)");
                        GlueState::End(GlueOutcome::HandlerFailure)
                    }
                }
            }
            GlueState::Dispatched => GlueState::End(GlueOutcome::Success),
            GlueState::End(outcome) => {
                if outcome == GlueOutcome::Success {
                    info!("edit cycle completed successfully");
                }
                return Ok(outcome);
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::StaticEntryProducer;
    use crate::editor::fakes::{FakeChooser, FakeEditor};
    use ldvi_core::codec::{BinaryMode, UnsupportedHasher};
    use ldvi_core::handler::RecordingHandler;
    use ldvi_core::native::NativeFormat;
    use ldvi_core::Attribute;

    fn config() -> PrintConfig {
        PrintConfig { binary_mode: BinaryMode::Utf8 }
    }

    #[test]
    fn unedited_document_dispatches_nothing() {
        let mut producer = StaticEntryProducer::new(vec![(
            "cn=foo,dc=example,dc=com".to_string(),
            vec![Attribute::with_values("cn", vec![b"foo".to_vec()])],
        )]);
        let hasher = UnsupportedHasher;
        let parser = NativeFormat::new(&hasher);
        let mut handler = RecordingHandler::new();
        let editor = FakeEditor::default();
        let chooser = FakeChooser::default();
        let tmp = tempfile::NamedTempFile::new().unwrap();

        let outcome = run_edit_cycle(
            &mut producer,
            &parser,
            DocumentFormat::Native,
            config(),
            &mut handler,
            &editor,
            &chooser,
            tmp.path(),
        )
        .unwrap();

        assert_eq!(outcome, GlueOutcome::Success);
        assert!(handler.calls.is_empty());
    }

    #[test]
    fn edited_attribute_dispatches_a_change() {
        let mut producer = StaticEntryProducer::new(vec![(
            "cn=foo,dc=example,dc=com".to_string(),
            vec![Attribute::with_values("sn", vec![b"old".to_vec()])],
        )]);
        let hasher = UnsupportedHasher;
        let parser = NativeFormat::new(&hasher);
        let mut handler = RecordingHandler::new();
        let tmp = tempfile::NamedTempFile::new().unwrap();

        // First pass: just to capture what the clean document looks like,
        // then hand the editor a rewritten copy with "old" replaced.
        let editor = FakeEditor {
            rewrite: Some("version ldapvi\n\n0 cn=foo,dc=example,dc=com\nsn new\n\n".to_string()),
            ..Default::default()
        };
        let chooser = FakeChooser::default();

        let outcome = run_edit_cycle(
            &mut producer,
            &parser,
            DocumentFormat::Native,
            config(),
            &mut handler,
            &editor,
            &chooser,
            tmp.path(),
        )
        .unwrap();

        assert_eq!(outcome, GlueOutcome::Success);
        assert_eq!(handler.calls.len(), 1);
    }

    #[test]
    fn offset_to_line_counts_newlines() {
        let text = b"one\ntwo\nthree\n";
        assert_eq!(offset_to_line(text, 0), 1);
        assert_eq!(offset_to_line(text, 4), 2);
        assert_eq!(offset_to_line(text, 8), 3);
    }
}
