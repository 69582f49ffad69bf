use std::io::{self, Write};

use crate::codec::{base64_encode, is_safe_under};
use crate::entry::Entry;
use crate::format::PrintConfig;
use crate::schema::{strip_options, Entroid};

/// Prints one fetched entry under its numeric index key.
///
/// Each value picks between two encodings: plain (with any literal
/// backslash doubled, since backslash is the value-escape character on
/// read-back) when it's safe under `config.binary_mode`, or `::` base64
/// otherwise. The native format never emits the `;`, `<file>` or numeric
/// tags on output - they exist only so a user can type them by hand.
pub(super) fn print_entry(out: &mut dyn Write, index: u64, entry: &Entry, config: PrintConfig) -> io::Result<()> {
    writeln!(out, "{} {}", index, entry.dn())?;
    for attr in entry.attributes() {
        for value in attr.values() {
            print_value_line(out, attr.ad(), value, config)?;
        }
    }
    writeln!(out)
}

/// Like [`print_entry`], but interleaves schema-derived commentary ahead of
/// the record: any free-form note the entroid carries (typically a schema
/// violation), then the structural class, as `#`-prefixed comment lines -
/// matching the original's `ldif_print_comment` call ahead of an entry.
/// Every printed attribute is removed from the entroid's must/may sets as
/// it's consumed so a caller can inspect what's left unconsumed afterward.
pub(super) fn print_entry_annotated(
    out: &mut dyn Write,
    index: u64,
    entry: &Entry,
    config: PrintConfig,
    entroid: &mut dyn Entroid,
) -> io::Result<()> {
    if let Some(comment) = entroid.comment() {
        for line in comment.lines() {
            writeln!(out, "# {line}")?;
        }
    }
    if let Some(class) = entroid.structural_class() {
        writeln!(out, "# structural class: {class}")?;
    }
    for attr in entry.attributes() {
        entroid.remove(strip_options(attr.ad()));
    }
    print_entry(out, index, entry, config)
}

fn print_value_line(out: &mut dyn Write, ad: &str, value: &[u8], config: PrintConfig) -> io::Result<()> {
    if is_safe_under(value, config.binary_mode) {
        write!(out, "{} ", ad)?;
        for &b in value {
            if b == b'\\' {
                out.write_all(b"\\\\")?;
            } else {
                out.write_all(&[b])?;
            }
        }
        writeln!(out)
    } else {
        writeln!(out, "{}:: {}", ad, base64_encode(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BinaryMode;
    use crate::entry::Attribute;

    fn render(entry: &Entry) -> String {
        let mut buf = Vec::new();
        print_entry(&mut buf, 3, entry, PrintConfig { binary_mode: BinaryMode::Utf8 }).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn prints_plain_values() {
        let mut entry = Entry::new("cn=foo,dc=example,dc=com");
        entry.attributes_mut().push(Attribute::with_values("cn", vec![b"foo".to_vec()]));
        assert_eq!(render(&entry), "3 cn=foo,dc=example,dc=com\ncn foo\n\n");
    }

    #[test]
    fn escapes_literal_backslash() {
        let mut entry = Entry::new("cn=foo,dc=example,dc=com");
        entry
            .attributes_mut()
            .push(Attribute::with_values("cn", vec![b"foo\\bar".to_vec()]));
        assert_eq!(render(&entry), "3 cn=foo,dc=example,dc=com\ncn foo\\\\bar\n\n");
    }

    #[test]
    fn base64_encodes_unsafe_values() {
        let mut entry = Entry::new("cn=foo,dc=example,dc=com");
        entry
            .attributes_mut()
            .push(Attribute::with_values("jpegPhoto", vec![vec![0u8, 1, 2, 255]]));
        assert!(render(&entry).contains("jpegPhoto:: "));
    }
}
