use std::io::{self, Write};

use crate::codec::{base64_encode, is_safe_under};
use crate::entry::Entry;
use crate::format::PrintConfig;
use crate::schema::{strip_options, Entroid};

/// Prints one fetched entry as a standards-conforming record: a `dn:` line,
/// an `ldapvi-key:` line carrying the offset-index key, then one `attr:` or
/// `attr::` line per value.
///
/// Unlike the native printer there is no backslash-escape output shape -
/// LDIF has exactly two value encodings, plain and base64 - so a value
/// either prints as-is or gets base64'd whole.
pub(super) fn print_entry(out: &mut dyn Write, index: u64, entry: &Entry, config: PrintConfig) -> io::Result<()> {
    print_dn_line(out, "dn", entry.dn())?;
    writeln!(out, "ldapvi-key: {}", index)?;
    for attr in entry.attributes() {
        for value in attr.values() {
            print_value_line(out, attr.ad(), value, config)?;
        }
    }
    writeln!(out)
}

/// Like [`print_entry`], but interleaves schema-derived commentary ahead of
/// the record as `#`-comment lines, matching the original's
/// `ldif_print_comment` call ahead of an entry. Every printed attribute is
/// removed from the entroid's must/may sets as it's consumed so a caller can
/// inspect what's left unconsumed afterward.
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

fn print_dn_line(out: &mut dyn Write, field: &str, value: &str) -> io::Result<()> {
    print_value_line(out, field, value.as_bytes(), PrintConfig { binary_mode: crate::codec::BinaryMode::Utf8 })
}

fn print_value_line(out: &mut dyn Write, ad: &str, value: &[u8], config: PrintConfig) -> io::Result<()> {
    if is_safe_under(value, config.binary_mode) {
        write!(out, "{}: ", ad)?;
        out.write_all(value)?;
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
    fn prints_dn_and_key_line() {
        let entry = Entry::new("cn=foo,dc=example,dc=com");
        let rendered = render(&entry);
        assert!(rendered.starts_with("dn: cn=foo,dc=example,dc=com\nldapvi-key: 3\n"));
    }

    #[test]
    fn prints_plain_attribute_values() {
        let mut entry = Entry::new("cn=foo,dc=example,dc=com");
        entry.attributes_mut().push(Attribute::with_values("cn", vec![b"foo".to_vec()]));
        assert_eq!(render(&entry), "dn: cn=foo,dc=example,dc=com\nldapvi-key: 3\ncn: foo\n\n");
    }

    #[test]
    fn base64_encodes_unsafe_values() {
        let mut entry = Entry::new("cn=foo,dc=example,dc=com");
        entry
            .attributes_mut()
            .push(Attribute::with_values("jpegPhoto", vec![vec![0u8, 1, 2, 255]]));
        assert!(render(&entry).contains("jpegPhoto:: "));
    }

    #[test]
    fn base64_encodes_dn_with_unsafe_leading_byte() {
        let entry = Entry::new(" cn=foo");
        let rendered = render(&entry);
        assert!(rendered.starts_with("dn:: "));
    }
}
