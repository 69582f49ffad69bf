use crate::codec::base64_decode;
use crate::dn::{looks_like_dn, split_rdn};
use crate::entry::{ChangeBatch, Entry, ModOp, Modification, RenameDescriptor};
use crate::error::{ParseError, ParseErrorKind};
use crate::format::{PeekResult, PrintConfig, RecordKey, RecordParser};
use crate::stream::{LineReader, RawLine, ReadSeek};

use super::StrictFormat;

impl RecordParser for StrictFormat {
    fn peek(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<Option<PeekResult>, ParseError> {
        let mut reader = LineReader::new(stream);
        let Some(offset) = enter_record(&mut reader, start)? else { return Ok(None) };
        let lines = read_logical_lines(&mut reader)?;
        let key = record_key(&lines)?;
        Ok(Some(PeekResult { key, offset }))
    }

    fn skip(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<Option<RecordKey>, ParseError> {
        let mut reader = LineReader::new(stream);
        let Some(offset) = enter_record(&mut reader, start)? else { return Ok(None) };
        let _ = offset;
        let lines = read_logical_lines(&mut reader)?;
        Ok(Some(record_key(&lines)?))
    }

    fn read_entry(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<Entry, ParseError> {
        let mut reader = LineReader::new(stream);
        let offset = enter_record(&mut reader, start)?.ok_or_else(|| ParseError::new(0, ParseErrorKind::UnexpectedEof))?;
        let lines = read_logical_lines(&mut reader)?;
        let mut iter = lines.into_iter();
        let (dn, _dn_offset) = read_dn_line(&mut iter, offset)?;
        let mut entry = Entry::new(dn);
        for (line_offset, line) in iter {
            if line == b"-" {
                return Err(ParseError::new(line_offset, ParseErrorKind::DashOutsideModifyBlock));
            }
            let (name, rest) = split_field_name(&line)
                .ok_or_else(|| ParseError::new(line_offset, ParseErrorKind::MissingField("attribute value")))?;
            if name.eq_ignore_ascii_case(b"changetype") {
                let value = text_value(decode_value(rest, line_offset)?, line_offset)?;
                if !value.eq_ignore_ascii_case("add") {
                    return Err(ParseError::new(line_offset, ParseErrorKind::InvalidVerb(value)));
                }
            } else if name.eq_ignore_ascii_case(b"ldapvi-key") {
                // consumed for key classification during peek; irrelevant here.
            } else if name.eq_ignore_ascii_case(b"control") {
                return Err(ParseError::new(line_offset, ParseErrorKind::UnsupportedControl));
            } else {
                let ad = String::from_utf8_lossy(name).into_owned();
                let value = decode_value(rest, line_offset)?;
                entry.merge_attribute_value(ad, value);
            }
        }
        Ok(entry)
    }

    fn read_delete(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<String, ParseError> {
        let mut reader = LineReader::new(stream);
        let offset = enter_record(&mut reader, start)?.ok_or_else(|| ParseError::new(0, ParseErrorKind::UnexpectedEof))?;
        let lines = read_logical_lines(&mut reader)?;
        let mut iter = lines.into_iter();
        let (dn, _dn_offset) = read_dn_line(&mut iter, offset)?;

        let mut saw_changetype = false;
        for (line_offset, line) in iter {
            let Some((name, rest)) = split_field_name(&line) else {
                return Err(ParseError::new(line_offset, ParseErrorKind::TrailingGarbage));
            };
            if name.eq_ignore_ascii_case(b"changetype") {
                let value = text_value(decode_value(rest, line_offset)?, line_offset)?;
                if !value.eq_ignore_ascii_case("delete") {
                    return Err(ParseError::new(line_offset, ParseErrorKind::InvalidVerb(value)));
                }
                saw_changetype = true;
            } else if name.eq_ignore_ascii_case(b"ldapvi-key") {
                continue;
            } else if name.eq_ignore_ascii_case(b"control") {
                return Err(ParseError::new(line_offset, ParseErrorKind::UnsupportedControl));
            } else {
                return Err(ParseError::new(line_offset, ParseErrorKind::TrailingGarbage));
            }
        }
        if !saw_changetype {
            return Err(ParseError::new(offset, ParseErrorKind::MissingField("changetype")));
        }
        Ok(dn)
    }

    fn read_modify(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<ChangeBatch, ParseError> {
        let mut reader = LineReader::new(stream);
        let offset = enter_record(&mut reader, start)?.ok_or_else(|| ParseError::new(0, ParseErrorKind::UnexpectedEof))?;
        let lines = read_logical_lines(&mut reader)?;
        let mut iter = lines.into_iter().peekable();
        let (dn, _) = read_dn_line(&mut iter, offset)?;

        let mut saw_changetype = false;
        let mut modifications = Vec::new();

        while let Some((line_offset, line)) = iter.next() {
            let Some((name, rest)) = split_field_name(&line) else {
                return Err(ParseError::new(line_offset, ParseErrorKind::DashOutsideModifyBlock));
            };
            if name.eq_ignore_ascii_case(b"changetype") {
                let value = text_value(decode_value(rest, line_offset)?, line_offset)?;
                if !value.eq_ignore_ascii_case("modify") {
                    return Err(ParseError::new(line_offset, ParseErrorKind::InvalidVerb(value)));
                }
                saw_changetype = true;
                continue;
            }
            if name.eq_ignore_ascii_case(b"ldapvi-key") {
                continue;
            }
            if name.eq_ignore_ascii_case(b"control") {
                return Err(ParseError::new(line_offset, ParseErrorKind::UnsupportedControl));
            }

            let op = match () {
                _ if name.eq_ignore_ascii_case(b"add") => ModOp::Add,
                _ if name.eq_ignore_ascii_case(b"delete") => ModOp::Delete,
                _ if name.eq_ignore_ascii_case(b"replace") => ModOp::Replace,
                _ => {
                    return Err(ParseError::new(
                        line_offset,
                        ParseErrorKind::InvalidModifyVerb(String::from_utf8_lossy(name).into_owned()),
                    ))
                }
            };
            let ad = text_value(decode_value(rest, line_offset)?, line_offset)?;

            let mut values = Vec::new();
            loop {
                let Some((val_offset, val_line)) = iter.next() else {
                    return Err(ParseError::new(line_offset, ParseErrorKind::MissingField("-")));
                };
                if val_line == b"-" {
                    break;
                }
                let Some((val_name, val_rest)) = split_field_name(&val_line) else {
                    return Err(ParseError::new(val_offset, ParseErrorKind::ModifyAdMismatch {
                        expected: ad.clone(),
                        got: String::from_utf8_lossy(&val_line).into_owned(),
                    }));
                };
                if !val_name.eq_ignore_ascii_case(ad.as_bytes()) {
                    return Err(ParseError::new(val_offset, ParseErrorKind::ModifyAdMismatch {
                        expected: ad.clone(),
                        got: String::from_utf8_lossy(val_name).into_owned(),
                    }));
                }
                values.push(decode_value(val_rest, val_offset)?);
            }
            modifications.push(Modification { op, ad, values: if values.is_empty() { None } else { Some(values) } });
        }
        if !saw_changetype {
            return Err(ParseError::new(offset, ParseErrorKind::MissingField("changetype")));
        }
        Ok(ChangeBatch { dn, modifications })
    }

    fn read_rename(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<RenameDescriptor, ParseError> {
        let mut reader = LineReader::new(stream);
        let offset = enter_record(&mut reader, start)?.ok_or_else(|| ParseError::new(0, ParseErrorKind::UnexpectedEof))?;
        let lines = read_logical_lines(&mut reader)?;
        let mut iter = lines.into_iter();
        let (old_dn, _) = read_dn_line(&mut iter, offset)?;

        let mut saw_changetype = false;
        let mut new_rdn: Option<String> = None;
        let mut delete_old_rdn: Option<bool> = None;
        let mut new_superior: Option<String> = None;

        for (line_offset, line) in iter {
            let Some((name, rest)) = split_field_name(&line) else {
                return Err(ParseError::new(line_offset, ParseErrorKind::TrailingGarbage));
            };
            if name.eq_ignore_ascii_case(b"changetype") {
                let value = text_value(decode_value(rest, line_offset)?, line_offset)?;
                if !value.eq_ignore_ascii_case("modrdn") && !value.eq_ignore_ascii_case("moddn") {
                    return Err(ParseError::new(line_offset, ParseErrorKind::InvalidVerb(value)));
                }
                saw_changetype = true;
            } else if name.eq_ignore_ascii_case(b"ldapvi-key") {
                continue;
            } else if name.eq_ignore_ascii_case(b"control") {
                return Err(ParseError::new(line_offset, ParseErrorKind::UnsupportedControl));
            } else if name.eq_ignore_ascii_case(b"newrdn") {
                new_rdn = Some(text_value(decode_value(rest, line_offset)?, line_offset)?);
            } else if name.eq_ignore_ascii_case(b"deleteoldrdn") {
                let value = text_value(decode_value(rest, line_offset)?, line_offset)?;
                delete_old_rdn = Some(match value.as_str() {
                    "0" => false,
                    "1" => true,
                    _ => return Err(ParseError::new(line_offset, ParseErrorKind::InvalidDeleteOldRdn(value))),
                });
            } else if name.eq_ignore_ascii_case(b"newsuperior") {
                let value = text_value(decode_value(rest, line_offset)?, line_offset)?;
                new_superior = if value.is_empty() { None } else { Some(value) };
            } else {
                return Err(ParseError::new(line_offset, ParseErrorKind::TrailingGarbage));
            }
        }

        if !saw_changetype {
            return Err(ParseError::new(offset, ParseErrorKind::MissingField("changetype")));
        }
        let new_rdn = new_rdn.ok_or_else(|| ParseError::new(offset, ParseErrorKind::MissingField("newrdn")))?;
        let delete_old_rdn =
            delete_old_rdn.ok_or_else(|| ParseError::new(offset, ParseErrorKind::MissingField("deleteoldrdn")))?;
        let new_superior = new_superior.or_else(|| split_rdn(&old_dn).1);

        Ok(RenameDescriptor { old_dn, new_rdn, new_superior, delete_old_rdn })
    }

    fn print_entry(&self, out: &mut dyn std::io::Write, index: u64, entry: &Entry, config: PrintConfig) -> std::io::Result<()> {
        super::printer::print_entry(out, index, entry, config)
    }
}

fn read_dn_line<I>(iter: &mut I, record_offset: u64) -> Result<(String, u64), ParseError>
where
    I: Iterator<Item = (u64, Vec<u8>)>,
{
    let (dn_offset, line) = iter
        .next()
        .ok_or_else(|| ParseError::new(record_offset, ParseErrorKind::MissingField("dn")))?;
    let (name, rest) = split_field_name(&line).ok_or_else(|| ParseError::new(dn_offset, ParseErrorKind::MissingField("dn")))?;
    if !name.eq_ignore_ascii_case(b"dn") {
        return Err(ParseError::new(dn_offset, ParseErrorKind::MissingField("dn")));
    }
    let dn = text_value(decode_value(rest, dn_offset)?, dn_offset)?;
    if !looks_like_dn(&dn) {
        return Err(ParseError::new(dn_offset, ParseErrorKind::InvalidDn(dn)));
    }
    Ok((dn, dn_offset))
}

fn text_value(bytes: Vec<u8>, offset: u64) -> Result<String, ParseError> {
    String::from_utf8(bytes).map_err(|_| ParseError::new(offset, ParseErrorKind::InvalidDn("non-UTF-8 field".to_string())))
}

/// Splits `name: rest` (or `name:: rest` / `name:< rest`) at the first
/// colon. Returns `None` for lines with no colon at all (the `-` modify
/// block terminator, or a malformed line).
fn split_field_name(line: &[u8]) -> Option<(&[u8], &[u8])> {
    let idx = line.iter().position(|&b| b == b':')?;
    Some((&line[..idx], &line[idx + 1..]))
}

fn strip_leading_spaces(bytes: &[u8]) -> &[u8] {
    let mut i = 0;
    while i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    &bytes[i..]
}

/// Decodes the part of a field line after its `:` separator, per RFC 2849's
/// three value-spec shapes: `::` base64, `:<` file URL, or plain text with
/// any number of leading fill spaces.
fn decode_value(rest: &[u8], offset: u64) -> Result<Vec<u8>, ParseError> {
    match rest.first() {
        Some(b':') => {
            let text = strip_leading_spaces(&rest[1..]);
            let s = String::from_utf8_lossy(text);
            base64_decode(&s).map_err(|e| ParseError::new(offset, ParseErrorKind::Codec(e)))
        }
        Some(b'<') => {
            let text = strip_leading_spaces(&rest[1..]);
            let url = String::from_utf8_lossy(text).into_owned();
            read_file_url(&url, offset)
        }
        Some(_) => Ok(strip_leading_spaces(rest).to_vec()),
        None => Ok(Vec::new()),
    }
}

fn read_file_url(url: &str, offset: u64) -> Result<Vec<u8>, ParseError> {
    let Some(idx) = url.find("://") else {
        return Err(ParseError::new(offset, ParseErrorKind::UnsupportedUrlScheme(url.to_string())));
    };
    let scheme = &url[..idx];
    if scheme != "file" {
        return Err(ParseError::new(offset, ParseErrorKind::UnsupportedUrlScheme(scheme.to_string())));
    }
    let path = &url[idx + 3..];
    std::fs::read(path)
        .map_err(|e| ParseError::new(offset, ParseErrorKind::UnreadableFileUrl(path.to_string(), e.to_string())))
}

/// Consumes a leading `version: 1` line (only meaningful at the very start
/// of the stream) and any run of blank separator lines, returning the
/// offset the record's `dn:` line actually starts at, or `None` at a clean
/// EOF with no record present.
fn enter_record(reader: &mut LineReader, start: Option<u64>) -> Result<Option<u64>, ParseError> {
    if let Some(pos) = start {
        reader.seek_to(pos)?;
    }
    if reader.position()? == 0 {
        let save = reader.position()?;
        match reader.read_line()? {
            RawLine::Line(line) => {
                if let Some((name, rest)) = split_field_name(&line) {
                    if name.eq_ignore_ascii_case(b"version") {
                        let value = text_value(decode_value(rest, save)?, save)?;
                        if value.trim() != "1" {
                            return Err(ParseError::new(save, ParseErrorKind::UnsupportedVersion(value)));
                        }
                    } else {
                        reader.seek_to(save)?;
                    }
                } else {
                    reader.seek_to(save)?;
                }
            }
            RawLine::Eof => return Ok(None),
            RawLine::Unterminated(_) => {
                reader.seek_to(save)?;
            }
        }
    }
    loop {
        let offset = reader.position()?;
        match reader.read_line()? {
            RawLine::Eof => return Ok(None),
            RawLine::Line(line) if line.is_empty() => continue,
            RawLine::Line(_) => {
                reader.seek_to(offset)?;
                return Ok(Some(offset));
            }
            RawLine::Unterminated(line) => {
                if line.is_empty() {
                    return Ok(None);
                }
                return Err(ParseError::new(offset, ParseErrorKind::MissingNewline));
            }
        }
    }
}

/// Reads every logical (unfolded, comment-stripped) line of one record,
/// consuming through the terminating blank line or EOF. Folding - a
/// continuation line starting with a single space - concatenates directly
/// onto the previous logical line with no inserted separator, so folding
/// can split in the middle of a field name or value.
fn read_logical_lines(reader: &mut LineReader) -> Result<Vec<(u64, Vec<u8>)>, ParseError> {
    let mut lines = Vec::new();
    loop {
        let offset = reader.position()?;
        match reader.read_line()? {
            RawLine::Eof => break,
            RawLine::Line(line) if line.is_empty() => break,
            RawLine::Line(line) => {
                if line[0] == b'#' {
                    skip_folds(reader)?;
                    continue;
                }
                let mut content = line;
                append_folds(reader, &mut content)?;
                lines.push((offset, content));
            }
            RawLine::Unterminated(line) => {
                if line.is_empty() {
                    break;
                }
                return Err(ParseError::new(offset, ParseErrorKind::MissingNewline));
            }
        }
    }
    Ok(lines)
}

fn append_folds(reader: &mut LineReader, content: &mut Vec<u8>) -> Result<(), ParseError> {
    loop {
        let pos = reader.position()?;
        match reader.read_byte()? {
            Some(b' ') => match reader.read_line()? {
                RawLine::Line(cont) => content.extend_from_slice(&cont),
                RawLine::Unterminated(cont) => {
                    content.extend_from_slice(&cont);
                    return Ok(());
                }
                RawLine::Eof => return Ok(()),
            },
            Some(_) => {
                reader.seek_to(pos)?;
                return Ok(());
            }
            None => return Ok(()),
        }
    }
}

fn skip_folds(reader: &mut LineReader) -> Result<(), ParseError> {
    loop {
        let pos = reader.position()?;
        match reader.read_byte()? {
            Some(b' ') => {
                reader.read_line()?;
            }
            Some(_) => {
                reader.seek_to(pos)?;
                return Ok(());
            }
            None => return Ok(()),
        }
    }
}

fn record_key(lines: &[(u64, Vec<u8>)]) -> Result<RecordKey, ParseError> {
    let mut changetype: Option<String> = None;
    let mut ldapvi_key: Option<String> = None;
    for (offset, line) in lines.iter().skip(1) {
        let Some((name, rest)) = split_field_name(line) else { continue };
        if name.eq_ignore_ascii_case(b"changetype") {
            changetype = Some(text_value(decode_value(rest, *offset)?, *offset)?);
        } else if name.eq_ignore_ascii_case(b"ldapvi-key") {
            ldapvi_key = Some(text_value(decode_value(rest, *offset)?, *offset)?);
        } else if name.eq_ignore_ascii_case(b"control") {
            return Err(ParseError::new(*offset, ParseErrorKind::UnsupportedControl));
        }
    }
    match changetype.as_deref() {
        Some(ct) if ct.eq_ignore_ascii_case("add") => return Ok(RecordKey::Add),
        Some(ct) if ct.eq_ignore_ascii_case("delete") => return Ok(RecordKey::Delete),
        Some(ct) if ct.eq_ignore_ascii_case("modify") => return Ok(RecordKey::Modify),
        Some(ct) if ct.eq_ignore_ascii_case("modrdn") || ct.eq_ignore_ascii_case("moddn") => return Ok(RecordKey::Rename),
        Some(other) => {
            let offset = lines.first().map(|(o, _)| *o).unwrap_or(0);
            return Err(ParseError::new(offset, ParseErrorKind::InvalidVerb(other.to_string())));
        }
        None => {}
    }
    match ldapvi_key {
        None => Ok(RecordKey::Add),
        Some(k) => match k.parse::<u64>() {
            Ok(n) => Ok(RecordKey::Index(n)),
            Err(_) => Ok(RecordKey::Label(k)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parser() -> StrictFormat {
        StrictFormat::new()
    }

    fn cursor(s: &str) -> Cursor<Vec<u8>> {
        Cursor::new(s.as_bytes().to_vec())
    }

    #[test]
    fn reads_simple_attrval_record_as_implicit_add() {
        let p = parser();
        let mut c = cursor("dn: cn=foo,dc=example,dc=com\ncn: foo\nsn: bar\n\n");
        let key = p.peek(&mut c, Some(0)).unwrap().unwrap().key;
        assert_eq!(key, RecordKey::Add);
        let entry = p.read_entry(&mut c, Some(0)).unwrap();
        assert_eq!(entry.dn(), "cn=foo,dc=example,dc=com");
        assert_eq!(entry.attributes().len(), 2);
    }

    #[test]
    fn ldapvi_key_selects_index() {
        let p = parser();
        let mut c = cursor("dn: cn=foo,dc=example,dc=com\nldapvi-key: 42\ncn: foo\n\n");
        let key = p.peek(&mut c, Some(0)).unwrap().unwrap().key;
        assert_eq!(key, RecordKey::Index(42));
    }

    #[test]
    fn skips_version_line() {
        let p = parser();
        let mut c = cursor("version: 1\ndn: cn=foo,dc=example,dc=com\ncn: foo\n\n");
        let entry = p.read_entry(&mut c, Some(0)).unwrap();
        assert_eq!(entry.dn(), "cn=foo,dc=example,dc=com");
    }

    #[test]
    fn rejects_bad_version() {
        let p = parser();
        let mut c = cursor("version: 2\ndn: cn=foo,dc=example,dc=com\ncn: foo\n\n");
        assert!(p.read_entry(&mut c, Some(0)).is_err());
    }

    #[test]
    fn skips_comments_with_folding() {
        let p = parser();
        let mut c = cursor("# a long\n comment\ndn: cn=foo,dc=example,dc=com\ncn: foo\n\n");
        let entry = p.read_entry(&mut c, Some(0)).unwrap();
        assert_eq!(entry.attributes().len(), 1);
    }

    #[test]
    fn folds_value_lines() {
        let p = parser();
        let mut c = cursor("dn: cn=foo,dc=example,dc=com\ndescription: hello\n world\n\n");
        let entry = p.read_entry(&mut c, Some(0)).unwrap();
        assert_eq!(entry.find_attribute("description").unwrap().values(), &[b"helloworld".to_vec()]);
    }

    #[test]
    fn folds_attribute_names() {
        let p = parser();
        let mut c = cursor("dn: cn=foo,dc=example,dc=com\ndescr\n iption: hello\n\n");
        let entry = p.read_entry(&mut c, Some(0)).unwrap();
        assert_eq!(entry.find_attribute("description").unwrap().values(), &[b"hello".to_vec()]);
    }

    #[test]
    fn decodes_base64_value() {
        let p = parser();
        let mut c = cursor("dn: cn=foo,dc=example,dc=com\ncn:: aGVsbG8=\n\n");
        let entry = p.read_entry(&mut c, Some(0)).unwrap();
        assert_eq!(entry.find_attribute("cn").unwrap().values(), &[b"hello".to_vec()]);
    }

    #[test]
    fn rejects_control_lines() {
        let p = parser();
        let mut c = cursor("dn: cn=foo,dc=example,dc=com\ncontrol: 1.2.3 true\ncn: foo\n\n");
        assert!(p.read_entry(&mut c, Some(0)).is_err());
    }

    #[test]
    fn reads_delete_record() {
        let p = parser();
        let mut c = cursor("dn: cn=foo,dc=example,dc=com\nchangetype: delete\n\n");
        let dn = p.read_delete(&mut c, Some(0)).unwrap();
        assert_eq!(dn, "cn=foo,dc=example,dc=com");
    }

    #[test]
    fn delete_with_trailing_garbage_errors() {
        let p = parser();
        let mut c = cursor("dn: cn=foo,dc=example,dc=com\nchangetype: delete\ncn: foo\n\n");
        assert!(p.read_delete(&mut c, Some(0)).is_err());
    }

    #[test]
    fn reads_modify_record_with_multiple_blocks() {
        let p = parser();
        let mut c = cursor(
            "dn: cn=foo,dc=example,dc=com\nchangetype: modify\nadd: mail\nmail: a@example.com\n-\ndelete: phone\n-\nreplace: sn\nsn: Smith\n-\n\n",
        );
        let batch = p.read_modify(&mut c, Some(0)).unwrap();
        assert_eq!(batch.modifications.len(), 3);
        assert_eq!(batch.modifications[0].op, ModOp::Add);
        assert_eq!(batch.modifications[1].op, ModOp::Delete);
        assert_eq!(batch.modifications[1].values, None);
        assert_eq!(batch.modifications[2].op, ModOp::Replace);
    }

    #[test]
    fn modify_attribute_name_mismatch_errors() {
        let p = parser();
        let mut c = cursor("dn: cn=foo,dc=example,dc=com\nchangetype: modify\nadd: mail\nphone: 12345\n-\n\n");
        assert!(p.read_modify(&mut c, Some(0)).is_err());
    }

    #[test]
    fn reads_rename_with_newsuperior() {
        let p = parser();
        let mut c = cursor(
            "dn: cn=old,dc=example,dc=com\nchangetype: modrdn\nnewrdn: cn=new\ndeleteoldrdn: 1\nnewsuperior: dc=other,dc=com\n\n",
        );
        let rename = p.read_rename(&mut c, Some(0)).unwrap();
        assert_eq!(rename.new_rdn, "cn=new");
        assert_eq!(rename.new_superior.as_deref(), Some("dc=other,dc=com"));
        assert!(rename.delete_old_rdn);
    }

    #[test]
    fn rename_without_newsuperior_falls_back_to_old_parent() {
        let p = parser();
        let mut c = cursor("dn: cn=old,dc=example,dc=com\nchangetype: moddn\nnewrdn: cn=moved\ndeleteoldrdn: 0\n\n");
        let rename = p.read_rename(&mut c, Some(0)).unwrap();
        assert_eq!(rename.new_superior.as_deref(), Some("dc=example,dc=com"));
        assert!(!rename.delete_old_rdn);
    }

    #[test]
    fn rename_with_empty_newsuperior_falls_back_too() {
        let p = parser();
        let mut c = cursor(
            "dn: cn=old,dc=example,dc=com\nchangetype: modrdn\nnewrdn: cn=new\ndeleteoldrdn: 1\nnewsuperior:\n\n",
        );
        let rename = p.read_rename(&mut c, Some(0)).unwrap();
        assert_eq!(rename.new_superior.as_deref(), Some("dc=example,dc=com"));
    }

    #[test]
    fn rename_invalid_deleteoldrdn_errors() {
        let p = parser();
        let mut c = cursor("dn: cn=old,dc=example,dc=com\nchangetype: modrdn\nnewrdn: cn=new\ndeleteoldrdn: 2\n\n");
        assert!(p.read_rename(&mut c, Some(0)).is_err());
    }

    #[test]
    fn empty_document_yields_null_key() {
        let p = parser();
        let mut c = cursor("");
        assert!(p.peek(&mut c, Some(0)).unwrap().is_none());
    }
}
