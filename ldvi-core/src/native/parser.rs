use crate::codec::{base64_decode, hash_password, HashKind, PasswordHasher};
use crate::dn::{looks_like_dn, split_rdn};
use crate::entry::{ChangeBatch, Entry, ModOp, Modification, RenameDescriptor};
use crate::error::{ParseError, ParseErrorKind};
use crate::format::{PeekResult, PrintConfig, RecordKey, RecordParser};
use crate::stream::{LineReader, RawLine, ReadSeek};

use super::NativeFormat;

impl<'h> RecordParser for NativeFormat<'h> {
    fn peek(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<Option<PeekResult>, ParseError> {
        let mut reader = LineReader::new(stream);
        match enter_record(&mut reader, start)? {
            None => Ok(None),
            Some((offset, header)) => {
                let (token, _) = crate::stream::split_once_space(&header);
                Ok(Some(PeekResult { key: classify_key(token), offset }))
            }
        }
    }

    fn skip(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<Option<RecordKey>, ParseError> {
        let mut reader = LineReader::new(stream);
        match enter_record(&mut reader, start)? {
            None => Ok(None),
            Some((_offset, header)) => {
                let (token, _) = crate::stream::split_once_space(&header);
                let key = classify_key(token);
                skip_record_body(&mut reader, self.hasher)?;
                Ok(Some(key))
            }
        }
    }

    fn read_entry(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<Entry, ParseError> {
        let mut reader = LineReader::new(stream);
        let (offset, header) = enter_record(&mut reader, start)?
            .ok_or_else(|| ParseError::new(0, ParseErrorKind::UnexpectedEof))?;
        let (_token, rest) = crate::stream::split_once_space(&header);
        let dn = String::from_utf8_lossy(require_field(rest, offset, "DN")?).into_owned();
        validate_dn(&dn, offset)?;
        let mut entry = Entry::new(dn);
        loop {
            let line_offset = reader.position()?;
            match reader.read_byte()? {
                None => break,
                Some(b'\n') => break,
                Some(b'#') => {
                    skip_comment_and_folds(&mut reader)?;
                    continue;
                }
                Some(_) => {
                    reader.unread_byte()?;
                    let (ad, value) = parse_attribute_line(&mut reader, self.hasher, line_offset)?;
                    entry.merge_attribute_value(ad, value);
                }
            }
        }
        Ok(entry)
    }

    fn read_delete(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<String, ParseError> {
        let mut reader = LineReader::new(stream);
        let (offset, header) = enter_record(&mut reader, start)?
            .ok_or_else(|| ParseError::new(0, ParseErrorKind::UnexpectedEof))?;
        let (verb, rest) = crate::stream::split_once_space(&header);
        if verb != b"delete" {
            return Err(ParseError::new(
                offset,
                ParseErrorKind::InvalidVerb(String::from_utf8_lossy(verb).into_owned()),
            ));
        }
        let dn = String::from_utf8_lossy(require_field(rest, offset, "DN")?).into_owned();
        validate_dn(&dn, offset)?;
        expect_blank_or_eof(&mut reader, offset)?;
        Ok(dn)
    }

    fn read_modify(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<ChangeBatch, ParseError> {
        let mut reader = LineReader::new(stream);
        let (offset, header) = enter_record(&mut reader, start)?
            .ok_or_else(|| ParseError::new(0, ParseErrorKind::UnexpectedEof))?;
        let (verb, rest) = crate::stream::split_once_space(&header);
        if verb != b"modify" {
            return Err(ParseError::new(
                offset,
                ParseErrorKind::InvalidVerb(String::from_utf8_lossy(verb).into_owned()),
            ));
        }
        let dn = String::from_utf8_lossy(require_field(rest, offset, "DN")?).into_owned();
        validate_dn(&dn, offset)?;

        let mut modifications = Vec::new();
        loop {
            let op_offset = reader.position()?;
            match reader.read_byte()? {
                None => break,
                Some(b'\n') => break,
                Some(b'#') => {
                    skip_comment_and_folds(&mut reader)?;
                    continue;
                }
                Some(_) => {
                    reader.unread_byte()?;
                    let op_line = match reader.read_line()? {
                        RawLine::Line(l) => l,
                        RawLine::Eof | RawLine::Unterminated(_) => {
                            return Err(ParseError::new(op_offset, ParseErrorKind::MissingNewline));
                        }
                    };
                    let (verb, rest) = crate::stream::split_once_space(&op_line);
                    let op = match verb {
                        b"add" => ModOp::Add,
                        b"delete" => ModOp::Delete,
                        b"replace" => ModOp::Replace,
                        _ => {
                            return Err(ParseError::new(
                                op_offset,
                                ParseErrorKind::InvalidModifyVerb(String::from_utf8_lossy(verb).into_owned()),
                            ))
                        }
                    };
                    let ad = String::from_utf8_lossy(require_field(rest, op_offset, "attribute description")?).into_owned();

                    let mut values = Vec::new();
                    loop {
                        let val_offset = reader.position()?;
                        match reader.read_byte()? {
                            Some(b' ') => values.push(read_value(&mut reader, self.hasher, val_offset)?),
                            _ => {
                                reader.seek_to(val_offset)?;
                                break;
                            }
                        }
                    }
                    modifications.push(Modification {
                        op,
                        ad,
                        values: if values.is_empty() { None } else { Some(values) },
                    });
                }
            }
        }
        Ok(ChangeBatch { dn, modifications })
    }

    fn read_rename(&self, stream: &mut dyn ReadSeek, start: Option<u64>) -> Result<RenameDescriptor, ParseError> {
        let mut reader = LineReader::new(stream);
        let (offset, header) = enter_record(&mut reader, start)?
            .ok_or_else(|| ParseError::new(0, ParseErrorKind::UnexpectedEof))?;
        let (verb, rest) = crate::stream::split_once_space(&header);
        if verb != b"rename" {
            return Err(ParseError::new(
                offset,
                ParseErrorKind::InvalidVerb(String::from_utf8_lossy(verb).into_owned()),
            ));
        }
        let old_dn = String::from_utf8_lossy(require_field(rest, offset, "DN")?).into_owned();
        validate_dn(&old_dn, offset)?;

        let line2_offset = reader.position()?;
        let line2 = match reader.read_line()? {
            RawLine::Line(l) => l,
            RawLine::Eof | RawLine::Unterminated(_) => {
                return Err(ParseError::new(line2_offset, ParseErrorKind::MissingField("new dn")));
            }
        };
        let (kw, rest2) = crate::stream::split_once_space(&line2);
        let delete_old_rdn = match kw {
            b"add" => false,
            b"replace" => true,
            _ => {
                return Err(ParseError::new(
                    line2_offset,
                    ParseErrorKind::InvalidModifyVerb(String::from_utf8_lossy(kw).into_owned()),
                ))
            }
        };
        let new_dn = String::from_utf8_lossy(require_field(rest2, line2_offset, "new DN")?).into_owned();
        validate_dn(&new_dn, line2_offset)?;
        expect_blank_or_eof(&mut reader, line2_offset)?;

        let (new_rdn, new_superior) = split_rdn(&new_dn);
        Ok(RenameDescriptor { old_dn, new_rdn, new_superior, delete_old_rdn })
    }

    fn print_entry(
        &self,
        out: &mut dyn std::io::Write,
        index: u64,
        entry: &Entry,
        config: PrintConfig,
    ) -> std::io::Result<()> {
        super::printer::print_entry(out, index, entry, config)
    }
}

/// Parses `profile NAME` header records used by `~/.ldviprofiles`. Not part
/// of the [`RecordParser`] façade since profiles are a config concept, not
/// a directory record, but the on-disk grammar is identical to an entry.
pub fn read_profile(stream: &mut dyn ReadSeek, hasher: &dyn PasswordHasher) -> Result<Option<Entry>, ParseError> {
    let mut reader = LineReader::new(stream);
    let offset = reader.position()?;
    let header = match reader.read_line()? {
        RawLine::Eof => return Ok(None),
        RawLine::Line(l) => l,
        RawLine::Unterminated(_) => return Err(ParseError::new(offset, ParseErrorKind::MissingNewline)),
    };
    let (verb, rest) = crate::stream::split_once_space(&header);
    if verb != b"profile" {
        return Err(ParseError::new(
            offset,
            ParseErrorKind::InvalidVerb(String::from_utf8_lossy(verb).into_owned()),
        ));
    }
    let name = String::from_utf8_lossy(rest.unwrap_or(&[])).into_owned();
    let mut entry = Entry::new(name);
    loop {
        let line_offset = reader.position()?;
        match reader.read_byte()? {
            None => break,
            Some(b'\n') => break,
            Some(b'#') => {
                skip_comment_and_folds(&mut reader)?;
                continue;
            }
            Some(_) => {
                reader.unread_byte()?;
                let (ad, value) = parse_attribute_line(&mut reader, hasher, line_offset)?;
                entry.merge_attribute_value(ad, value);
            }
        }
    }
    Ok(Some(entry))
}

/// A record header's `key SP DN` (or `verb SP DN`, `modop SP AD`, ...) grammar
/// requires the separating space to actually be present - unlike a value
/// line, there is no way to write an empty trailing field without it. A
/// missing space (e.g. a bare `"0"` header with no DN at all) is a syntax
/// error, distinct from a present-but-empty field (`"0 "`, the root DSE).
fn require_field<'a>(rest: Option<&'a [u8]>, offset: u64, what: &'static str) -> Result<&'a [u8], ParseError> {
    rest.ok_or_else(|| ParseError::new(offset, ParseErrorKind::MissingField(what)))
}

fn expect_blank_or_eof(reader: &mut LineReader, at_offset: u64) -> Result<(), ParseError> {
    match reader.read_line()? {
        RawLine::Eof => Ok(()),
        RawLine::Line(l) if l.is_empty() => Ok(()),
        _ => Err(ParseError::new(at_offset, ParseErrorKind::TrailingGarbage)),
    }
}

fn classify_key(token: &[u8]) -> RecordKey {
    let text = String::from_utf8_lossy(token);
    if let Ok(n) = text.parse::<u64>() {
        return RecordKey::Index(n);
    }
    match text.as_ref() {
        "add" => RecordKey::Add,
        "delete" => RecordKey::Delete,
        "modify" => RecordKey::Modify,
        "rename" => RecordKey::Rename,
        _ => RecordKey::Label(text.into_owned()),
    }
}

fn validate_dn(dn: &str, offset: u64) -> Result<(), ParseError> {
    if looks_like_dn(dn) {
        Ok(())
    } else {
        Err(ParseError::new(offset, ParseErrorKind::InvalidDn(dn.to_string())))
    }
}

/// Seeks to `start` (if given), optionally consumes a leading `version
/// ldapvi` line at the very start of the stream, then skips blank
/// separator lines until a non-empty header line or a clean EOF is found.
fn enter_record(reader: &mut LineReader, start: Option<u64>) -> Result<Option<(u64, Vec<u8>)>, ParseError> {
    if let Some(pos) = start {
        reader.seek_to(pos)?;
    }
    if reader.position()? == 0 {
        let save = reader.position()?;
        match reader.read_line()? {
            RawLine::Line(line) => {
                let (token, rest) = crate::stream::split_once_space(&line);
                if token == b"version" {
                    let value = String::from_utf8_lossy(rest.unwrap_or(&[])).into_owned();
                    if value != "ldapvi" {
                        return Err(ParseError::new(save, ParseErrorKind::UnsupportedVersion(value)));
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
            RawLine::Line(line) => return Ok(Some((offset, line))),
            RawLine::Unterminated(line) => {
                if line.is_empty() {
                    return Ok(None);
                }
                return Err(ParseError::new(offset, ParseErrorKind::MissingNewline));
            }
        }
    }
}

fn skip_comment_and_folds(reader: &mut LineReader) -> Result<(), ParseError> {
    reader.read_line()?;
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

/// Scans an attribute description up to its `' '` or `':'` separator,
/// returning the name and which separator byte ended it.
fn read_ad_and_sep(reader: &mut LineReader, offset: u64) -> Result<(String, u8), ParseError> {
    let mut name = Vec::new();
    loop {
        match reader.read_byte()? {
            None => return Err(ParseError::new(offset, ParseErrorKind::MissingNewline)),
            Some(0) => return Err(ParseError::new(offset, ParseErrorKind::NulInAttributeDescription)),
            Some(b'\n') => return Err(ParseError::new(offset, ParseErrorKind::UnexpectedEol)),
            Some(b @ (b' ' | b':')) => return Ok((String::from_utf8_lossy(&name).into_owned(), b)),
            Some(b) => name.push(b),
        }
    }
}

fn parse_attribute_line(
    reader: &mut LineReader,
    hasher: &dyn PasswordHasher,
    offset: u64,
) -> Result<(String, Vec<u8>), ParseError> {
    let (ad, sep) = read_ad_and_sep(reader, offset)?;
    let value = if sep == b' ' {
        let (text, terminated) = read_text_value(reader)?;
        if !terminated {
            return Err(ParseError::new(offset, ParseErrorKind::MissingNewline));
        }
        text
    } else {
        read_tagged_value(reader, hasher, offset)?
    };
    Ok((ad, value))
}

/// Reads one value where the caller has already consumed a lone marker
/// space (a modify record's continuation value line) but doesn't yet know
/// whether a `:tag` follows or the bytes are a plain value directly.
fn read_value(reader: &mut LineReader, hasher: &dyn PasswordHasher, offset: u64) -> Result<Vec<u8>, ParseError> {
    match reader.read_byte()? {
        Some(b':') => read_tagged_value(reader, hasher, offset),
        Some(_) => {
            reader.unread_byte()?;
            let (text, terminated) = read_text_value(reader)?;
            if !terminated {
                return Err(ParseError::new(offset, ParseErrorKind::MissingNewline));
            }
            Ok(text)
        }
        None => Err(ParseError::new(offset, ParseErrorKind::UnexpectedEol)),
    }
}

/// Reads text up to (and consuming) the next unescaped newline.
/// `\\` collapses to a literal backslash and `\` immediately before a real
/// newline embeds a literal `\n` and keeps reading the next physical line
/// as part of the same value - ldvi's only form of line folding for values.
/// A trailing CR immediately before the newline is stripped, same as
/// [`crate::stream::LineReader::read_line`], so a CRLF-saved document reads
/// back identically to an LF one. Returns whether the text was properly
/// newline-terminated.
fn read_text_value(reader: &mut LineReader) -> Result<(Vec<u8>, bool), ParseError> {
    let mut out = Vec::new();
    loop {
        match reader.read_byte().map_err(ParseError::from)? {
            None => return Ok((out, false)),
            Some(b'\n') => {
                if out.last() == Some(&b'\r') {
                    out.pop();
                }
                return Ok((out, true));
            }
            Some(b'\\') => match reader.read_byte().map_err(ParseError::from)? {
                Some(b'\n') => out.push(b'\n'),
                Some(c) => out.push(c),
                None => return Ok((out, false)),
            },
            Some(b) => out.push(b),
        }
    }
}

/// Reads text up to (and consuming) the next newline with no escape
/// processing at all - used for base64 text and file URLs. Strips a
/// trailing CR the same way [`read_text_value`] does.
fn read_raw_line(reader: &mut LineReader) -> Result<(Vec<u8>, bool), ParseError> {
    let mut out = Vec::new();
    loop {
        match reader.read_byte().map_err(ParseError::from)? {
            None => return Ok((out, false)),
            Some(b'\n') => {
                if out.last() == Some(&b'\r') {
                    out.pop();
                }
                return Ok((out, true));
            }
            Some(b) => out.push(b),
        }
    }
}

/// Reads the part of a value after an `AD:` separator has already been
/// consumed: picks the tag from the next byte and decodes accordingly.
fn read_tagged_value(reader: &mut LineReader, hasher: &dyn PasswordHasher, offset: u64) -> Result<Vec<u8>, ParseError> {
    let tag_byte = reader
        .read_byte()?
        .ok_or_else(|| ParseError::new(offset, ParseErrorKind::UnexpectedEol))?;
    match tag_byte {
        b':' => {
            reader.skip_spaces()?;
            let (text, terminated) = read_raw_line(reader)?;
            if !terminated {
                return Err(ParseError::new(offset, ParseErrorKind::MissingNewline));
            }
            let s = String::from_utf8_lossy(&text).into_owned();
            base64_decode(&s).map_err(|e| ParseError::new(offset, ParseErrorKind::Codec(e)))
        }
        b';' => {
            reader.skip_spaces()?;
            let (text, terminated) = read_text_value(reader)?;
            if !terminated {
                return Err(ParseError::new(offset, ParseErrorKind::MissingNewline));
            }
            Ok(text)
        }
        b'<' => {
            reader.skip_spaces()?;
            let (text, terminated) = read_raw_line(reader)?;
            if !terminated {
                return Err(ParseError::new(offset, ParseErrorKind::MissingNewline));
            }
            let url = String::from_utf8_lossy(&text).into_owned();
            read_file_url(&url, offset)
        }
        b if b.is_ascii_digit() => {
            let mut digits = vec![b];
            loop {
                let pos = reader.position()?;
                match reader.read_byte()? {
                    Some(d) if d.is_ascii_digit() => digits.push(d),
                    Some(b' ') => break,
                    _ => {
                        reader.seek_to(pos)?;
                        break;
                    }
                }
            }
            let n: usize = std::str::from_utf8(&digits)
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| ParseError::new(offset, ParseErrorKind::NumericLengthOverflow(digits.len())))?;
            let bytes = reader.read_exact_bytes(n).map_err(ParseError::from)?;
            reader.skip_newline().map_err(ParseError::from)?;
            Ok(bytes)
        }
        first => {
            let mut word = vec![first];
            loop {
                match reader.read_byte()? {
                    Some(b' ') | None => break,
                    Some(c) => word.push(c),
                }
            }
            let word_str = String::from_utf8_lossy(&word).into_owned();
            let kind = HashKind::from_scheme_name(&word_str)
                .ok_or_else(|| ParseError::new(offset, ParseErrorKind::UnknownEncodingTag(word_str)))?;
            let (cleartext, terminated) = read_text_value(reader)?;
            if !terminated {
                return Err(ParseError::new(offset, ParseErrorKind::MissingNewline));
            }
            hash_password(kind, &cleartext, hasher).map_err(|e| ParseError::new(offset, ParseErrorKind::Codec(e)))
        }
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

fn skip_record_body(reader: &mut LineReader, hasher: &dyn PasswordHasher) -> Result<(), ParseError> {
    loop {
        let offset = reader.position()?;
        match reader.read_byte()? {
            None => break,
            Some(b'\n') => break,
            Some(b'#') => {
                skip_comment_and_folds(reader)?;
                continue;
            }
            Some(b' ') => {
                read_value(reader, hasher, offset)?;
            }
            Some(_) => {
                reader.unread_byte()?;
                let (_ad, sep) = read_ad_and_sep(reader, offset)?;
                if sep == b' ' {
                    let (_text, terminated) = read_text_value(reader)?;
                    if !terminated {
                        return Err(ParseError::new(offset, ParseErrorKind::MissingNewline));
                    }
                } else {
                    read_tagged_value(reader, hasher, offset)?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::UnsupportedHasher;
    use std::io::Cursor;

    fn parser() -> NativeFormat<'static> {
        NativeFormat::new(&UnsupportedHasher)
    }

    fn cursor(s: &str) -> Cursor<Vec<u8>> {
        Cursor::new(s.as_bytes().to_vec())
    }

    #[test]
    fn reads_simple_entry() {
        let p = parser();
        let mut c = cursor("add cn=foo,dc=example,dc=com\ncn foo\nsn bar\n\n");
        let entry = p.read_entry(&mut c, None).unwrap();
        assert_eq!(entry.dn(), "cn=foo,dc=example,dc=com");
        assert_eq!(entry.attributes().len(), 2);
        assert_eq!(entry.find_attribute("cn").unwrap().values(), &[b"foo".to_vec()]);
    }

    #[test]
    fn strips_cr_from_crlf_saved_values() {
        let p = parser();
        let mut c = Cursor::new(b"add cn=foo,dc=example,dc=com\r\ncn foo\r\nsn bar\r\n\r\n".to_vec());
        let entry = p.read_entry(&mut c, None).unwrap();
        assert_eq!(entry.dn(), "cn=foo,dc=example,dc=com");
        assert_eq!(entry.find_attribute("cn").unwrap().values(), &[b"foo".to_vec()]);
        assert_eq!(entry.find_attribute("sn").unwrap().values(), &[b"bar".to_vec()]);
    }

    #[test]
    fn rejects_bad_version() {
        let p = parser();
        let mut c = cursor("version 1\nadd cn=foo,dc=example,dc=com\ncn foo\n\n");
        assert!(p.read_entry(&mut c, None).is_err());
    }

    #[test]
    fn skips_version_and_comments() {
        let p = parser();
        let mut c = cursor("version ldapvi\nadd cn=foo,dc=example,dc=com\n# a comment\n continued\ncn foo\n\n");
        let entry = p.read_entry(&mut c, None).unwrap();
        assert_eq!(entry.attributes().len(), 1);
    }

    #[test]
    fn decodes_backslash_continuation() {
        let p = parser();
        let mut c = cursor("add cn=foo,dc=example,dc=com\ndescription one\\\ntwo\n\n");
        let entry = p.read_entry(&mut c, None).unwrap();
        assert_eq!(
            entry.find_attribute("description").unwrap().values(),
            &[b"one\ntwo".to_vec()]
        );
    }

    #[test]
    fn decodes_base64() {
        let p = parser();
        let mut c = cursor("add cn=foo,dc=example,dc=com\ncn:: Zm9v\n\n");
        let entry = p.read_entry(&mut c, None).unwrap();
        assert_eq!(entry.find_attribute("cn").unwrap().values(), &[b"foo".to_vec()]);
    }

    #[test]
    fn decodes_numeric_length_with_embedded_bytes() {
        let p = parser();
        let mut c = cursor("add cn=foo,dc=example,dc=com\ncn:7 foo\nbar\n\n");
        let entry = p.read_entry(&mut c, None).unwrap();
        assert_eq!(entry.find_attribute("cn").unwrap().values(), &[b"foo\nbar".to_vec()]);
    }

    #[test]
    fn unknown_encoding_tag_errors() {
        let p = parser();
        let mut c = cursor("add cn=foo,dc=example,dc=com\ncn:bogus val\n\n");
        assert!(p.read_entry(&mut c, None).is_err());
    }

    #[test]
    fn reads_delete_record() {
        let p = parser();
        let mut c = cursor("delete cn=foo,dc=example,dc=com\n\n");
        let dn = p.read_delete(&mut c, None).unwrap();
        assert_eq!(dn, "cn=foo,dc=example,dc=com");
    }

    #[test]
    fn reads_modify_record_with_multiple_ops() {
        let p = parser();
        let mut c = cursor(
            "modify cn=foo,dc=example,dc=com\nadd mail\n foo@example.com\n bar@example.com\ndelete phone\n\n",
        );
        let batch = p.read_modify(&mut c, None).unwrap();
        assert_eq!(batch.modifications.len(), 2);
        assert_eq!(batch.modifications[0].ad, "mail");
        assert_eq!(
            batch.modifications[0].values.as_ref().unwrap(),
            &[b"foo@example.com".to_vec(), b"bar@example.com".to_vec()]
        );
        assert_eq!(batch.modifications[1].op, ModOp::Delete);
        assert_eq!(batch.modifications[1].values, None);
    }

    #[test]
    fn reads_rename_record() {
        let p = parser();
        let mut c = cursor("rename cn=old,dc=example,dc=com\nreplace cn=new,dc=example,dc=com\n\n");
        let rename = p.read_rename(&mut c, None).unwrap();
        assert_eq!(rename.old_dn, "cn=old,dc=example,dc=com");
        assert_eq!(rename.new_rdn, "cn=new");
        assert_eq!(rename.new_superior.as_deref(), Some("dc=example,dc=com"));
        assert!(rename.delete_old_rdn);
    }

    #[test]
    fn peek_reports_key_and_does_not_consume() {
        let p = parser();
        let mut c = cursor("42 cn=foo,dc=example,dc=com\ncn foo\n\n");
        let result = p.peek(&mut c, Some(0)).unwrap().unwrap();
        assert_eq!(result.key, RecordKey::Index(42));
        let entry = p.read_entry(&mut c, Some(0)).unwrap();
        assert_eq!(entry.attributes().len(), 1);
    }

    #[test]
    fn skip_modify_body_returns_key() {
        let p = parser();
        let mut c = cursor("modify cn=foo,dc=example,dc=com\nadd mail\n foo@example.com\n\n");
        let key = p.skip(&mut c, None).unwrap().unwrap();
        assert_eq!(key, RecordKey::Modify);
    }
}
