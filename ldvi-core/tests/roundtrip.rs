//! Round-trip property: printing an entry and reading it back through the
//! same format's parser reproduces the entry, once attribute and value
//! order are normalized away (the wire formats don't promise to preserve
//! either).

use std::io::Cursor;

use pretty_assertions::assert_eq;

use ldvi_core::codec::UnsupportedHasher;
use ldvi_core::native::NativeFormat;
use ldvi_core::strict::StrictFormat;
use ldvi_core::{Attribute, Entry, PrintConfig, RecordParser};

fn normalized(mut entry: Entry) -> Entry {
    for attr in entry.attributes_mut() {
        attr.values_mut().sort();
    }
    entry.attributes_mut().sort();
    entry
}

fn sample_entry() -> Entry {
    let mut entry = Entry::new("cn=foo,dc=example,dc=com");
    entry.attributes_mut().push(Attribute::with_values("cn", vec![b"foo".to_vec()]));
    entry.attributes_mut().push(Attribute::with_values(
        "mail",
        vec![b"foo@example.com".to_vec(), b"foo2@example.com".to_vec()],
    ));
    entry.attributes_mut().push(Attribute::with_values("jpegPhoto", vec![vec![0u8, 1, 2, 255, 10]]));
    entry
}

#[test]
fn native_round_trip_normalizes_to_the_same_entry() {
    let parser = NativeFormat::new(&UnsupportedHasher);
    let entry = sample_entry();

    let mut buf = Vec::new();
    parser.print_entry(&mut buf, 0, &entry, PrintConfig::default()).unwrap();

    let mut stream = Cursor::new(buf);
    let read_back = parser.read_entry(&mut stream, Some(0)).unwrap();

    assert_eq!(normalized(entry), normalized(read_back));
}

#[test]
fn strict_round_trip_normalizes_to_the_same_entry() {
    let parser = StrictFormat::new();
    let entry = sample_entry();

    let mut buf = Vec::new();
    parser.print_entry(&mut buf, 0, &entry, PrintConfig::default()).unwrap();

    let mut stream = Cursor::new(buf);
    let read_back = parser.read_entry(&mut stream, Some(0)).unwrap();

    assert_eq!(normalized(entry), normalized(read_back));
}

#[test]
fn native_round_trip_preserves_a_literal_backslash() {
    let parser = NativeFormat::new(&UnsupportedHasher);
    let mut entry = Entry::new("cn=foo,dc=example,dc=com");
    entry.attributes_mut().push(Attribute::with_values("description", vec![b"a\\b".to_vec()]));

    let mut buf = Vec::new();
    parser.print_entry(&mut buf, 0, &entry, PrintConfig::default()).unwrap();

    let mut stream = Cursor::new(buf);
    let read_back = parser.read_entry(&mut stream, Some(0)).unwrap();

    assert_eq!(read_back.find_attribute("description").unwrap().values()[0], b"a\\b");
}

#[test]
fn strict_round_trip_base64_encodes_and_decodes_binary_values() {
    let parser = StrictFormat::new();
    let mut entry = Entry::new("cn=foo,dc=example,dc=com");
    entry.attributes_mut().push(Attribute::with_values("jpegPhoto", vec![vec![0u8, 1, 2, 255]]));

    let mut buf = Vec::new();
    parser.print_entry(&mut buf, 0, &entry, PrintConfig::default()).unwrap();
    let rendered = String::from_utf8(buf.clone()).unwrap();
    assert!(rendered.contains("jpegPhoto:: "));

    let mut stream = Cursor::new(buf);
    let read_back = parser.read_entry(&mut stream, Some(0)).unwrap();
    assert_eq!(read_back.find_attribute("jpegPhoto").unwrap().values()[0], vec![0u8, 1, 2, 255]);
}
