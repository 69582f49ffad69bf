//! The out-of-scope network collaborator: establishing a session to the
//! directory, authenticating, running the search, and dispatching the
//! resulting change operations. The core only needs the two trait
//! boundaries below; actually speaking the LDAP wire protocol to a remote
//! server is deliberately not implemented here, the same way this tool's
//! schema support defaults to [`ldvi_core::NullEntroid`] and its password
//! hashing defaults to `UnsupportedHasher` when no real backend is wired
//! up - a consumed-only contract with an inert stand-in.

use std::io;

use ldvi_core::{Attribute, ChangeHandler, Entry, Modification};

/// Supplies a lazy sequence of `(dn, attributes)` pairs, one per search
/// result, assigning consecutive indices starting at 0 as the glue builds
/// the offset index.
pub trait EntryProducer {
    fn next_entry(&mut self) -> io::Result<Option<(String, Vec<Attribute>)>>;
}

/// Connection parameters for a directory session. Consumed only as
/// configuration in this build - see the module doc comment.
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub bind_dn: Option<String>,
}

/// A directory session that never actually connects. Every method reports
/// the same "not wired up" error, so a caller that reaches this type finds
/// out immediately rather than hanging on a socket this build never opens.
#[derive(Debug, Clone, Default)]
pub struct NullDirectoryConnection {
    pub config: ConnectionConfig,
}

fn unsupported() -> io::Error {
    io::Error::new(io::ErrorKind::Unsupported, "no directory backend is wired up in this build")
}

impl EntryProducer for NullDirectoryConnection {
    fn next_entry(&mut self) -> io::Result<Option<(String, Vec<Attribute>)>> {
        Err(unsupported())
    }
}

impl ChangeHandler for NullDirectoryConnection {
    fn change(&mut self, _key: u64, _old_dn: &str, _new_dn: &str, _modifications: &[Modification]) -> bool {
        false
    }

    fn rename(&mut self, _key: u64, _old_dn: &str, _new_entry: &Entry) -> bool {
        false
    }

    fn rename0(&mut self, _old_dn: &str, _new_rdn: &str, _new_superior: Option<&str>, _delete_old_rdn: bool) -> bool {
        false
    }

    fn add(&mut self, _key: u64, _dn: &str, _modifications: &[Modification]) -> bool {
        false
    }

    fn delete(&mut self, _key: Option<u64>, _dn: &str) -> bool {
        false
    }
}

/// An in-memory [`EntryProducer`] that yields a fixed list of entries, used
/// by tests and by `--input-file`-style offline workflows that don't touch
/// a real directory at all.
#[derive(Debug, Clone, Default)]
pub struct StaticEntryProducer {
    entries: std::collections::VecDeque<(String, Vec<Attribute>)>,
}

impl StaticEntryProducer {
    pub fn new(entries: Vec<(String, Vec<Attribute>)>) -> Self {
        StaticEntryProducer { entries: entries.into() }
    }
}

impl EntryProducer for StaticEntryProducer {
    fn next_entry(&mut self) -> io::Result<Option<(String, Vec<Attribute>)>> {
        Ok(self.entries.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_producer_yields_entries_in_order_then_none() {
        let mut producer = StaticEntryProducer::new(vec![
            ("cn=a,dc=example,dc=com".to_string(), Vec::new()),
            ("cn=b,dc=example,dc=com".to_string(), Vec::new()),
        ]);
        assert_eq!(producer.next_entry().unwrap().unwrap().0, "cn=a,dc=example,dc=com");
        assert_eq!(producer.next_entry().unwrap().unwrap().0, "cn=b,dc=example,dc=com");
        assert!(producer.next_entry().unwrap().is_none());
    }

    #[test]
    fn null_connection_reports_unsupported() {
        let mut conn = NullDirectoryConnection::default();
        assert!(conn.next_entry().is_err());
        assert!(!conn.add(0, "cn=a,dc=example,dc=com", &[]));
    }
}
