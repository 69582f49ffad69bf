//! Small distinguished-name helpers shared by both parsers.
//!
//! This crate treats a DN as an opaque, already-escaped string wherever
//! possible; the one place it has to look inside one is splitting a rename
//! target into its RDN and parent, since both textual formats accept a
//! rename as a single new DN rather than separate RDN/superior fields.

/// True if `dn` looks like a distinguished name: either empty (the root
/// DSE) or containing at least one `attr=value` component.
pub(crate) fn looks_like_dn(dn: &str) -> bool {
    dn.is_empty() || dn.contains('=')
}

/// Splits a DN into its leading RDN and, if any, the remaining superior DN.
/// Does not attempt to un-escape embedded commas; a `,` inside a
/// backslash-escaped or quoted RDN value would split incorrectly, but none
/// of this tool's own generated DNs ever need that and a user typing one by
/// hand is expected to keep it simple.
pub(crate) fn split_rdn(dn: &str) -> (String, Option<String>) {
    match dn.find(',') {
        Some(idx) => (dn[..idx].to_string(), Some(dn[idx + 1..].to_string())),
        None => (dn.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_first_comma() {
        assert_eq!(
            split_rdn("cn=new,dc=example,dc=com"),
            ("cn=new".to_string(), Some("dc=example,dc=com".to_string()))
        );
    }

    #[test]
    fn no_comma_means_no_superior() {
        assert_eq!(split_rdn("cn=new"), ("cn=new".to_string(), None));
    }
}
