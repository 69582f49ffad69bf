//! The in-memory entry model: a distinguished name plus an ordered set of
//! attributes, each holding one or more byte-string values.
//!
//! Values are `Vec<u8>` rather than `String` throughout this crate -
//! directory values are not guaranteed to be valid UTF-8 (password hashes,
//! JPEG photos, raw binary certificates), and the whole point of the codec
//! in [`crate::codec`] is to carry those bytes safely through a text editor.

use std::cmp::Ordering;

/// One attribute description and its values, in the order they were read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    ad: String,
    values: Vec<Vec<u8>>,
}

impl Attribute {
    pub fn new(ad: impl Into<String>) -> Self {
        Attribute { ad: ad.into(), values: Vec::new() }
    }

    pub fn with_values(ad: impl Into<String>, values: Vec<Vec<u8>>) -> Self {
        Attribute { ad: ad.into(), values }
    }

    pub fn ad(&self) -> &str {
        &self.ad
    }

    pub fn values(&self) -> &[Vec<u8>] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut Vec<Vec<u8>> {
        &mut self.values
    }

    pub fn append_value(&mut self, value: Vec<u8>) {
        self.values.push(value);
    }

    pub fn find_value(&self, value: &[u8]) -> bool {
        self.values.iter().any(|v| v.as_slice() == value)
    }

    pub fn remove_value(&mut self, value: &[u8]) -> bool {
        let before = self.values.len();
        self.values.retain(|v| v.as_slice() != value);
        self.values.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PartialOrd for Attribute {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Attribute {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ad.to_ascii_lowercase().cmp(&other.ad.to_ascii_lowercase())
    }
}

/// A directory entry: one DN plus its attributes.
///
/// Attribute descriptions are compared case-insensitively, matching LDAP's
/// own attribute-type matching rules, but the original casing a user typed
/// is preserved for printing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    dn: String,
    attributes: Vec<Attribute>,
}

impl Entry {
    pub fn new(dn: impl Into<String>) -> Self {
        Entry { dn: dn.into(), attributes: Vec::new() }
    }

    pub fn dn(&self) -> &str {
        &self.dn
    }

    pub fn set_dn(&mut self, dn: impl Into<String>) {
        self.dn = dn.into();
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Vec<Attribute> {
        &mut self.attributes
    }

    pub fn find_attribute(&self, ad: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.ad().eq_ignore_ascii_case(ad))
    }

    pub fn find_attribute_mut(&mut self, ad: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|a| a.ad().eq_ignore_ascii_case(ad))
    }

    pub fn find_or_create_attribute(&mut self, ad: &str) -> &mut Attribute {
        if self.find_attribute(ad).is_none() {
            self.attributes.push(Attribute::new(ad));
        }
        self.find_attribute_mut(ad).expect("just inserted")
    }

    /// Adds one freshly-parsed value line. A repeated attribute description
    /// within the same entry (`cn foo` then `cn bar`) folds into the one
    /// attribute's value list rather than producing a second attribute,
    /// matching how a user types a multi-valued attribute by hand.
    pub fn merge_attribute_value(&mut self, ad: String, value: Vec<u8>) {
        self.find_or_create_attribute(&ad).append_value(value);
    }

    pub fn remove_attribute(&mut self, ad: &str) -> bool {
        let before = self.attributes.len();
        self.attributes.retain(|a| !a.ad().eq_ignore_ascii_case(ad));
        self.attributes.len() != before
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dn.cmp(&other.dn)
    }
}

/// The kind of change a single modify operation represents (RFC 4511 §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModOp {
    Add,
    Delete,
    Replace,
}

impl ModOp {
    pub fn as_verb(self) -> &'static str {
        match self {
            ModOp::Add => "add",
            ModOp::Delete => "delete",
            ModOp::Replace => "replace",
        }
    }
}

/// One `add:`/`delete:`/`replace:` block inside a modify record.
///
/// `values` is `None` for a bare `delete: ad` with no following value lines,
/// meaning "delete every value of this attribute".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub op: ModOp,
    pub ad: String,
    pub values: Option<Vec<Vec<u8>>>,
}

/// A full modify record: a target DN plus the ordered list of changes to
/// apply to it, dispatched as one `ChangeHandler::change` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBatch {
    pub dn: String,
    pub modifications: Vec<Modification>,
}

/// A `modrdn`/`moddn` record: move and/or rename an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDescriptor {
    pub old_dn: String,
    pub new_rdn: String,
    pub new_superior: Option<String>,
    pub delete_old_rdn: bool,
}
