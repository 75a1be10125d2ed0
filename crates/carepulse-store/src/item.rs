//! Items and keys.
//!
//! An [`Item`] is the unit of storage: a primary [`ItemKey`], up to three
//! secondary index key pairs, a flat map of scalar attributes (used by
//! conditional writes), and an opaque serialized payload. Secondary index
//! entries are derived from the primary item on every write; they are never
//! written independently.

use std::collections::BTreeMap;

/// A composite primary or index key: partition key plus sort key.
///
/// Keys are plain strings. Range queries rely on lexicographic sort-key
/// ordering, so callers encoding timestamps into sort keys must use a
/// fixed-width encoding.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey {
    pub partition: String,
    pub sort: String,
}

impl ItemKey {
    /// Create a key from partition and sort components.
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self { partition: partition.into(), sort: sort.into() }
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.partition, self.sort)
    }
}

/// One of the fixed set of secondary indexes a table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecondaryIndex {
    Gsi1,
    Gsi2,
    Gsi3,
}

impl SecondaryIndex {
    /// All secondary indexes, in declaration order.
    pub const ALL: [SecondaryIndex; 3] =
        [SecondaryIndex::Gsi1, SecondaryIndex::Gsi2, SecondaryIndex::Gsi3];

    /// The backend-facing index name.
    pub fn name(&self) -> &'static str {
        match self {
            SecondaryIndex::Gsi1 => "gsi1",
            SecondaryIndex::Gsi2 => "gsi2",
            SecondaryIndex::Gsi3 => "gsi3",
        }
    }

    /// Zero-based position, used by backends that store index entries in
    /// per-index structures.
    pub fn position(&self) -> usize {
        match self {
            SecondaryIndex::Gsi1 => 0,
            SecondaryIndex::Gsi2 => 1,
            SecondaryIndex::Gsi3 => 2,
        }
    }
}

/// Secondary index key pairs for an item. Absent pairs mean the item does not
/// appear in that index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexKeys {
    pub gsi1: Option<ItemKey>,
    pub gsi2: Option<ItemKey>,
    pub gsi3: Option<ItemKey>,
}

impl IndexKeys {
    /// Look up the key pair for one index.
    pub fn get(&self, index: SecondaryIndex) -> Option<&ItemKey> {
        match index {
            SecondaryIndex::Gsi1 => self.gsi1.as_ref(),
            SecondaryIndex::Gsi2 => self.gsi2.as_ref(),
            SecondaryIndex::Gsi3 => self.gsi3.as_ref(),
        }
    }

    /// Returns true if the item appears in no secondary index.
    pub fn is_empty(&self) -> bool {
        self.gsi1.is_none() && self.gsi2.is_none() && self.gsi3.is_none()
    }
}

/// A stored record: primary key, derived index keys, scalar attributes, and
/// the serialized entity payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub key: ItemKey,
    pub index_keys: IndexKeys,
    pub attributes: BTreeMap<String, String>,
    pub payload: Vec<u8>,
}

impl Item {
    /// Create an item with no index keys and no attributes.
    pub fn new(key: ItemKey, payload: Vec<u8>) -> Self {
        Self { key, index_keys: IndexKeys::default(), attributes: BTreeMap::new(), payload }
    }

    /// Attach secondary index keys.
    pub fn with_index_keys(mut self, index_keys: IndexKeys) -> Self {
        self.index_keys = index_keys;
        self
    }

    /// Attach a scalar attribute (visible to conditional writes).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Read a scalar attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}
