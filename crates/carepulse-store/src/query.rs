//! Partition queries.
//!
//! A [`Query`] targets one partition of the primary key space or of a named
//! secondary index, with an optional condition on the sort key. Results come
//! back in sort-key order, ascending unless `descending` is set.

use crate::item::SecondaryIndex;

/// Which key space a query runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryIndex {
    /// The primary (partition, sort) key.
    #[default]
    Primary,
    /// One of the table's secondary indexes.
    Secondary(SecondaryIndex),
}

/// Condition on the sort key within the queried partition.
///
/// `Between` is inclusive at both ends, matching the backing store's range
/// semantics: with timestamps `t1 < t2 < t3`, a `Between(t1, t2)` query
/// returns the `t1` and `t2` records and excludes `t3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortCondition {
    BeginsWith(String),
    Between(String, String),
    AtMost(String),
}

impl SortCondition {
    /// Evaluate this condition against a sort key value.
    pub fn matches(&self, sort: &str) -> bool {
        match self {
            SortCondition::BeginsWith(prefix) => sort.starts_with(prefix.as_str()),
            SortCondition::Between(low, high) => {
                low.as_str() <= sort && sort <= high.as_str()
            },
            SortCondition::AtMost(high) => sort <= high.as_str(),
        }
    }
}

/// A partition query against the primary key or a secondary index.
#[derive(Debug, Clone, bon::Builder)]
pub struct Query {
    /// Partition key value to query.
    #[builder(into)]
    pub partition: String,

    /// Key space to query. Defaults to the primary key.
    #[builder(default)]
    pub index: QueryIndex,

    /// Optional sort-key condition.
    pub sort: Option<SortCondition>,

    /// Return results in descending sort-key order.
    #[builder(default)]
    pub descending: bool,

    /// Maximum number of items to return.
    pub limit: Option<usize>,
}
