//! Conditional-write guards.
//!
//! A [`Condition`] is evaluated by the backend against the current state of
//! the keyed item, atomically with the write it guards. Rejection surfaces as
//! [`StoreError::ConditionFailed`](crate::StoreError::ConditionFailed).

use crate::item::Item;

/// Guard expression for a conditional put or delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// The keyed item must not exist.
    NotExists,

    /// The keyed item must exist and carry an attribute equal to the value.
    AttributeEquals { name: String, value: String },

    /// The keyed item must not exist, or its attribute must sort strictly
    /// below the value. An existing item missing the attribute fails the
    /// condition.
    NotExistsOrLessThan { name: String, value: String },
}

impl Condition {
    /// Evaluate the condition against the item currently stored under the
    /// target key, if any.
    pub fn holds(&self, existing: Option<&Item>) -> bool {
        match self {
            Condition::NotExists => existing.is_none(),
            Condition::AttributeEquals { name, value } => existing
                .map_or(false, |item| item.attribute(name) == Some(value.as_str())),
            Condition::NotExistsOrLessThan { name, value } => match existing {
                None => true,
                Some(item) => {
                    item.attribute(name).map_or(false, |current| current < value.as_str())
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemKey;

    fn lock_item(expires_at: &str) -> Item {
        Item::new(ItemKey::new("LOCK#jobs", "LOCK"), Vec::new())
            .with_attribute("holder_id", "worker-a")
            .with_attribute("expires_at", expires_at)
    }

    #[test]
    fn test_not_exists() {
        assert!(Condition::NotExists.holds(None));
        assert!(!Condition::NotExists.holds(Some(&lock_item("2024-01-01T00:00:00.000Z"))));
    }

    #[test]
    fn test_attribute_equals() {
        let cond = Condition::AttributeEquals {
            name: "holder_id".to_string(),
            value: "worker-a".to_string(),
        };
        assert!(cond.holds(Some(&lock_item("2024-01-01T00:00:00.000Z"))));

        let other = Condition::AttributeEquals {
            name: "holder_id".to_string(),
            value: "worker-b".to_string(),
        };
        assert!(!other.holds(Some(&lock_item("2024-01-01T00:00:00.000Z"))));
        assert!(!other.holds(None));
    }

    #[test]
    fn test_not_exists_or_less_than() {
        let cond = Condition::NotExistsOrLessThan {
            name: "expires_at".to_string(),
            value: "2024-06-01T00:00:00.000Z".to_string(),
        };
        // Absent row: acquirable.
        assert!(cond.holds(None));
        // Expired lease: acquirable.
        assert!(cond.holds(Some(&lock_item("2024-01-01T00:00:00.000Z"))));
        // Live lease: held.
        assert!(!cond.holds(Some(&lock_item("2024-12-01T00:00:00.000Z"))));
        // Existing row without the attribute: held.
        let bare = Item::new(ItemKey::new("LOCK#jobs", "LOCK"), Vec::new());
        assert!(!cond.holds(Some(&bare)));
    }
}
