//! Per-item reports for sequential multi-request operations

use std::fmt;

/// What happened to one item of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Applied; carries the backend ID of the created or deleted row
    Applied { id: Option<i64> },
    Failed { message: String },
    /// Skipped because an earlier item failed
    NotAttempted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchItem<K> {
    pub key: K,
    pub outcome: ItemOutcome,
}

/// Outcome of a batch that stops at its first failure.
///
/// Nothing is rolled back: items before the failure stay applied, and the
/// report says exactly which ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport<K> {
    pub items: Vec<BatchItem<K>>,
    /// Single user-facing failure message, set when an item failed
    pub failure: Option<String>,
}

impl<K> BatchReport<K> {
    /// Report with every item not yet attempted
    pub fn pending(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            items: keys
                .into_iter()
                .map(|key| BatchItem {
                    key,
                    outcome: ItemOutcome::NotAttempted,
                })
                .collect(),
            failure: None,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn applied_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Applied { .. }))
            .count()
    }

    pub fn not_attempted_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.outcome == ItemOutcome::NotAttempted)
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.applied_count() == self.items.len()
    }

    /// Backend ID of the last applied item
    pub fn last_applied_id(&self) -> Option<i64> {
        self.items.iter().rev().find_map(|item| match item.outcome {
            ItemOutcome::Applied { id } => id,
            _ => None,
        })
    }

    pub fn applied(&self) -> impl Iterator<Item = &K> {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Applied { .. }))
            .map(|item| &item.key)
    }

    pub(crate) fn mark_applied(&mut self, index: usize, id: Option<i64>) {
        if let Some(item) = self.items.get_mut(index) {
            item.outcome = ItemOutcome::Applied { id };
        }
    }

    /// Record the failing item and stop the batch with `summary`
    pub(crate) fn mark_failed(&mut self, index: usize, message: String, summary: String) {
        if let Some(item) = self.items.get_mut(index) {
            item.outcome = ItemOutcome::Failed { message };
        }
        self.failure = Some(summary);
    }
}

impl<K> fmt::Display for BatchReport<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} applied", self.applied_count(), self.items.len())?;
        if let Some(failure) = &self.failure {
            write!(f, " ({})", failure)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_bookkeeping() {
        let mut report = BatchReport::pending(["a", "b", "c"]);
        assert_eq!(report.not_attempted_count(), 3);

        report.mark_applied(0, Some(10));
        report.mark_failed(1, "duplicate".into(), "Booking failed".into());

        assert_eq!(report.applied_count(), 1);
        assert_eq!(report.not_attempted_count(), 1);
        assert_eq!(report.last_applied_id(), Some(10));
        assert!(!report.is_complete());
        assert_eq!(report.applied().copied().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(report.to_string(), "1 of 3 applied (Booking failed)");
    }

    #[test]
    fn test_empty_report_is_complete() {
        let report = BatchReport::<u8>::pending([]);
        assert!(report.is_complete());
        assert!(report.last_applied_id().is_none());
    }
}
