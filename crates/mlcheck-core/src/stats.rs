//! Per-document statistics and the batch accumulator

use serde::{Deserialize, Serialize};

/// Counts for one validated document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Open-tag events (HTML) or element nodes (XML)
    pub tag_or_node_count: usize,
    pub error_count: usize,
}

impl ValidationStats {
    pub fn new(tag_or_node_count: usize, error_count: usize) -> Self {
        Self {
            tag_or_node_count,
            error_count,
        }
    }

    /// Stats for a document that could not be read at all
    pub fn read_failure() -> Self {
        Self::new(0, 1)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

/// Running totals over a set of documents
///
/// Owned by whoever drives the batch; there is no shared state behind it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub files_scanned: usize,
    pub files_with_errors: usize,
    pub total_errors: usize,
    pub total_tags: usize,
}

impl BatchSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one more document
    pub fn record(&mut self, stats: &ValidationStats) {
        self.files_scanned += 1;
        self.total_tags += stats.tag_or_node_count;
        self.total_errors += stats.error_count;
        if stats.has_errors() {
            self.files_with_errors += 1;
        }
    }

    /// Fold another summary into this one
    pub fn merge(&mut self, other: &BatchSummary) {
        self.files_scanned += other.files_scanned;
        self.files_with_errors += other.files_with_errors;
        self.total_errors += other.total_errors;
        self.total_tags += other.total_tags;
    }

    pub fn is_empty(&self) -> bool {
        self.files_scanned == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_files_with_errors_once() {
        let mut summary = BatchSummary::new();
        summary.record(&ValidationStats::new(10, 0));
        summary.record(&ValidationStats::new(4, 3));
        summary.record(&ValidationStats::read_failure());

        assert_eq!(
            summary,
            BatchSummary {
                files_scanned: 3,
                files_with_errors: 2,
                total_errors: 4,
                total_tags: 14,
            }
        );
    }

    #[test]
    fn test_merge_adds_every_counter() {
        let mut global = BatchSummary::new();
        assert!(global.is_empty());

        let mut first = BatchSummary::new();
        first.record(&ValidationStats::new(2, 1));
        let mut second = BatchSummary::new();
        second.record(&ValidationStats::new(5, 0));

        global.merge(&first);
        global.merge(&second);

        assert_eq!(global.files_scanned, 2);
        assert_eq!(global.files_with_errors, 1);
        assert_eq!(global.total_errors, 1);
        assert_eq!(global.total_tags, 7);
    }
}
