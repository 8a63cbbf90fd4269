//! Post-crawl deduplication of the result collection.
//!
//! Reprocessing queries after a restart, and overlapping prefixes, put the
//! same person into the collection more than once. The first occurrence of
//! each key wins and the original order is preserved.

use crate::collection::JsonCollection;
use crate::error::Result;
use dirsweep_core::Record;
use std::collections::HashSet;
use tracing::info;

/// Counts from one filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterReport {
    /// Records read from the result collection
    pub before: usize,
    /// Records written to the filtered output
    pub after: usize,
}

/// Keep the first record for every distinct value of `key`.
///
/// Records without a string value for `key` cannot collide and are kept.
#[must_use]
pub fn dedupe(records: Vec<Record>, key: &str) -> Vec<Record> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| match record.key(key) {
            Some(value) => seen.insert(value.to_string()),
            None => true,
        })
        .collect()
}

/// Read `results`, dedupe on `key`, and write the survivors to `output`.
pub async fn filter_collection(
    results: &JsonCollection,
    output: &JsonCollection,
    key: &str,
) -> Result<FilterReport> {
    let records: Vec<Record> = results.load().await?;
    let before = records.len();

    let unique = dedupe(records, key);
    output.replace(&unique).await?;

    let report = FilterReport {
        before,
        after: unique.len(),
    };
    info!(
        before = report.before,
        after = report.after,
        output = %output.path().display(),
        "filtered records saved"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn kv(k: &str, v: i64) -> Record {
        Record::new().with("k", k).with("v", v)
    }

    #[test]
    fn test_first_occurrence_wins() {
        let deduped = dedupe(vec![kv("a", 1), kv("a", 2), kv("b", 3)], "k");
        assert_eq!(deduped, vec![kv("a", 1), kv("b", 3)]);
    }

    #[test]
    fn test_order_is_preserved() {
        let deduped = dedupe(
            vec![kv("c", 1), kv("a", 2), kv("c", 3), kv("b", 4), kv("a", 5)],
            "k",
        );
        let keys: Vec<_> = deduped.iter().filter_map(|r| r.key("k")).collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_records_without_key_are_kept() {
        let anonymous = Record::new().with("name", "No Email");
        let deduped = dedupe(
            vec![anonymous.clone(), kv("a", 1), anonymous.clone()],
            "k",
        );
        assert_eq!(deduped.len(), 3);
    }

    #[tokio::test]
    async fn test_filter_collection_writes_output() {
        let tmp = TempDir::new().expect("create temp dir");
        let results = JsonCollection::new(tmp.path().join("results.json"));
        let output = JsonCollection::new(tmp.path().join("filtered.json"));

        results
            .append(&[
                Record::new().with("email", "x@y").with("name", "X"),
                Record::new().with("email", "z@y").with("name", "Z"),
                Record::new().with("email", "x@y").with("name", "X again"),
            ])
            .await
            .expect("seed results");

        let report = filter_collection(&results, &output, "email")
            .await
            .expect("filter");
        assert_eq!(report, FilterReport { before: 3, after: 2 });

        let filtered: Vec<Record> = output.load().await.expect("load output");
        assert_eq!(filtered[0].get("name").and_then(|v| v.as_str()), Some("X"));
        assert_eq!(filtered[1].key("email"), Some("z@y"));
    }

    #[tokio::test]
    async fn test_filter_collection_on_missing_results() {
        let tmp = TempDir::new().expect("create temp dir");
        let results = JsonCollection::new(tmp.path().join("results.json"));
        let output = JsonCollection::new(tmp.path().join("out/filtered.json"));

        let report = filter_collection(&results, &output, "email")
            .await
            .expect("filter");

        assert_eq!(report, FilterReport { before: 0, after: 0 });
        assert_eq!(
            std::fs::read_to_string(output.path()).expect("read output"),
            "[]"
        );
    }
}
