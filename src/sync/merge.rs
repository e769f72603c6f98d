//! Merge-by-identifier reconciliation of local and remote collections.

use std::collections::HashMap;

use crate::data::JobRecord;

/// Union of `local` and `remote` keyed by id. When both sides carry the same
/// id the remote version wins; there is no timestamp comparison, so a local
/// edit made after the remote was fetched is overwritten.
///
/// Output keeps local order, followed by remote-only records in remote order.
pub fn merge(local: &[JobRecord], remote: &[JobRecord]) -> Vec<JobRecord> {
    let mut merged: Vec<JobRecord> = Vec::with_capacity(local.len() + remote.len());
    let mut index: HashMap<String, usize> = HashMap::with_capacity(local.len() + remote.len());

    for record in local.iter().chain(remote.iter()) {
        match index.get(&record.id) {
            Some(&pos) => merged[pos] = record.clone(),
            None => {
                index.insert(record.id.clone(), merged.len());
                merged.push(record.clone());
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(json: serde_json::Value) -> JobRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_remote_wins_and_union() {
        let local = vec![record(serde_json::json!({"id": 1, "v": "a"}))];
        let remote = vec![
            record(serde_json::json!({"id": 1, "v": "b"})),
            record(serde_json::json!({"id": 2, "v": "c"})),
        ];

        let merged = merge(&local, &remote);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id, "1");
        assert_eq!(merged[0].extra["v"], "b");
        assert_eq!(merged[1].id, "2");
        assert_eq!(merged[1].extra["v"], "c");
    }

    #[test]
    fn test_local_only_records_are_kept() {
        let local = vec![
            record(serde_json::json!({"id": "l1", "company": "Acme"})),
            record(serde_json::json!({"id": "shared", "company": "Old"})),
        ];
        let remote = vec![record(serde_json::json!({"id": "shared", "company": "New"}))];

        let merged = merge(&local, &remote);

        let companies: Vec<&str> = merged.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(companies, vec!["Acme", "New"]);
    }

    #[test]
    fn test_empty_sides() {
        let local = vec![record(serde_json::json!({"id": "x"}))];
        assert_eq!(merge(&local, &[]), local);
        assert_eq!(merge(&[], &local), local);
        assert!(merge(&[], &[]).is_empty());
    }

    #[test]
    fn test_no_duplicate_ids() {
        let local: Vec<JobRecord> = (0..5)
            .map(|i| record(serde_json::json!({"id": i.to_string()})))
            .collect();
        let remote: Vec<JobRecord> = (3..8)
            .map(|i| record(serde_json::json!({"id": i.to_string()})))
            .collect();

        let merged = merge(&local, &remote);
        let mut ids: Vec<&str> = merged.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), merged.len());
        assert_eq!(merged.len(), 8);
    }
}
