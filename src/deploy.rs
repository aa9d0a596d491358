use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use storage::{TaskStore, BEACON_BLOCK_TASK, RANGE_BEACON_BLOCK_TASK};
use tracing::info;

/// Task rows to create, read from YAML.
///
/// ```yaml
/// block_scan:
///   start: 9000000
/// range_scans:
///   - start: 100
///     end: 200
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Deployment {
    pub block_scan: Option<BlockScan>,
    pub range_scans: Vec<RangeScan>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BlockScan {
    pub start: u64,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RangeScan {
    pub start: u64,
    pub end: u64,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeployReport {
    pub tailing_task: Option<i64>,
    pub range_tasks: Vec<i64>,
    pub existing_range_tasks: usize,
}

impl Deployment {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read deployment {}", path.display()))?;
        serde_yaml::from_str(&raw).with_context(|| format!("invalid deployment {}", path.display()))
    }

    fn validate(&self) -> Result<()> {
        for range in &self.range_scans {
            if range.start > range.end {
                bail!("range scan start {} is after end {}", range.start, range.end);
            }
        }
        Ok(())
    }
}

/// Create the task rows the scanners pick up.
///
/// The tailing task's cursor is set to `start`, so scanning begins at the
/// height after it. Range tasks already present with the same bounds are
/// left untouched, which makes a repeated deploy harmless.
pub fn deploy(store: &dyn TaskStore, deployment: &Deployment) -> Result<DeployReport> {
    deployment.validate()?;
    let mut report = DeployReport::default();

    if let Some(scan) = deployment.block_scan {
        let task = match store.get_enabled_task(BEACON_BLOCK_TASK)? {
            Some(mut task) => {
                task.last_processed = scan.start;
                store.save_task(&task)?;
                task
            }
            None => store.create_task(BEACON_BLOCK_TASK, scan.start)?,
        };
        info!(task = task.id, start = scan.start, "Deployed tailing scan task");
        report.tailing_task = Some(task.id);
    }

    let existing = store.get_enabled_range_tasks(RANGE_BEACON_BLOCK_TASK)?;
    for range in &deployment.range_scans {
        if existing
            .iter()
            .any(|task| task.start == range.start && task.end == range.end)
        {
            info!(start = range.start, end = range.end, "Range scan task already deployed");
            report.existing_range_tasks += 1;
            continue;
        }

        let task = store.create_range_task(RANGE_BEACON_BLOCK_TASK, range.start, range.end)?;
        info!(task = task.id, start = range.start, end = range.end, "Deployed range scan task");
        report.range_tasks.push(task.id);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use storage::SqliteStore;

    fn parse(raw: &str) -> Deployment {
        serde_yaml::from_str(raw).expect("valid deployment")
    }

    #[test]
    fn test_creates_tailing_and_range_tasks() {
        let store = SqliteStore::in_memory().expect("store");
        let deployment = parse(
            "block_scan:\n  start: 500\nrange_scans:\n  - start: 10\n    end: 20\n  - start: 30\n    end: 40\n",
        );

        let report = deploy(&store, &deployment).expect("deploy");

        let task = store
            .get_enabled_task(BEACON_BLOCK_TASK)
            .expect("read")
            .expect("tailing task");
        assert_eq!(report.tailing_task, Some(task.id));
        assert_eq!(task.last_processed, 500);
        assert_eq!(task.next_height(), 501);

        let ranges = store
            .get_enabled_range_tasks(RANGE_BEACON_BLOCK_TASK)
            .expect("read");
        assert_eq!(ranges.len(), 2);
        assert_eq!(report.range_tasks.len(), 2);
        assert_eq!((ranges[0].start, ranges[0].end), (10, 20));
        assert_eq!(ranges[0].last_processed, None);
    }

    #[test]
    fn test_redeploy_moves_cursor_and_keeps_ranges() {
        let store = SqliteStore::in_memory().expect("store");
        let first = parse("block_scan:\n  start: 500\nrange_scans:\n  - start: 10\n    end: 20\n");
        let first_report = deploy(&store, &first).expect("deploy");

        let second = parse("block_scan:\n  start: 800\nrange_scans:\n  - start: 10\n    end: 20\n");
        let report = deploy(&store, &second).expect("redeploy");

        assert_eq!(report.tailing_task, first_report.tailing_task);
        assert_eq!(report.existing_range_tasks, 1);
        assert!(report.range_tasks.is_empty());
        let task = store
            .get_enabled_task(BEACON_BLOCK_TASK)
            .expect("read")
            .expect("tailing task");
        assert_eq!(task.last_processed, 800);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let store = SqliteStore::in_memory().expect("store");
        let deployment = parse("range_scans:\n  - start: 20\n    end: 10\n");

        assert!(deploy(&store, &deployment).is_err());
        assert!(store
            .get_enabled_range_tasks(RANGE_BEACON_BLOCK_TASK)
            .expect("read")
            .is_empty());
    }
}
