/// Task type of the tailing scanner.
pub const BEACON_BLOCK_TASK: &str = "beacon_block";

/// Task type of bounded backfill jobs.
pub const RANGE_BEACON_BLOCK_TASK: &str = "directly_beacon_block";

/// Progress cursor of the tailing scanner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanTask {
    pub id: i64,
    pub task_type: String,
    pub last_processed: u64,
    pub enabled: bool,
}

impl ScanTask {
    pub fn next_height(&self) -> u64 {
        self.last_processed + 1
    }
}

/// A bounded backfill job over `start..=end`.
///
/// `last_processed` stays `None` until the first height of the range is
/// written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RangeScanTask {
    pub id: i64,
    pub task_type: String,
    pub start: u64,
    pub end: u64,
    pub last_processed: Option<u64>,
    pub enabled: bool,
}

impl RangeScanTask {
    pub fn next_height(&self) -> u64 {
        match self.last_processed {
            Some(last) => (last + 1).max(self.start),
            None => self.start,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.next_height() > self.end
    }

    pub fn remaining(&self) -> u64 {
        (self.end + 1).saturating_sub(self.next_height())
    }
}
