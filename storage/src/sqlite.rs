use std::path::Path;

use containers::{AttestationRecord, BlockRecord, ForkName};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::schema::{configure_connection, migrate};
use crate::tasks::{RangeScanTask, ScanTask};
use crate::{BlockStore, TaskStore};

/// SQLite-backed block and task store.
///
/// A single connection is shared by every scan loop. Writes are serialized by
/// the mutex and each block is written inside its own transaction.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and bring the schema up to date.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        configure_connection(&conn)?;
        let store = Self::from_connection(conn)?;
        info!(path = %path.as_ref().display(), "Opened block store");
        Ok(store)
    }

    /// Private in-memory database, for tests and dry runs.
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_block(row: &Row<'_>) -> rusqlite::Result<(BlockRecord, String)> {
        let record = BlockRecord {
            slot: row.get::<_, i64>(0)? as u64,
            epoch: row.get::<_, i64>(1)? as u64,
            proposer_index: row.get::<_, i64>(2)? as u64,
            parent_root: row.get(3)?,
            state_root: row.get(4)?,
            randao_reveal: row.get(5)?,
            graffiti: row.get(6)?,
            eth1_block_hash: row.get(7)?,
            eth1_deposit_root: row.get(8)?,
            eth1_deposit_count: row.get::<_, Option<i64>>(9)?.map(|v| v as u64),
            execution_block_hash: row.get(10)?,
            execution_block_number: row.get::<_, Option<i64>>(11)?.map(|v| v as u64),
            signature: row.get(12)?,
            proposer_slashings: row.get::<_, i64>(13)? as u64,
            attester_slashings: row.get::<_, i64>(14)? as u64,
            fork: ForkName::default(),
        };
        Ok((record, row.get(15)?))
    }

    fn row_to_attestation(row: &Row<'_>) -> rusqlite::Result<AttestationRecord> {
        Ok(AttestationRecord {
            slot: row.get::<_, i64>(0)? as u64,
            attest_index: row.get::<_, i64>(1)? as u64,
            aggregation_bits: row.get(2)?,
            beacon_block_root: row.get(3)?,
            committee_index: row.get::<_, i64>(4)? as u64,
            source_epoch: row.get::<_, i64>(5)? as u64,
            source_root: row.get(6)?,
            target_epoch: row.get::<_, i64>(7)? as u64,
            target_root: row.get(8)?,
            signature: row.get(9)?,
        })
    }

    fn row_to_task(row: &Row<'_>) -> rusqlite::Result<ScanTask> {
        Ok(ScanTask {
            id: row.get(0)?,
            task_type: row.get(1)?,
            last_processed: row.get::<_, i64>(2)? as u64,
            enabled: row.get(3)?,
        })
    }

    fn row_to_range_task(row: &Row<'_>) -> rusqlite::Result<RangeScanTask> {
        Ok(RangeScanTask {
            id: row.get(0)?,
            task_type: row.get(1)?,
            start: row.get::<_, i64>(2)? as u64,
            end: row.get::<_, i64>(3)? as u64,
            last_processed: row.get::<_, Option<i64>>(4)?.map(|v| v as u64),
            enabled: row.get(5)?,
        })
    }
}

impl BlockStore for SqliteStore {
    fn store_block(
        &self,
        block: &BlockRecord,
        attestations: &[AttestationRecord],
    ) -> StoreResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO beacon_blocks (
                 slot, epoch, proposer_index, parent_root, state_root, randao_reveal,
                 graffiti, eth1_block_hash, eth1_deposit_root, eth1_deposit_count,
                 execution_block_hash, execution_block_number, signature,
                 proposer_slashings, attester_slashings, fork
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)
             ON CONFLICT(slot) DO UPDATE SET
                 epoch = excluded.epoch,
                 proposer_index = excluded.proposer_index,
                 parent_root = excluded.parent_root,
                 state_root = excluded.state_root,
                 randao_reveal = excluded.randao_reveal,
                 graffiti = excluded.graffiti,
                 eth1_block_hash = excluded.eth1_block_hash,
                 eth1_deposit_root = excluded.eth1_deposit_root,
                 eth1_deposit_count = excluded.eth1_deposit_count,
                 execution_block_hash = excluded.execution_block_hash,
                 execution_block_number = excluded.execution_block_number,
                 signature = excluded.signature,
                 proposer_slashings = excluded.proposer_slashings,
                 attester_slashings = excluded.attester_slashings,
                 fork = excluded.fork",
            params![
                block.slot as i64,
                block.epoch as i64,
                block.proposer_index as i64,
                block.parent_root,
                block.state_root,
                block.randao_reveal,
                block.graffiti,
                block.eth1_block_hash,
                block.eth1_deposit_root,
                block.eth1_deposit_count.map(|v| v as i64),
                block.execution_block_hash,
                block.execution_block_number.map(|v| v as i64),
                block.signature,
                block.proposer_slashings as i64,
                block.attester_slashings as i64,
                block.fork.as_str(),
            ],
        )?;

        tx.execute(
            "DELETE FROM beacon_attestations WHERE slot = ?1",
            params![block.slot as i64],
        )?;

        {
            let mut insert = tx.prepare_cached(
                "INSERT INTO beacon_attestations (
                     slot, attest_index, aggregation_bits, beacon_block_root, committee_index,
                     source_epoch, source_root, target_epoch, target_root, signature
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for attestation in attestations {
                insert.execute(params![
                    attestation.slot as i64,
                    attestation.attest_index as i64,
                    attestation.aggregation_bits,
                    attestation.beacon_block_root,
                    attestation.committee_index as i64,
                    attestation.source_epoch as i64,
                    attestation.source_root,
                    attestation.target_epoch as i64,
                    attestation.target_root,
                    attestation.signature,
                ])?;
            }
        }

        tx.commit()?;

        debug!(
            slot = block.slot,
            attestations = attestations.len(),
            "Stored block"
        );
        Ok(())
    }

    fn get_block(&self, slot: u64) -> StoreResult<Option<BlockRecord>> {
        let conn = self.conn.lock();
        let row = conn
            .query_row(
                "SELECT slot, epoch, proposer_index, parent_root, state_root, randao_reveal,
                        graffiti, eth1_block_hash, eth1_deposit_root, eth1_deposit_count,
                        execution_block_hash, execution_block_number, signature,
                        proposer_slashings, attester_slashings, fork
                 FROM beacon_blocks WHERE slot = ?1",
                params![slot as i64],
                Self::row_to_block,
            )
            .optional()?;

        let Some((mut record, fork)) = row else {
            return Ok(None);
        };
        record.fork = fork
            .parse()
            .map_err(|_| StoreError::Corrupt(format!("slot {slot} has fork {fork:?}")))?;
        Ok(Some(record))
    }

    fn get_attestations(&self, slot: u64) -> StoreResult<Vec<AttestationRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT slot, attest_index, aggregation_bits, beacon_block_root, committee_index,
                    source_epoch, source_root, target_epoch, target_root, signature
             FROM beacon_attestations WHERE slot = ?1 ORDER BY attest_index",
        )?;
        let rows = stmt.query_map(params![slot as i64], Self::row_to_attestation)?;
        let attestations = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(attestations)
    }

    fn block_count(&self) -> StoreResult<u64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM beacon_blocks", [], |row| {
            row.get(0)
        })?;
        Ok(count as u64)
    }
}

impl TaskStore for SqliteStore {
    fn get_enabled_task(&self, task_type: &str) -> StoreResult<Option<ScanTask>> {
        let conn = self.conn.lock();
        let task = conn
            .query_row(
                "SELECT id, task_type, last_number, enabled FROM scan_tasks
                 WHERE task_type = ?1 AND enabled = 1 ORDER BY id LIMIT 1",
                params![task_type],
                Self::row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    fn save_task(&self, task: &ScanTask) -> StoreResult<()> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE scan_tasks SET task_type = ?2, last_number = ?3, enabled = ?4 WHERE id = ?1",
            params![
                task.id,
                task.task_type,
                task.last_processed as i64,
                task.enabled
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::TaskNotFound(task.id));
        }
        Ok(())
    }

    fn create_task(&self, task_type: &str, last_processed: u64) -> StoreResult<ScanTask> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO scan_tasks (task_type, last_number, enabled) VALUES (?1, ?2, 1)",
            params![task_type, last_processed as i64],
        )?;
        Ok(ScanTask {
            id: conn.last_insert_rowid(),
            task_type: task_type.to_string(),
            last_processed,
            enabled: true,
        })
    }

    fn get_enabled_range_tasks(&self, task_type: &str) -> StoreResult<Vec<RangeScanTask>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT id, task_type, start_height, end_height, last_number, enabled
             FROM range_scan_tasks WHERE task_type = ?1 AND enabled = 1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![task_type], Self::row_to_range_task)?;
        let tasks = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    fn get_range_task(&self, id: i64) -> StoreResult<RangeScanTask> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, task_type, start_height, end_height, last_number, enabled
             FROM range_scan_tasks WHERE id = ?1",
            params![id],
            Self::row_to_range_task,
        )
        .optional()?
        .ok_or(StoreError::TaskNotFound(id))
    }

    fn save_range_task(&self, task: &RangeScanTask) -> StoreResult<()> {
        let conn = self.conn.lock();
        let updated = conn.execute(
            "UPDATE range_scan_tasks
             SET task_type = ?2, start_height = ?3, end_height = ?4, last_number = ?5,
                 enabled = ?6
             WHERE id = ?1",
            params![
                task.id,
                task.task_type,
                task.start as i64,
                task.end as i64,
                task.last_processed.map(|v| v as i64),
                task.enabled
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::TaskNotFound(task.id));
        }
        Ok(())
    }

    fn create_range_task(
        &self,
        task_type: &str,
        start: u64,
        end: u64,
    ) -> StoreResult<RangeScanTask> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO range_scan_tasks (task_type, start_height, end_height, last_number, enabled)
             VALUES (?1, ?2, ?3, NULL, 1)",
            params![task_type, start as i64, end as i64],
        )?;
        Ok(RangeScanTask {
            id: conn.last_insert_rowid(),
            task_type: task_type.to_string(),
            start,
            end,
            last_processed: None,
            enabled: true,
        })
    }
}
