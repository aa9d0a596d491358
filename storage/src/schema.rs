use rusqlite::Connection;

pub(crate) fn configure_connection(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;
         PRAGMA foreign_keys=ON;",
    )
}

/// Create every table and index that does not exist yet.
pub(crate) fn migrate(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS beacon_blocks (
             slot INTEGER PRIMARY KEY,
             epoch INTEGER NOT NULL,
             proposer_index INTEGER NOT NULL,
             parent_root TEXT NOT NULL,
             state_root TEXT NOT NULL,
             randao_reveal TEXT NOT NULL,
             graffiti TEXT NOT NULL,
             eth1_block_hash TEXT,
             eth1_deposit_root TEXT,
             eth1_deposit_count INTEGER,
             execution_block_hash TEXT,
             execution_block_number INTEGER,
             signature TEXT NOT NULL,
             proposer_slashings INTEGER NOT NULL,
             attester_slashings INTEGER NOT NULL,
             fork TEXT NOT NULL
         );
         CREATE INDEX IF NOT EXISTS idx_beacon_blocks_epoch ON beacon_blocks(epoch);

         CREATE TABLE IF NOT EXISTS beacon_attestations (
             slot INTEGER NOT NULL,
             attest_index INTEGER NOT NULL,
             aggregation_bits TEXT NOT NULL,
             beacon_block_root TEXT NOT NULL,
             committee_index INTEGER NOT NULL,
             source_epoch INTEGER NOT NULL,
             source_root TEXT NOT NULL,
             target_epoch INTEGER NOT NULL,
             target_root TEXT NOT NULL,
             signature TEXT NOT NULL,
             PRIMARY KEY (slot, attest_index),
             FOREIGN KEY (slot) REFERENCES beacon_blocks(slot)
         );
         CREATE INDEX IF NOT EXISTS idx_beacon_attestations_slot ON beacon_attestations(slot);

         CREATE TABLE IF NOT EXISTS scan_tasks (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             task_type TEXT NOT NULL,
             last_number INTEGER NOT NULL,
             enabled INTEGER NOT NULL DEFAULT 1
         );
         CREATE INDEX IF NOT EXISTS idx_scan_tasks_type ON scan_tasks(task_type);

         CREATE TABLE IF NOT EXISTS range_scan_tasks (
             id INTEGER PRIMARY KEY AUTOINCREMENT,
             task_type TEXT NOT NULL,
             start_height INTEGER NOT NULL,
             end_height INTEGER NOT NULL,
             last_number INTEGER,
             enabled INTEGER NOT NULL DEFAULT 1
         );
         CREATE INDEX IF NOT EXISTS idx_range_scan_tasks_type ON range_scan_tasks(task_type);",
    )
}
