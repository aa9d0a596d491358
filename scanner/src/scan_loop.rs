//! The per-task scan loop shared by the tailing and range scanners.
//!
//! ## How It Works
//!
//! The loop is an explicit [`ScanState`] machine:
//!
//! 1. **Refreshing**: read the head slot from the node
//! 2. **Waiting**: the next height is past the head, back off and refresh
//! 3. **Fetching**: request the block at the cursor's next height
//! 4. **Persisting**: normalize, write block and attestations in one
//!    transaction, then durably advance the cursor
//!
//! Progress is only advanced after the write succeeds. A crash in between
//! replays the height, which the store absorbs as an upsert.
//!
//! Shutdown is checked at every iteration and interrupts the sleeps, never an
//! in-flight request or write.

use std::sync::Arc;
use std::time::Duration;

use containers::{AttestationRecord, BlockRecord, RawBlock};
use networking::BlockId;
use tokio::sync::watch;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval, sleep};
use tracing::{debug, error, info, trace, warn};

use crate::config::PROGRESS_LOG_INTERVAL;
use crate::context::ScanContext;
use crate::cursor::{Cursor, FetchFailure};
use crate::error::ScanError;
use crate::lease::TaskLease;
use crate::states::ScanState;

/// Why a loop ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Range task reached its end.
    Complete,
    Shutdown,
    /// The task lease expired or was taken over.
    LeaseLost,
    /// Another instance holds the task.
    Contended,
    /// The task was disabled while waiting for its lease.
    Disabled,
}

struct Fetched {
    height: u64,
    raw: RawBlock,
    started: Instant,
}

pub(crate) struct ScanLoop<C: Cursor> {
    ctx: Arc<ScanContext>,
    cursor: C,
    label: String,
    state: ScanState,
    head: Option<u64>,
    shutdown: watch::Receiver<bool>,
    lease: Option<TaskLease>,
}

impl<C: Cursor> ScanLoop<C> {
    pub(crate) fn new(
        ctx: Arc<ScanContext>,
        cursor: C,
        shutdown: watch::Receiver<bool>,
        lease: Option<TaskLease>,
    ) -> Self {
        let label = cursor.label();
        Self {
            ctx,
            cursor,
            label,
            state: ScanState::Idle,
            head: None,
            shutdown,
            lease,
        }
    }

    pub(crate) async fn run(mut self) -> Result<LoopExit, ScanError> {
        info!(
            task = %self.label,
            height = self.cursor.next_height(),
            "Scan loop started"
        );

        let result = self.drive().await;
        self.transition(ScanState::Idle);

        if let Some(lease) = self.lease.take() {
            lease.release().await;
        }

        match &result {
            Ok(exit) => info!(task = %self.label, ?exit, "Scan loop stopped"),
            Err(err) => error!(
                task = %self.label,
                height = self.cursor.next_height(),
                %err,
                "Scan loop failed"
            ),
        }
        result
    }

    fn transition(&mut self, target: ScanState) {
        debug_assert!(
            self.state.can_transition_to(target),
            "invalid scan transition {:?} -> {:?}",
            self.state,
            target
        );
        trace!(task = %self.label, from = ?self.state, to = ?target, "Scan state");
        self.state = target;
    }

    async fn drive(&mut self) -> Result<LoopExit, ScanError> {
        let mut poll = interval(self.ctx.config.poll_interval);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut fetched: Option<Fetched> = None;

        self.transition(ScanState::Refreshing);

        loop {
            if *self.shutdown.borrow() {
                return Ok(LoopExit::Shutdown);
            }

            if self.cursor.is_complete() {
                info!(task = %self.label, "Scan task completed");
                return Ok(LoopExit::Complete);
            }

            if let Some(lease) = self.lease.as_mut() {
                if !lease.keep_alive().await {
                    return Ok(LoopExit::LeaseLost);
                }
            }

            match self.state {
                ScanState::Idle => return Ok(LoopExit::Shutdown),

                ScanState::Refreshing => {
                    let header = self.ctx.node.latest_header().await.inspect_err(|err| {
                        error!(task = %self.label, %err, "Failed to get latest beacon header");
                    })?;
                    let head = header.slot();
                    self.head = Some(head);
                    if let Some(metrics) = &self.ctx.metrics {
                        metrics.set_chain_head_slot(head);
                    }

                    if self.cursor.next_height() > head {
                        self.transition(ScanState::Waiting);
                    } else {
                        self.transition(ScanState::Fetching);
                    }
                }

                ScanState::Waiting => {
                    let wait = self.ctx.config.head_wait;
                    if !self.sleep(wait).await {
                        return Ok(LoopExit::Shutdown);
                    }
                    self.transition(ScanState::Refreshing);
                }

                ScanState::Fetching => {
                    if !self.tick(&mut poll).await {
                        return Ok(LoopExit::Shutdown);
                    }
                    fetched = self.fetch().await?;
                    if fetched.is_some() {
                        self.transition(ScanState::Persisting);
                    }
                }

                ScanState::Persisting => {
                    if let Some(Fetched {
                        height,
                        raw,
                        started,
                    }) = fetched.take()
                    {
                        let records = normalizer::normalize(&raw, &self.ctx.spec)
                            .map_err(|err| ScanError::from_normalize(height, err))?;
                        self.commit(height, Some(records)).await?;

                        if let Some(metrics) = &self.ctx.metrics {
                            metrics.inc_blocks_persisted(&self.label);
                            metrics.observe_block_processing_time(started.elapsed());
                        }
                    }
                    self.transition(ScanState::Fetching);
                }
            }
        }
    }

    /// One fetch attempt at the cursor's next height.
    ///
    /// Returns the block to persist, or `None` when the state has been moved
    /// on without one (head refresh, retry, skip or empty slot).
    async fn fetch(&mut self) -> Result<Option<Fetched>, ScanError> {
        let height = self.cursor.next_height();
        let head = self.head.unwrap_or_default();

        if height > head {
            self.transition(ScanState::Refreshing);
            return Ok(None);
        }

        let started = Instant::now();
        match self.ctx.node.block(BlockId::Slot(height)).await {
            Ok(raw) => {
                self.cursor.on_fetched(height);
                debug!(task = %self.label, height, version = %raw.version, "Fetched block");
                Ok(Some(Fetched {
                    height,
                    raw,
                    started,
                }))
            }
            // Either nothing was proposed here or the node pruned it; both leave a gap.
            Err(err) if err.is_not_found() && height < head => {
                warn!(
                    task = %self.label,
                    height,
                    head,
                    "Block missing below head, recording empty slot"
                );
                self.cursor.on_fetched(height);
                self.commit(height, None).await?;
                if let Some(metrics) = &self.ctx.metrics {
                    metrics.inc_skipped_slots(&self.label);
                }
                self.transition(ScanState::Fetching);
                Ok(None)
            }
            Err(err) => {
                error!(task = %self.label, height, %err, "Failed to get beacon block by id");
                if let Some(metrics) = &self.ctx.metrics {
                    metrics.inc_fetch_failures(&self.label);
                }

                match self.cursor.on_fetch_failure(height) {
                    FetchFailure::Retry => {
                        self.transition(ScanState::Fetching);
                        Ok(None)
                    }
                    FetchFailure::Skip => {
                        warn!(task = %self.label, height, "Skipping failed height");
                        self.commit(height, None).await?;
                        if let Some(metrics) = &self.ctx.metrics {
                            metrics.inc_skipped_slots(&self.label);
                        }
                        self.transition(ScanState::Fetching);
                        Ok(None)
                    }
                    FetchFailure::Yield => Err(err.into()),
                }
            }
        }
    }

    /// Write the block (if any) and the advanced cursor, then adopt the cursor.
    async fn commit(
        &mut self,
        height: u64,
        records: Option<(BlockRecord, Vec<AttestationRecord>)>,
    ) -> Result<(), ScanError> {
        let store = Arc::clone(&self.ctx.store);
        let mut next = self.cursor.clone();
        next.advance(height);

        let next = tokio::task::spawn_blocking(move || {
            if let Some((block, attestations)) = &records {
                store.store_block(block, attestations)?;
            }
            next.persist(store.as_ref())?;
            Ok::<_, storage::StoreError>(next)
        })
        .await??;

        self.cursor = next;

        if let Some(metrics) = &self.ctx.metrics {
            metrics.set_last_processed_slot(&self.label, height);
        }

        if height % PROGRESS_LOG_INTERVAL == 0 {
            match self.cursor.remaining() {
                Some(remain) => info!(task = %self.label, remain, height, "Processed beacon blocks"),
                None => info!(task = %self.label, height, "Processed beacon blocks"),
            }
        }
        Ok(())
    }

    /// Wait for the next poll tick. `false` if shutdown was requested.
    async fn tick(&mut self, poll: &mut Interval) -> bool {
        tokio::select! {
            _ = poll.tick() => true,
            changed = self.shutdown.changed() => changed.is_ok() && !*self.shutdown.borrow(),
        }
    }

    /// Sleep for `duration`. `false` if shutdown was requested.
    async fn sleep(&mut self, duration: Duration) -> bool {
        tokio::select! {
            _ = sleep(duration) => true,
            changed = self.shutdown.changed() => changed.is_ok() && !*self.shutdown.borrow(),
        }
    }
}
