//! Append-only Given/When/Then ledger.
//!
//! The ledger tracks the active stage. Switching to a different stage, or finalizing,
//! drains the aggregator's current segment into a new [`StageRecord`] tagged with the stage
//! that was active while those events arrived. Empty segments produce no record.

use crate::aggregator::Aggregator;
use crate::event::{HistoryEntry, Stage};
use log::{debug, info, warn};

/// Events collected while one stage was active. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRecord {
    stage: Stage,
    events: Vec<HistoryEntry>,
}

impl StageRecord {
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    pub fn events(&self) -> &[HistoryEntry] {
        &self.events
    }
}

#[derive(Debug, Default)]
pub struct StageLedger {
    current: Stage,
    records: Vec<StageRecord>,
    finalized: bool,
}

impl StageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn current_stage(&self) -> Stage {
        self.current
    }

    pub fn records(&self) -> &[StageRecord] {
        &self.records
    }

    pub const fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Close the current segment and make `stage` active.
    ///
    /// Returns `false` without touching any history when `stage` is already active or the
    /// ledger has been finalized.
    pub fn switch_stage(&mut self, stage: Stage, aggregator: &mut Aggregator) -> bool {
        if self.finalized {
            warn!("Ignoring switch to {stage}: the recording is already finalized");
            return false;
        }
        if stage == self.current {
            debug!("Already in {stage}, nothing to switch");
            return false;
        }
        self.close_segment(aggregator);
        info!("Stage switched: {} -> {stage}", self.current);
        self.current = stage;
        true
    }

    /// Close the last segment under the active stage. Only the first call does anything.
    pub fn finalize(&mut self, aggregator: &mut Aggregator) -> bool {
        if self.finalized {
            debug!("Ledger already finalized");
            return false;
        }
        self.close_segment(aggregator);
        self.finalized = true;
        info!("Recording finalized with {} stage record(s)", self.records.len());
        true
    }

    fn close_segment(&mut self, aggregator: &mut Aggregator) {
        let events = aggregator.take_segment();
        if events.is_empty() {
            debug!("No events recorded during {}", self.current);
            return;
        }
        debug!("Closing {} segment with {} event(s)", self.current, events.len());
        self.records.push(StageRecord {
            stage: self.current,
            events,
        });
    }

    /// Every event recorded under `stage`, across all of its records, in ledger order.
    pub fn events_for(&self, stage: Stage) -> impl Iterator<Item = &HistoryEntry> {
        self.records
            .iter()
            .filter(move |record| record.stage == stage)
            .flat_map(|record| record.events.iter())
    }
}
