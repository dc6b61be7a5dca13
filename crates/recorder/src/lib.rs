//! Aggregation of captured UI interactions into a Given/When/Then report.
//!
//! Raw click and input events flow into the [`Aggregator`], which keeps per-page history.
//! Stage switches and finalization move that history into the append-only [`StageLedger`],
//! and [`render`] turns the ledger into the numbered, deduplicated report text.
//! [`ControlLoop`] drives all of it from a single ordered message stream.
#![allow(
    clippy::missing_docs_in_private_items,
    reason = "Internal implementation details don't need public documentation"
)]
#![allow(
    clippy::missing_inline_in_public_items,
    reason = "Inlining decisions left to compiler for this crate"
)]

pub mod aggregator;
pub mod config;
pub mod control;
pub mod event;
pub mod ledger;
pub mod report;
pub mod wire;

pub use aggregator::Aggregator;
pub use config::RecorderConfig;
pub use control::{ControlLoop, Message};
pub use event::{EventKind, HistoryEntry, RawEvent, Stage};
pub use ledger::{StageLedger, StageRecord};
pub use report::render;
pub use wire::{WireItem, WireRecord, decode_batch};
