//! The single control loop that owns all aggregation state.
//!
//! Captured batches and stage switches both arrive as [`Message`]s on one channel and are
//! applied strictly in arrival order, so a stage switch is never observed half-applied by a
//! batch. Shutdown (or the channel closing) finalizes the ledger exactly once.

use crate::aggregator::Aggregator;
use crate::event::Stage;
use crate::ledger::StageLedger;
use crate::report::render;
use crate::wire::{WireItem, decode_batch};
use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// The browser is now showing `url`.
    Visit { url: String },
    /// Records drained from the page at `url`.
    Batch { url: String, records: Value },
    /// External request to make the named stage active.
    SwitchStage(String),
    /// Finalize and produce the report.
    Shutdown,
}

#[derive(Debug, Default)]
pub struct ControlLoop {
    aggregator: Aggregator,
    ledger: StageLedger,
}

impl ControlLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub const fn ledger(&self) -> &StageLedger {
        &self.ledger
    }

    /// Apply one message. Returns the rendered report when the message was `Shutdown`.
    pub fn handle(&mut self, message: Message) -> Option<String> {
        if self.ledger.is_finalized() && message != Message::Shutdown {
            debug!("Recording finalized; dropping {message:?}");
            return None;
        }
        match message {
            Message::Visit { url } => {
                self.aggregator.visit(&url);
                None
            }
            Message::Batch { url, records } => {
                for item in decode_batch(records, &url) {
                    match item {
                        WireItem::Event(event) => {
                            self.aggregator.record(event);
                        }
                        WireItem::Hover { url, markup } => {
                            self.aggregator.record_hover(&url, markup);
                        }
                        WireItem::Stage(name) => self.switch_stage(&name),
                    }
                }
                None
            }
            Message::SwitchStage(name) => {
                self.switch_stage(&name);
                None
            }
            Message::Shutdown => Some(self.finish()),
        }
    }

    fn switch_stage(&mut self, name: &str) {
        match name.parse::<Stage>() {
            Ok(stage) => {
                self.ledger.switch_stage(stage, &mut self.aggregator);
            }
            Err(err) => warn!("Ignoring stage switch: {err}"),
        }
    }

    /// Finalize (first call only) and render the report.
    pub fn finish(&mut self) -> String {
        self.ledger.finalize(&mut self.aggregator);
        render(&self.ledger)
    }

    /// Consume messages until `Shutdown` arrives or every sender is gone, then return the report.
    pub async fn run(&mut self, mut messages: UnboundedReceiver<Message>) -> String {
        while let Some(message) = messages.recv().await {
            if let Some(report) = self.handle(message) {
                return report;
            }
        }
        info!("Message channel closed; finalizing recording");
        self.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = "https://app.test/";

    #[test]
    fn unknown_stage_names_change_nothing() {
        let mut control = ControlLoop::new();
        control.handle(Message::Batch {
            url: PAGE.into(),
            records: json!([{"kind": "click", "markup": "<a>x</a>"}]),
        });
        control.handle(Message::SwitchStage("eventually".into()));
        assert_eq!(control.ledger().current_stage(), Stage::Given);
        assert!(control.ledger().records().is_empty());
        assert_eq!(control.aggregator().history(PAGE).len(), 1);
    }

    #[test]
    fn in_batch_stage_signal_splits_the_batch() {
        let mut control = ControlLoop::new();
        control.handle(Message::Batch {
            url: PAGE.into(),
            records: json!([
                {"kind": "click", "markup": "<a>before</a>"},
                {"stage": "then"},
                {"kind": "click", "markup": "<a>after</a>"},
            ]),
        });
        let report = control.handle(Message::Shutdown).unwrap_or_default();
        assert_eq!(
            report,
            "=== GIVEN ===\n1. <a>before</a>\n\n=== WHEN ===\n\n=== THEN ===\n1. <a>after</a>\n"
        );
    }

    #[test]
    fn messages_after_shutdown_are_dropped() {
        let mut control = ControlLoop::new();
        let first = control.handle(Message::Shutdown);
        control.handle(Message::Batch {
            url: PAGE.into(),
            records: json!([{"kind": "click", "markup": "<a>late</a>"}]),
        });
        let second = control.handle(Message::Shutdown);
        assert_eq!(first, second);
        assert!(control.aggregator().history(PAGE).is_empty());
    }

    #[test]
    fn hovers_reach_the_hover_log_but_not_the_report() {
        let mut control = ControlLoop::new();
        control.handle(Message::Batch {
            url: PAGE.into(),
            records: json!([
                {"kind": "hover", "markup": "<li>Admin</li>"},
                {"kind": "click", "markup": "<a>go</a>"},
            ]),
        });
        let report = control.handle(Message::Shutdown).unwrap_or_default();
        assert_eq!(report, "=== GIVEN ===\n1. <a>go</a>\n\n=== WHEN ===\n\n=== THEN ===\n");
        assert_eq!(control.aggregator().hover_log(PAGE), ["<li>Admin</li>"]);
    }
}
