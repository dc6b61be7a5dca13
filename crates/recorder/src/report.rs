//! Rendering of the final Given/When/Then report.
//!
//! Sections always appear in `GIVEN`, `WHEN`, `THEN` order. A section whose stage has no
//! printable survivors still prints its header, with no numbered lines under it.

use crate::event::{EventKind, HistoryEntry, Stage};
use crate::ledger::StageLedger;
use std::collections::HashMap;

/// Render `ledger` into report text. Pure: the same ledger always renders identically.
pub fn render(ledger: &StageLedger) -> String {
    let mut out = String::new();
    for (position, stage) in Stage::ORDER.into_iter().enumerate() {
        if position > 0 {
            out.push('\n');
        }
        out.push_str(&format!("=== {} ===\n", stage.label()));
        let lines = survivors(ledger.events_for(stage)).into_iter().filter_map(report_line);
        for (number, line) in (1usize..).zip(lines) {
            out.push_str(&format!("{number}. {line}\n"));
        }
    }
    out
}

/// Collapse events by identity: position of the first sighting, content of the latest.
fn survivors<'ledger, I>(events: I) -> Vec<&'ledger HistoryEntry>
where
    I: IntoIterator<Item = &'ledger HistoryEntry>,
{
    let mut order: Vec<&'ledger str> = Vec::new();
    let mut latest: HashMap<&'ledger str, &'ledger HistoryEntry> = HashMap::new();
    for entry in events {
        if latest.insert(entry.identity(), entry).is_none() {
            order.push(entry.identity());
        }
    }
    order
        .into_iter()
        .filter_map(|identity| latest.get(identity).copied())
        .collect()
}

fn report_line(entry: &HistoryEntry) -> Option<String> {
    let event = entry.event();
    let element = html::simplify(&event.markup);
    match event.kind {
        EventKind::Click => Some(element),
        EventKind::Input => {
            let value = event.value_or_empty();
            (!value.is_empty()).then(|| format!("keys sent: {value}; html element:{element}"))
        }
    }
}
