//! Decoding of the records the in-page capture script hands over on each poll.
//!
//! The script drains a queue of plain objects. Interaction records look like
//! `{"kind": "click" | "input", "markup": "...", "value": "...", "url": "..."}` and stage
//! signals look like `{"stage": "when"}`; both share one queue so their interleaving survives
//! the trip. Missing `markup` or `value` fields read as empty strings.
//!
//! `{"kind": "hover", ...}` marks an element the pointer rested on. Hovers feed the
//! diagnostic hover log only; they never become events.

use crate::event::{EventKind, RawEvent};
use log::warn;
use serde::Deserialize;
use serde_json::Value;

/// One captured record as serialized by the page. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WireRecord {
    pub kind: Option<String>,
    pub markup: Option<String>,
    pub value: Option<String>,
    pub url: Option<String>,
    pub stage: Option<String>,
}

/// A decoded record, in the order it was captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireItem {
    Event(RawEvent),
    /// Markup the pointer rested on at `url`.
    Hover { url: String, markup: String },
    /// A stage-switch request by name; unknown names are rejected by the consumer.
    Stage(String),
}

impl WireRecord {
    /// Turn the record into an item, using `page_url` when it carries no URL of its own.
    pub fn into_item(self, page_url: &str) -> Option<WireItem> {
        if let Some(stage) = self.stage {
            return Some(WireItem::Stage(stage));
        }
        let url = self.url.filter(|url| !url.is_empty()).unwrap_or_else(|| page_url.to_owned());
        let markup = self.markup.unwrap_or_default();
        let kind = match self.kind.as_deref().map(str::to_ascii_lowercase).as_deref() {
            Some("click") => EventKind::Click,
            Some("input" | "change") => EventKind::Input,
            Some("hover") => return Some(WireItem::Hover { url, markup }),
            other => {
                warn!("Skipping captured record of unknown kind {other:?}");
                return None;
            }
        };
        Some(WireItem::Event(match kind {
            EventKind::Click => RawEvent::click(url, markup),
            EventKind::Input => RawEvent::input(url, markup, self.value.unwrap_or_default()),
        }))
    }
}

/// Decode a drained batch. `null` and non-array payloads decode to nothing; a record that
/// does not deserialize is skipped on its own.
pub fn decode_batch(payload: Value, page_url: &str) -> Vec<WireItem> {
    let records = match payload {
        Value::Array(records) => records,
        Value::Null => return Vec::new(),
        other => {
            warn!("Ignoring capture payload that is not a list: {other}");
            return Vec::new();
        }
    };
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<WireRecord>(record) {
            Ok(record) => record.into_item(page_url),
            Err(err) => {
                warn!("Skipping malformed captured record: {err}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE: &str = "https://app.test/";

    #[test]
    fn decodes_events_and_stage_signals_in_order() {
        let items = decode_batch(
            json!([
                {"kind": "click", "markup": "<a>x</a>"},
                {"stage": "when"},
                {"kind": "input", "markup": "<input id=\"q\">", "value": "abc", "url": "https://app.test/q"},
            ]),
            PAGE,
        );
        assert_eq!(
            items,
            [
                WireItem::Event(RawEvent::click(PAGE, "<a>x</a>")),
                WireItem::Stage("when".into()),
                WireItem::Event(RawEvent::input("https://app.test/q", "<input id=\"q\">", "abc")),
            ]
        );
    }

    #[test]
    fn missing_fields_become_empty_strings() {
        let items = decode_batch(json!([{"kind": "input"}, {"kind": "click", "markup": null}]), PAGE);
        assert_eq!(
            items,
            [
                WireItem::Event(RawEvent::input(PAGE, "", "")),
                WireItem::Event(RawEvent::click(PAGE, "")),
            ]
        );
    }

    #[test]
    fn bad_records_are_skipped_individually() {
        let items = decode_batch(
            json!([42, {"kind": "scroll", "markup": "<b>"}, {"kind": "click", "markup": 7}, {"kind": "click", "markup": "<i>ok</i>"}]),
            PAGE,
        );
        assert_eq!(items, [WireItem::Event(RawEvent::click(PAGE, "<i>ok</i>"))]);
    }

    #[test]
    fn hover_records_decode_separately_from_events() {
        let items = decode_batch(
            json!([
                {"kind": "hover", "markup": "<li>Admin</li>", "url": "https://app.test/admin"},
                {"kind": "HOVER"},
            ]),
            PAGE,
        );
        assert_eq!(
            items,
            [
                WireItem::Hover { url: "https://app.test/admin".into(), markup: "<li>Admin</li>".into() },
                WireItem::Hover { url: PAGE.into(), markup: String::new() },
            ]
        );
    }

    #[test]
    fn empty_and_null_payloads_decode_to_nothing() {
        assert!(decode_batch(json!([]), PAGE).is_empty());
        assert!(decode_batch(Value::Null, PAGE).is_empty());
        assert!(decode_batch(json!({"kind": "click"}), PAGE).is_empty());
    }
}
