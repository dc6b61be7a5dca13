//! Event and stage types shared by the aggregator, ledger and renderer.

use anyhow::{Error, anyhow};
use core::fmt;
use core::str::FromStr;

/// The kind of interaction the capture script observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Input,
}

/// BDD phase an interaction belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Stage {
    #[default]
    Given,
    When,
    Then,
}

impl Stage {
    /// Report section order, independent of the order stages were visited in.
    pub const ORDER: [Self; 3] = [Self::Given, Self::When, Self::Then];

    /// Upper-case section label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Given => "GIVEN",
            Self::When => "WHEN",
            Self::Then => "THEN",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

impl FromStr for Stage {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.trim().to_ascii_lowercase().as_str() {
            "given" => Ok(Self::Given),
            "when" => Ok(Self::When),
            "then" => Ok(Self::Then),
            _ => Err(anyhow!("unknown stage `{name}`")),
        }
    }
}

/// One interaction as produced by the capture script. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub kind: EventKind,
    pub markup: String,
    pub url: String,
    pub value: Option<String>,
}

impl RawEvent {
    pub fn click(url: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Click,
            markup: markup.into(),
            url: url.into(),
            value: None,
        }
    }

    pub fn input(url: impl Into<String>, markup: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Input,
            markup: markup.into(),
            url: url.into(),
            value: Some(value.into()),
        }
    }

    /// The typed value, with a missing value read as empty.
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }
}

/// A recorded event together with the element identity derived when it was ingested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    event: RawEvent,
    identity: String,
}

impl HistoryEntry {
    pub fn new(event: RawEvent) -> Self {
        let identity = html::identify(&event.markup);
        Self { event, identity }
    }

    pub const fn event(&self) -> &RawEvent {
        &self.event
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }
}
