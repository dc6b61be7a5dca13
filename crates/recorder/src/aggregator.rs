//! Per-page ingestion of raw interaction events.
//!
//! Each page keeps four things:
//! - a click log of unique raw markup (diagnostic output only),
//! - a hover log of unique markup the pointer rested on (diagnostic output only, never part
//!   of the history),
//! - the set of `(value, markup)` pairs already seen for inputs, used to decide what is
//!   worth a live log line,
//! - the unified event history that stage switches drain into the ledger.
//!
//! Live-log suppression never suppresses aggregation: every event reaches the history.

use crate::event::{EventKind, HistoryEntry, RawEvent};
use core::mem;
use log::{debug, info};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
struct PageHistory {
    url: String,
    clicks: Vec<String>,
    hovers: Vec<String>,
    inputs: HashSet<(String, String)>,
    events: Vec<HistoryEntry>,
}

impl PageHistory {
    fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            ..Self::default()
        }
    }
}

/// Owns every page's histories for the running session.
#[derive(Debug, Default)]
pub struct Aggregator {
    pages: Vec<PageHistory>,
    by_url: HashMap<String, usize>,
    /// Pages in the order their first event of the current segment arrived.
    segment_order: Vec<usize>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `url` has (possibly empty) histories. Re-visiting a known page changes nothing.
    pub fn visit(&mut self, url: &str) {
        self.page_index(url);
    }

    fn page_index(&mut self, url: &str) -> usize {
        if let Some(&index) = self.by_url.get(url) {
            return index;
        }
        let index = self.pages.len();
        self.pages.push(PageHistory::new(url));
        self.by_url.insert(url.to_owned(), index);
        debug!("Tracking new page {url}");
        index
    }

    /// Ingest one event. Returns whether it was new for live-logging purposes.
    pub fn record(&mut self, event: RawEvent) -> bool {
        let index = self.page_index(&event.url);
        let page = &mut self.pages[index];

        let fresh = match event.kind {
            EventKind::Click => {
                let fresh = !page.clicks.contains(&event.markup);
                if fresh {
                    page.clicks.push(event.markup.clone());
                    info!("Clicked element: {}", event.markup);
                }
                fresh
            }
            EventKind::Input => {
                let key = (event.value_or_empty().to_owned(), event.markup.clone());
                let fresh = !page.inputs.contains(&key);
                if fresh {
                    info!("Keys sent: {} to element: {}", key.0, key.1);
                    page.inputs.insert(key);
                }
                fresh
            }
        };

        if page.events.is_empty() {
            self.segment_order.push(index);
        }
        page.events.push(HistoryEntry::new(event));
        fresh
    }

    /// Ingest a batch of clicked markup for `url`.
    pub fn record_clicks<I>(&mut self, url: &str, markups: I)
    where
        I: IntoIterator<Item = String>,
    {
        for markup in markups {
            self.record(RawEvent::click(url, markup));
        }
    }

    /// Ingest a batch of `(value, markup)` inputs for `url`.
    pub fn record_inputs<I>(&mut self, url: &str, inputs: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (value, markup) in inputs {
            self.record(RawEvent::input(url, markup, value));
        }
    }

    /// Note that the pointer rested on `markup`. Returns whether it was new for `url`.
    pub fn record_hover(&mut self, url: &str, markup: String) -> bool {
        let index = self.page_index(url);
        let page = &mut self.pages[index];
        if page.hovers.contains(&markup) {
            return false;
        }
        info!("Hovered element: {markup}");
        page.hovers.push(markup);
        true
    }

    /// Unique clicked markup for `url`, in first-click order.
    pub fn click_log(&self, url: &str) -> &[String] {
        self.by_url
            .get(url)
            .and_then(|&index| self.pages.get(index))
            .map(|page| page.clicks.as_slice())
            .unwrap_or_default()
    }

    /// Unique hovered markup for `url`, in first-hover order.
    pub fn hover_log(&self, url: &str) -> &[String] {
        self.by_url
            .get(url)
            .and_then(|&index| self.pages.get(index))
            .map(|page| page.hovers.as_slice())
            .unwrap_or_default()
    }

    /// Events of the current segment for `url`, in arrival order.
    pub fn history(&self, url: &str) -> &[HistoryEntry] {
        self.by_url
            .get(url)
            .and_then(|&index| self.pages.get(index))
            .map(|page| page.events.as_slice())
            .unwrap_or_default()
    }

    /// Known page URLs, in the order they were first seen.
    pub fn pages(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.url.as_str())
    }

    /// Flatten the current segment (page by page, in first-event order) and clear every
    /// page's event history. Click logs and input pairs survive.
    pub fn take_segment(&mut self) -> Vec<HistoryEntry> {
        let mut events = Vec::new();
        for index in mem::take(&mut self.segment_order) {
            if let Some(page) = self.pages.get_mut(index) {
                events.append(&mut page.events);
            }
        }
        events
    }

    /// Shutdown diagnostic: unique clicked markup grouped by page. Pages without clicks
    /// are left out; an empty string means nothing was clicked at all.
    pub fn click_summary(&self) -> String {
        self.summary(|page| &page.clicks)
    }

    /// Shutdown diagnostic: unique hovered markup grouped by page, in the click summary's
    /// format.
    pub fn hover_summary(&self) -> String {
        self.summary(|page| &page.hovers)
    }

    fn summary<F>(&self, log: F) -> String
    where
        F: Fn(&PageHistory) -> &Vec<String>,
    {
        let mut out = String::new();
        for page in &self.pages {
            let markups = log(page);
            if markups.is_empty() {
                continue;
            }
            out.push_str("Page URL: ");
            out.push_str(&page.url);
            out.push('\n');
            for markup in markups {
                out.push_str(" - ");
                out.push_str(markup);
                out.push('\n');
            }
        }
        out
    }
}
