//! Runtime configuration for a recording session.
//!
//! Values come from environment variables; the start URL can also be given as the first
//! command-line argument, which wins over the environment.

use anyhow::{Context as _, Error};
use core::time::Duration;
use std::env;
use url::Url;

pub const DEFAULT_START_URL: &str = "https://opensource-demo.orangehrmlive.com/";
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_MAX_FAILED_TICKS: u32 = 3;

#[derive(Clone, Debug)]
pub struct RecorderConfig {
    /// Page the browser opens first
    pub start_url: Url,
    /// Delay between two polls of the capture queue
    pub poll_interval_ms: u64,
    /// Launch Chrome without a window
    pub headless: bool,
    /// Print the per-page click listing after the report
    pub click_summary: bool,
    /// Print the per-page listing of elements hovered for 5 seconds after the report
    pub hover_summary: bool,
    /// Consecutive failed polls after which the browser is considered gone
    pub max_failed_ticks: u32,
}

impl RecorderConfig {
    /// Load configuration from the process environment.
    ///
    /// Reads the following environment variables:
    /// - `GWT_START_URL`: first page to open (default: the `OrangeHRM` demo)
    /// - `GWT_POLL_INTERVAL_MS`: poll period in milliseconds (default: 1000, minimum 1)
    /// - `GWT_HEADLESS`: set to "1" to run Chrome headless
    /// - `GWT_CLICK_SUMMARY`: set to "1" to print the click listing on shutdown
    /// - `GWT_HOVER_SUMMARY`: set to "1" to print the hover listing on shutdown
    /// - `GWT_MAX_FAILED_TICKS`: failed polls in a row before giving up (default: 3)
    ///
    /// # Errors
    /// Returns an error if the start URL does not parse.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but reads variables through `lookup`.
    ///
    /// # Errors
    /// Returns an error if the start URL does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let start_url = lookup("GWT_START_URL").unwrap_or_else(|| DEFAULT_START_URL.to_owned());
        let poll_interval_ms = lookup("GWT_POLL_INTERVAL_MS")
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS)
            .max(1);
        let max_failed_ticks = lookup("GWT_MAX_FAILED_TICKS")
            .and_then(|val| val.parse::<u32>().ok())
            .unwrap_or(DEFAULT_MAX_FAILED_TICKS)
            .max(1);
        Ok(Self {
            start_url: parse_start_url(&start_url)?,
            poll_interval_ms,
            headless: lookup("GWT_HEADLESS").as_deref() == Some("1"),
            click_summary: lookup("GWT_CLICK_SUMMARY").as_deref() == Some("1"),
            hover_summary: lookup("GWT_HOVER_SUMMARY").as_deref() == Some("1"),
            max_failed_ticks,
        })
    }

    /// Override the start URL, typically from the command line.
    ///
    /// # Errors
    /// Returns an error if `raw` does not parse as a URL.
    pub fn with_start_url(mut self, raw: &str) -> Result<Self, Error> {
        self.start_url = parse_start_url(raw)?;
        Ok(self)
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

fn parse_start_url(raw: &str) -> Result<Url, Error> {
    Url::parse(raw.trim()).with_context(|| format!("invalid start URL `{raw}`"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<RecorderConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        RecorderConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_without_variables() -> Result<()> {
        let config = config_from(&[])?;
        assert_eq!(config.start_url.as_str(), DEFAULT_START_URL);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
        assert!(!config.headless);
        assert!(!config.click_summary);
        assert!(!config.hover_summary);
        assert_eq!(config.max_failed_ticks, DEFAULT_MAX_FAILED_TICKS);
        Ok(())
    }

    #[test]
    fn variables_override_defaults() -> Result<()> {
        let config = config_from(&[
            ("GWT_START_URL", "http://localhost:8080/login"),
            ("GWT_POLL_INTERVAL_MS", "250"),
            ("GWT_HEADLESS", "1"),
            ("GWT_CLICK_SUMMARY", "1"),
            ("GWT_HOVER_SUMMARY", "1"),
            ("GWT_MAX_FAILED_TICKS", "0"),
        ])?;
        assert_eq!(config.start_url.as_str(), "http://localhost:8080/login");
        assert_eq!(config.poll_interval_ms, 250);
        assert!(config.headless);
        assert!(config.click_summary);
        assert!(config.hover_summary);
        assert_eq!(config.max_failed_ticks, 1);
        Ok(())
    }

    #[test]
    fn zero_interval_is_clamped_and_garbage_ignored() -> Result<()> {
        assert_eq!(config_from(&[("GWT_POLL_INTERVAL_MS", "0")])?.poll_interval_ms, 1);
        assert_eq!(
            config_from(&[("GWT_POLL_INTERVAL_MS", "soon")])?.poll_interval_ms,
            DEFAULT_POLL_INTERVAL_MS
        );
        Ok(())
    }

    #[test]
    fn bad_start_url_is_an_error() -> Result<()> {
        assert!(config_from(&[("GWT_START_URL", "not a url")]).is_err());
        let config = config_from(&[])?.with_start_url("https://example.org/")?;
        assert_eq!(config.start_url.as_str(), "https://example.org/");
        Ok(())
    }
}
