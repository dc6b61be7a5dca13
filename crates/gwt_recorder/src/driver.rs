//! Chrome session management and the per-tick poll of the recorded page.

use crate::capture::{DRAIN_QUEUE, INSTALL_LISTENERS};
use anyhow::{Error, anyhow};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::page::Page;
use core::time::Duration;
use futures::StreamExt as _;
use log::{debug, info, warn};
use recorder::{Message, RecorderConfig};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, MissedTickBehavior};
use url::Url;

/// Browser instance with its background CDP event handler.
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    /// Launch Chrome, headed unless the config asks otherwise.
    ///
    /// # Errors
    /// Returns an error if the browser cannot be started.
    pub async fn launch(config: &RecorderConfig) -> Result<Self, Error> {
        let mut builder = BrowserConfig::builder();
        if !config.headless {
            builder = builder.with_head();
        }
        let browser_config = builder
            .build()
            .map_err(|err| anyhow!("Browser config error: {err}"))?;
        let (browser, mut handler) = Browser::launch(browser_config).await?;

        let handler = task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    debug!("Browser event error: {err:?}");
                }
            }
        });
        Ok(Self { browser, handler })
    }

    /// Open `url` in a new tab whose documents all start with the capture listeners installed.
    ///
    /// # Errors
    /// Returns an error if the tab cannot be created or navigated.
    pub async fn open(&self, url: &Url) -> Result<Page, Error> {
        let page = self.browser.new_page("about:blank").await?;
        page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(
            INSTALL_LISTENERS,
        ))
        .await?;
        info!("Opening {url}");
        page.goto(url.as_str()).await?;
        Ok(page)
    }

    pub async fn close(mut self) {
        if let Err(err) = self.browser.close().await {
            debug!("Browser already gone: {err}");
        }
        self.handler.abort();
    }
}

/// Poll `page` every `interval` until the browser stops answering or the control loop hangs up.
///
/// A single failed tick is logged and skipped; `max_failed_ticks` failures in a row end the
/// session with a `Shutdown` message so the report still gets rendered.
pub async fn poll_page(
    page: Page,
    interval: Duration,
    max_failed_ticks: u32,
    messages: UnboundedSender<Message>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut current_url = String::new();
    let mut failures = 0u32;

    loop {
        ticker.tick().await;
        match poll_once(&page, &mut current_url, &messages).await {
            Ok(()) => failures = 0,
            Err(err) => {
                failures = failures.saturating_add(1);
                warn!("Poll failed ({failures}/{max_failed_ticks}): {err:#}");
                if failures >= max_failed_ticks {
                    info!("Browser is no longer reachable; ending the recording");
                    break;
                }
            }
        }
        if messages.is_closed() {
            return;
        }
    }

    if messages.send(Message::Shutdown).is_err() {
        debug!("Control loop already stopped");
    }
}

async fn poll_once(
    page: &Page,
    current_url: &mut String,
    messages: &UnboundedSender<Message>,
) -> Result<(), Error> {
    let url = page.url().await?.unwrap_or_default();
    if url != *current_url {
        info!("Now on {url}");
        current_url.clone_from(&url);
        send(messages, Message::Visit { url: url.clone() })?;
    }

    // No-op once the listeners are in; covers a document that predates the registration.
    page.evaluate(INSTALL_LISTENERS).await?;
    let records: Value = page.evaluate(DRAIN_QUEUE).await?.into_value()?;
    send(messages, Message::Batch { url, records })
}

fn send(messages: &UnboundedSender<Message>, message: Message) -> Result<(), Error> {
    messages
        .send(message)
        .map_err(|_closed| anyhow!("control loop stopped"))
}
