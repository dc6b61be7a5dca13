use crate::driver::ChromeSession;
use anyhow::Error;
use log::{debug, error, info};
use recorder::{ControlLoop, Message, RecorderConfig};
use std::env;
use std::io::{self, Write as _};
use tokio::io::{AsyncBufReadExt as _, BufReader, stdin};
use tokio::runtime::Runtime;
use tokio::signal;
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio::task;

mod capture;
mod driver;

/// What the session leaves behind once the ledger is finalized.
struct Outcome {
    report: String,
    click_summary: String,
    hover_summary: String,
}

pub fn main() -> Result<(), Error> {
    env_logger::init();

    let mut config = RecorderConfig::from_env()?;
    if let Some(start_url) = env::args().nth(1) {
        config = config.with_start_url(&start_url)?;
    }

    let runtime = Runtime::new()?;
    let outcome = runtime.block_on(record(&config));
    // The stdin reader sits in a blocking read; don't wait for it.
    runtime.shutdown_background();
    let outcome = outcome?;

    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", outcome.report)?;
    if config.click_summary && !outcome.click_summary.is_empty() {
        writeln!(stdout, "\nAll Clicked Elements by Page:")?;
        write!(stdout, "{}", outcome.click_summary)?;
    }
    if config.hover_summary && !outcome.hover_summary.is_empty() {
        writeln!(stdout, "\nAll Hovered Elements by Page:")?;
        write!(stdout, "{}", outcome.hover_summary)?;
    }
    stdout.flush()?;
    Ok(())
}

async fn record(config: &RecorderConfig) -> Result<Outcome, Error> {
    let session = ChromeSession::launch(config).await?;
    let page = session.open(&config.start_url).await?;
    info!("Recording. Ctrl+Alt+G/W/T in the page (or given/when/then on stdin) switch stage; Ctrl-C ends.");

    let (tx, rx) = mpsc::unbounded_channel();
    let poller = task::spawn(driver::poll_page(
        page,
        config.poll_interval(),
        config.max_failed_ticks,
        tx.clone(),
    ));
    let console = task::spawn(forward_console_stages(tx.clone()));
    let interrupt = task::spawn(forward_interrupt(tx));

    let mut control = ControlLoop::new();
    let report = control.run(rx).await;

    poller.abort();
    console.abort();
    interrupt.abort();
    session.close().await;

    Ok(Outcome {
        report,
        click_summary: control.aggregator().click_summary(),
        hover_summary: control.aggregator().hover_summary(),
    })
}

/// Turn Ctrl-C into a `Shutdown` message.
async fn forward_interrupt(messages: UnboundedSender<Message>) {
    if let Err(err) = signal::ctrl_c().await {
        error!("Cannot listen for Ctrl-C: {err}");
        return;
    }
    info!("Shutdown requested");
    if messages.send(Message::Shutdown).is_err() {
        debug!("Control loop already stopped");
    }
}

/// Every non-empty stdin line is a stage-switch request.
async fn forward_console_stages(messages: UnboundedSender<Message>) {
    let mut lines = BufReader::new(stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let name = line.trim();
                if name.is_empty() {
                    continue;
                }
                if messages.send(Message::SwitchStage(name.to_owned())).is_err() {
                    return;
                }
            }
            Ok(None) => return,
            Err(err) => {
                debug!("Stopped reading stage commands: {err}");
                return;
            }
        }
    }
}
