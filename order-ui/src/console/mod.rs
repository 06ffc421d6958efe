//! Line-oriented front end for the order form.
//!
//! Commands are read from any `AsyncBufRead` (stdin in the binary). Sends
//! to the order sink and the post-success reset timer run as spawned tasks
//! and report back over a channel, so input keeps being accepted while a
//! submission is pending.

pub mod command;
pub mod render;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use order_core::form::{FieldName, OrderForm, SubmissionState, SubmitRejected};
use order_core::models::KitId;
use order_core::sink::{Delivery, OrderSink, SinkError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub use command::{Command, CommandError, HELP};

const RESET_PROMPT: &str = "Are you sure you want to reset the form? [y/N]";

/// Results delivered back to the console by background tasks.
#[derive(Debug)]
pub enum ConsoleEvent {
    SubmitFinished(Result<Delivery, SinkError>),
    /// Fired once the success banner has been up long enough. Carries the
    /// success it belongs to so a stale timer cannot clear a later order.
    ResetDue { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Console<W> {
    form: OrderForm,
    sink: Arc<dyn OrderSink>,
    reset_delay: Duration,
    out: W,
    events_tx: mpsc::Sender<ConsoleEvent>,
    events_rx: mpsc::Receiver<ConsoleEvent>,
    success_generation: u64,
    confirming_reset: bool,
}

impl<W: Write> Console<W> {
    pub fn new(
        form: OrderForm,
        sink: Arc<dyn OrderSink>,
        reset_delay: Duration,
        out: W,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(16);
        Self {
            form,
            sink,
            reset_delay,
            out,
            events_tx,
            events_rx,
            success_generation: 0,
            confirming_reset: false,
        }
    }

    pub fn form(&self) -> &OrderForm {
        &self.form
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    /// Processes input until `quit` or end of input, then waits for a send
    /// still in flight so its outcome is not lost. A successful order is
    /// cleared before returning, since its reset timer dies with the loop.
    pub async fn run<R>(
        &mut self,
        input: R,
    ) -> anyhow::Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        writeln!(self.out, "{}", render::render(&self.form))?;
        writeln!(self.out, "Type 'help' for commands.")?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if self.handle_line(&line).await? == Flow::Quit {
                        break;
                    }
                }
                Some(event) = self.events_rx.recv() => self.handle_event(event).await?,
            }
        }

        if self.form.submission_state() == SubmissionState::Submitting {
            writeln!(self.out, "Waiting for the pending submission...")?;
            while self.form.submission_state() == SubmissionState::Submitting {
                match self.events_rx.recv().await {
                    Some(event) => self.handle_event(event).await?,
                    None => break,
                }
            }
        }

        if self.form.complete_success_reset().await {
            writeln!(self.out, "Form cleared for the next order.")?;
        }
        Ok(())
    }

    /// Waits for the next background result.
    pub async fn next_event(&mut self) -> Option<ConsoleEvent> {
        self.events_rx.recv().await
    }

    pub async fn handle_line(
        &mut self,
        line: &str,
    ) -> anyhow::Result<Flow> {
        if std::mem::take(&mut self.confirming_reset) {
            if matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                self.reset().await?;
            } else {
                writeln!(self.out, "Reset cancelled.")?;
            }
            return Ok(Flow::Continue);
        }

        let command = match Command::parse(line, self.form.catalog()) {
            Ok(command) => command,
            Err(CommandError::Empty) => return Ok(Flow::Continue),
            Err(e) => {
                writeln!(self.out, "{e}")?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            Command::Set { field, value } => {
                self.form.edit(&field, &value).await;
                if let FieldName::Quantity(kit) = &field {
                    self.print_kit(kit)?;
                }
            }
            Command::Increment(kit) => {
                self.form.increment(&kit).await;
                self.print_kit(&kit)?;
            }
            Command::Decrement(kit) => {
                self.form.decrement(&kit).await;
                self.print_kit(&kit)?;
            }
            Command::Quantity { kit, value } => {
                self.form.edit(&FieldName::Quantity(kit.clone()), &value).await;
                self.print_kit(&kit)?;
            }
            Command::Attach(path) => self.attach(&path).await?,
            Command::Detach => {
                self.form.attach(None).await;
                writeln!(self.out, "Payment proof removed.")?;
            }
            Command::Show => writeln!(self.out, "{}", render::render(&self.form))?,
            Command::Submit => self.submit()?,
            Command::Reset { confirmed: true } => self.reset().await?,
            Command::Reset { confirmed: false } => {
                self.confirming_reset = true;
                writeln!(self.out, "{RESET_PROMPT}")?;
            }
            Command::Dismiss => self.form.dismiss_notification(),
            Command::Log(level) => match crate::logging::set_log_level(&level) {
                Ok(()) => writeln!(self.out, "Log level set to '{level}'.")?,
                Err(e) => writeln!(self.out, "{e}")?,
            },
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    pub async fn handle_event(
        &mut self,
        event: ConsoleEvent,
    ) -> anyhow::Result<()> {
        match event {
            ConsoleEvent::SubmitFinished(result) => {
                let state = self.form.finish_submit(result).await;
                self.print_banner()?;
                if state == SubmissionState::Succeeded {
                    self.success_generation += 1;
                    self.schedule_reset(self.success_generation);
                }
            }
            ConsoleEvent::ResetDue { generation } => {
                if generation == self.success_generation
                    && self.form.complete_success_reset().await
                {
                    writeln!(self.out, "Form cleared for the next order.")?;
                }
            }
        }
        Ok(())
    }

    fn submit(&mut self) -> anyhow::Result<()> {
        match self.form.begin_submit() {
            Ok(payload) => {
                writeln!(self.out, "Submitting...")?;
                let sink = Arc::clone(&self.sink);
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = sink.send(&payload).await;
                    if tx.send(ConsoleEvent::SubmitFinished(result)).await.is_err() {
                        debug!("console closed before the submission finished");
                    }
                });
            }
            Err(SubmitRejected::Invalid(_)) => {
                self.print_banner()?;
                writeln!(self.out, "{}", render::render(&self.form))?;
            }
            Err(rejected) => writeln!(self.out, "{rejected}")?,
        }
        Ok(())
    }

    fn schedule_reset(
        &self,
        generation: u64,
    ) {
        let tx = self.events_tx.clone();
        let delay = self.reset_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(ConsoleEvent::ResetDue { generation }).await;
        });
    }

    async fn reset(&mut self) -> anyhow::Result<()> {
        self.form.reset().await;
        writeln!(self.out, "Form reset.")?;
        Ok(())
    }

    async fn attach(
        &mut self,
        path: &Path,
    ) -> anyhow::Result<()> {
        let is_file = tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false);
        let name = path.file_name().map(|n| n.to_string_lossy().into_owned());

        match name {
            Some(name) if is_file => {
                self.form.attach(Some(&name)).await;
                writeln!(self.out, "Attached {name}.")?;
            }
            _ => {
                warn!(path = %path.display(), "attachment is not a readable file");
                writeln!(self.out, "No such file: {}", path.display())?;
            }
        }
        Ok(())
    }

    fn print_kit(
        &mut self,
        kit: &KitId,
    ) -> anyhow::Result<()> {
        let text = self.form.summary_text();
        writeln!(
            self.out,
            "{kit}: {}   grand total {}",
            text.line(kit).unwrap_or_default(),
            text.grand_total
        )?;
        Ok(())
    }

    fn print_banner(&mut self) -> anyhow::Result<()> {
        if let Some(banner) = render::banner(self.form.notification()) {
            writeln!(self.out, "{banner}")?;
        }
        Ok(())
    }
}
