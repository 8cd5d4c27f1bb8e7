use anyhow::{Context, Result};
use inquire::{InquireError, Text};
use std::io::Write;
use tracing::info;

use weather_query_core::{Backend, QueryStateMachine};

use crate::render::{PLACEHOLDER, render};

/// Drives one state machine against one backend and prints every visible state.
pub struct Session<'a> {
    machine: QueryStateMachine,
    backend: &'a dyn Backend,
}

impl<'a> Session<'a> {
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self {
            machine: QueryStateMachine::new(),
            backend,
        }
    }

    /// One edit → submit → render → reset cycle.
    ///
    /// Returns `false` without printing anything when the text is blank.
    pub async fn turn(&mut self, text: &str, out: &mut impl Write) -> Result<bool> {
        self.machine.edit_input(text);

        let Some(pending) = self.machine.begin_submit() else {
            return Ok(false);
        };

        writeln!(out, "You: {}", pending.query)?;
        writeln!(out, "{}", render(self.machine.state()))?;
        out.flush()?;

        let outcome = pending.dispatch(self.backend).await;
        self.machine.settle(pending.ticket, outcome);

        writeln!(out, "{}", render(self.machine.state()))?;
        out.flush()?;

        self.machine.reset();
        Ok(true)
    }

    /// Interactive prompt loop; ends on Esc or Ctrl-C.
    pub async fn chat(&mut self, out: &mut impl Write) -> Result<()> {
        info!("chat session started");

        loop {
            let text = match Text::new("You:").with_placeholder(PLACEHOLDER).prompt() {
                Ok(text) => text,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
                Err(err) => return Err(err).context("Failed to read query from terminal"),
            };

            if self.turn(&text, out).await? {
                writeln!(out)?;
            }
        }

        info!(
            queries = self.machine.requests_issued(),
            "chat session ended"
        );
        Ok(())
    }
}
