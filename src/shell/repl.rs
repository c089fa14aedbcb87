//! The interactive read-classify-dispatch loop
//!
//! One line is handled at a time. Classification always finishes before the
//! line is executed or sent to the assistant, and the prompt is not shown
//! again until that work is done.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::core::error::Result;
use crate::llm::assistant::{Assistant, Classification, INVALID_COMMAND_CONTEXT};
use crate::shell::resolver::{first_token, ExecutableResolver};
use crate::shell::runner::{CommandOutcome, CommandRunner, RunningFlag};
use crate::ui;

/// Whether the session continues after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exit,
}

/// True for `exit` / `quit` in any letter case, ignoring surrounding whitespace
pub fn is_exit_command(input: &str) -> bool {
    let input = input.trim().to_lowercase();
    input == "exit" || input == "quit"
}

/// Interactive shell session
///
/// `out` receives the prompt, assistant replies and warnings; `err`
/// receives error messages.
pub struct InteractionLoop<I, W, E> {
    assistant: Assistant,
    resolver: Box<dyn ExecutableResolver>,
    runner: CommandRunner,
    input: Lines<I>,
    out: W,
    err: E,
}

impl<I, W, E> InteractionLoop<I, W, E>
where
    I: AsyncBufRead + Unpin,
    W: Write,
    E: Write,
{
    pub fn new(
        assistant: Assistant,
        resolver: Box<dyn ExecutableResolver>,
        runner: CommandRunner,
        input: I,
        out: W,
        err: E,
    ) -> Self {
        Self {
            assistant,
            resolver,
            runner,
            input: input.lines(),
            out,
            err,
        }
    }

    /// Handle for the interrupt watcher
    pub fn running_flag(&self) -> RunningFlag {
        self.runner.running_flag()
    }

    /// Run until `exit`, `quit` or end of input
    pub async fn run(&mut self) -> Result<()> {
        ui::banner(&mut self.out)?;
        loop {
            ui::prompt(&mut self.out)?;
            let line = match self.input.next_line().await? {
                Some(line) => line,
                None => {
                    writeln!(self.out)?;
                    ui::farewell(&mut self.out)?;
                    return Ok(());
                }
            };
            if self.handle_line(&line).await? == Step::Exit {
                return Ok(());
            }
        }
    }

    /// Handle one line
    pub async fn handle_line(&mut self, line: &str) -> Result<Step> {
        let input = line.trim();

        if is_exit_command(input) {
            ui::farewell(&mut self.out)?;
            return Ok(Step::Exit);
        }
        if input.is_empty() {
            return Ok(Step::Continue);
        }

        // A failed classifier call leans conversational; a garbled reply
        // already leaned towards COMMAND inside parse_classification.
        let classification = match self.assistant.classify(input).await {
            Ok(classification) => classification,
            Err(e) => {
                tracing::debug!(error = %e, "classification failed");
                ui::error(&mut self.err, &format!("Classification failed: {}", e))?;
                Classification::Natural
            }
        };

        match classification {
            Classification::Natural => {
                ui::thinking(&mut self.out)?;
                self.reply(input, "").await?;
            }
            Classification::Command => {
                if self.resolver.resolvable(first_token(input)) {
                    self.execute(input).await?;
                } else {
                    ui::warning(&mut self.out, ui::NOT_FOUND_WARNING)?;
                    self.reply(input, INVALID_COMMAND_CONTEXT).await?;
                }
            }
        }

        Ok(Step::Continue)
    }

    async fn execute(&mut self, input: &str) -> Result<()> {
        self.out.flush()?;
        if let CommandOutcome::Failed(reason) = self.runner.execute(input).await {
            ui::error(
                &mut self.err,
                &format!("Error executing command: {}", reason),
            )?;
        }
        Ok(())
    }

    async fn reply(&mut self, input: &str, context: &str) -> Result<()> {
        match self.assistant.ask(input, context).await {
            Ok(text) if text.trim().is_empty() => {
                tracing::debug!("assistant returned an empty reply");
            }
            Ok(text) => ui::ai_reply(&mut self.out, &text)?,
            Err(e) => {
                tracing::debug!(error = %e, "assistant request failed");
                ui::error(&mut self.err, &e.to_string())?;
            }
        }
        Ok(())
    }

    /// Consume the loop, returning the output writers
    pub fn into_writers(self) -> (W, E) {
        (self.out, self.err)
    }
}
