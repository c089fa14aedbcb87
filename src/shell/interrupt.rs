//! Ctrl+C policy
//!
//! At the prompt an interrupt ends the session. While a command runs the
//! interrupt belongs to the child, which shares the terminal and receives
//! the signal directly, so the shell does nothing.

use std::io::{self, Write};

use tokio::task::JoinHandle;

use crate::shell::runner::RunningFlag;
use crate::ui;

/// What the shell does with an interrupt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterruptAction {
    /// Print the farewell and exit successfully
    Exit,
    /// Leave it to the running child
    PassThrough,
}

/// Decide from the flag as it reads now, not when the signal arrived.
///
/// A child killed by the same Ctrl+C may already be reaped by then, in
/// which case the shell exits too.
pub fn on_interrupt(running: &RunningFlag) -> InterruptAction {
    if running.is_running() {
        InterruptAction::PassThrough
    } else {
        InterruptAction::Exit
    }
}

/// Listen for Ctrl+C for the rest of the process lifetime
pub fn spawn_interrupt_watcher(running: RunningFlag) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!(error = %e, "could not listen for interrupts");
                return;
            }
            match on_interrupt(&running) {
                InterruptAction::Exit => {
                    let mut stdout = io::stdout();
                    let _ = writeln!(stdout);
                    let _ = ui::farewell(&mut stdout);
                    std::process::exit(0);
                }
                InterruptAction::PassThrough => {
                    tracing::debug!("interrupt left to running command");
                }
            }
        }
    })
}
