//! Interactive shell: executable lookup, command execution and the main loop

pub mod interrupt;
pub mod repl;
pub mod resolver;
pub mod runner;

pub use interrupt::{on_interrupt, spawn_interrupt_watcher, InterruptAction};
pub use repl::{is_exit_command, InteractionLoop, Step};
pub use resolver::{first_token, ExecutableResolver, PathResolver};
pub use runner::{CommandOutcome, CommandRunner, ExitInfo, RunningFlag, ShellSpawner, Spawn};
