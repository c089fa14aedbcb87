//! Subprocess execution attached to the terminal
//!
//! Commands run through a shell interpreter so pipes, redirections and
//! globbing behave as typed. The child inherits stdin, stdout and stderr,
//! which keeps pagers and editors working and lets the terminal deliver
//! Ctrl+C straight to the child.

use std::io;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

/// Shared "a command is running" flag
///
/// Written only by [`CommandRunner`]; clones handed to the interrupt
/// watcher observe the same value.
#[derive(Debug, Clone, Default)]
pub struct RunningFlag(Arc<AtomicBool>);

impl RunningFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> RunningGuard<'_> {
        self.0.store(true, Ordering::SeqCst);
        RunningGuard { flag: self }
    }
}

/// Clears the flag when the command scope ends, on every exit path
struct RunningGuard<'a> {
    flag: &'a RunningFlag,
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.flag.0.store(false, Ordering::SeqCst);
    }
}

/// How a finished process exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitInfo {
    /// Exit code, `None` when the process was terminated by a signal
    pub code: Option<i32>,
}

impl ExitInfo {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Result of running one command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The process ran and terminated, whatever its exit status
    Completed(ExitInfo),
    /// The process could not be started
    Failed(String),
}

/// Starts a command line and waits for it to finish
#[async_trait]
pub trait Spawn: Send + Sync {
    async fn run(&self, line: &str) -> io::Result<ExitInfo>;
}

/// Runs lines through the platform shell with inherited terminal I/O
#[derive(Debug, Clone)]
pub struct ShellSpawner {
    program: String,
    command_flag: String,
}

impl ShellSpawner {
    pub fn with_shell(program: impl Into<String>, command_flag: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            command_flag: command_flag.into(),
        }
    }
}

impl Default for ShellSpawner {
    #[cfg(windows)]
    fn default() -> Self {
        Self::with_shell("cmd", "/C")
    }

    #[cfg(not(windows))]
    fn default() -> Self {
        Self::with_shell("sh", "-c")
    }
}

#[async_trait]
impl Spawn for ShellSpawner {
    async fn run(&self, line: &str) -> io::Result<ExitInfo> {
        let status = Command::new(&self.program)
            .arg(&self.command_flag)
            .arg(line)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;
        Ok(ExitInfo {
            code: status.code(),
        })
    }
}

/// Executes command lines one at a time and tracks whether one is running
pub struct CommandRunner {
    spawner: Box<dyn Spawn>,
    running: RunningFlag,
}

impl CommandRunner {
    pub fn new(spawner: Box<dyn Spawn>) -> Self {
        Self {
            spawner,
            running: RunningFlag::new(),
        }
    }

    /// Runner using the platform shell
    pub fn shell() -> Self {
        Self::new(Box::new(ShellSpawner::default()))
    }

    /// Handle for observers such as the interrupt watcher
    pub fn running_flag(&self) -> RunningFlag {
        self.running.clone()
    }

    /// Run `line` to completion
    pub async fn execute(&self, line: &str) -> CommandOutcome {
        let _guard = self.running.acquire();
        match self.spawner.run(line).await {
            Ok(exit) => {
                tracing::debug!(
                    command = line,
                    code = ?exit.code,
                    success = exit.success(),
                    "command finished"
                );
                CommandOutcome::Completed(exit)
            }
            Err(e) => {
                tracing::debug!(command = line, error = %e, "command failed to start");
                CommandOutcome::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    /// Spawner that stays "running" until released
    struct HeldSpawner {
        started: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl Spawn for HeldSpawner {
        async fn run(&self, _line: &str) -> io::Result<ExitInfo> {
            self.started.notify_one();
            self.release.notified().await;
            Ok(ExitInfo { code: Some(0) })
        }
    }

    /// Spawner that records the flag value it observes, then fails to start
    struct FailingProbe {
        flag: Mutex<Option<RunningFlag>>,
        observed: Mutex<Option<bool>>,
    }

    #[async_trait]
    impl Spawn for FailingProbe {
        async fn run(&self, _line: &str) -> io::Result<ExitInfo> {
            let running = self.flag.lock().unwrap().as_ref().map(|f| f.is_running());
            *self.observed.lock().unwrap() = running;
            Err(io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }
    }

    #[tokio::test]
    async fn test_flag_set_only_while_running() {
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let runner = CommandRunner::new(Box::new(HeldSpawner {
            started: started.clone(),
            release: release.clone(),
        }));
        let flag = runner.running_flag();
        assert!(!flag.is_running());

        let sampler = async {
            started.notified().await;
            let during = flag.is_running();
            release.notify_one();
            during
        };
        let (outcome, during) = tokio::join!(runner.execute("vim notes.txt"), sampler);

        assert!(during);
        assert!(!flag.is_running());
        assert_eq!(outcome, CommandOutcome::Completed(ExitInfo { code: Some(0) }));
    }

    #[tokio::test]
    async fn test_flag_cleared_after_start_failure() {
        let probe = Arc::new(FailingProbe {
            flag: Mutex::new(None),
            observed: Mutex::new(None),
        });

        struct Shared(Arc<FailingProbe>);

        #[async_trait]
        impl Spawn for Shared {
            async fn run(&self, line: &str) -> io::Result<ExitInfo> {
                self.0.run(line).await
            }
        }

        let runner = CommandRunner::new(Box::new(Shared(probe.clone())));
        *probe.flag.lock().unwrap() = Some(runner.running_flag());

        let outcome = runner.execute("ghost").await;

        assert!(matches!(outcome, CommandOutcome::Failed(ref reason) if reason.contains("no such file")));
        assert_eq!(*probe.observed.lock().unwrap(), Some(true));
        assert!(!runner.running_flag().is_running());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_reports_exit_code() {
        let runner = CommandRunner::shell();
        assert_eq!(
            runner.execute("exit 3").await,
            CommandOutcome::Completed(ExitInfo { code: Some(3) })
        );
        assert_eq!(
            runner.execute("true | cat").await,
            CommandOutcome::Completed(ExitInfo { code: Some(0) })
        );
        assert!(!runner.running_flag().is_running());
    }

    #[tokio::test]
    async fn test_missing_shell_is_failure() {
        let runner = CommandRunner::new(Box::new(ShellSpawner::with_shell(
            "/nonexistent/shell-3f9a1c",
            "-c",
        )));
        assert!(matches!(runner.execute("echo hi").await, CommandOutcome::Failed(_)));
        assert!(!runner.running_flag().is_running());
    }

    #[test]
    fn test_exit_info_success() {
        assert!(ExitInfo { code: Some(0) }.success());
        assert!(!ExitInfo { code: Some(1) }.success());
        assert!(!ExitInfo { code: None }.success());
    }
}
