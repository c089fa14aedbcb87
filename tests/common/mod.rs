//! Test doubles for driving the interactive loop without a network or real processes

#![allow(dead_code)]

use std::collections::{HashSet, VecDeque};
use std::io;
use std::sync::{Arc, Mutex};

use ai_shell::core::error::{Result, ShellError};
use ai_shell::llm::{Assistant, CompletionBackend, CompletionRequest};
use ai_shell::shell::{CommandRunner, ExecutableResolver, ExitInfo, InteractionLoop, Spawn};
use async_trait::async_trait;
use tokio::io::BufReader;

/// Backend replaying scripted replies in order; `Err` entries simulate transport failures
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedBackend {
    pub fn new(replies: Vec<std::result::Result<&str, &str>>) -> Arc<Self> {
        let replies = replies
            .into_iter()
            .map(|r| r.map(String::from).map_err(String::from))
            .collect();
        Arc::new(Self {
            replies: Mutex::new(replies),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(msg)) => Err(ShellError::LlmError(msg)),
            None => Err(ShellError::LlmError("no scripted reply".into())),
        }
    }
}

/// Resolver that knows a fixed set of executables
pub struct StaticResolver(HashSet<String>);

impl StaticResolver {
    pub fn new(names: &[&str]) -> Self {
        Self(names.iter().map(|n| n.to_string()).collect())
    }
}

impl ExecutableResolver for StaticResolver {
    fn resolvable(&self, token: &str) -> bool {
        self.0.contains(token)
    }
}

/// Spawner that records each command line and reports a clean exit
#[derive(Clone, Default)]
pub struct RecordingSpawner {
    pub lines: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Spawn for RecordingSpawner {
    async fn run(&self, line: &str) -> io::Result<ExitInfo> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(ExitInfo { code: Some(0) })
    }
}

/// Spawner whose processes never start
pub struct BrokenSpawner;

#[async_trait]
impl Spawn for BrokenSpawner {
    async fn run(&self, _line: &str) -> io::Result<ExitInfo> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
    }
}

pub type TestLoop = InteractionLoop<BufReader<&'static [u8]>, Vec<u8>, Vec<u8>>;

pub fn shell_with(
    backend: Arc<ScriptedBackend>,
    resolver: StaticResolver,
    spawner: Box<dyn Spawn>,
    input: &'static str,
) -> TestLoop {
    InteractionLoop::new(
        Assistant::new(backend),
        Box::new(resolver),
        CommandRunner::new(spawner),
        BufReader::new(input.as_bytes()),
        Vec::new(),
        Vec::new(),
    )
}

/// Run the loop to completion and return (stdout, stderr) as text
pub async fn run_to_end(mut shell: TestLoop) -> (String, String) {
    shell.run().await.expect("loop ended with an error");
    let (out, err) = shell.into_writers();
    (
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}
