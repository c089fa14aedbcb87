//! Executable lookup on the search path

/// Answers whether a token names a reachable executable
pub trait ExecutableResolver: Send + Sync {
    fn resolvable(&self, token: &str) -> bool;
}

/// Resolver backed by the platform's `PATH` search (`which`)
#[derive(Debug, Default, Clone, Copy)]
pub struct PathResolver;

impl ExecutableResolver for PathResolver {
    fn resolvable(&self, token: &str) -> bool {
        if token.is_empty() {
            return false;
        }
        match which::which(token) {
            Ok(path) => {
                tracing::debug!(token, path = %path.display(), "resolved executable");
                true
            }
            Err(e) => {
                tracing::debug!(token, error = %e, "executable not resolvable");
                false
            }
        }
    }
}

/// First whitespace-separated token of a line, or "" for a blank line
pub fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}
