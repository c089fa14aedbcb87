pub mod config;
pub mod error;

pub use config::{SamplingParams, ShellConfig};
pub use error::{Result, ShellError};
