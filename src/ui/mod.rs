//! Color-coded terminal output for the interactive shell
//!
//! Every helper writes to any `io::Write`, so the loop can target the real
//! terminal while tests capture into a buffer.

use std::io::{self, Write};
use std::sync::OnceLock;

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::tty::IsTty;

pub const PROMPT: &str = "ai-shell> ";
pub const AI_PREFIX: &str = "🤖 AI:";
pub const FAREWELL: &str = "Goodbye!";
pub const NOT_FOUND_WARNING: &str = "⚠️  Command not found or invalid syntax";

/// Colors are used only when stdout is a terminal and `NO_COLOR` is unset
pub fn colors_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| io::stdout().is_tty() && std::env::var_os("NO_COLOR").is_none())
}

fn styled<W: Write>(w: &mut W, text: &str, color: Color, enabled: bool) -> io::Result<()> {
    if enabled {
        queue!(w, SetForegroundColor(color), Print(text), ResetColor)
    } else {
        queue!(w, Print(text))
    }
}

fn colored<W: Write>(w: &mut W, text: &str, color: Color) -> io::Result<()> {
    styled(w, text, color, colors_enabled())
}

pub fn banner<W: Write>(w: &mut W) -> io::Result<()> {
    colored(w, "Welcome to AI Shell! 🚀\n", Color::Blue)?;
    colored(w, "Type commands or ask questions in natural language.\n", Color::DarkGrey)?;
    colored(w, "Type \"exit\" or Ctrl+C to quit.\n\n", Color::DarkGrey)?;
    w.flush()
}

pub fn prompt<W: Write>(w: &mut W) -> io::Result<()> {
    colored(w, PROMPT, Color::Green)?;
    w.flush()
}

pub fn thinking<W: Write>(w: &mut W) -> io::Result<()> {
    colored(w, AI_PREFIX, Color::Cyan)?;
    colored(w, " Thinking...\n", Color::DarkGrey)?;
    w.flush()
}

pub fn ai_reply<W: Write>(w: &mut W, text: &str) -> io::Result<()> {
    colored(w, AI_PREFIX, Color::Cyan)?;
    queue!(w, Print(" "), Print(text), Print("\n"))?;
    w.flush()
}

pub fn warning<W: Write>(w: &mut W, text: &str) -> io::Result<()> {
    colored(w, text, Color::Yellow)?;
    queue!(w, Print("\n"))?;
    w.flush()
}

pub fn error<W: Write>(w: &mut W, text: &str) -> io::Result<()> {
    colored(w, text, Color::Red)?;
    queue!(w, Print("\n"))?;
    w.flush()
}

/// Printed on every graceful exit
pub fn farewell<W: Write>(w: &mut W) -> io::Result<()> {
    warning(w, FAREWELL)
}

/// Printed when the credential is missing, before exiting
pub fn setup_hint<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    error(w, &format!("Error: {}", message))?;
    warning(w, "Please create a .env file with your OpenAI API key.")?;
    colored(w, "Example: OPENAI_API_KEY=your_api_key_here\n", Color::DarkGrey)?;
    w.flush()
}
