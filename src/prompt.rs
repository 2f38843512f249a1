//! User prompts and notifications

use crate::error::{Error, Result};

use log::{info, warn};
use std::io::{BufRead, Write};

/// Severity of a message shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    Info,
    Warning,
    Error,
}

/// Asks the user questions and tells them what happened
pub trait Prompt {
    /// Ask the user to pick one of `options`.
    ///
    /// Returns the chosen label, or `None` if the user dismissed the question.
    ///
    /// # Errors
    ///
    /// Returns `Error::Prompt` if the question cannot be asked.
    fn confirm(&mut self, message: &str, options: &[&str]) -> Result<Option<String>>;

    /// Show a message. Delivery failures are logged, never returned.
    fn notify(&mut self, notice: Notice, message: &str);
}

// =============================================================================
// Console prompt
// =============================================================================

/// Line-based prompt over any reader/writer pair.
///
/// An answer may be the option's number or its label (case-insensitive). An
/// empty line or end of input dismisses the question; anything else asks
/// again.
#[derive(Debug)]
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Prompt on the process's standard input and output
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give back the output, e.g. to inspect what was written
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, message: &str, options: &[&str]) -> std::io::Result<Option<String>> {
        writeln!(self.output, "{message}")?;
        for (i, option) in options.iter().enumerate() {
            writeln!(self.output, "  {}) {option}", i + 1)?;
        }

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            let answer = line.trim();
            if answer.is_empty() {
                return Ok(None);
            }

            if let Some(chosen) = match_answer(answer, options) {
                return Ok(Some(chosen.to_string()));
            }
            writeln!(
                self.output,
                "Please answer with 1-{} or one of: {}",
                options.len(),
                options.join(", ")
            )?;
        }
    }
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn confirm(&mut self, message: &str, options: &[&str]) -> Result<Option<String>> {
        self.ask(message, options)
            .map_err(|e| Error::Prompt(e.to_string()))
    }

    fn notify(&mut self, notice: Notice, message: &str) {
        let written = match notice {
            Notice::Info => writeln!(self.output, "{message}"),
            Notice::Warning => writeln!(self.output, "Warning: {message}"),
            Notice::Error => writeln!(self.output, "Error: {message}"),
        };
        if let Err(e) = written {
            warn!("Could not show message '{message}': {e}");
        }
    }
}

fn match_answer<'a>(answer: &str, options: &[&'a str]) -> Option<&'a str> {
    if let Ok(n) = answer.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| options.get(i)).copied();
    }
    options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(answer))
        .copied()
}

// =============================================================================
// Non-interactive decorator
// =============================================================================

/// Answers every question with its first option and forwards notifications.
///
/// Used for `--yes` runs; option lists put the affirmative answer first.
#[derive(Debug)]
pub struct AssumeYes<P> {
    inner: P,
}

impl<P: Prompt> AssumeYes<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: Prompt> Prompt for AssumeYes<P> {
    fn confirm(&mut self, message: &str, options: &[&str]) -> Result<Option<String>> {
        let answer = options.first().map(|o| (*o).to_string());
        info!("Answering '{message}' with {answer:?}");
        Ok(answer)
    }

    fn notify(&mut self, notice: Notice, message: &str) {
        self.inner.notify(notice, message);
    }
}
