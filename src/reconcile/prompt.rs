//! Overwrite confirmation.

use std::io::{self, BufRead, Write};

use super::error::ReconcileError;
use super::policy::Answer;

/// Asks whether an existing element should be overwritten.
pub trait Prompter {
    fn confirm_overwrite(&mut self, name: &str) -> Result<Answer, ReconcileError>;
}

/// Text of the overwrite question for `name`.
pub fn overwrite_question(name: &str) -> String {
    format!("{name} already exists. Overwrite? [y]es / [Y]es to all / [n]o / [N]o to all")
}

/// Line-based prompter over any reader/writer pair.
///
/// Re-asks until one of `y`, `Y`, `n`, `N` is entered.
#[derive(Debug)]
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process's stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn confirm_overwrite(&mut self, name: &str) -> Result<Answer, ReconcileError> {
        let question = overwrite_question(name);
        loop {
            let Some(reply) = self.ask(&question).map_err(ReconcileError::Prompt)? else {
                return Err(ReconcileError::PromptClosed);
            };
            if let Some(answer) = Answer::parse(&reply) {
                return Ok(answer);
            }
            writeln!(self.output, "Error: '{reply}' is not one of y, Y, n, N.")
                .map_err(ReconcileError::Prompt)?;
        }
    }
}

/// A prompter that must never be consulted; used with non-interactive
/// policies.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPrompt;

impl Prompter for NoPrompt {
    fn confirm_overwrite(&mut self, _name: &str) -> Result<Answer, ReconcileError> {
        Err(ReconcileError::PromptClosed)
    }
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn confirm_overwrite(&mut self, name: &str) -> Result<Answer, ReconcileError> {
        (**self).confirm_overwrite(name)
    }
}
