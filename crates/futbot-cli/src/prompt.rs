use std::io::{self, BufRead, Write};

use futbot_core::{Confirm, ConfirmPrompt};
use tracing::debug;

use crate::output;

/// Interactive yes/no confirmation. Anything but `y`/`yes` declines, including EOF.
pub struct LineConfirm<R, W> {
    input: R,
    output: W,
}

impl LineConfirm<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr, read the answer from stdin.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R, W> LineConfirm<R, W>
where
    R: BufRead,
    W: Write,
{
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, prompt: &ConfirmPrompt<'_>) -> io::Result<bool> {
        let question = match prompt {
            ConfirmPrompt::PlaceOrder(_) => "Confirm order placement? [y/N] ",
            ConfirmPrompt::CancelOrder(_) => "Confirm order cancellation? [y/N] ",
        };

        writeln!(self.output)?;
        write!(self.output, "{}", output::confirmation_preview(prompt))?;
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            writeln!(self.output)?;
            return Ok(false);
        }
        Ok(is_yes(&answer))
    }
}

impl<R, W> Confirm for LineConfirm<R, W>
where
    R: BufRead,
    W: Write,
{
    fn confirm(&mut self, prompt: &ConfirmPrompt<'_>) -> bool {
        match self.ask(prompt) {
            Ok(answer) => answer,
            Err(error) => {
                debug!(%error, "confirmation prompt failed; treating as declined");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
