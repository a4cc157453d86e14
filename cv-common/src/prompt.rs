//! Interactive line prompts
//!
//! Every tool gathers its parameters by asking on the terminal. A value
//! supplied on the command line pre-answers the matching question.

use crate::{Error, Result};
use std::io::{self, BufRead, Write};

/// Line-oriented prompter over any reader/writer pair
pub struct Prompter<R, W> {
    reader: R,
    writer: W,
}

impl Prompter<io::StdinLock<'static>, io::Stdout> {
    /// Prompter bound to the process terminal
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Print `question`, read one line, return it trimmed
    pub fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.writer, "{}", question)?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(Error::InvalidInput(format!(
                "No answer to prompt: {}",
                question.trim()
            )));
        }

        Ok(line.trim().to_string())
    }

    /// Use `preset` when given, otherwise ask
    pub fn ask_or(&mut self, preset: Option<String>, question: &str) -> Result<String> {
        match preset {
            Some(value) => Ok(value),
            None => self.ask(question),
        }
    }
}
