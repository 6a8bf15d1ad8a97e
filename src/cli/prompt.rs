//! Interactive prompts for inputs not given on the command line

use crate::error::Result;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// Answer to the main-script menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Chosen(PathBuf),
    /// User typed `q`, or input ended
    Abort,
}

/// Line-oriented prompter over any reader/writer pair
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask for the base package directory; empty input means `default`
    pub fn base_directory(&mut self, default: &Path) -> Result<PathBuf> {
        let answer = self.ask(&format!(
            "Enter the name of the base package directory (default to '{}'): ",
            default.display()
        ))?;
        Ok(match answer.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default.to_path_buf(),
        })
    }

    /// Show the numbered candidates until a valid index or `q` is entered
    pub fn main_script(&mut self, files: &[PathBuf]) -> Result<Selection> {
        loop {
            writeln!(self.output, "Select the main script (enter the index, or 'q' to quit):")?;
            for (idx, file) in files.iter().enumerate() {
                writeln!(self.output, "{}: {}", idx, file.display())?;
            }

            let Some(answer) = self.ask("Enter index: ")? else {
                return Ok(Selection::Abort);
            };
            let answer = answer.trim();
            if answer.eq_ignore_ascii_case("q") {
                return Ok(Selection::Abort);
            }

            // Negative numbers are indices too, just never valid ones
            match answer.parse::<i64>() {
                Ok(idx) => match usize::try_from(idx).ok().and_then(|i| files.get(i)) {
                    Some(file) => return Ok(Selection::Chosen(file.clone())),
                    None => writeln!(self.output, "Invalid index. Please try again.")?,
                },
                Err(_) => writeln!(self.output, "Invalid input. Please enter a valid index number.")?,
            }
        }
    }

    /// Ask for the sub-package token, repeating while the answer is blank,
    /// since a blank token would pull in every import. `None` when input ends first.
    pub fn sub_package(&mut self) -> Result<Option<String>> {
        loop {
            let Some(answer) = self.ask("Enter the name of the sub package directory: ")? else {
                return Ok(None);
            };
            let answer = answer.trim();
            if !answer.is_empty() {
                return Ok(Some(answer.to_string()));
            }
        }
    }

    /// Print a prompt and read one line; `None` at end of input
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}
