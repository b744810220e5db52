//! Confirmation questions for destructive commands.
//!
//! The question goes to stderr so that `--output json` keeps stdout parseable.

use anyhow::{bail, Result};
use console::Term;
use std::io::IsTerminal;

/// Asks `question [y/N]`. `yes` answers without asking.
///
/// Without a terminal on stdin there is nobody to answer, so this fails and
/// points at `--yes` instead of reading an answer from piped input.
pub fn confirm(question: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        bail!("{} Pass --yes to confirm when not running interactively.", question);
    }
    let term = Term::stderr();
    term.write_str(&format!("{} [y/N] ", question))?;
    let answer = term.read_line()?;
    Ok(is_yes(&answer))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_answers() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[test]
    fn flag_skips_the_question() {
        assert!(confirm("Delete everything?", true).unwrap());
    }
}
