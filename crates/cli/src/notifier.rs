//! Terminal implementation of the host notifier.

use std::io::{stdin, stdout, BufRead, BufReader, Write};
use std::sync::{Mutex, PoisonError};

use colt_bridge_core::notifier::Notifier;
use crossterm::style::Stylize;
use log::warn;

/// Prints notifications to the terminal and reads answers from a line-based input.
pub struct TerminalNotifier {
    input: Mutex<Box<dyn BufRead + Send>>,
}

impl Default for TerminalNotifier {
    fn default() -> Self {
        Self::with_input(Box::new(BufReader::new(stdin())))
    }
}

impl TerminalNotifier {
    pub fn with_input(input: Box<dyn BufRead + Send>) -> Self {
        Self {
            input: Mutex::new(input),
        }
    }

    /// Prints `prompt` and reads one trimmed line. `None` on end of input or read failure.
    fn read_answer(&self, prompt: &str) -> Option<String> {
        print!("{prompt}");
        if let Err(e) = stdout().flush() {
            warn!("Failed to flush stdout: {e}");
        }

        let mut input = self.input.lock().unwrap_or_else(PoisonError::into_inner);
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_string()),
            Err(e) => {
                warn!("Failed to read from the terminal: {e}");
                None
            }
        }
    }
}

/// Maps a 1-based answer to an option index.
fn parse_choice(answer: &str, option_count: usize) -> Option<usize> {
    match answer.parse::<usize>() {
        Ok(choice) if (1..=option_count).contains(&choice) => Some(choice - 1),
        _ => None,
    }
}

impl Notifier for TerminalNotifier {
    fn notify_info(&self, message: &str) {
        println!("{}", message.green());
    }

    fn notify_error(&self, message: &str) {
        eprintln!("{}", message.red());
    }

    fn prompt_choice(&self, message: &str, options: &[&str]) -> Option<usize> {
        println!("{}", message.yellow());
        for (index, option) in options.iter().enumerate() {
            println!("  {}) {option}", index + 1);
        }

        loop {
            let answer = self.read_answer(&format!("Choice [1-{}]: ", options.len()))?;
            if let Some(choice) = parse_choice(&answer, options.len()) {
                return Some(choice);
            }

            println!("Please enter a number between 1 and {}.", options.len());
        }
    }

    fn prompt_input(&self, message: &str) -> Option<String> {
        self.read_answer(&format!("{message}: "))
            .filter(|answer| !answer.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn notifier(input: &'static str) -> TerminalNotifier {
        TerminalNotifier::with_input(Box::new(Cursor::new(input)))
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1", 2), Some(0));
        assert_eq!(parse_choice("2", 2), Some(1));
        assert_eq!(parse_choice("0", 2), None);
        assert_eq!(parse_choice("3", 2), None);
        assert_eq!(parse_choice("yes", 2), None);
    }

    #[test]
    fn test_prompt_choice_retries_until_valid() {
        let notifier = notifier("banana\n7\n2\n");
        assert_eq!(
            notifier.prompt_choice("Pick one", &["Try again", "Cancel"]),
            Some(1)
        );
    }

    #[test]
    fn test_prompt_choice_end_of_input() {
        let notifier = notifier("");
        assert_eq!(notifier.prompt_choice("Pick one", &["Try again", "Cancel"]), None);
    }

    #[test]
    fn test_prompt_input() {
        assert_eq!(
            notifier("  8124 \n").prompt_input("Key"),
            Some("8124".to_string())
        );
        assert_eq!(notifier("\n").prompt_input("Key"), None);
    }
}
