//! Terminal transcript: chat turns, in-flight indicator, history.
//!
//! The rendering is a line-per-turn stand-in for chat bubbles: user turns
//! prefixed 🧑, agent turns 🤖. While a request is in flight a transient
//! "thinking" line is shown and overwritten by the next turn.

use chrono::{DateTime, Local};
use std::io::{self, Write};

const THINKING_LINE: &str = "🤖 is thinking...";
const ERROR_LINE: &str = "❌ Failed to get AI response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Agent,
}

impl Speaker {
    fn prefix(self) -> &'static str {
        match self {
            Speaker::User => "🧑",
            Speaker::Agent => "🤖",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Turn {
    pub speaker: Speaker,
    pub text: String,
    pub at: DateTime<Local>,
}

/// Format a turn the way it is printed.
pub fn format_turn(speaker: Speaker, text: &str) -> String {
    format!("{} {}", speaker.prefix(), text)
}

#[derive(Debug, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
    thinking: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the history and print it.
    pub fn push(&mut self, speaker: Speaker, text: &str) {
        self.clear_thinking();
        println!("{}", format_turn(speaker, text));
        self.turns.push(Turn {
            speaker,
            text: text.to_string(),
            at: Local::now(),
        });
    }

    /// Show the transient in-flight indicator.
    pub fn show_thinking(&mut self) {
        if self.thinking {
            return;
        }
        print!("{}", THINKING_LINE);
        let _ = io::stdout().flush();
        self.thinking = true;
    }

    /// Print the failed-request line without recording a turn.
    pub fn push_error(&mut self) {
        self.clear_thinking();
        println!("{}", ERROR_LINE);
    }

    fn clear_thinking(&mut self) {
        if !self.thinking {
            return;
        }
        // Overwrite the indicator in place
        print!("\r{:width$}\r", "", width = THINKING_LINE.chars().count() + 4);
        let _ = io::stdout().flush();
        self.thinking = false;
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turns_are_prefixed_by_speaker() {
        assert_eq!(format_turn(Speaker::User, "hello"), "🧑 hello");
        assert_eq!(format_turn(Speaker::Agent, "hi there"), "🤖 hi there");
    }

    #[test]
    fn history_retains_turn_order() {
        let mut transcript = Transcript::new();
        transcript.push(Speaker::Agent, "Good morning");
        transcript.push(Speaker::User, "hello");
        transcript.push(Speaker::Agent, "How can I assist you today?");

        let turns = transcript.turns();
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[0].speaker, Speaker::Agent);
        assert_eq!(turns[1].text, "hello");
        assert!(turns[0].at <= turns[2].at);
    }

    #[test]
    fn error_line_is_not_recorded_as_a_turn() {
        let mut transcript = Transcript::new();
        transcript.show_thinking();
        transcript.push_error();
        assert!(transcript.turns().is_empty());
    }
}
