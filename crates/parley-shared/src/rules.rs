//! Rule tables consulted by the router.
//!
//! The built-in book carries the stock greetings, answers and jokes. A TOML
//! rule file may replace any table; tables it omits keep their defaults.
//! Triggers are matched against lowercased input, so they must be
//! lowercase themselves.

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::RuleBookError;

/// Shared built-in rule book, built on first use.
pub static BUILTIN: Lazy<Arc<RuleBook>> = Lazy::new(|| Arc::new(RuleBook::default()));

/// Trigger phrase with its canned answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub trigger: String,
    pub answer: String,
}

impl Answer {
    pub fn new(trigger: &str, answer: &str) -> Self {
        Self {
            trigger: trigger.to_string(),
            answer: answer.to_string(),
        }
    }
}

/// All tables of the response cascade. Ordered tables keep their order:
/// the first matching entry wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleBook {
    /// Prefixes that count as a greeting
    pub greetings: Vec<String>,
    pub greeting_replies: Vec<String>,
    /// Substrings that count as a farewell
    pub farewells: Vec<String>,
    pub farewell_replies: Vec<String>,
    /// Joke mode replies
    pub jokes: Vec<String>,
    pub small_talk_keywords: Vec<String>,
    pub small_talk_replies: Vec<String>,
    pub static_answers: Vec<Answer>,
    /// FAQ mode answers
    pub faq_answers: Vec<Answer>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RuleBook {
    fn default() -> Self {
        Self {
            greetings: strings(&[
                "hi",
                "hello",
                "hey",
                "good morning",
                "good afternoon",
                "good evening",
            ]),
            greeting_replies: strings(&["Hello!", "Hi there!", "Hey! How can I help?"]),
            farewells: strings(&["bye", "goodbye", "see you", "see ya"]),
            farewell_replies: strings(&["Goodbye!", "See you later!", "Take care!"]),
            jokes: strings(&[
                "Why did the programmer quit his job? Because he didn't get arrays.",
                "There are only 10 types of people in this world: those who understand binary and those who don't.",
                "Why do Java developers wear glasses? Because they don't see sharp.",
            ]),
            small_talk_keywords: strings(&["weather", "movie", "music", "food", "hobby"]),
            small_talk_replies: strings(&[
                "Nice to chat with you!",
                "Tell me more.",
                "Cool! 😎",
                "I like learning from conversation.",
                "Ha — that's interesting!",
            ]),
            static_answers: vec![
                Answer::new("what is your name", "I'm an AI rule-based chatbot."),
                Answer::new("who created you", "I was created by a human developer (you!)."),
                Answer::new(
                    "how are you",
                    "I'm a program — I don't have feelings, but thanks for asking!",
                ),
                Answer::new(
                    "help",
                    "Try asking me about the time, doing arithmetic (e.g. 2+2), or say hello!",
                ),
            ],
            faq_answers: vec![
                Answer::new(
                    "what is ai",
                    "AI stands for Artificial Intelligence — systems that perform tasks that usually require human intelligence.",
                ),
                Answer::new(
                    "what is python",
                    "Python is a popular high-level programming language used for many tasks: web, data, automation, and more.",
                ),
                Answer::new(
                    "what is chatbot",
                    "A chatbot is software that can simulate conversation with human users.",
                ),
            ],
        }
    }
}

impl RuleBook {
    /// Parse a TOML rule file body and validate it.
    pub fn from_toml_str(content: &str) -> Result<Self, RuleBookError> {
        let book: RuleBook = toml::from_str(content)?;
        book.validate()?;
        Ok(book)
    }

    /// Load and validate a rule file from disk.
    pub fn load(path: &Path) -> Result<Self, RuleBookError> {
        let content = std::fs::read_to_string(path).map_err(|source| RuleBookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, RuleBookError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check that every randomly drawn reply set is non-empty and every
    /// trigger can actually match normalized input.
    pub fn validate(&self) -> Result<(), RuleBookError> {
        let reply_sets = [
            ("greeting_replies", &self.greeting_replies),
            ("farewell_replies", &self.farewell_replies),
            ("small_talk_replies", &self.small_talk_replies),
            ("jokes", &self.jokes),
        ];
        for (name, set) in reply_sets {
            if set.is_empty() {
                return Err(RuleBookError::Invalid(format!("{} must not be empty", name)));
            }
        }

        let trigger_lists = [
            ("greetings", &self.greetings),
            ("farewells", &self.farewells),
            ("small_talk_keywords", &self.small_talk_keywords),
        ];
        for (name, list) in trigger_lists {
            for trigger in list.iter() {
                check_trigger(name, trigger)?;
            }
        }

        for (name, table) in [
            ("static_answers", &self.static_answers),
            ("faq_answers", &self.faq_answers),
        ] {
            for entry in table.iter() {
                check_trigger(name, &entry.trigger)?;
            }
        }

        Ok(())
    }
}

fn check_trigger(table: &str, trigger: &str) -> Result<(), RuleBookError> {
    if trigger.trim().is_empty() {
        return Err(RuleBookError::Invalid(format!(
            "{} contains an empty trigger",
            table
        )));
    }
    if trigger != trigger.to_lowercase() {
        return Err(RuleBookError::Invalid(format!(
            "{} trigger '{}' must be lowercase",
            table, trigger
        )));
    }
    Ok(())
}
