//! Response router - ordered rule cascade from input text to reply.
//!
//! Order is the disambiguation policy and must not change:
//! FAQ (FAQ mode) → joke (Joke mode) → greeting → farewell → static answer
//! → time/date → arithmetic → small talk → fallback.
//! The first matching rule wins. Matching is greedy substring matching on
//! the trimmed, lowercased input.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::calc;
use crate::clock::{Clock, SystemClock};
use crate::error::RouteError;
use crate::mode::Mode;
use crate::picker::{ReplyPicker, SeededPicker};
use crate::rules::{Answer, RuleBook};

pub const FALLBACK_REPLY: &str =
    "Sorry, I don't understand that yet. Try asking for the time, a math problem, or say 'help'.";

pub const ERROR_REPLY: &str = "Error processing your input.";

/// Greeting shown by front ends when a session starts.
pub const INTRO_MESSAGE: &str =
    "Hello! I'm an AI chatbot. Type 'help' for tips. You can switch modes (Normal/FAQ/Joke).";

/// Characters that make input look like arithmetic (together with a digit).
pub const ARITHMETIC_SYMBOLS: &[char] = &['+', '-', '*', '/', '%', '^'];

/// Which rule produced a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Faq,
    Joke,
    Greeting,
    Farewell,
    StaticAnswer,
    Time,
    Date,
    Arithmetic,
    SmallTalk,
    Fallback,
    /// Internal failure converted at the boundary
    Error,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Faq => "faq",
            Self::Joke => "joke",
            Self::Greeting => "greeting",
            Self::Farewell => "farewell",
            Self::StaticAnswer => "static_answer",
            Self::Time => "time",
            Self::Date => "date",
            Self::Arithmetic => "arithmetic",
            Self::SmallTalk => "small_talk",
            Self::Fallback => "fallback",
            Self::Error => "error",
        };
        write!(f, "{}", s)
    }
}

/// Result of one conversation turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub rule: RuleKind,
}

impl Reply {
    fn new(rule: RuleKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            rule,
        }
    }
}

/// Trim and lowercase, the form every trigger is matched against.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Crude arithmetic detection: at least one digit and one operator symbol.
pub fn looks_arithmetic(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit()) && text.contains(ARITHMETIC_SYMBOLS)
}

/// Rewrite `^` as `**` and drop spaces before handing text to the evaluator.
pub fn prepare_expression(text: &str) -> String {
    text.replace('^', "**").replace(' ', "")
}

fn find_answer<'a>(table: &'a [Answer], text: &str) -> Option<&'a str> {
    table
        .iter()
        .find(|entry| text.contains(entry.trigger.as_str()))
        .map(|entry| entry.answer.as_str())
}

/// Responder owning its rule book, random source and clock.
///
/// `respond` takes `&mut self` because drawing a random reply advances the
/// picker; the rule book itself is shared and never mutated.
pub struct Responder<P = SeededPicker, C = SystemClock> {
    rules: Arc<RuleBook>,
    picker: P,
    clock: C,
}

impl Responder {
    /// Responder with OS entropy and the local clock.
    pub fn new(rules: Arc<RuleBook>) -> Self {
        Self::with_parts(rules, SeededPicker::from_entropy(), SystemClock)
    }
}

impl<P: ReplyPicker, C: Clock> Responder<P, C> {
    pub fn with_parts(rules: Arc<RuleBook>, picker: P, clock: C) -> Self {
        Self {
            rules,
            picker,
            clock,
        }
    }

    pub fn rules(&self) -> &RuleBook {
        &self.rules
    }

    /// Produce a reply for one turn. Never fails: internal errors become
    /// `ERROR_REPLY`.
    pub fn respond(&mut self, text: &str, mode: Mode) -> Reply {
        match self.route(text, mode) {
            Ok(reply) => {
                debug!(rule = %reply.rule, %mode, "matched");
                reply
            }
            Err(e) => {
                warn!(error = %e, %mode, "routing failed");
                Reply::new(RuleKind::Error, ERROR_REPLY)
            }
        }
    }

    fn route(&mut self, text: &str, mode: Mode) -> Result<Reply, RouteError> {
        let rules = Arc::clone(&self.rules);
        let txt = normalize(text);

        match mode {
            Mode::Faq => {
                if let Some(answer) = find_answer(&rules.faq_answers, &txt) {
                    return Ok(Reply::new(RuleKind::Faq, answer));
                }
            }
            Mode::Joke => return self.pick(RuleKind::Joke, &rules.jokes),
            Mode::Normal => {}
        }

        if rules.greetings.iter().any(|g| txt.starts_with(g.as_str())) {
            return self.pick(RuleKind::Greeting, &rules.greeting_replies);
        }

        if rules.farewells.iter().any(|f| txt.contains(f.as_str())) {
            return self.pick(RuleKind::Farewell, &rules.farewell_replies);
        }

        if let Some(answer) = find_answer(&rules.static_answers, &txt) {
            return Ok(Reply::new(RuleKind::StaticAnswer, answer));
        }

        if txt.contains("time") {
            let now = self.clock.now();
            return Ok(Reply::new(
                RuleKind::Time,
                format!("Current time: {}", now.format("%H:%M:%S")),
            ));
        }
        if txt.contains("date") || txt.contains("day") {
            let now = self.clock.now();
            return Ok(Reply::new(
                RuleKind::Date,
                format!("Today's date: {}", now.format("%Y-%m-%d")),
            ));
        }

        if looks_arithmetic(&txt) {
            let expr = prepare_expression(&txt);
            match calc::evaluate(&expr) {
                Ok(value) => {
                    return Ok(Reply::new(RuleKind::Arithmetic, format!("Result: {}", value)));
                }
                Err(e) => {
                    debug!(error = %e, expr = %expr, "not arithmetic after all");
                }
            }
        }

        if rules.small_talk_keywords.iter().any(|k| txt.contains(k.as_str())) {
            return self.pick(RuleKind::SmallTalk, &rules.small_talk_replies);
        }

        Ok(Reply::new(RuleKind::Fallback, FALLBACK_REPLY))
    }

    fn pick(&mut self, rule: RuleKind, options: &[String]) -> Result<Reply, RouteError> {
        self.picker
            .pick(options)
            .map(|text| Reply::new(rule, text))
            .ok_or(RouteError::EmptyReplySet(rule))
    }
}

/// One-shot reply with the built-in rules, fresh entropy and the local clock.
pub fn respond(text: &str, mode: Mode) -> String {
    Responder::new(Arc::clone(&*crate::rules::BUILTIN))
        .respond(text, mode)
        .text
}
