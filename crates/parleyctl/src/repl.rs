//! REPL - terminal chat loop
//!
//! Reads one message per line and prints the bot's reply. Lines starting
//! with `/` are front-end commands (`/mode`, `/quit`); everything else goes
//! to the responder with the currently selected mode.

use std::io::{self, BufRead, Write};

use owo_colors::OwoColorize;
use parley_shared::clock::Clock;
use parley_shared::picker::ReplyPicker;
use parley_shared::router::INTRO_MESSAGE;
use parley_shared::{Mode, Responder};
use tracing::debug;

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Say(String),
    SetMode(Mode),
    ShowMode,
    Quit,
    /// Unrecognized `/command` or bad argument, with a message for the user
    Invalid(String),
}

/// Parse a line of input. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Option<ReplCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let Some(command) = line.strip_prefix('/') else {
        return Some(ReplCommand::Say(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let cmd = match parts.next() {
        Some(name) => name.to_lowercase(),
        None => return Some(ReplCommand::Say(line.to_string())),
    };
    let parsed = match (cmd.as_str(), parts.next()) {
        ("quit" | "exit", _) => ReplCommand::Quit,
        ("mode", None) => ReplCommand::ShowMode,
        ("mode", Some(name)) => match name.parse::<Mode>() {
            Ok(mode) => ReplCommand::SetMode(mode),
            Err(e) => ReplCommand::Invalid(e.to_string()),
        },
        (other, _) => ReplCommand::Invalid(format!(
            "Unknown command '/{}'. Try /mode <normal|faq|joke> or /quit.",
            other
        )),
    };
    Some(parsed)
}

/// Run the chat loop until `/quit` or end of input. Returns the mode that
/// was selected when the loop ended.
pub fn run<P, C, R, W>(
    responder: &mut Responder<P, C>,
    mut mode: Mode,
    mut input: R,
    out: &mut W,
    interactive: bool,
) -> io::Result<Mode>
where
    P: ReplyPicker,
    C: Clock,
    R: BufRead,
    W: Write,
{
    bot_say(out, INTRO_MESSAGE, interactive)?;

    let mut buf = Vec::new();
    loop {
        if interactive {
            write!(out, "{} ", "You:".bold())?;
            out.flush()?;
        }

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        // undecodable bytes become U+FFFD instead of ending the session
        let line = String::from_utf8_lossy(&buf);

        match parse_line(&line) {
            None => continue,
            Some(ReplCommand::Quit) => break,
            Some(ReplCommand::ShowMode) => {
                bot_say(out, &format!("Current mode: {}", mode), interactive)?;
            }
            Some(ReplCommand::SetMode(next)) => {
                debug!(from = %mode, to = %next, "mode switched");
                mode = next;
                bot_say(out, &format!("Mode set to {}.", mode), interactive)?;
            }
            Some(ReplCommand::Invalid(message)) => bot_say(out, &message, interactive)?,
            Some(ReplCommand::Say(text)) => {
                let reply = responder.respond(&text, mode);
                bot_say(out, &reply.text, interactive)?;
            }
        }
    }

    Ok(mode)
}

fn bot_say<W: Write>(out: &mut W, message: &str, styled: bool) -> io::Result<()> {
    if styled {
        writeln!(out, "{} {}\n", "Bot:".cyan().bold(), message)
    } else {
        writeln!(out, "Bot: {}\n", message)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use chrono::NaiveDate;
    use parley_shared::clock::FixedClock;
    use parley_shared::picker::FixedPicker;
    use parley_shared::RuleBook;

    use super::*;

    fn responder() -> Responder<FixedPicker, FixedClock> {
        let now = NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(3, 4, 5)
            .unwrap();
        Responder::with_parts(Arc::new(RuleBook::default()), FixedPicker(0), FixedClock(now))
    }

    fn transcript(input: &str) -> (String, Mode) {
        let mut out = Vec::new();
        let mode = run(
            &mut responder(),
            Mode::Normal,
            Cursor::new(input.to_string()),
            &mut out,
            false,
        )
        .unwrap();
        (String::from_utf8(out).unwrap(), mode)
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("   "), None);
        assert_eq!(parse_line(" hi "), Some(ReplCommand::Say("hi".to_string())));
        assert_eq!(parse_line("/quit"), Some(ReplCommand::Quit));
        assert_eq!(parse_line("/EXIT"), Some(ReplCommand::Quit));
        assert_eq!(parse_line("/mode"), Some(ReplCommand::ShowMode));
        assert_eq!(parse_line("/mode FAQ"), Some(ReplCommand::SetMode(Mode::Faq)));
        assert!(matches!(parse_line("/mode trivia"), Some(ReplCommand::Invalid(_))));
        assert!(matches!(parse_line("/dance"), Some(ReplCommand::Invalid(_))));
        // a lone slash is just text
        assert_eq!(parse_line("/"), Some(ReplCommand::Say("/".to_string())));
        assert_eq!(parse_line("10 / 2"), Some(ReplCommand::Say("10 / 2".to_string())));
    }

    #[test]
    fn test_session_transcript() {
        let (out, mode) = transcript("hello\n\n2+2\nwhat time is it\n");
        let expected = format!(
            "Bot: {}\n\nBot: Hello!\n\nBot: Result: 4\n\nBot: Current time: 03:04:05\n\n",
            INTRO_MESSAGE
        );
        assert_eq!(out, expected);
        assert_eq!(mode, Mode::Normal);
    }

    #[test]
    fn test_mode_switching() {
        let (out, mode) = transcript("/mode joke\nwhat is your name\n/mode\n");
        assert!(out.contains("Bot: Mode set to Joke."));
        assert!(out.contains(
            "Bot: Why did the programmer quit his job? Because he didn't get arrays."
        ));
        assert!(out.contains("Bot: Current mode: Joke"));
        assert_eq!(mode, Mode::Joke);
    }

    #[test]
    fn test_invalid_utf8_line_does_not_end_session() {
        let mut input = b"hello\n".to_vec();
        input.extend_from_slice(&[0xff, 0xfe, b'\n']);
        input.extend_from_slice(b"2+2\n");
        let mut out = Vec::new();
        run(&mut responder(), Mode::Normal, Cursor::new(input), &mut out, false).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Bot: Hello!"));
        assert!(out.contains("Bot: Result: 4"));
    }

    #[test]
    fn test_last_line_without_newline() {
        let (out, _) = transcript("hello\n3*3");
        assert!(out.ends_with("Bot: Result: 9\n\n"));
    }

    #[test]
    fn test_quit_stops_reading() {
        let (out, _) = transcript("/quit\nhello\n");
        assert!(!out.contains("Hello!"));
    }
}
