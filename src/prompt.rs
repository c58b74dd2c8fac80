use crate::error::{InitError, Result};
use colored::Colorize;
use inquire::InquireError;
use inquire::ui::{Color, RenderConfig, StyleSheet};
use std::io::{self, BufRead, IsTerminal, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    /// Answering `y` destroys data.
    Danger,
}

/// One interactive question.
#[derive(Debug, Clone)]
pub struct Question {
    pub message: String,
    pub tone: Tone,
    /// Restricted answers; empty means free text.
    pub options: Vec<String>,
    /// Used when the answer is an empty line.
    pub default: Option<String>,
}

impl Question {
    pub fn text(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tone: Tone::Normal,
            options: Vec::new(),
            default: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_default(mut self, default: Option<impl Into<String>>) -> Self {
        self.default = default.map(Into::into);
        self
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    /// Suffix like ` (y | n) [n]` shown after the message.
    pub fn hint(&self) -> String {
        match (self.options.is_empty(), &self.default) {
            (true, None) => String::new(),
            (true, Some(default)) => format!(" [{}]", default),
            (false, None) => format!(" ({})", self.options.join(" | ")),
            (false, Some(default)) => format!(" ({}) [{}]", self.options.join(" | "), default),
        }
    }
}

/// Source of raw answer lines. Owned by the run and dropped on every exit path.
pub trait LineReader {
    fn read_line(&mut self, question: &Question) -> Result<String>;
}

/// Prompts through `inquire` on an interactive terminal. `inquire` draws on stderr.
pub struct TerminalReader;

fn render_config(tone: Tone) -> RenderConfig {
    let (prompt, hint) = match tone {
        Tone::Normal => (Color::LightCyan, Color::LightYellow),
        Tone::Danger => (Color::LightRed, Color::LightRed),
    };
    let mut config = RenderConfig::default();
    config.prompt = StyleSheet::new().with_fg(prompt);
    config.help_message = StyleSheet::new().with_fg(hint);
    config.answer = StyleSheet::new().with_fg(Color::LightGreen);
    config
}

impl LineReader for TerminalReader {
    fn read_line(&mut self, question: &Question) -> Result<String> {
        let message = format!("{}:", question.message);
        let hint = question.hint();
        let mut prompt = inquire::Text::new(&message).with_render_config(render_config(question.tone));
        if !hint.is_empty() {
            prompt = prompt.with_help_message(hint.trim_start());
        }
        match prompt.prompt() {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                Err(InitError::Aborted)
            }
            Err(InquireError::IO(err)) => Err(InitError::Io(err)),
            Err(err) => Err(InitError::Io(io::Error::other(err))),
        }
    }
}

/// Reads answers line by line from piped input, echoing prompt and answer to `output`.
pub struct StreamReader<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StreamReader<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> LineReader for StreamReader<R, W> {
    fn read_line(&mut self, question: &Question) -> Result<String> {
        let (message, hint) = match question.tone {
            Tone::Normal => (question.message.cyan(), question.hint().yellow()),
            Tone::Danger => (question.message.red(), question.hint().red()),
        };
        write!(self.output, "{}{}: ", message, hint)?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        writeln!(self.output, "{}", line.trim_end().green())?;
        Ok(line)
    }
}

/// Picks `inquire` for a terminal and a plain line reader otherwise.
pub fn session() -> Box<dyn LineReader> {
    if io::stdin().is_terminal() {
        Box::new(TerminalReader)
    } else {
        Box::new(StreamReader::new(io::stdin().lock(), io::stdout()))
    }
}

/// Applies default and option rules to a raw answer.
pub fn resolve_answer(question: &Question, raw: &str) -> Result<String> {
    let answer = raw.trim();
    if answer.is_empty() {
        return question.default.clone().ok_or(InitError::NoInput);
    }
    if question.options.is_empty() {
        return Ok(answer.to_string());
    }
    question
        .options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(answer))
        .cloned()
        .ok_or_else(|| InitError::InvalidOption(answer.to_string()))
}

pub fn ask(reader: &mut dyn LineReader, question: &Question) -> Result<String> {
    let raw = reader.read_line(question)?;
    resolve_answer(question, &raw)
}

/// Destructive `y`/`n` confirmation, default `n`.
pub fn confirm(reader: &mut dyn LineReader, message: &str) -> Result<bool> {
    let question = Question::text(message)
        .with_tone(Tone::Danger)
        .with_options(["y", "n"])
        .with_default(Some("n"));
    Ok(ask(reader, &question)?.eq_ignore_ascii_case("y"))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays canned answers; running out behaves like a closed stdin.
    pub(crate) struct ScriptedReader {
        pub answers: VecDeque<String>,
        pub asked: Vec<String>,
        pub tones: Vec<Tone>,
    }

    impl ScriptedReader {
        pub(crate) fn new<const N: usize>(answers: [&str; N]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                asked: Vec::new(),
                tones: Vec::new(),
            }
        }
    }

    impl LineReader for ScriptedReader {
        fn read_line(&mut self, question: &Question) -> Result<String> {
            self.asked.push(question.message.clone());
            self.tones.push(question.tone);
            Ok(self.answers.pop_front().unwrap_or_default())
        }
    }

    #[test]
    fn empty_answer_uses_default() {
        let question = Question::text("Package Manager")
            .with_options(["npm", "yarn"])
            .with_default(Some("yarn"));
        assert_eq!(resolve_answer(&question, "  \n").unwrap(), "yarn");
    }

    #[test]
    fn empty_answer_without_default_aborts() {
        let question = Question::text("Author");
        assert!(matches!(resolve_answer(&question, "\n"), Err(InitError::NoInput)));
    }

    #[test]
    fn answer_outside_options_aborts() {
        let question = Question::text("Package Manager").with_options(["npm", "yarn"]);
        assert!(matches!(
            resolve_answer(&question, "pnpm"),
            Err(InitError::InvalidOption(answer)) if answer == "pnpm"
        ));
    }

    #[test]
    fn options_match_case_insensitively() {
        let question = Question::text("Package Manager").with_options(["npm", "yarn"]);
        assert_eq!(resolve_answer(&question, "NPM\n").unwrap(), "npm");
    }

    #[test]
    fn hint_lists_options_and_default() {
        let question = Question::text("Continue?")
            .with_options(["y", "n"])
            .with_default(Some("n"));
        assert_eq!(question.hint(), " (y | n) [n]");
        assert_eq!(Question::text("Author").hint(), "");
    }

    #[test]
    fn confirm_only_accepts_y() {
        let mut reader = ScriptedReader::new(["Y", "", "n"]);
        assert!(confirm(&mut reader, "Overwrite?").unwrap());
        assert!(!confirm(&mut reader, "Overwrite?").unwrap());
        assert!(!confirm(&mut reader, "Overwrite?").unwrap());
        assert!(matches!(
            confirm(&mut ScriptedReader::new(["yes"]), "Overwrite?"),
            Err(InitError::InvalidOption(_))
        ));
    }

    #[test]
    fn stream_reader_returns_lines_in_order() {
        let input = io::Cursor::new("myapp\nbob\n");
        let mut output = Vec::new();
        let mut reader = StreamReader::new(input, &mut output);
        let question = Question::text("Project name");
        assert_eq!(ask(&mut reader, &question).unwrap(), "myapp");
        assert_eq!(ask(&mut reader, &question).unwrap(), "bob");
        assert!(matches!(ask(&mut reader, &question), Err(InitError::NoInput)));
        drop(reader);

        let transcript = String::from_utf8(output).unwrap();
        assert_eq!(transcript.matches("Project name").count(), 3);
        assert!(transcript.contains("myapp"));
        assert!(transcript.contains("bob"));
    }

    #[test]
    fn confirmation_is_a_danger_prompt() {
        let mut reader = ScriptedReader::new(["n"]);
        confirm(&mut reader, "Overwrite?").unwrap();
        assert_eq!(reader.tones, [Tone::Danger]);
        assert_eq!(Question::text("Author").tone, Tone::Normal);
    }
}
