//! rustyline helper: completion, highlighting and hints for slash commands.

use std::borrow::Cow::{self, Borrowed, Owned};

use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use strum::IntoEnumIterator;

use crate::commands::{COMMANDS, QuickTopic};

const UPLOAD_KINDS: &[&str] = &["image", "document"];

#[derive(Clone, Default)]
pub struct CliHelper;

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if let Some(kind_prefix) = line.strip_prefix("/upload ") {
            if kind_prefix.contains(' ') {
                return Ok((0, vec![]));
            }
            let candidates: Vec<Pair> = UPLOAD_KINDS
                .iter()
                .filter(|kind| kind.starts_with(kind_prefix))
                .map(|kind| Pair {
                    display: kind.to_string(),
                    replacement: format!("{kind} "),
                })
                .collect();
            return Ok(("/upload ".len(), candidates));
        }

        if let Some(topic_prefix) = line.strip_prefix("/ask ") {
            let candidates: Vec<Pair> = QuickTopic::iter()
                .map(|topic| topic.as_ref().to_string())
                .filter(|topic| topic.starts_with(topic_prefix))
                .map(|topic| Pair {
                    display: topic.clone(),
                    replacement: topic,
                })
                .collect();
            return Ok(("/ask ".len(), candidates));
        }

        if line.starts_with('/') && !line.contains(' ') {
            let candidates: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(line))
                .map(|(cmd, _)| Pair {
                    display: cmd.to_string(),
                    replacement: cmd.to_string(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    /// Completes the command name, then shows the rest of its usage.
    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return None;
        }

        if !line.contains(' ') {
            return COMMANDS
                .iter()
                .find(|(cmd, _)| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|(cmd, _)| cmd[line.len()..].to_string());
        }

        let name = line.split_whitespace().next()?;
        let (_, usage) = COMMANDS.iter().find(|(cmd, _)| *cmd == name)?;
        if line.trim_end() == name {
            usage.strip_prefix(name).map(|rest| rest.trim_start().to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}
