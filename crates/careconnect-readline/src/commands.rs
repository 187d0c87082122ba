//! Parsing of REPL input lines.

use careconnect_core::backend::UploadKind;
use careconnect_core::session::ValidationError;
use std::path::PathBuf;
use std::str::FromStr;
use strum::{AsRefStr, EnumIter, EnumString};
use thiserror::Error;

/// Slash commands with their usage, in completion order.
pub const COMMANDS: &[(&str, &str)] = &[
    ("/login", "/login <email> [--remember]"),
    ("/register", "/register <name> <email>"),
    ("/guest", "/guest"),
    ("/logout", "/logout"),
    ("/upload", "/upload <image|document> <path>"),
    ("/ask", "/ask [topic]"),
    ("/emergency", "/emergency"),
    ("/lang", "/lang"),
    ("/theme", "/theme"),
    ("/whoami", "/whoami"),
    ("/status", "/status"),
    ("/help", "/help"),
];

/// Preset health questions, asked with `/ask <topic>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum QuickTopic {
    Covid,
    Diabetes,
    Tb,
    Malaria,
    Dengue,
    Influenza,
    Hypertension,
    Asthma,
    Typhoid,
    Measles,
    Pneumonia,
    Hepatitis,
    Chickenpox,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String, remember: bool },
    Register { name: String, email: String },
    Guest,
    Logout,
    Upload { kind: UploadKind, path: PathBuf },
    /// `None` lists the topics.
    Ask(Option<QuickTopic>),
    Emergency,
    Language,
    Theme,
    WhoAmI,
    Status,
    Help,
    Quit,
    /// Anything that is not a command.
    Chat(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type /help")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown topic '{0}', type /ask to list topics")]
    UnknownTopic(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

fn usage(name: &str) -> &'static str {
    COMMANDS
        .iter()
        .find(|(command, _)| *command == name)
        .map(|(_, usage)| *usage)
        .unwrap_or("/help")
}

impl Command {
    /// Parses one input line. Blank input parses as an empty chat message.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            return Ok(Command::Quit);
        }
        if !trimmed.starts_with('/') {
            return Ok(Command::Chat(trimmed.to_string()));
        }

        let mut words = trimmed.split_whitespace();
        let name = words.next().unwrap_or_default();
        let args: Vec<&str> = words.collect();

        match name {
            "/login" => {
                let remember = args.contains(&"--remember");
                let rest: Vec<&str> = args.into_iter().filter(|a| *a != "--remember").collect();
                match rest.as_slice() {
                    [email] => Ok(Command::Login {
                        email: email.to_string(),
                        remember,
                    }),
                    _ => Err(CommandError::Usage(usage(name))),
                }
            }
            "/register" => match args.split_last() {
                Some((email, name_parts)) if !name_parts.is_empty() => Ok(Command::Register {
                    name: name_parts.join(" "),
                    email: email.to_string(),
                }),
                _ => Err(CommandError::Usage(usage(name))),
            },
            "/upload" => match args.as_slice() {
                [kind, path] => {
                    let kind = UploadKind::from_str(&kind.to_lowercase())
                        .map_err(|_| ValidationError::UnknownUploadKind(kind.to_string()))?;
                    Ok(Command::Upload {
                        kind,
                        path: PathBuf::from(path),
                    })
                }
                _ => Err(CommandError::Usage(usage(name))),
            },
            "/ask" => match args.as_slice() {
                [] => Ok(Command::Ask(None)),
                [topic] => QuickTopic::from_str(&topic.to_lowercase())
                    .map(|topic| Command::Ask(Some(topic)))
                    .map_err(|_| CommandError::UnknownTopic(topic.to_string())),
                _ => Err(CommandError::Usage(usage(name))),
            },
            "/emergency" => Ok(Command::Emergency),
            "/guest" => Ok(Command::Guest),
            "/logout" => Ok(Command::Logout),
            "/lang" => Ok(Command::Language),
            "/theme" => Ok(Command::Theme),
            "/whoami" => Ok(Command::WhoAmI),
            "/status" => Ok(Command::Status),
            "/help" => Ok(Command::Help),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_chat() {
        assert_eq!(
            Command::parse("  I have a cold ").unwrap(),
            Command::Chat("I have a cold".into())
        );
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_login_flag_position_is_free() {
        let expected = Command::Login {
            email: "a@b.c".into(),
            remember: true,
        };
        assert_eq!(Command::parse("/login a@b.c --remember").unwrap(), expected);
        assert_eq!(Command::parse("/login --remember a@b.c").unwrap(), expected);
        assert_eq!(
            Command::parse("/login").unwrap_err(),
            CommandError::Usage("/login <email> [--remember]")
        );
    }

    #[test]
    fn test_register_name_may_have_spaces() {
        assert_eq!(
            Command::parse("/register Asha Rao asha@example.com").unwrap(),
            Command::Register {
                name: "Asha Rao".into(),
                email: "asha@example.com".into()
            }
        );
        assert!(Command::parse("/register asha@example.com").is_err());
    }

    #[test]
    fn test_upload_kind() {
        assert_eq!(
            Command::parse("/upload Image ./scan.png").unwrap(),
            Command::Upload {
                kind: UploadKind::Image,
                path: PathBuf::from("./scan.png")
            }
        );
        assert_eq!(
            Command::parse("/upload video a.mp4").unwrap_err(),
            CommandError::Invalid(ValidationError::UnknownUploadKind("video".into()))
        );
    }

    #[test]
    fn test_ask_topic() {
        assert_eq!(Command::parse("/ask").unwrap(), Command::Ask(None));
        assert_eq!(
            Command::parse("/ask Dengue").unwrap(),
            Command::Ask(Some(QuickTopic::Dengue))
        );
        assert_eq!(
            Command::parse("/ask ebola").unwrap_err(),
            CommandError::UnknownTopic("ebola".into())
        );
        assert_eq!(Command::parse("/emergency").unwrap(), Command::Emergency);
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            Command::parse("/plan").unwrap_err(),
            CommandError::Unknown("/plan".into())
        );
    }
}
