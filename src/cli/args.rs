//! Command-line argument parsing for the `linda` CLI.

/// Default page size for `linda sessions`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Sign in; the password is prompted for
    Login { username: String },
    /// Create an account and sign in
    Register { username: String },
    /// Forget the stored credential
    Logout,
    /// Post a message to a session
    Send { session_id: String, content: String },
    /// Show a session's message history
    History { session_id: String },
    /// List sessions
    Sessions { page: u32, size: u32 },
    /// Delete a session
    Delete { session_id: String },
    /// Stream live messages until interrupted; stdin lines are sent out
    Listen,
    /// Unusable arguments, with the reason
    Invalid(String),
}

/// Parse command-line arguments, program name included.
///
/// # Examples
///
/// ```
/// use linda::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["linda".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let args: Vec<String> = args.skip(1).collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        return CliCommand::Version;
    }
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return CliCommand::Help;
    }

    let Some((command, rest)) = args.split_first() else {
        return CliCommand::Help;
    };

    match command.as_str() {
        "login" => match rest {
            [username] => CliCommand::Login {
                username: username.clone(),
            },
            _ => CliCommand::Invalid("usage: linda login <username>".to_string()),
        },
        "register" => match rest {
            [username] => CliCommand::Register {
                username: username.clone(),
            },
            _ => CliCommand::Invalid("usage: linda register <username>".to_string()),
        },
        "logout" => CliCommand::Logout,
        "send" => match rest {
            [session_id, content @ ..] if !content.is_empty() => CliCommand::Send {
                session_id: session_id.clone(),
                content: content.join(" "),
            },
            _ => CliCommand::Invalid("usage: linda send <session-id> <message...>".to_string()),
        },
        "history" => match rest {
            [session_id] => CliCommand::History {
                session_id: session_id.clone(),
            },
            _ => CliCommand::Invalid("usage: linda history <session-id>".to_string()),
        },
        "delete" => match rest {
            [session_id] => CliCommand::Delete {
                session_id: session_id.clone(),
            },
            _ => CliCommand::Invalid("usage: linda delete <session-id>".to_string()),
        },
        "sessions" => parse_sessions(rest),
        "listen" => CliCommand::Listen,
        other => CliCommand::Invalid(format!("unknown command: {}", other)),
    }
}

fn parse_sessions(rest: &[String]) -> CliCommand {
    let mut page = 0;
    let mut size = DEFAULT_PAGE_SIZE;

    let mut iter = rest.iter();
    while let Some(flag) = iter.next() {
        let value = iter.next().and_then(|v| v.parse::<u32>().ok());
        match (flag.as_str(), value) {
            ("--page", Some(value)) => page = value,
            ("--size", Some(value)) if value > 0 => size = value,
            ("--page", _) => return CliCommand::Invalid("--page expects a number".to_string()),
            ("--size", _) => {
                return CliCommand::Invalid("--size expects a positive number".to_string())
            }
            (other, _) => return CliCommand::Invalid(format!("unexpected argument: {}", other)),
        }
    }
    CliCommand::Sessions { page, size }
}

/// Usage text for `linda --help`.
pub fn usage() -> &'static str {
    "\
usage: linda <command> [args]

commands:
  login <username>              sign in (password is prompted)
  register <username>           create an account and sign in
  logout                        forget the stored credential
  send <session-id> <message>   post a message
  history <session-id>          show a session's messages
  sessions [--page N] [--size N]
                                list sessions (pages count from 0)
  delete <session-id>           delete a session
  listen                        stream live messages; stdin lines are sent

environment:
  LINDA_API_BASE_URL, LINDA_WS_URL, RUST_LOG"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliCommand {
        let args: Vec<String> = std::iter::once("linda")
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        parse_args(args.into_iter())
    }

    #[test]
    fn test_version_flag_anywhere() {
        assert_eq!(parse(&["--version"]), CliCommand::Version);
        assert_eq!(parse(&["login", "-V"]), CliCommand::Version);
    }

    #[test]
    fn test_no_args_is_help() {
        assert_eq!(parse(&[]), CliCommand::Help);
        assert_eq!(parse(&["-h"]), CliCommand::Help);
    }

    #[test]
    fn test_login() {
        assert_eq!(
            parse(&["login", "amy"]),
            CliCommand::Login {
                username: "amy".to_string()
            }
        );
        assert!(matches!(parse(&["login"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_send_joins_words() {
        assert_eq!(
            parse(&["send", "s1", "hello", "there"]),
            CliCommand::Send {
                session_id: "s1".to_string(),
                content: "hello there".to_string()
            }
        );
        assert!(matches!(parse(&["send", "s1"]), CliCommand::Invalid(_)));
    }

    #[test]
    fn test_sessions_defaults_and_flags() {
        assert_eq!(
            parse(&["sessions"]),
            CliCommand::Sessions { page: 0, size: 20 }
        );
        assert_eq!(
            parse(&["sessions", "--page", "3", "--size", "5"]),
            CliCommand::Sessions { page: 3, size: 5 }
        );
        assert!(matches!(
            parse(&["sessions", "--page", "zero"]),
            CliCommand::Invalid(_)
        ));
        assert!(matches!(
            parse(&["sessions", "--size", "0"]),
            CliCommand::Invalid(_)
        ));
        assert!(matches!(
            parse(&["sessions", "--limit", "5"]),
            CliCommand::Invalid(_)
        ));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse(&["logout"]), CliCommand::Logout);
        assert_eq!(parse(&["listen"]), CliCommand::Listen);
        assert_eq!(
            parse(&["delete", "s9"]),
            CliCommand::Delete {
                session_id: "s9".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(
            parse(&["dance"]),
            CliCommand::Invalid("unknown command: dance".to_string())
        );
    }
}
