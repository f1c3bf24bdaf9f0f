//! Command parser for the terminal client
//!
//! Parses lines like "more", "brand Chanel", "show 3f2a...".

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing argument for {0}")]
    MissingArgument(String),
}

/// Commands the user can type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load the next page of older posts
    More,

    /// Drop everything and re-subscribe
    Refresh,

    /// Toggle the brand filter
    Brand(String),

    /// Toggle the category filter
    Category(String),

    /// Clear both filters
    Clear,

    /// Show one post with its comments
    Show(String),

    /// Comment on a post
    Comment { post_id: String, text: String },

    /// Show the signed-in user's profile
    Profile,

    Help,

    Quit,
}

/// Parse a command from one input line
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseError::UnknownCommand("empty input".to_string()));
    }

    let (command, rest) = match input.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (input, ""),
    };

    let arg = |name: &str| {
        if rest.is_empty() {
            Err(ParseError::MissingArgument(name.to_string()))
        } else {
            Ok(rest.to_string())
        }
    };

    match command.to_lowercase().as_str() {
        "more" | "m" | "next" => Ok(Command::More),
        "refresh" | "r" | "reload" => Ok(Command::Refresh),
        // Brand names may contain spaces ("Louis Vuitton")
        "brand" | "b" => Ok(Command::Brand(arg("brand")?)),
        "category" | "cat" | "c" => Ok(Command::Category(arg("category")?)),
        "clear" => Ok(Command::Clear),
        "show" | "open" => Ok(Command::Show(arg("show")?)),
        "comment" => {
            let rest = arg("comment")?;
            match rest.split_once(char::is_whitespace) {
                Some((post_id, text)) if !text.trim().is_empty() => Ok(Command::Comment {
                    post_id: post_id.to_string(),
                    text: text.trim().to_string(),
                }),
                _ => Err(ParseError::MissingArgument("comment text".to_string())),
            }
        }
        "profile" | "me" => Ok(Command::Profile),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

/// Help text for all commands
pub fn help_text() -> &'static str {
    r#"Commands:
  more               Load older posts
  refresh            Reload the feed from the top
  brand <name>       Toggle the brand filter
  category <name>    Toggle the category filter
  clear              Clear all filters
  show <post-id>     Show a post and its comments
  comment <id> <text>  Comment on a post
  profile            Show your profile
  help               Show this help
  quit               Exit
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("more").unwrap(), Command::More);
        assert_eq!(parse_command("  M ").unwrap(), Command::More);
        assert_eq!(parse_command("refresh").unwrap(), Command::Refresh);
        assert_eq!(parse_command("clear").unwrap(), Command::Clear);
        assert_eq!(parse_command("profile").unwrap(), Command::Profile);
        assert_eq!(parse_command("?").unwrap(), Command::Help);
        assert_eq!(parse_command("exit").unwrap(), Command::Quit);
    }

    #[test]
    fn test_parse_filters_keep_spaces() {
        assert_eq!(
            parse_command("brand Louis Vuitton").unwrap(),
            Command::Brand("Louis Vuitton".to_string())
        );
        assert_eq!(
            parse_command("category   Bags ").unwrap(),
            Command::Category("Bags".to_string())
        );
    }

    #[test]
    fn test_parse_show_and_comment() {
        assert_eq!(
            parse_command("show p1").unwrap(),
            Command::Show("p1".to_string())
        );
        assert_eq!(
            parse_command("comment p1 so pretty").unwrap(),
            Command::Comment {
                post_id: "p1".to_string(),
                text: "so pretty".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_arguments() {
        assert_eq!(
            parse_command("brand"),
            Err(ParseError::MissingArgument("brand".to_string()))
        );
        assert_eq!(
            parse_command("show"),
            Err(ParseError::MissingArgument("show".to_string()))
        );
        assert_eq!(
            parse_command("comment p1"),
            Err(ParseError::MissingArgument("comment text".to_string()))
        );
    }

    #[test]
    fn test_unknown_and_empty() {
        assert_eq!(
            parse_command("dance"),
            Err(ParseError::UnknownCommand("dance".to_string()))
        );
        assert!(parse_command("   ").is_err());
    }
}
