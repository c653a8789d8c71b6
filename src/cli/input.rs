//! Interactive command parsing

use std::str::FromStr;

use thiserror::Error;

/// A command typed at the session prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    /// Record button
    Toggle,
    List,
    /// Play the item at a 1-based list position
    Play(usize),
    /// Delete the item at a 1-based list position
    Delete(usize),
    Status,
    Help,
    Quit,
}

/// Input that is not a valid command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Unknown command '{0}'. Type h for help")]
    Unknown(String),

    #[error("'{command}' needs a recording number, e.g. {command} 1")]
    MissingIndex { command: String },

    #[error("Invalid recording number '{0}'")]
    InvalidIndex(String),
}

fn parse_index(command: &str, arg: Option<&str>) -> Result<usize, InputError> {
    let arg = arg.ok_or_else(|| InputError::MissingIndex {
        command: command.to_string(),
    })?;
    match arg.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(InputError::InvalidIndex(arg.to_string())),
    }
}

impl FromStr for UiCommand {
    type Err = InputError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            // Bare Enter is the record button
            return Ok(UiCommand::Toggle);
        };
        let arg = parts.next();

        match command.to_lowercase().as_str() {
            "r" | "record" => Ok(UiCommand::Toggle),
            "l" | "list" => Ok(UiCommand::List),
            "p" | "play" => parse_index(command, arg).map(UiCommand::Play),
            "d" | "delete" => parse_index(command, arg).map(UiCommand::Delete),
            "s" | "status" => Ok(UiCommand::Status),
            "h" | "help" | "?" => Ok(UiCommand::Help),
            "q" | "quit" | "exit" => Ok(UiCommand::Quit),
            _ => Err(InputError::Unknown(command.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line_toggles() {
        assert_eq!("".parse::<UiCommand>(), Ok(UiCommand::Toggle));
        assert_eq!("   ".parse::<UiCommand>(), Ok(UiCommand::Toggle));
        assert_eq!("r".parse::<UiCommand>(), Ok(UiCommand::Toggle));
    }

    #[test]
    fn parses_indexed_commands() {
        assert_eq!("p 2".parse::<UiCommand>(), Ok(UiCommand::Play(2)));
        assert_eq!("delete 1".parse::<UiCommand>(), Ok(UiCommand::Delete(1)));
        assert_eq!("  P   3 ".parse::<UiCommand>(), Ok(UiCommand::Play(3)));
    }

    #[test]
    fn indexed_commands_need_a_positive_number() {
        assert!(matches!(
            "p".parse::<UiCommand>(),
            Err(InputError::MissingIndex { .. })
        ));
        assert_eq!(
            "d 0".parse::<UiCommand>(),
            Err(InputError::InvalidIndex("0".to_string()))
        );
        assert_eq!(
            "d x".parse::<UiCommand>(),
            Err(InputError::InvalidIndex("x".to_string()))
        );
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!("l".parse::<UiCommand>(), Ok(UiCommand::List));
        assert_eq!("s".parse::<UiCommand>(), Ok(UiCommand::Status));
        assert_eq!("?".parse::<UiCommand>(), Ok(UiCommand::Help));
        assert_eq!("Q".parse::<UiCommand>(), Ok(UiCommand::Quit));
    }

    #[test]
    fn unknown_command_is_rejected() {
        assert_eq!(
            "x".parse::<UiCommand>(),
            Err(InputError::Unknown("x".to_string()))
        );
    }
}
