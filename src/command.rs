use std::str::FromStr;

use crate::error::CommandParseError;

/// Command enum for type-safe clock updates
#[derive(Debug, Clone, PartialEq)]
pub enum ClockCommand {
    /// Start the mission clock. Ignored once started.
    Start,
    /// A pointer click at canvas coordinates.
    Click { x: f64, y: f64 },
    /// Freeze the displayed time at `HH:MM`.
    OverrideTime(String),
    /// Return to the live wall-clock time.
    ClearTimeOverride,
    /// Replace the elapsed-minutes counter.
    OverrideElapsed(String),
}

impl FromStr for ClockCommand {
    type Err = CommandParseError;

    /// Parse one text command: `start`, `click X Y`, `time HH:MM`, `live`
    /// or `elapsed N`. Override arguments are validated later by the view so
    /// the user sees the same diagnostics as from the panel.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandParseError::Empty);
        };
        let rest = words.collect::<Vec<_>>().join(" ");
        match verb.to_ascii_lowercase().as_str() {
            "start" => Ok(ClockCommand::Start),
            "live" => Ok(ClockCommand::ClearTimeOverride),
            "time" => non_empty(rest, "time", "HH:MM").map(ClockCommand::OverrideTime),
            "elapsed" => non_empty(rest, "elapsed", "a minute count").map(ClockCommand::OverrideElapsed),
            "click" | "waypoint" => {
                let mut coords = rest.split_whitespace();
                let (Some(x), Some(y), None) = (coords.next(), coords.next(), coords.next()) else {
                    return Err(CommandParseError::MissingArgument {
                        command: "click",
                        expected: "X Y",
                    });
                };
                Ok(ClockCommand::Click {
                    x: coordinate(x)?,
                    y: coordinate(y)?,
                })
            }
            _ => Err(CommandParseError::Unknown(verb.to_string())),
        }
    }
}

fn non_empty(
    rest: String,
    command: &'static str,
    expected: &'static str,
) -> Result<String, CommandParseError> {
    if rest.is_empty() {
        Err(CommandParseError::MissingArgument { command, expected })
    } else {
        Ok(rest)
    }
}

fn coordinate(word: &str) -> Result<f64, CommandParseError> {
    word.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CommandParseError::InvalidCoordinate(word.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_command() {
        assert_eq!("start".parse(), Ok(ClockCommand::Start));
        assert_eq!("  START ".parse(), Ok(ClockCommand::Start));
        assert_eq!("live".parse(), Ok(ClockCommand::ClearTimeOverride));
        assert_eq!(
            "time 09:30".parse(),
            Ok(ClockCommand::OverrideTime("09:30".into()))
        );
        assert_eq!(
            "elapsed 45".parse(),
            Ok(ClockCommand::OverrideElapsed("45".into()))
        );
        assert_eq!(
            "click 548 300".parse(),
            Ok(ClockCommand::Click { x: 548.0, y: 300.0 })
        );
    }

    #[test]
    fn override_arguments_are_passed_through_unvalidated() {
        assert_eq!(
            "time 25:99".parse(),
            Ok(ClockCommand::OverrideTime("25:99".into()))
        );
        assert_eq!(
            "elapsed abc".parse(),
            Ok(ClockCommand::OverrideElapsed("abc".into()))
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert_eq!("".parse::<ClockCommand>(), Err(CommandParseError::Empty));
        assert_eq!(
            "launch".parse::<ClockCommand>(),
            Err(CommandParseError::Unknown("launch".into()))
        );
        assert!(matches!(
            "time".parse::<ClockCommand>(),
            Err(CommandParseError::MissingArgument { command: "time", .. })
        ));
        assert!(matches!(
            "click 1".parse::<ClockCommand>(),
            Err(CommandParseError::MissingArgument { .. })
        ));
        assert_eq!(
            "click 1 nope".parse::<ClockCommand>(),
            Err(CommandParseError::InvalidCoordinate("nope".into()))
        );
        assert_eq!(
            "click 1 NaN".parse::<ClockCommand>(),
            Err(CommandParseError::InvalidCoordinate("NaN".into()))
        );
    }
}
