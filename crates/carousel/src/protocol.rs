//! Line protocol spoken over the control socket.
//!
//! One command per line: a case-insensitive verb followed by whitespace
//! separated arguments, e.g. `goto 3` or `drag-end -72.5 -640`.

use std::fmt;
use std::str::{FromStr, SplitWhitespace};
use strum::{Display as StrumDisplay, EnumString, IntoStaticStr};
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/carousel.sock";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Next,
    Prev,
    GoTo(i64),
    Resize(f32),
    DragStart,
    DragMove { offset_x: f32, velocity_x: f32 },
    DragEnd {
        offset_x: f32,
        velocity_x: Option<f32>,
    },
    Pause,
    Resume,
    Status,
    Dispose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, StrumDisplay, IntoStaticStr)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
enum Verb {
    Next,
    Prev,
    #[strum(to_string = "goto", serialize = "go-to")]
    GoTo,
    Resize,
    DragStart,
    DragMove,
    DragEnd,
    Pause,
    Resume,
    Status,
    Dispose,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    UnknownVerb(String),
    #[error("'{verb}' needs <{name}>")]
    MissingArgument { verb: &'static str, name: &'static str },
    #[error("invalid <{name}>: '{value}'")]
    InvalidArgument { name: &'static str, value: String },
    #[error("unexpected input '{0}'")]
    Trailing(String),
}

struct Args<'a> {
    verb: &'static str,
    rest: SplitWhitespace<'a>,
}

impl Args<'_> {
    fn required<T: FromStr>(&mut self, name: &'static str) -> Result<T, CommandError> {
        let raw = self.rest.next().ok_or(CommandError::MissingArgument {
            verb: self.verb,
            name,
        })?;
        parse_arg(name, raw)
    }

    fn optional<T: FromStr>(&mut self, name: &'static str, default: T) -> Result<T, CommandError> {
        self.rest
            .next()
            .map_or(Ok(default), |raw| parse_arg(name, raw))
    }

    fn maybe<T: FromStr>(&mut self, name: &'static str) -> Result<Option<T>, CommandError> {
        self.rest.next().map(|raw| parse_arg(name, raw)).transpose()
    }

    fn finish(mut self) -> Result<(), CommandError> {
        match self.rest.next() {
            Some(extra) => Err(CommandError::Trailing(extra.to_string())),
            None => Ok(()),
        }
    }
}

fn parse_arg<T: FromStr>(name: &'static str, raw: &str) -> Result<T, CommandError> {
    raw.parse().map_err(|_| CommandError::InvalidArgument {
        name,
        value: raw.to_string(),
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let word = words.next().ok_or(CommandError::Empty)?;
        let verb: Verb = word
            .parse()
            .map_err(|_| CommandError::UnknownVerb(word.to_string()))?;

        let mut args = Args {
            verb: verb.into(),
            rest: words,
        };

        let command = match verb {
            Verb::Next => Self::Next,
            Verb::Prev => Self::Prev,
            Verb::GoTo => Self::GoTo(args.required("index")?),
            Verb::Resize => Self::Resize(args.required("width")?),
            Verb::DragStart => Self::DragStart,
            Verb::DragMove => Self::DragMove {
                offset_x: args.required("offset")?,
                velocity_x: args.optional("velocity", 0.0)?,
            },
            Verb::DragEnd => Self::DragEnd {
                offset_x: args.required("offset")?,
                velocity_x: args.maybe("velocity")?,
            },
            Verb::Pause => Self::Pause,
            Verb::Resume => Self::Resume,
            Verb::Status => Self::Status,
            Verb::Dispose => Self::Dispose,
        };

        args.finish()?;
        Ok(command)
    }
}

impl Command {
    fn verb(&self) -> Verb {
        match self {
            Self::Next => Verb::Next,
            Self::Prev => Verb::Prev,
            Self::GoTo(_) => Verb::GoTo,
            Self::Resize(_) => Verb::Resize,
            Self::DragStart => Verb::DragStart,
            Self::DragMove { .. } => Verb::DragMove,
            Self::DragEnd { .. } => Verb::DragEnd,
            Self::Pause => Verb::Pause,
            Self::Resume => Verb::Resume,
            Self::Status => Verb::Status,
            Self::Dispose => Verb::Dispose,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.verb())?;
        match self {
            Self::GoTo(index) => write!(f, " {}", index),
            Self::Resize(width) => write!(f, " {}", width),
            Self::DragMove {
                offset_x,
                velocity_x,
            } => write!(f, " {} {}", offset_x, velocity_x),
            Self::DragEnd {
                offset_x,
                velocity_x,
            } => {
                write!(f, " {}", offset_x)?;
                match velocity_x {
                    Some(v) => write!(f, " {}", v),
                    None => Ok(()),
                }
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cases = vec![
            ("next", Command::Next),
            ("  PREV ", Command::Prev),
            ("goto 7", Command::GoTo(7)),
            ("Go-To -1", Command::GoTo(-1)),
            ("resize 1024.5", Command::Resize(1024.5)),
            ("drag-start", Command::DragStart),
            (
                "drag-move -40",
                Command::DragMove {
                    offset_x: -40.0,
                    velocity_x: 0.0,
                },
            ),
            (
                "drag-end -60 -650",
                Command::DragEnd {
                    offset_x: -60.0,
                    velocity_x: Some(-650.0),
                },
            ),
            (
                "drag-end 35",
                Command::DragEnd {
                    offset_x: 35.0,
                    velocity_x: None,
                },
            ),
            ("pause", Command::Pause),
            ("resume", Command::Resume),
            ("status", Command::Status),
            ("dispose", Command::Dispose),
        ];

        for (line, expected) in cases {
            assert_eq!(line.parse::<Command>(), Ok(expected), "{line}");
        }
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "jump".parse::<Command>(),
            Err(CommandError::UnknownVerb("jump".into()))
        );
        assert_eq!(
            "goto".parse::<Command>(),
            Err(CommandError::MissingArgument {
                verb: "goto",
                name: "index"
            })
        );
        assert_eq!(
            "goto two".parse::<Command>(),
            Err(CommandError::InvalidArgument {
                name: "index",
                value: "two".into()
            })
        );
        assert_eq!(
            "next 3".parse::<Command>(),
            Err(CommandError::Trailing("3".into()))
        );
    }

    #[test]
    fn test_display_produces_parseable_lines() {
        let drag = Command::DragEnd {
            offset_x: 12.5,
            velocity_x: Some(900.0),
        };
        assert_eq!(drag.to_string(), "drag-end 12.5 900");
        assert_eq!(drag.to_string().parse::<Command>(), Ok(drag));
        let release = Command::DragEnd {
            offset_x: -4.0,
            velocity_x: None,
        };
        assert_eq!(release.to_string(), "drag-end -4");
        assert_eq!(Command::GoTo(-3).to_string(), "goto -3");
        assert_eq!(Command::DragStart.to_string(), "drag-start");
    }

    #[test]
    fn test_non_finite_numbers_parse() {
        // the engine treats these as ignorable gestures, not protocol errors
        match "drag-end NaN 0".parse::<Command>() {
            Ok(Command::DragEnd { offset_x, .. }) => assert!(offset_x.is_nan()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
