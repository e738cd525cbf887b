//! Admin chat commands.

use std::time::Duration;

use crate::region::Vector3;

/// One-metre nudge directions for `!go <direction>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Forward,
    Back,
}

impl Direction {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "forward" => Some(Self::Forward),
            "back" => Some(Self::Back),
            _ => None,
        }
    }

    /// Offset applied to the current position.
    pub fn offset(self) -> Vector3 {
        match self {
            Self::Forward => Vector3::new(1.0, 0.0, 0.0),
            Self::Back => Vector3::new(-1.0, 0.0, 0.0),
            Self::Left => Vector3::new(0.0, 1.0, 0.0),
            Self::Right => Vector3::new(0.0, -1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BotCommand {
    Continue,
    Stop,
    Nudge(Direction),
    WalkTo {
        destination: Vector3,
        timeout: Option<Duration>,
    },
    FlyTo {
        destination: Vector3,
        timeout: Option<Duration>,
    },
    Teleport(Vector3),
    /// `!teleport` with a missing or unparsable position.
    InvalidTeleport(String),
    /// Any other `!` message, carrying the full text.
    Unknown(String),
}

impl BotCommand {
    /// Parse a chat line.
    ///
    /// Returns `None` for ordinary chat and for malformed `!go`/`!fly`
    /// targets, which are dropped silently.
    pub fn parse(text: &str) -> Option<Self> {
        if !text.starts_with('!') {
            return None;
        }
        let mut words = text.split(' ');
        let verb = words.next().unwrap_or_default();
        let arg = words.next();

        match verb {
            "!continue" => Some(Self::Continue),
            "!stop" => Some(Self::Stop),
            "!go" => {
                let arg = arg?;
                if let Some(direction) = Direction::parse(arg) {
                    return Some(Self::Nudge(direction));
                }
                let (destination, timeout) = parse_target(arg)?;
                Some(Self::WalkTo {
                    destination,
                    timeout,
                })
            }
            "!fly" => {
                let (destination, timeout) = parse_target(arg?)?;
                Some(Self::FlyTo {
                    destination,
                    timeout,
                })
            }
            "!teleport" => match arg.map(str::parse::<Vector3>) {
                Some(Ok(position)) => Some(Self::Teleport(position)),
                Some(Err(e)) => Some(Self::InvalidTeleport(e.to_string())),
                None => Some(Self::InvalidTeleport("missing position".to_string())),
            },
            _ => Some(Self::Unknown(text.to_string())),
        }
    }
}

/// `x,y,z` or `x,y,z,secs`.
fn parse_target(arg: &str) -> Option<(Vector3, Option<Duration>)> {
    let parts: Vec<&str> = arg.split(',').collect();
    let (xyz, secs) = match parts.len() {
        3 => (arg, None),
        4 => {
            let secs: f64 = parts[3].trim().parse().ok()?;
            let end = arg.len() - parts[3].len() - 1;
            (&arg[..end], Some(Duration::try_from_secs_f64(secs).ok()?))
        }
        _ => return None,
    };
    Some((xyz.parse().ok()?, secs))
}
