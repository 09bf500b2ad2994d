// Line command parsing.
//
// Turns one line of user input into a Command. Parsing is pure; the REPL in
// main.rs executes the result against the draft session.

use gridiron_core::{PlayerId, Position};
use thiserror::Error;

/// Default number of rows shown by `avail`.
pub const DEFAULT_AVAILABLE_LIMIT: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Draft a player. Without a team, the team on the clock picks.
    Pick { team: Option<u8>, player: PlayerId },
    Undo,
    Status,
    /// Upcoming picks for a team (defaults to the user's draft slot).
    Next { team: Option<u8> },
    Needs { team: Option<u8> },
    Byes { team: Option<u8> },
    Available {
        position: Option<Position>,
        limit: usize,
    },
    Find(String),
    /// One round of the board; the current round when omitted.
    Board { round: Option<u32> },
    Supply,
    Save,
    Load,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("`{value}` is not a valid {what}")]
    BadArgument { what: &'static str, value: String },
}

pub const HELP: &str = "\
commands:
  pick [team] <player_id>   draft a player (team defaults to the one on the clock)
  undo                      reverse the most recent pick
  status                    draft progress and who is on the clock
  next [team]               upcoming picks for a team (default: yours)
  needs [team]              unfilled roster minimums
  byes [team]               bye weeks shared by two or more rostered players
  avail [POS] [limit]       best available players
  find <text>               search available players by name
  board [round]             picks in a round (default: current)
  supply                    positional supply and scarcity
  save | load               write or read the draft snapshot
  help | quit";

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Err(CommandError::Empty);
    };
    let args: Vec<&str> = parts.collect();

    match head.to_ascii_lowercase().as_str() {
        "pick" | "p" => match args.as_slice() {
            [player] => Ok(Command::Pick {
                team: None,
                player: parse_player(player)?,
            }),
            [team, player] => Ok(Command::Pick {
                team: Some(parse_team(team)?),
                player: parse_player(player)?,
            }),
            _ => Err(CommandError::Usage("pick [team] <player_id>")),
        },
        "undo" | "u" => no_args(&args, Command::Undo, "undo"),
        "status" | "s" => no_args(&args, Command::Status, "status"),
        "next" => Ok(Command::Next {
            team: optional_team(&args, "next [team]")?,
        }),
        "needs" => Ok(Command::Needs {
            team: optional_team(&args, "needs [team]")?,
        }),
        "byes" => Ok(Command::Byes {
            team: optional_team(&args, "byes [team]")?,
        }),
        "avail" | "a" => parse_available(&args),
        "find" | "f" => {
            if args.is_empty() {
                Err(CommandError::Usage("find <text>"))
            } else {
                Ok(Command::Find(args.join(" ")))
            }
        }
        "board" | "b" => match args.as_slice() {
            [] => Ok(Command::Board { round: None }),
            [round] => Ok(Command::Board {
                round: Some(parse_number(round, "round")?),
            }),
            _ => Err(CommandError::Usage("board [round]")),
        },
        "supply" => no_args(&args, Command::Supply, "supply"),
        "save" => no_args(&args, Command::Save, "save"),
        "load" => no_args(&args, Command::Load, "load"),
        "help" | "h" | "?" => Ok(Command::Help),
        "quit" | "q" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn no_args(args: &[&str], command: Command, usage: &'static str) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(CommandError::Usage(usage))
    }
}

fn optional_team(args: &[&str], usage: &'static str) -> Result<Option<u8>, CommandError> {
    match args {
        [] => Ok(None),
        [team] => parse_team(team).map(Some),
        _ => Err(CommandError::Usage(usage)),
    }
}

/// `avail`, `avail RB`, `avail 30`, or `avail RB 30`.
fn parse_available(args: &[&str]) -> Result<Command, CommandError> {
    let mut position = None;
    let mut limit = DEFAULT_AVAILABLE_LIMIT;
    match args {
        [] => {}
        [one] => match Position::from_str_pos(one) {
            Some(pos) => position = Some(pos),
            None => limit = parse_number(one, "position or limit")?,
        },
        [pos, n] => {
            position = Some(Position::from_str_pos(pos).ok_or_else(|| {
                CommandError::BadArgument {
                    what: "position",
                    value: pos.to_string(),
                }
            })?);
            limit = parse_number(n, "limit")?;
        }
        _ => return Err(CommandError::Usage("avail [POS] [limit]")),
    }
    Ok(Command::Available { position, limit })
}

fn parse_team(s: &str) -> Result<u8, CommandError> {
    parse_number(s, "team slot")
}

fn parse_player(s: &str) -> Result<PlayerId, CommandError> {
    parse_number(s, "player id").map(PlayerId)
}

fn parse_number<T: std::str::FromStr>(s: &str, what: &'static str) -> Result<T, CommandError> {
    s.parse().map_err(|_| CommandError::BadArgument {
        what,
        value: s.to_string(),
    })
}
