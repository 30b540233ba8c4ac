// Line-oriented command parsing.
//
// Translates one line of operator input into a UserCommand for the app
// loop. Player names are the rest of the line, so they may contain spaces.

use std::path::PathBuf;

use draftsheet_core::draft::pick::{Position, TeamId};
use draftsheet_core::protocol::UserCommand;

pub const DEFAULT_UPCOMING: usize = 5;
pub const DEFAULT_AVAILABLE: usize = 10;

pub const USAGE: &str = "\
commands:
  draft <player>                 draft a player with the pick on the clock
  undo                           undo the most recent pick
  keeper <team> <round> <player> reserve a team's pick for a keeper
  reset <teams> <rounds>         change the draft size (before any picks)
  status                         show the draft board
  next [n]                       show the next n picks
  avail [pos] [n]                best available players, optionally by position
  find <text>                    search undrafted players by name or NFL team
  roster <team>                  show a team's roster
  export [dir]                   write every roster to CSV
  help                           show this message
  quit                           exit";

/// Result of parsing one input line.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Command(UserCommand),
    Help,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("unknown command `{0}` (type `help` for a list)")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    MissingArgument(&'static str),

    #[error("`{value}` is not a valid {what}")]
    InvalidNumber { what: &'static str, value: String },

    #[error("`{0}` is not a position (QB, RB, WR, TE, K, DST)")]
    InvalidPosition(String),
}

pub fn parse_line(line: &str) -> Result<ParsedLine, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ParsedLine::Blank);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let cmd = match verb.to_lowercase().as_str() {
        "draft" | "pick" | "d" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument("draft <player>"));
            }
            UserCommand::Draft {
                player: rest.to_string(),
            }
        }
        "undo" | "u" => UserCommand::Undo,
        "keeper" | "keep" => {
            const USAGE_KEEPER: &str = "keeper <team> <round> <player>";
            if args.len() < 3 {
                return Err(InputError::MissingArgument(USAGE_KEEPER));
            }
            let team = parse_number(args[0], "team number")?;
            let round = parse_number(args[1], "round")?;
            let player = skip_words(rest, 2);
            if player.is_empty() {
                return Err(InputError::MissingArgument(USAGE_KEEPER));
            }
            UserCommand::AddKeeper {
                team: TeamId(team),
                player: player.to_string(),
                round,
            }
        }
        "reset" => {
            if args.len() != 2 {
                return Err(InputError::MissingArgument("reset <teams> <rounds>"));
            }
            UserCommand::ResetDraft {
                teams: parse_number(args[0], "team count")?,
                rounds: parse_number(args[1], "round count")?,
            }
        }
        "status" | "s" => UserCommand::Status,
        "next" | "n" => UserCommand::Upcoming {
            count: match args.first() {
                Some(n) => parse_number(n, "count")? as usize,
                None => DEFAULT_UPCOMING,
            },
        },
        "avail" | "available" | "a" => parse_available(&args)?,
        "find" | "search" | "f" => {
            if rest.is_empty() {
                return Err(InputError::MissingArgument("find <text>"));
            }
            UserCommand::Search {
                query: rest.to_string(),
                limit: DEFAULT_AVAILABLE,
            }
        }
        "roster" | "r" => match args.first() {
            Some(team) => UserCommand::Roster {
                team: TeamId(parse_number(team, "team number")?),
            },
            None => return Err(InputError::MissingArgument("roster <team>")),
        },
        "export" => UserCommand::Export {
            dir: (!rest.is_empty()).then(|| PathBuf::from(rest)),
        },
        "help" | "h" | "?" => return Ok(ParsedLine::Help),
        "quit" | "exit" | "q" => UserCommand::Quit,
        other => return Err(InputError::UnknownCommand(other.to_string())),
    };
    Ok(ParsedLine::Command(cmd))
}

/// `avail`, `avail 20`, `avail rb`, `avail rb 20`
fn parse_available(args: &[&str]) -> Result<UserCommand, InputError> {
    let mut position = None;
    let mut limit = DEFAULT_AVAILABLE;
    match args {
        [] => {}
        [one] => match one.parse::<usize>() {
            Ok(n) => limit = n,
            Err(_) => position = Some(parse_position(one)?),
        },
        [pos, n, ..] => {
            position = Some(parse_position(pos)?);
            limit = parse_number(n, "count")? as usize;
        }
    }
    Ok(UserCommand::Available { position, limit })
}

/// `s` with its first `n` whitespace-separated words removed.
fn skip_words(s: &str, n: usize) -> &str {
    let mut rest = s.trim_start();
    for _ in 0..n {
        rest = match rest.split_once(char::is_whitespace) {
            Some((_, tail)) => tail.trim_start(),
            None => "",
        };
    }
    rest.trim_end()
}

fn parse_position(s: &str) -> Result<Position, InputError> {
    Position::from_str_pos(s).ok_or_else(|| InputError::InvalidPosition(s.to_string()))
}

fn parse_number(s: &str, what: &'static str) -> Result<u32, InputError> {
    s.parse().map_err(|_| InputError::InvalidNumber {
        what,
        value: s.to_string(),
    })
}
