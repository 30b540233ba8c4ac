// Player table loading and normalization.
//
// Reads a ranked cheat-sheet CSV. Header names vary by site ("Name" vs
// "Player", "Pos" vs "Position", ...), so headers are mapped onto the
// canonical columns before rows are deserialized. Projected points and tier
// are kept when present; other columns (ADP, notes) are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::draft::pick::Position;
use crate::draft::pool::{Player, PlayerId};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PlayerImportError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Bye weeks
// ---------------------------------------------------------------------------

/// 2025 NFL bye weeks, used when the sheet has no bye column (or a blank cell).
const NFL_BYE_WEEKS_2025: &[(&str, u8)] = &[
    ("ARI", 8),
    ("ARZ", 8),
    ("ATL", 5),
    ("BAL", 7),
    ("BUF", 7),
    ("CAR", 14),
    ("CHI", 5),
    ("CIN", 10),
    ("CLE", 9),
    ("DAL", 10),
    ("DEN", 12),
    ("DET", 8),
    ("GB", 5),
    ("HOU", 6),
    ("IND", 11),
    ("JAX", 8),
    ("KC", 10),
    ("LAC", 12),
    ("LAR", 8),
    ("LV", 8),
    ("MIA", 12),
    ("MIN", 6),
    ("NE", 14),
    ("NO", 11),
    ("NYG", 14),
    ("NYJ", 9),
    ("PHI", 9),
    ("PIT", 5),
    ("SEA", 8),
    ("SF", 14),
    ("TB", 9),
    ("TEN", 10),
    ("WAS", 12),
];

/// Look up the 2025 bye week for an NFL team abbreviation.
pub fn bye_week_for(team: &str) -> Option<u8> {
    let team = team.trim().to_uppercase();
    NFL_BYE_WEEKS_2025
        .iter()
        .find(|(abbr, _)| *abbr == team)
        .map(|&(_, week)| week)
}

// ---------------------------------------------------------------------------
// Header normalization
// ---------------------------------------------------------------------------

/// Map a raw header to its canonical column name, case-insensitively.
fn canonical_header(raw: &str) -> Option<&'static str> {
    match raw.trim().to_lowercase().as_str() {
        "player" | "name" => Some("Player"),
        "team" | "tm" => Some("Team"),
        "position" | "pos" => Some("Position"),
        "bye" | "bye_week" | "bye week" => Some("Bye"),
        "rank" | "rk" => Some("Rank"),
        "projpts" | "proj_pts" | "proj pts" | "points" => Some("ProjPts"),
        "tier" => Some("Tier"),
        _ => None,
    }
}

/// Rewrite recognized headers to canonical names. When two headers map to
/// the same column, the first one wins and the rest are renamed out of the
/// way so they are ignored.
fn normalize_headers(headers: &csv::StringRecord) -> csv::StringRecord {
    let mut used: Vec<&'static str> = Vec::new();
    headers
        .iter()
        .enumerate()
        .map(|(idx, raw)| match canonical_header(raw) {
            Some(canonical) if !used.contains(&canonical) => {
                used.push(canonical);
                canonical.to_string()
            }
            Some(_) => format!("{raw}#{idx}"),
            None => raw.to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Raw CSV row (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawPlayerRow {
    Player: String,
    #[serde(default)]
    Team: String,
    #[serde(default)]
    Position: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    Bye: Option<u8>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    Rank: Option<u32>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    ProjPts: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    Tier: Option<u32>,
}

// ---------------------------------------------------------------------------
// Loaders
// ---------------------------------------------------------------------------

/// Parse players from any CSV reader. Malformed rows are skipped with a
/// warning; ids are assigned in row order starting at 1.
pub fn load_players_from_reader<R: Read>(rdr: R) -> Result<Vec<Player>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr);
    let headers = normalize_headers(reader.headers()?);
    reader.set_headers(headers);

    let mut players = Vec::new();
    for (row_idx, result) in reader.deserialize::<RawPlayerRow>().enumerate() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed player row {}: {}", row_idx + 1, e);
                continue;
            }
        };

        let name = raw.Player.trim();
        if name.is_empty() {
            warn!("skipping player row {}: empty name", row_idx + 1);
            continue;
        }
        let Some(position) = Position::from_str_pos(&raw.Position) else {
            warn!(
                "skipping player '{}': unrecognized position '{}'",
                name, raw.Position
            );
            continue;
        };
        let team = raw.Team.trim().to_uppercase();

        players.push(Player {
            id: PlayerId(players.len() as u32 + 1),
            rank: raw.Rank.unwrap_or(row_idx as u32 + 1),
            name: name.to_string(),
            bye_week: raw.Bye.or_else(|| bye_week_for(&team)),
            team,
            position,
            proj_pts: raw.ProjPts,
            tier: raw.Tier,
        });
    }
    Ok(players)
}

/// Load the player table from a CSV file.
pub fn load_players(path: &Path) -> Result<Vec<Player>, PlayerImportError> {
    let path_str = path.display().to_string();
    let file = File::open(path).map_err(|e| PlayerImportError::Io {
        path: path_str.clone(),
        source: e,
    })?;
    let players = load_players_from_reader(file).map_err(|e| PlayerImportError::Csv {
        path: path_str.clone(),
        source: e,
    })?;
    if players.is_empty() {
        return Err(PlayerImportError::Validation(format!(
            "no players could be read from {path_str}"
        )));
    }
    info!("Loaded {} players from {}", players.len(), path_str);
    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_canonical_headers() {
        let csv = "\
Rank,Player,Team,Position,Bye
1,Justin Jefferson,MIN,WR,6
2,Christian McCaffrey,SF,RB,9
";
        let players = load_players_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].id, PlayerId(1));
        assert_eq!(players[0].name, "Justin Jefferson");
        assert_eq!(players[0].position, Position::WideReceiver);
        assert_eq!(players[0].bye_week, Some(6));
        assert_eq!(players[1].rank, 2);
        assert_eq!(players[1].team, "SF");
        // Explicit bye column beats the built-in table (SF is 14 in 2025).
        assert_eq!(players[1].bye_week, Some(9));
    }

    #[test]
    fn normalizes_header_aliases_case_insensitively() {
        let csv = "\
RK,NAME,tm,Pos,bye_week,ProjPts,Tier
3,Ja'Marr Chase,cin,wr,10,250,1
";
        let players = load_players_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].rank, 3);
        assert_eq!(players[0].name, "Ja'Marr Chase");
        assert_eq!(players[0].team, "CIN");
        assert_eq!(players[0].position, Position::WideReceiver);
        assert_eq!(players[0].bye_week, Some(10));
        assert_eq!(players[0].proj_pts, Some(250.0));
        assert_eq!(players[0].tier, Some(1));
    }

    #[test]
    fn projection_and_tier_are_optional() {
        let csv = "\
Player,Team,Position,Proj Pts,Tier
Bijan Robinson,ATL,RB,301.5,
Puka Nacua,LAR,WR,n/a,2
Josh Jacobs,GB,RB
";
        let players = load_players_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(players.len(), 3);
        assert_eq!(players[0].proj_pts, Some(301.5));
        assert_eq!(players[0].tier, None);
        assert_eq!(players[1].proj_pts, None);
        assert_eq!(players[1].tier, Some(2));
        assert_eq!(players[2].proj_pts, None);
        assert_eq!(players[2].tier, None);
    }

    #[test]
    fn missing_bye_filled_from_team_table() {
        let csv = "\
Player,Team,Position
Josh Allen,BUF,QB
Somebody,XYZ,TE
";
        let players = load_players_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(players[0].bye_week, Some(7));
        assert_eq!(players[1].bye_week, None);
    }

    #[test]
    fn blank_bye_and_rank_fall_back() {
        let csv = "\
Rank,Player,Team,Position,Bye
,Saquon Barkley,PHI,RB,
";
        let players = load_players_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(players[0].rank, 1);
        assert_eq!(players[0].bye_week, Some(9));
    }

    #[test]
    fn skips_unknown_positions_and_blank_names() {
        let csv = "\
Player,Team,Position
Kyle Juszczyk,SF,FB
,KC,QB
Harrison Butker,KC,K
";
        let players = load_players_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].name, "Harrison Butker");
        assert_eq!(players[0].id, PlayerId(1));
        // Rank falls back to the row position in the file.
        assert_eq!(players[0].rank, 3);
    }

    #[test]
    fn duplicate_header_aliases_keep_first() {
        let csv = "\
Name,Player,Position
Real Name,Other Column,QB
";
        let players = load_players_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(players[0].name, "Real Name");
    }

    #[test]
    fn bye_week_lookup_is_case_insensitive() {
        assert_eq!(bye_week_for("kc"), Some(10));
        assert_eq!(bye_week_for("ARZ"), Some(8));
        assert_eq!(bye_week_for("???"), None);
    }

    #[test]
    fn load_players_missing_file_is_io_error() {
        let err = load_players(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, PlayerImportError::Io { .. }));
    }

    #[test]
    fn load_players_reads_file() {
        let path = std::env::temp_dir().join("draftsheet_players_ok.csv");
        std::fs::write(
            &path,
            "Rank,Player,Team,Position\n1,Josh Allen,BUF,QB\n2,Travis Kelce,KC,TE\n",
        )
        .unwrap();
        let players = load_players(&path).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[1].name, "Travis Kelce");
        assert_eq!(players[1].bye_week, Some(10));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_players_empty_table_is_validation_error() {
        let path = std::env::temp_dir().join("draftsheet_players_empty.csv");
        std::fs::write(&path, "Player,Team,Position\n").unwrap();
        let err = load_players(&path).unwrap_err();
        assert!(matches!(err, PlayerImportError::Validation(_)));
        let _ = std::fs::remove_file(&path);
    }
}
