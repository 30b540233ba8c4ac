// Per-team roster export to CSV.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::draft::pick::TeamId;
use crate::draft::roster::RosterEntry;
use crate::draft::session::DraftSession;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

const HEADER: [&str; 6] = ["Round", "Pick", "Player", "Team", "Position", "Bye"];

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    round: u32,
    pick: Option<u32>,
    player: &'a str,
    team: &'a str,
    position: &'static str,
    bye: Option<u8>,
}

impl<'a> From<&'a RosterEntry> for ExportRow<'a> {
    fn from(entry: &'a RosterEntry) -> Self {
        ExportRow {
            round: entry.round,
            pick: entry.pick_in_round,
            player: &entry.player.name,
            team: &entry.player.team,
            position: entry.player.position.display_str(),
            bye: entry.player.bye_week,
        }
    }
}

/// `team_<n>.csv`
pub fn roster_file_name(team: TeamId) -> String {
    format!("team_{}.csv", team.0)
}

/// Write one roster as CSV. The header row is always written, even for an
/// empty roster; unknown values become empty cells.
pub fn write_roster<W: Write>(writer: W, entries: &[RosterEntry]) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(HEADER)?;
    for entry in entries {
        wtr.serialize(ExportRow::from(entry))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write every team's roster into `dir`, creating it if needed. Returns the
/// files written, in team order.
pub fn export_rosters(session: &DraftSession, dir: &Path) -> Result<Vec<PathBuf>, ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut written = Vec::new();
    for (team, entries) in session.rosters().iter() {
        let path = dir.join(roster_file_name(team));
        let path_str = path.display().to_string();
        let file = File::create(&path).map_err(|e| ExportError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        write_roster(file, entries).map_err(|e| ExportError::Csv {
            path: path_str,
            source: e,
        })?;
        written.push(path);
    }
    info!("Exported {} rosters to {}", written.len(), dir.display());
    Ok(written)
}
