// Plain-text rendering of UiUpdates for the console.

use std::fmt::Write;

use draftsheet_core::draft::pick::PickSlot;
use draftsheet_core::draft::pool::Player;
use draftsheet_core::draft::roster::RosterEntry;
use draftsheet_core::draft::session::DraftSnapshot;
use draftsheet_core::protocol::UiUpdate;

/// Render an update as one or more lines of text (no trailing newline).
pub fn render(update: &UiUpdate) -> String {
    match update {
        UiUpdate::Snapshot(snapshot) => render_snapshot(snapshot),
        UiUpdate::Picked(pick) => format!(
            "Pick {} ({}.{:02}) {}: {} ({})",
            pick.pick_number,
            pick.round,
            pick.pick_in_round,
            pick.team,
            pick.player_name,
            pick.position
        ),
        UiUpdate::Undone(undone) => format!(
            "Undid round {} pick for {}: {} is back in the pool",
            undone.entry.round, undone.team, undone.entry.player.name
        ),
        UiUpdate::KeeperAdded(keeper) => format!(
            "Keeper: {} keeps {} ({}) in round {}",
            keeper.team, keeper.player.name, keeper.player.position, keeper.round
        ),
        UiUpdate::Reset { teams, rounds } => {
            format!("Draft reset to {teams} teams x {rounds} rounds")
        }
        UiUpdate::Upcoming(slots) => {
            if slots.is_empty() {
                "No picks remaining".to_string()
            } else {
                let mut out = String::from("Upcoming:");
                for slot in slots {
                    let _ = write!(out, "\n  {}", slot_label(slot));
                }
                out
            }
        }
        UiUpdate::Available(players) => {
            if players.is_empty() {
                return "No players available".to_string();
            }
            let mut out = String::from("Best available:");
            for p in players {
                let _ = write!(out, "\n  {}", player_line(p));
            }
            out
        }
        UiUpdate::SearchResults { query, players } => {
            if players.is_empty() {
                return format!("No players match `{query}`");
            }
            let mut out = format!("Matches for `{query}`:");
            for p in players {
                let _ = write!(out, "\n  {}", player_line(p));
            }
            out
        }
        UiUpdate::Roster { team, entries } => {
            let mut out = format!("{team} roster:");
            if entries.is_empty() {
                out.push_str("\n  (empty)");
            }
            for entry in entries {
                let _ = write!(out, "\n  {}", roster_line(entry));
            }
            out
        }
        UiUpdate::Exported(files) => {
            let mut out = format!("Exported {} rosters:", files.len());
            for file in files {
                let _ = write!(out, "\n  {}", file.display());
            }
            out
        }
        UiUpdate::Rejected { message } => format!("error: {message}"),
    }
}

/// Render an update as a single JSON line.
pub fn render_json(update: &UiUpdate) -> serde_json::Result<String> {
    serde_json::to_string(update)
}

fn render_snapshot(s: &DraftSnapshot) -> String {
    let mut out = match &s.on_the_clock {
        Some(slot) => format!(
            "On the clock: {} | {} of {} picks left | {} players available",
            slot_label(slot),
            s.picks_remaining,
            s.total_picks,
            s.available_count
        ),
        None => format!(
            "Draft complete: {} teams x {} rounds | {} players undrafted",
            s.settings.team_count, s.settings.round_count, s.available_count
        ),
    };
    if !s.upcoming.is_empty() {
        let next: Vec<String> = s
            .upcoming
            .iter()
            .map(|slot| format!("#{} {}", slot.pick, slot.team))
            .collect();
        let _ = write!(out, "\nUp next: {}", next.join(", "));
    }
    if let Some(last) = s.recent_picks.last() {
        let _ = write!(
            out,
            "\nLast pick: #{} {} took {}",
            last.pick_number, last.team, last.player_name
        );
    }
    out
}

fn slot_label(slot: &PickSlot) -> String {
    format!(
        "pick {} (round {}.{:02}) {}",
        slot.pick, slot.round, slot.pick_in_round, slot.team
    )
}

fn player_line(p: &Player) -> String {
    let bye = p.bye_week.map(|b| b.to_string()).unwrap_or_else(|| "-".into());
    let mut line = format!(
        "{:>4}  {:<28} {:<3} {:<4} bye {}",
        p.rank,
        p.name,
        p.position.display_str(),
        p.team,
        bye
    );
    if let Some(pts) = p.proj_pts {
        let _ = write!(line, "  {pts:.1} pts");
    }
    if let Some(tier) = p.tier {
        let _ = write!(line, "  tier {tier}");
    }
    line
}

fn roster_line(entry: &RosterEntry) -> String {
    let pick = match entry.pick_in_round {
        Some(p) => format!("{}.{:02}", entry.round, p),
        None => format!("{}.--", entry.round),
    };
    let keeper = if entry.is_keeper { " [keeper]" } else { "" };
    format!(
        "{:<6} {:<28} {:<3} {}{}",
        pick,
        entry.player.name,
        entry.player.position.display_str(),
        entry.player.team,
        keeper
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use draftsheet_core::draft::pick::{Position, TeamId};
    use draftsheet_core::draft::pool::PlayerId;
    use draftsheet_core::draft::session::DraftSession;

    fn players(n: u32) -> Vec<Player> {
        (1..=n)
            .map(|i| Player {
                id: PlayerId(i),
                rank: i,
                name: format!("Player {i}"),
                team: "KC".into(),
                position: Position::RunningBack,
                bye_week: Some(10),
                proj_pts: None,
                tier: None,
            })
            .collect()
    }

    #[test]
    fn snapshot_shows_clock_and_last_pick() {
        let mut session = DraftSession::new(2, 2, players(6)).unwrap();
        session.draft_player("Player 1").unwrap();
        let text = render(&UiUpdate::Snapshot(Box::new(session.snapshot(2))));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "On the clock: pick 2 (round 1.02) Team 2 | 3 of 4 picks left | 5 players available"
        );
        assert_eq!(lines[1], "Up next: #3 Team 2, #4 Team 1");
        assert_eq!(lines[2], "Last pick: #1 Team 1 took Player 1");
    }

    #[test]
    fn completed_snapshot() {
        let mut session = DraftSession::new(1, 1, players(2)).unwrap();
        session.draft_player("Player 2").unwrap();
        let text = render(&UiUpdate::Snapshot(Box::new(session.snapshot(5))));
        assert!(text.starts_with("Draft complete: 1 teams x 1 rounds | 1 players undrafted"));
    }

    #[test]
    fn roster_marks_keepers() {
        let mut session = DraftSession::new(2, 2, players(6)).unwrap();
        session.add_keeper(TeamId(2), "Player 6", 2).unwrap();
        let entries = session.roster(TeamId(2)).unwrap().to_vec();
        let text = render(&UiUpdate::Roster {
            team: TeamId(2),
            entries,
        });
        assert!(text.starts_with("Team 2 roster:"));
        assert!(text.contains("2.--"));
        assert!(text.contains("[keeper]"));
    }

    #[test]
    fn rejected_and_empty_lists() {
        assert_eq!(
            render(&UiUpdate::Rejected {
                message: "nothing to undo".into()
            }),
            "error: nothing to undo"
        );
        assert_eq!(render(&UiUpdate::Upcoming(vec![])), "No picks remaining");
        assert_eq!(render(&UiUpdate::Available(vec![])), "No players available");
    }

    #[test]
    fn search_results_list_matches_with_projections() {
        let mut found = players(1);
        found[0].proj_pts = Some(287.5);
        found[0].tier = Some(2);
        let text = render(&UiUpdate::SearchResults {
            query: "player".into(),
            players: found,
        });
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Matches for `player`:");
        assert!(lines[1].contains("Player 1"));
        assert!(lines[1].ends_with("bye 10  287.5 pts  tier 2"));

        assert_eq!(
            render(&UiUpdate::SearchResults {
                query: "zzz".into(),
                players: vec![],
            }),
            "No players match `zzz`"
        );
    }

    #[test]
    fn json_lines_are_tagged_by_variant() {
        let line = render_json(&UiUpdate::Reset { teams: 8, rounds: 14 }).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["Reset"]["teams"], 8);
    }
}
