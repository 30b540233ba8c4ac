// Application orchestrator.
//
// The command loop exclusively owns the draft session. Commands arrive over
// an mpsc channel and are applied one at a time; every result is pushed to
// the front end as a `UiUpdate`.

use std::path::PathBuf;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::config::Config;
use crate::draft::pick::TeamId;
use crate::draft::pool::Player;
use crate::draft::session::DraftSession;
use crate::export;
use crate::protocol::{UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub session: DraftSession,
    /// Upcoming picks included in each snapshot.
    pub lookahead: usize,
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(session: DraftSession, lookahead: usize, export_dir: PathBuf) -> Self {
        AppState {
            session,
            lookahead,
            export_dir,
        }
    }

    pub fn from_config(config: &Config, players: Vec<Player>) -> anyhow::Result<Self> {
        let session = build_session(config, players)?;
        Ok(AppState::new(
            session,
            config.draft.lookahead,
            config.export_dir.clone(),
        ))
    }
}

/// Create a session from the configured dimensions and apply the configured
/// keepers in file order.
pub fn build_session(config: &Config, players: Vec<Player>) -> anyhow::Result<DraftSession> {
    let mut session = DraftSession::new(config.draft.teams, config.draft.rounds, players)
        .context("invalid draft settings")?;
    for keeper in &config.keepers {
        session
            .add_keeper(TeamId(keeper.team), &keeper.player, keeper.round)
            .with_context(|| {
                format!(
                    "failed to apply keeper {} for team {} in round {}",
                    keeper.player, keeper.team, keeper.round
                )
            })?;
    }
    Ok(session)
}

// ---------------------------------------------------------------------------
// Main event loop
// ---------------------------------------------------------------------------

/// Run the command loop until `Quit` arrives or the command channel closes.
///
/// Publishes an initial snapshot so the front end has something to show.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");
    send_snapshot(&state, &ui_tx).await;

    loop {
        match cmd_rx.recv().await {
            Some(UserCommand::Quit) => {
                info!("Quit command received, shutting down");
                break;
            }
            Some(cmd) => {
                handle_user_command(&mut state, cmd, &ui_tx).await;
            }
            None => {
                info!("Command channel closed, shutting down");
                break;
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

async fn handle_user_command(
    state: &mut AppState,
    cmd: UserCommand,
    ui_tx: &mpsc::Sender<UiUpdate>,
) {
    match cmd {
        UserCommand::Draft { player } => match state.session.draft_player(&player) {
            Ok(pick) => {
                let _ = ui_tx.send(UiUpdate::Picked(pick)).await;
                send_snapshot(state, ui_tx).await;
            }
            Err(e) => reject(ui_tx, e).await,
        },
        UserCommand::Undo => match state.session.undo_last_pick() {
            Ok(undone) => {
                let _ = ui_tx.send(UiUpdate::Undone(undone)).await;
                send_snapshot(state, ui_tx).await;
            }
            Err(e) => reject(ui_tx, e).await,
        },
        UserCommand::AddKeeper {
            team,
            player,
            round,
        } => match state.session.add_keeper(team, &player, round) {
            Ok(reservation) => {
                let _ = ui_tx.send(UiUpdate::KeeperAdded(reservation)).await;
                send_snapshot(state, ui_tx).await;
            }
            Err(e) => reject(ui_tx, e).await,
        },
        UserCommand::ResetDraft { teams, rounds } => {
            match state.session.reset_draft(teams, rounds) {
                Ok(()) => {
                    let _ = ui_tx.send(UiUpdate::Reset { teams, rounds }).await;
                    send_snapshot(state, ui_tx).await;
                }
                Err(e) => reject(ui_tx, e).await,
            }
        }
        UserCommand::Status => send_snapshot(state, ui_tx).await,
        UserCommand::Upcoming { count } => {
            let slots = state.session.upcoming(count);
            let _ = ui_tx.send(UiUpdate::Upcoming(slots)).await;
        }
        UserCommand::Available { position, limit } => {
            let players = state
                .session
                .pool()
                .available(position, limit)
                .into_iter()
                .cloned()
                .collect();
            let _ = ui_tx.send(UiUpdate::Available(players)).await;
        }
        UserCommand::Search { query, limit } => {
            let players = state
                .session
                .pool()
                .search(&query, limit)
                .into_iter()
                .cloned()
                .collect();
            let _ = ui_tx.send(UiUpdate::SearchResults { query, players }).await;
        }
        UserCommand::Roster { team } => match state.session.roster(team) {
            Ok(entries) => {
                let entries = entries.to_vec();
                let _ = ui_tx.send(UiUpdate::Roster { team, entries }).await;
            }
            Err(e) => reject(ui_tx, e).await,
        },
        UserCommand::Export { dir } => {
            let dir = dir.unwrap_or_else(|| state.export_dir.clone());
            match export::export_rosters(&state.session, &dir) {
                Ok(files) => {
                    let _ = ui_tx.send(UiUpdate::Exported(files)).await;
                }
                Err(e) => reject(ui_tx, e).await,
            }
        }
        // Handled by the loop before dispatch.
        UserCommand::Quit => {}
    }
}

async fn send_snapshot(state: &AppState, ui_tx: &mpsc::Sender<UiUpdate>) {
    let snapshot = state.session.snapshot(state.lookahead);
    let _ = ui_tx.send(UiUpdate::Snapshot(Box::new(snapshot))).await;
}

async fn reject(ui_tx: &mpsc::Sender<UiUpdate>, err: impl std::fmt::Display) {
    let message = err.to_string();
    warn!("Command rejected: {}", message);
    let _ = ui_tx.send(UiUpdate::Rejected { message }).await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataConfig, DraftConfig, KeeperConfig};
    use crate::draft::pick::Position;
    use crate::draft::pool::tests::player;

    fn players(n: u32) -> Vec<Player> {
        (1..=n)
            .map(|i| player(i, &format!("Player {i}"), Position::ALL[(i as usize) % 6]))
            .collect()
    }

    fn config(teams: u32, rounds: u32, keepers: Vec<KeeperConfig>) -> Config {
        Config {
            draft: DraftConfig {
                teams,
                rounds,
                lookahead: 3,
            },
            data: DataConfig {
                players: PathBuf::from("unused.csv"),
            },
            export_dir: std::env::temp_dir().join("draftsheet_app_exports"),
            keepers,
        }
    }

    /// Spawn the loop and return its channels. The initial snapshot is
    /// consumed before returning.
    async fn start(
        state: AppState,
    ) -> (
        mpsc::Sender<UserCommand>,
        mpsc::Receiver<UiUpdate>,
        tokio::task::JoinHandle<anyhow::Result<()>>,
    ) {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (ui_tx, mut ui_rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(cmd_rx, ui_tx, state));
        match ui_rx.recv().await {
            Some(UiUpdate::Snapshot(_)) => {}
            other => panic!("expected initial snapshot, got {other:?}"),
        }
        (cmd_tx, ui_rx, handle)
    }

    fn state(teams: u32, rounds: u32) -> AppState {
        AppState::from_config(&config(teams, rounds, vec![]), players(teams * rounds + 10))
            .unwrap()
    }

    #[test]
    fn build_session_applies_keepers() {
        let cfg = config(
            4,
            3,
            vec![KeeperConfig {
                team: 1,
                player: "Player 2".into(),
                round: 1,
            }],
        );
        let session = build_session(&cfg, players(20)).unwrap();
        assert_eq!(session.keepers().len(), 1);
        assert_eq!(session.settings().current_pick, 2);
        assert!(session.pool().find_by_name("Player 2").is_none());
    }

    #[test]
    fn build_session_reports_unknown_keeper() {
        let cfg = config(
            4,
            3,
            vec![KeeperConfig {
                team: 1,
                player: "Nobody".into(),
                round: 1,
            }],
        );
        let err = build_session(&cfg, players(20)).unwrap_err();
        assert!(format!("{err:#}").contains("Nobody"));
    }

    #[tokio::test]
    async fn draft_publishes_pick_then_snapshot() {
        let (cmd_tx, mut ui_rx, handle) = start(state(2, 2)).await;

        cmd_tx
            .send(UserCommand::Draft {
                player: "player 1".into(),
            })
            .await
            .unwrap();

        match ui_rx.recv().await {
            Some(UiUpdate::Picked(pick)) => {
                assert_eq!(pick.pick_number, 1);
                assert_eq!(pick.team, TeamId(1));
                assert_eq!(pick.player_name, "Player 1");
            }
            other => panic!("expected Picked, got {other:?}"),
        }
        match ui_rx.recv().await {
            Some(UiUpdate::Snapshot(snapshot)) => {
                assert_eq!(snapshot.settings.current_pick, 2);
                assert_eq!(snapshot.upcoming.len(), 2);
            }
            other => panic!("expected Snapshot, got {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn rejected_command_keeps_loop_running() {
        let (cmd_tx, mut ui_rx, handle) = start(state(2, 2)).await;

        cmd_tx.send(UserCommand::Undo).await.unwrap();
        match ui_rx.recv().await {
            Some(UiUpdate::Rejected { message }) => assert!(message.contains("undo")),
            other => panic!("expected Rejected, got {other:?}"),
        }

        cmd_tx
            .send(UserCommand::Draft {
                player: "Nobody".into(),
            })
            .await
            .unwrap();
        assert!(matches!(
            ui_rx.recv().await,
            Some(UiUpdate::Rejected { .. })
        ));

        cmd_tx.send(UserCommand::Status).await.unwrap();
        match ui_rx.recv().await {
            Some(UiUpdate::Snapshot(snapshot)) => assert_eq!(snapshot.settings.current_pick, 1),
            other => panic!("expected Snapshot, got {other:?}"),
        }

        drop(cmd_tx);
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn queries_do_not_mutate() {
        let (cmd_tx, mut ui_rx, handle) = start(state(3, 2)).await;

        cmd_tx
            .send(UserCommand::Available {
                position: None,
                limit: 3,
            })
            .await
            .unwrap();
        match ui_rx.recv().await {
            Some(UiUpdate::Available(list)) => {
                let ranks: Vec<u32> = list.iter().map(|p| p.rank).collect();
                assert_eq!(ranks, vec![1, 2, 3]);
            }
            other => panic!("expected Available, got {other:?}"),
        }

        cmd_tx.send(UserCommand::Upcoming { count: 4 }).await.unwrap();
        match ui_rx.recv().await {
            Some(UiUpdate::Upcoming(slots)) => {
                let picks: Vec<u32> = slots.iter().map(|s| s.pick).collect();
                assert_eq!(picks, vec![2, 3, 4, 5]);
            }
            other => panic!("expected Upcoming, got {other:?}"),
        }

        cmd_tx
            .send(UserCommand::Search {
                query: "player 1".into(),
                limit: 3,
            })
            .await
            .unwrap();
        match ui_rx.recv().await {
            Some(UiUpdate::SearchResults { query, players }) => {
                assert_eq!(query, "player 1");
                let names: Vec<&str> = players.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["Player 1", "Player 10", "Player 11"]);
            }
            other => panic!("expected SearchResults, got {other:?}"),
        }

        cmd_tx
            .send(UserCommand::Roster { team: TeamId(9) })
            .await
            .unwrap();
        assert!(matches!(
            ui_rx.recv().await,
            Some(UiUpdate::Rejected { .. })
        ));

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn keeper_undo_and_reset_flow() {
        let (cmd_tx, mut ui_rx, handle) = start(state(2, 3)).await;

        cmd_tx
            .send(UserCommand::AddKeeper {
                team: TeamId(2),
                player: "Player 5".into(),
                round: 1,
            })
            .await
            .unwrap();
        assert!(matches!(
            ui_rx.recv().await,
            Some(UiUpdate::KeeperAdded(_))
        ));
        assert!(matches!(ui_rx.recv().await, Some(UiUpdate::Snapshot(_))));

        // Keepers on record block a reset.
        cmd_tx
            .send(UserCommand::ResetDraft { teams: 4, rounds: 4 })
            .await
            .unwrap();
        assert!(matches!(
            ui_rx.recv().await,
            Some(UiUpdate::Rejected { .. })
        ));

        cmd_tx
            .send(UserCommand::Draft {
                player: "Player 1".into(),
            })
            .await
            .unwrap();
        assert!(matches!(ui_rx.recv().await, Some(UiUpdate::Picked(_))));
        match ui_rx.recv().await {
            // Pick 2 (Team 2, round 1) is the keeper slot.
            Some(UiUpdate::Snapshot(snapshot)) => assert_eq!(snapshot.settings.current_pick, 3),
            other => panic!("expected Snapshot, got {other:?}"),
        }

        cmd_tx.send(UserCommand::Undo).await.unwrap();
        match ui_rx.recv().await {
            Some(UiUpdate::Undone(undone)) => {
                assert_eq!(undone.team, TeamId(1));
                assert_eq!(undone.entry.player.name, "Player 1");
            }
            other => panic!("expected Undone, got {other:?}"),
        }
        match ui_rx.recv().await {
            Some(UiUpdate::Snapshot(snapshot)) => assert_eq!(snapshot.settings.current_pick, 1),
            other => panic!("expected Snapshot, got {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn reset_before_anything_recorded() {
        let (cmd_tx, mut ui_rx, handle) = start(state(2, 2)).await;

        cmd_tx
            .send(UserCommand::ResetDraft { teams: 3, rounds: 2 })
            .await
            .unwrap();
        assert_eq!(
            ui_rx.recv().await,
            Some(UiUpdate::Reset { teams: 3, rounds: 2 })
        );
        match ui_rx.recv().await {
            Some(UiUpdate::Snapshot(snapshot)) => {
                assert_eq!(snapshot.total_picks, 6);
                assert_eq!(snapshot.teams.len(), 3);
            }
            other => panic!("expected Snapshot, got {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn export_uses_configured_dir_by_default() {
        let dir = std::env::temp_dir().join("draftsheet_app_export_default");
        let _ = std::fs::remove_dir_all(&dir);
        let mut app = state(2, 2);
        app.export_dir = dir.clone();
        let (cmd_tx, mut ui_rx, handle) = start(app).await;

        cmd_tx.send(UserCommand::Export { dir: None }).await.unwrap();
        match ui_rx.recv().await {
            Some(UiUpdate::Exported(files)) => {
                assert_eq!(files, vec![dir.join("team_1.csv"), dir.join("team_2.csv")]);
            }
            other => panic!("expected Exported, got {other:?}"),
        }

        cmd_tx.send(UserCommand::Quit).await.unwrap();
        handle.await.unwrap().unwrap();
        let _ = std::fs::remove_dir_all(&dir);
    }
}
