// Draft sheet entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not the console)
// 2. Load config (seeding config/ from defaults/)
// 3. Import the player table
// 4. Build the draft session and apply configured keepers
// 5. Spawn the app loop and the console renderer
// 6. Read commands from stdin until `quit` or EOF
// 7. Wait for the app loop to drain

use draftsheet_cli::console;
use draftsheet_cli::render;
use draftsheet_core::app;
use draftsheet_core::config;
use draftsheet_core::players;

use anyhow::Context;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let json_output = std::env::args().skip(1).any(|arg| arg == "--json");

    // 1. Initialize tracing
    init_tracing()?;
    info!("Draft sheet starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} teams, {} rounds, {} keepers",
        config.draft.teams,
        config.draft.rounds,
        config.keepers.len()
    );

    // 3. Import players
    let player_list = players::load_players(&config.data.players)
        .with_context(|| format!("failed to load players from {}", config.data.players.display()))?;

    // 4. Build the session
    let state = app::AppState::from_config(&config, player_list)
        .context("failed to set up the draft")?;

    // 5. Channels and tasks
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, mut ui_rx) = mpsc::channel(256);

    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, ui_tx, state).await {
            error!("Application loop error: {}", e);
        }
    });

    let render_handle = tokio::spawn(async move {
        while let Some(update) = ui_rx.recv().await {
            if json_output {
                match render::render_json(&update) {
                    Ok(line) => println!("{line}"),
                    Err(e) => error!("Failed to serialize update: {}", e),
                }
            } else {
                println!("{}\n", render::render(&update));
            }
        }
    });

    if !json_output {
        println!(
            "draftsheet: {} teams x {} rounds. Type `help` for commands.\n",
            config.draft.teams, config.draft.rounds
        );
    }

    // 6. Command input
    let stdin = BufReader::new(tokio::io::stdin());
    if let Err(e) = console::run(stdin, &cmd_tx).await {
        error!("Failed to read stdin: {}", e);
    }
    drop(cmd_tx);

    // 7. Cleanup: wait for the app loop and renderer (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
        let _ = render_handle.await;
    })
    .await;

    info!("Draft sheet shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the console is used for the draft).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("draftsheet.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftsheet=info,draftsheet_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
