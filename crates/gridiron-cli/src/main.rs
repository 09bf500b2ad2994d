// Gridiron draft tracker entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Resolve the working directory and load config
// 3. Load the player catalog
// 4. Build the draft session
// 5. Spawn a watcher that logs every published state
// 6. Run the line-command loop on stdin until `quit` or EOF

mod commands;
mod display;
mod players;

use std::path::{Path, PathBuf};

use anyhow::Context;
use gridiron_core::config::{self, Config};
use gridiron_core::draft::order;
use gridiron_core::draft::scarcity::positional_supply;
use gridiron_core::draft::snapshot::DraftSnapshot;
use gridiron_core::{DraftEngine, DraftSession, PlayerFilter, PlayerPool};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use commands::{parse_command, Command, HELP};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Gridiron starting up");

    let base_dir = resolve_base_dir()?;
    if let Some(path) = config::seed_league_config(&base_dir).context("failed to seed config")? {
        info!("Seeded {}", path.display());
    }
    let config = config::load_config_from(&base_dir).context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, {:?}, {} rounds",
        config.league.name,
        config.league.num_teams,
        config.league.draft_type,
        config.league.rounds()
    );

    let players_path = base_dir.join(&config.data.players);
    let players = players::load_players(&players_path)
        .with_context(|| format!("failed to load players from {}", players_path.display()))?;
    info!("Loaded {} players", players.len());
    let pool = PlayerPool::new(players).context("invalid player catalog")?;

    let engine = DraftEngine::new(config.league.clone(), pool).context("failed to start draft")?;
    let session = DraftSession::new(engine);

    let watcher = tokio::spawn(log_published_states(session.clone()));

    println!("{}", display::status(&session.view()));
    println!("Type `help` for commands.");

    let result = run_repl(&session, &base_dir, &config).await;
    watcher.abort();
    if let Err(e) = &result {
        error!("Command loop error: {:#}", e);
    }

    info!("Gridiron shut down cleanly");
    result
}

/// Initialize tracing to log to a file (the terminal belongs to the REPL).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("gridiron.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gridiron=info,warn")),
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

/// The current directory when it holds `config/` or `defaults/`, otherwise
/// the per-user config directory.
fn resolve_base_dir() -> anyhow::Result<PathBuf> {
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    if cwd.join("config").is_dir() || cwd.join("defaults").is_dir() {
        return Ok(cwd);
    }
    let dirs = directories::ProjectDirs::from("", "", "gridiron")
        .context("no home directory to hold gridiron config")?;
    let base = dirs.config_dir().to_path_buf();
    info!("Using per-user directory {}", base.display());
    Ok(base)
}

async fn log_published_states(session: DraftSession) {
    let mut rx = session.subscribe();
    while rx.changed().await.is_ok() {
        let state = rx.borrow_and_update().clone();
        let progress = state.progress();
        debug!(
            "Draft state published: {} of {} picks made, clock {}",
            progress.picks_made,
            progress.total_picks,
            state.clock()
        );
    }
}

async fn run_repl(session: &DraftSession, base_dir: &Path, config: &Config) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let snapshot_path = base_dir.join(&config.data.snapshot);

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await.context("failed to read stdin")? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        match execute(command, session, &snapshot_path) {
            Ok(output) => println!("{output}"),
            Err(e) => println!("error: {e:#}"),
        }
    }
    Ok(())
}

/// Run one command and return the text to print.
fn execute(command: Command, session: &DraftSession, snapshot_path: &Path) -> anyhow::Result<String> {
    let view = session.view();
    let me = view.config().my_position;
    let output = match command {
        Command::Pick { team, player } => {
            let team = match team.or_else(|| view.on_the_clock()) {
                Some(team) => team,
                None => return Err(gridiron_core::DraftError::DraftComplete.into()),
            };
            let outcome = session.make_pick(team, player)?;
            display::pick_outcome(&session.view(), &outcome)
        }
        Command::Undo => {
            let pick = session.undo_last_pick()?;
            let view = session.view();
            let name = view
                .pool()
                .lookup(pick.player_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|_| pick.player_id.to_string());
            format!(
                "Undid pick {}: {} returns to the pool\n{}",
                order::pick_label(pick.overall, view.config().num_teams),
                name,
                display::status(&view)
            )
        }
        Command::Status => display::status(&view),
        Command::Next { team } => {
            let team = team.unwrap_or(me);
            let picks = view.upcoming_picks(team, 5)?;
            display::upcoming(&view, team, &picks)
        }
        Command::Needs { team } => display::needs(&view, team.unwrap_or(me)),
        Command::Byes { team } => display::byes(&view, team.unwrap_or(me)),
        Command::Available { position, limit } => {
            let mut filter = PlayerFilter::default();
            if let Some(pos) = position {
                filter = filter.position(pos);
            }
            display::player_table(view.available(&filter).take(limit))
        }
        Command::Find(text) => {
            let filter = PlayerFilter::default().name_contains(&text);
            display::player_table(view.available(&filter))
        }
        Command::Board { round } => {
            let round = round
                .or_else(|| view.progress().current_round)
                .unwrap_or_else(|| view.config().rounds());
            display::board(&view, round)
        }
        Command::Supply => display::supply(&positional_supply(&view)),
        Command::Save => {
            let json = session.export().to_json()?;
            if let Some(parent) = snapshot_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(snapshot_path, json)
                .with_context(|| format!("failed to write {}", snapshot_path.display()))?;
            info!("Saved draft snapshot to {}", snapshot_path.display());
            format!("Saved {} picks to {}", view.picks().len(), snapshot_path.display())
        }
        Command::Load => {
            let text = std::fs::read_to_string(snapshot_path)
                .with_context(|| format!("failed to read {}", snapshot_path.display()))?;
            let snapshot = DraftSnapshot::from_json(&text)?;
            session.restore(&snapshot)?;
            format!(
                "Loaded {} picks from {}\n{}",
                snapshot.picks.len(),
                snapshot_path.display(),
                display::status(&session.view())
            )
        }
        Command::Help => HELP.to_string(),
        Command::Quit => String::new(),
    };
    Ok(output)
}
