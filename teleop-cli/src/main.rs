use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use teleop_client::{ConsoleConfig, ConsoleExit, OperatorConsole, RobotConsole, RobotExit};
use teleop_core::utils::{DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2};
use teleop_core::{IceServerConfig, RoomName};
use teleop_server::{SignalingService, router};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RESTART_DELAY: Duration = Duration::from_secs(1);

#[derive(Parser)]
#[command(name = "teleop", version, about = "Robot teleoperation session tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct SessionArgs {
    /// TOML console configuration.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    room: Option<String>,

    /// Rendezvous websocket url.
    #[arg(long)]
    url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the rendezvous relay.
    Rendezvous {
        #[arg(long, default_value = "0.0.0.0:3000")]
        addr: SocketAddr,
    },
    /// Join a room as the operator. Lines on stdin are console input.
    Operator(SessionArgs),
    /// Join a room as a simulated robot.
    Robot(SessionArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Rendezvous { addr } => run_rendezvous(addr).await,
        Commands::Operator(args) => run_operator(load_config(args)?).await,
        Commands::Robot(args) => run_robot(load_config(args)?).await,
    }
}

fn load_config(args: SessionArgs) -> Result<ConsoleConfig> {
    let mut config = match &args.config {
        Some(path) => ConsoleConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => ConsoleConfig::default(),
    };
    if let Some(room) = args.room {
        config.room = RoomName::from(room);
    }
    if let Some(url) = args.url {
        config.signaling_url = url;
    }
    Ok(config.validated()?)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Returns false when Ctrl-C arrives during the pause.
async fn pause_before_restart() -> bool {
    tokio::select! {
        _ = shutdown_signal() => false,
        _ = tokio::time::sleep(RESTART_DELAY) => true,
    }
}

async fn run_rendezvous(addr: SocketAddr) -> Result<()> {
    println!("{}", "📡 Starting rendezvous...".green().bold());

    let service = SignalingService::new(vec![IceServerConfig {
        urls: vec![DEFAULT_STUN_ADDR.to_owned(), DEFAULT_STUN_ADDR_2.to_owned()],
        username: None,
        credential: None,
    }]);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    println!("   🔌 Listening on ws://{}/ws", addr);
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Rendezvous server failed")?;

    println!("{}", "👋 Rendezvous stopped".yellow());
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

async fn run_operator(config: ConsoleConfig) -> Result<()> {
    println!(
        "{} {}",
        "🎮 Operator console for room".green().bold(),
        config.room.to_string().cyan()
    );
    println!("   Type a voice command, `speed <0..1>` or `mode <action-mode>`.");

    let mut input = spawn_stdin_reader();
    loop {
        let console = OperatorConsole::new(config.clone());
        match console.run(shutdown_signal(), &mut input).await? {
            ConsoleExit::Hangup => break,
            ConsoleExit::Reload => {
                println!("{}", "🔄 Session did not connect in time, reloading".yellow());
            }
            ConsoleExit::Closed => {
                println!("{}", "🔌 Session closed, rejoining".yellow());
            }
        }
        if !pause_before_restart().await {
            break;
        }
    }

    println!("{}", "👋 Hung up".green());
    Ok(())
}

async fn run_robot(config: ConsoleConfig) -> Result<()> {
    println!(
        "{} {}",
        "🤖 Simulated robot for room".green().bold(),
        config.room.to_string().cyan()
    );

    loop {
        let console = RobotConsole::new(config.clone());
        match console.run(shutdown_signal()).await? {
            RobotExit::Hangup => break,
            exit => info!(?exit, "Robot session ended, rejoining"),
        }
        if !pause_before_restart().await {
            break;
        }
    }

    println!("{}", "👋 Robot stopped".green());
    Ok(())
}
