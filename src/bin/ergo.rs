//! Ergo Jr command client
//!
//! Command-line interface to a Poppy Ergo Jr's REST API. Each subcommand
//! maps to one façade operation.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use poppy_ergo::{blocks, Config, ErgoService};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ergo")]
#[command(about = "Send commands to a Poppy Ergo Jr")]
#[command(version)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Robot URL override, e.g. http://poppy.local:8080
    #[arg(long, global = true)]
    url: Option<String>,

    /// Output format: text, json
    #[arg(long, default_value = "text", global = true)]
    format: String,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the robot answers
    Test,
    /// List motor names reported by the robot
    Names,
    /// Read a register from motors
    Get {
        register: String,
        /// Motors, comma separated (default: all)
        #[arg(default_value = "")]
        motors: String,
    },
    /// Move motors to a position in degrees
    Goto {
        motors: String,
        #[arg(allow_negative_numbers = true)]
        position: f64,
        /// Movement duration in seconds
        #[arg(default_value = "2")]
        duration: f64,
        /// Wait for the movement duration before returning
        #[arg(short, long)]
        wait: bool,
    },
    /// Set compliance from a localized label (e.g. souple, rigide)
    Compliance { motors: String, state: String },
    /// Write a register on motors
    Register {
        register: String,
        motors: String,
        value: String,
    },
    /// Set LED color from a localized label (e.g. rouge)
    Led {
        color: String,
        #[arg(default_value = "")]
        motors: String,
    },
    /// Start recording a move
    Record {
        name: String,
        #[arg(default_value = "")]
        motors: String,
    },
    /// Stop recording a move
    StopRecord { name: String },
    /// Delete a recorded move
    DeleteMove { name: String },
    /// Play a recorded move
    Play {
        name: String,
        #[arg(long)]
        speed: Option<f64>,
    },
    /// Stop playing a move
    StopMove { name: String },
    /// Apply a move command (start, pause, stop, restart) to a primitive
    Move { command: String, name: String },
    /// Start a behavior
    StartBehavior { name: String },
    /// Stop a behavior
    StopBehavior { name: String },
    /// Print the block table for the host environment
    Blocks,
    /// Invoke a block by operation name with raw arguments
    Call {
        operation: String,
        args: Vec<String>,
    },
    /// Stream robot state from the status channel
    #[cfg(feature = "status-channel")]
    Monitor {
        /// Seconds between state prints
        #[arg(long, default_value = "1")]
        interval: u64,
    },
}

impl Args {
    fn load_config(&self) -> Result<Config> {
        let path = self
            .config
            .clone()
            .or_else(|| std::env::var("POPPY_CONFIG").ok());
        match path {
            Some(path) => Config::load_from_path(&path)
                .with_context(|| format!("Failed to load config {}", path)),
            None => Ok(Config::default()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "poppy_ergo=debug,ergo=debug"
    } else {
        "poppy_ergo=info,ergo=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = args.load_config()?;
    let service = ErgoService::new(&config);
    if let Some(url) = &args.url {
        service.commands().set_robot_url(url);
    }

    match run(&args, &service).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{:#}", e);
            Err(e)
        }
    }
}

async fn run(args: &Args, service: &ErgoService) -> Result<()> {
    let robot = service.commands();
    match &args.command {
        Commands::Test => {
            let reachable = robot.test_connection().await;
            let report = serde_json::json!({ "url": robot.robot_url(), "reachable": reachable });
            print_value(args, &report);
            if !reachable {
                anyhow::bail!("Robot not reachable at {}", robot.robot_url());
            }
        }
        Commands::Names => {
            let names = robot.get_motors_names().await.context("Failed to list motors")?;
            print_list(args, &names);
        }
        Commands::Get { register, motors } => {
            let values = robot
                .get_motors_register(motors, register)
                .await
                .with_context(|| format!("Failed to read {}", register))?;
            print_list(args, &values);
        }
        Commands::Goto { motors, position, duration, wait } => {
            let motion = robot
                .set_motors_position_and_wait(motors, *position, *duration, *wait)
                .await
                .context("Goto failed")?;
            info!("Goto accepted");
            if motion.will_settle() {
                motion.settled().await;
                info!("Movement presumed complete");
            }
        }
        Commands::Compliance { motors, state } => {
            robot.set_motors_compliance(motors, state).await.context("Failed to set compliance")?;
        }
        Commands::Register { register, motors, value } => {
            robot
                .set_motors_register(motors, register, value)
                .await
                .with_context(|| format!("Failed to write {}", register))?;
        }
        Commands::Led { color, motors } => {
            robot.set_led_color(motors, color).await.context("Failed to set LED color")?;
        }
        Commands::Record { name, motors } => {
            robot.create_and_record_move(name, motors).await.context("Failed to start recording")?;
        }
        Commands::StopRecord { name } => {
            robot.stop_move_record(name).await.context("Failed to stop recording")?;
        }
        Commands::DeleteMove { name } => {
            robot.delete_move(name).await.context("Failed to delete move")?;
        }
        Commands::Play { name, speed } => {
            robot.play_move(name, *speed).await.context("Failed to play move")?;
        }
        Commands::StopMove { name } => {
            robot.stop_move(name).await.context("Failed to stop move")?;
        }
        Commands::Move { command, name } => {
            robot.update_move(command, name).await.context("Move command failed")?;
        }
        Commands::StartBehavior { name } => {
            robot.start_behavior(name).await.context("Failed to start behavior")?;
        }
        Commands::StopBehavior { name } => {
            robot.stop_behavior(name).await.context("Failed to stop behavior")?;
        }
        Commands::Blocks => {
            let session = service.session();
            let descriptor = blocks::descriptor(&session.locale(), session.motors());
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Commands::Call { operation, args: call_args } => {
            let output = blocks::invoke(robot, operation, call_args)
                .await
                .with_context(|| format!("Block {} failed", operation))?;
            print_value(args, &serde_json::to_value(&output)?);
        }
        #[cfg(feature = "status-channel")]
        Commands::Monitor { interval } => monitor(args, service, *interval).await?,
    }
    Ok(())
}

#[cfg(feature = "status-channel")]
async fn monitor(args: &Args, service: &ErgoService, interval: u64) -> Result<()> {
    use poppy_ergo::ChannelState;
    use std::time::Duration;

    let status = service.status();
    let mut state = status.subscribe();
    status.connect();
    state
        .wait_for(|s| *s != ChannelState::Connecting)
        .await
        .context("Status channel dropped")?;
    if status.state() != ChannelState::Connected {
        anyhow::bail!("Could not connect to {}", status.url());
    }
    info!("Monitoring {} (Ctrl+C to stop)", status.url());

    let mut ticker = tokio::time::interval(Duration::from_secs(interval.max(1)));
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = state.changed() => {
                if changed.is_err() || *state.borrow() == ChannelState::Disconnected {
                    info!("Status channel closed");
                    return Ok(());
                }
            }
            _ = ticker.tick() => {
                if let Some(snapshot) = status.latest_snapshot() {
                    print_value(args, &serde_json::to_value(&snapshot)?);
                }
            }
        }
    }

    service.shutdown();
    let _ = tokio::time::timeout(
        Duration::from_secs(2),
        state.wait_for(|s| *s == ChannelState::Disconnected),
    )
    .await;
    Ok(())
}

fn print_list(args: &Args, values: &[String]) {
    if args.format == "json" {
        println!("{}", serde_json::json!(values));
    } else {
        for value in values {
            println!("{}", value);
        }
    }
}

fn print_value(args: &Args, value: &serde_json::Value) {
    if args.format == "json" {
        println!("{}", value);
    } else {
        match serde_json::to_string_pretty(value) {
            Ok(text) => println!("{}", text),
            Err(_) => println!("{}", value),
        }
    }
}
