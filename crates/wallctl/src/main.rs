//! wallctl: command-line control for a networked video-wall appliance.
//!
//! Each invocation runs one operation against the appliance and exits, except
//! `listen`, which keeps the persistent channel open until Ctrl+C.
//!
//! # Usage
//!
//! ```text
//! wallctl [OPTIONS] <COMMAND>
//!
//! Commands:
//!   layouts              List layouts as "index  id  name"
//!   active               Print the local index of the active layout (-1 if unknown)
//!   select <INDEX>       Refresh the catalog, then activate layout INDEX
//!   mixer get            Print the mixer levels
//!   mixer set <LEVEL>..  Write the given mixer levels
//!   osd <SCREEN>         Show an on-screen display screen
//!   cursor <KEY>         Press a cursor key (up, down, left, right, select,
//!                        text-left, text-right, text-select, exit)
//!   listen               Print appliance events until Ctrl+C
//!   send <MESSAGE>       Send one text message on the persistent channel
//!
//! Options:
//!   --host <HOST>        Appliance host [env: WALL_HOST]
//!   --debug              Mirror every command to the debug port [env: WALL_DEBUG]
//!   --debug-port <PORT>  Debug mirror port [default: 8081]
//!   --timeout <SECS>     HTTP request timeout [default: 5]
//!   --config <PATH>      TOML config file
//! ```
//!
//! # Precedence
//!
//! Command-line flags (and their environment variables) override the config
//! file; the config file overrides built-in defaults.  `RUST_LOG` overrides
//! every other log level setting.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use wall_core::{CursorKey, MixerLevel, MixerLevels};
use wallctl::application::{ChannelHandler, DeviceController};
use wallctl::domain::{result_code, ControllerConfig, SessionEvent};
use wallctl::infrastructure::{build_controller, load_config, FileConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Video-wall appliance controller.
#[derive(Debug, Parser)]
#[command(
    name = "wallctl",
    about = "Control a networked video-wall appliance",
    version
)]
struct Cli {
    /// Appliance host name or address, optionally with a port.
    #[arg(long, env = "WALL_HOST")]
    host: Option<String>,

    /// Mirror every command to the debug port before sending it.
    #[arg(long, env = "WALL_DEBUG")]
    debug: bool,

    /// Port of the debug mirror on the appliance host.
    #[arg(long)]
    debug_port: Option<u16>,

    /// HTTP request timeout in seconds.
    #[arg(long)]
    timeout: Option<u64>,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the appliance's layouts.
    Layouts,
    /// Print the local index of the active layout.
    Active,
    /// Activate the layout at a local index.
    Select { index: usize },
    /// Read or write audio mixer levels.
    Mixer {
        #[command(subcommand)]
        action: MixerAction,
    },
    /// Show an on-screen display screen.
    Osd { screen: String },
    /// Press a cursor key.
    Cursor { key: CursorKey },
    /// Print persistent-channel events until Ctrl+C.
    Listen,
    /// Send one text message on the persistent channel.
    Send { message: String },
}

#[derive(Debug, Subcommand)]
enum MixerAction {
    /// Fetch and print the current levels.
    Get,
    /// Write levels, in channel order.
    Set {
        #[arg(required = true, allow_negative_numbers = true)]
        levels: Vec<MixerLevel>,
    },
}

impl Cli {
    /// Layers the command-line flags over the config file.
    fn into_controller_config(&self, file: &FileConfig) -> ControllerConfig {
        let mut config = file.controller_config();
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if self.debug {
            config.debug = true;
        }
        if let Some(port) = self.debug_port {
            config.debug_port = port;
        }
        if let Some(secs) = self.timeout {
            config.request_timeout = Duration::from_secs(secs);
        }
        config
    }

    /// Log filter used when `RUST_LOG` is not set.
    fn log_level(&self, file: &FileConfig) -> String {
        if self.debug {
            "debug".to_string()
        } else {
            file.logging.level.clone()
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => FileConfig::default(),
    };

    // ── Logging setup ─────────────────────────────────────────────────────────
    //
    // `RUST_LOG` wins; otherwise --debug or the config file picks the level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level(&file))),
        )
        .init();

    let config = cli.into_controller_config(&file);
    let (handler, events) = ChannelHandler::new();
    let controller = build_controller(config, Arc::new(handler))?;
    info!(
        "wallctl targeting {} (debug mirror {})",
        controller.config().rest_base(),
        if controller.debug_enabled() { "on" } else { "off" }
    );

    run(&controller, cli.command, events).await
}

async fn run(
    controller: &DeviceController,
    command: Command,
    mut events: UnboundedReceiver<SessionEvent>,
) -> anyhow::Result<()> {
    match command {
        Command::Layouts => {
            controller.list_layouts().await?;
            for (index, layout) in controller.layouts().await.iter().enumerate() {
                println!("{index}\t{}\t{}", layout.id, layout.name);
            }
        }
        Command::Active => {
            controller
                .list_layouts()
                .await
                .context("failed to refresh layout catalog")?;
            println!("{}", controller.active_layout_index().await);
        }
        Command::Select { index } => {
            controller
                .list_layouts()
                .await
                .context("failed to refresh layout catalog")?;
            controller.select_layout(index).await?;
            if let Some(name) = controller.layout_name(index).await {
                println!("selected {index}: {name}");
            }
        }
        Command::Mixer { action: MixerAction::Get } => {
            let levels = controller.get_mixer_levels().await?;
            println!("{}", format_levels(&levels));
        }
        Command::Mixer {
            action: MixerAction::Set { levels },
        } => {
            controller.set_mixer_cache(MixerLevels::new(levels)).await;
            controller.set_mixer_levels().await?;
        }
        Command::Osd { screen } => controller.show_screen(&screen).await?,
        Command::Cursor { key } => controller.cursor(key).await?,
        Command::Listen => listen(controller, &mut events).await?,
        Command::Send { message } => send_one(controller, &mut events, message).await?,
    }
    Ok(())
}

/// Prints received payloads until Ctrl+C or until the appliance closes the
/// channel.
async fn listen(
    controller: &DeviceController,
    events: &mut UnboundedReceiver<SessionEvent>,
) -> anyhow::Result<()> {
    controller.connect();
    expect_connected(events).await?;
    info!("listening on {}; press Ctrl+C to stop", controller.config().socket_url());

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::Received(Ok(received))) => {
                    println!("[{}] {}", received.opcode.code(), received.text);
                }
                Some(SessionEvent::Received(Err(e))) => {
                    info!("channel ended: {e}");
                    return Ok(());
                }
                Some(_) => {}
                None => return Ok(()),
            },
            signal = tokio::signal::ctrl_c() => {
                signal.context("failed to listen for Ctrl+C")?;
                info!("received Ctrl+C; disconnecting");
                break;
            }
        }
    }

    controller.disconnect().await?;
    Ok(())
}

async fn send_one(
    controller: &DeviceController,
    events: &mut UnboundedReceiver<SessionEvent>,
    message: String,
) -> anyhow::Result<()> {
    controller.connect();
    expect_connected(events).await?;

    controller.websocket_send(message).await?;
    while let Some(event) = events.recv().await {
        if let SessionEvent::Sent(result) = event {
            debug!("send completed with code {}", result_code(&result));
            result.context("send failed")?;
            break;
        }
    }

    controller.disconnect().await?;
    Ok(())
}

async fn expect_connected(events: &mut UnboundedReceiver<SessionEvent>) -> anyhow::Result<()> {
    while let Some(event) = events.recv().await {
        if let SessionEvent::Connected(result) = event {
            debug!("connect completed with code {}", result_code(&result));
            return result.context("failed to open persistent channel");
        }
    }
    bail!("session handler dropped before connect completed")
}

fn format_levels(levels: &MixerLevels) -> String {
    levels
        .as_slice()
        .iter()
        .map(|level| level.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_without_flags_uses_file_values() {
        // Arrange
        let cli = Cli::parse_from(["wallctl", "layouts"]);
        let mut file = FileConfig::default();
        file.appliance.host = "10.0.0.20".to_string();
        file.appliance.debug = true;

        // Act
        let config = cli.into_controller_config(&file);

        // Assert
        assert_eq!(config.host, "10.0.0.20");
        assert!(config.debug);
        assert_eq!(config.debug_port, 8081);
    }

    #[test]
    fn test_cli_flags_override_file() {
        let cli = Cli::parse_from([
            "wallctl",
            "--host",
            "wall.local",
            "--debug",
            "--debug-port",
            "9000",
            "--timeout",
            "30",
            "active",
        ]);

        let config = cli.into_controller_config(&FileConfig::default());

        assert_eq!(config.host, "wall.local");
        assert!(config.debug);
        assert_eq!(config.debug_host(), "wall.local:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_debug_flag_raises_log_level() {
        let file = FileConfig::default();
        assert_eq!(Cli::parse_from(["wallctl", "layouts"]).log_level(&file), "info");
        assert_eq!(
            Cli::parse_from(["wallctl", "--debug", "layouts"]).log_level(&file),
            "debug"
        );
    }

    #[test]
    fn test_select_parses_index() {
        let cli = Cli::parse_from(["wallctl", "select", "3"]);
        assert!(matches!(cli.command, Command::Select { index: 3 }));
    }

    #[test]
    fn test_mixer_set_accepts_negative_levels() {
        let cli = Cli::parse_from(["wallctl", "mixer", "set", "10", "-20", "30"]);
        match cli.command {
            Command::Mixer {
                action: MixerAction::Set { levels },
            } => assert_eq!(levels, vec![10, -20, 30]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_mixer_set_requires_levels() {
        assert!(Cli::try_parse_from(["wallctl", "mixer", "set"]).is_err());
    }

    #[test]
    fn test_cursor_parses_key_names() {
        let cli = Cli::parse_from(["wallctl", "cursor", "text-left"]);
        assert!(matches!(
            cli.command,
            Command::Cursor {
                key: CursorKey::TextLeft
            }
        ));
    }

    #[test]
    fn test_cursor_rejects_unknown_key() {
        assert!(Cli::try_parse_from(["wallctl", "cursor", "sideways"]).is_err());
    }

    #[test]
    fn test_format_levels_is_space_separated() {
        assert_eq!(format_levels(&MixerLevels::new(vec![10, -5, 0])), "10 -5 0");
    }
}
