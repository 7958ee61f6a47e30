//! invidplay - search Invidious and play or download results
//!
//! # Usage
//!
//! ```bash
//! # Interactive session
//! invidplay
//!
//! # CLI mode (for automation)
//! invidplay search "daft punk"
//! invidplay play dQw4w9WgXcQ
//! invidplay download dQw4w9WgXcQ --format 3
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use invidplay::cli::{Cli, Command, ExitCode, Output};
use invidplay::commands;
use invidplay::config::Config;
use invidplay::repl;
use invidplay::stream::{Downloader, LocalPlayer};
use invidplay::{InvidiousClient, Session, SystemRunner};

// Everything runs on one thread: each request and each child process is
// awaited before the next step starts.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = run(cli).await?;
    std::process::exit(exit_code.into());
}

/// Logs go to stderr; RUST_LOG overrides the default level
fn init_tracing(verbose: bool) {
    let default = if verbose { "invidplay=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the session and dispatch to CLI or interactive mode
async fn run(cli: Cli) -> Result<ExitCode> {
    let output = if cli.is_cli_mode() {
        Output::new(&cli)
    } else {
        Output::interactive(cli.quiet)
    };
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    if let Some(Command::Config(cmd)) = &cli.command {
        let effective = config.effective(
            cli.player.as_deref(),
            cli.instance.as_deref(),
            cli.download_dir.as_deref(),
        );
        return Ok(commands::config_cmd(*cmd, &effective, cli.config.as_deref(), &output));
    }

    let player_cmd = config.player_command(cli.player.as_deref());
    let Some(player) = LocalPlayer::from_command_line(&player_cmd) else {
        return Ok(output.error("Player command is empty", ExitCode::InvalidArgs));
    };

    // Startup precondition: nothing can be played without the player
    if cli.needs_player() && !player.is_available() {
        return Ok(output.error(
            format!(
                "Cannot find player '{}'. Install it or set {}.",
                player.player_type().command(),
                invidplay::config::PLAYER_ENV
            ),
            ExitCode::PlayerNotFound,
        ));
    }
    tracing::debug!(player = %player.player_type(), "using player");

    let client = InvidiousClient::with_base_url(config.instance_url(cli.instance.as_deref()));
    tracing::debug!(instance = client.base_url(), "using instance");
    let downloader = Downloader::new(
        config.downloader_program(),
        config.download_dir(cli.download_dir.as_deref()),
    );
    let mut session = Session::new(client, player, downloader, SystemRunner);

    let code = match cli.command {
        Some(Command::Search(cmd)) => commands::search_cmd(cmd, &mut session, &output).await,
        Some(Command::Info(cmd)) => commands::info_cmd(cmd, &session, &output).await,
        Some(Command::Formats(cmd)) => commands::formats_cmd(cmd, &session, &output).await,
        Some(Command::Play(cmd)) => commands::play_cmd(cmd, &session, &output).await,
        Some(Command::Download(cmd)) => commands::download_cmd(cmd, &session, &output).await,
        Some(Command::Config(_)) => ExitCode::Success,
        None => {
            let stdin = std::io::stdin();
            let mut input = stdin.lock();
            repl::run(&mut session, &mut input, &output).await?;
            ExitCode::Success
        }
    };

    Ok(code)
}
