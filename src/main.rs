//! # vimline Main Entry Point
//!
//! Resolve the editor session for a folder, attach, and hand over to the
//! dispatch loop. Any failure before the loop starts is fatal.

use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{filter::LevelFilter, fmt::time::ChronoLocal, EnvFilter};
use vimline::{
    cmd_args::CommandLineArgs,
    config::{self, Config},
    session::{launcher, NvimSession, SessionLocator},
    AppController, SessionIdentity,
};

fn main() -> ExitCode {
    let cmd_args = CommandLineArgs::parse();
    init_tracing_subscriber(cmd_args.verbose());

    match run(&cmd_args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("vimline: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cmd_args: &CommandLineArgs) -> Result<()> {
    let profile_path = config::get_profile_path();
    let mut config = Config::load(&profile_path, cmd_args.profile())
        .with_context(|| format!("cannot load profile '{}'", cmd_args.profile()))?;
    if let Some(socket_dir) = cmd_args.socket_dir() {
        config.socket_dir = socket_dir.to_path_buf();
    }
    tracing::debug!("Using config: {:?}", config);

    let folder = match cmd_args.folder() {
        Some(folder) => folder.to_path_buf(),
        None => std::env::current_dir().context("cannot determine current directory")?,
    };
    let identity = SessionIdentity::from_path(&folder);

    if cmd_args.launch() {
        let status = launcher::launch(&identity, &config)?;
        if !status.success() {
            bail!("editor exited with {status}");
        }
        return Ok(());
    }

    println!("Starting vimline on {}", identity.working_directory());

    let socket = SessionLocator::new(&config.socket_dir)
        .with_prefix(config.socket_prefix.clone())
        .with_policy(config.on_multiple)
        .locate(identity.identity_hash())
        .with_context(|| format!("cannot find an editor for {identity}"))?;
    if cmd_args.verbose() {
        println!("Attaching to {}", socket.path().display());
    }

    let session = NvimSession::connect(socket.path(), config.timeout)?;
    let mut app = AppController::new(session, &config)?;
    app.run()
}

fn init_tracing_subscriber(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_level.into())
                .with_env_var(format!(
                    "{}_LOG_LEVEL",
                    env!("CARGO_PKG_NAME").to_uppercase()
                ))
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_timer(ChronoLocal::rfc_3339())
        .init();
}
