//! Scope Log Server - Entry Point

use clap::Parser;
use scopelog::config::{self, CliOverrides, OutputFormat};
use scopelog::server::{Server, ServerConfig};
use scopelog::view::ConsoleViewer;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

/// Scope Log Server - collects scoped log lines over TCP
#[derive(Parser, Debug)]
#[command(name = "scopelog")]
#[command(version)]
#[command(about = "Collects newline-delimited scoped log lines over TCP and prints one tree per connection")]
pub struct Args {
    /// Address to listen on
    #[arg(long)]
    pub bind: Option<String>,

    /// Port to listen on (0 picks a free port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path of the diagnostic log file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// How finished trees are printed
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Close connections idle for this many seconds (0 = never)
    #[arg(long, value_name = "SECS")]
    pub read_timeout: Option<u64>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            bind_address: self.bind.clone(),
            port: self.port,
            log_file_path: self.log_file.clone(),
            output_format: self.format,
            read_timeout_secs: self.read_timeout,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = config::load_config_with_precedence(args.config.clone())?;
        let merged = config::merge_config(config_file);
        let with_env = config::apply_env_overrides(merged)?;
        config::apply_cli_overrides(with_env, args.overrides())
    };

    scopelog::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let server = Arc::new(Server::with_config(
        config.listen_address(),
        ServerConfig {
            read_timeout: config.read_timeout,
        },
    )?);
    eprintln!("scopelog listening on {}", server.local_addr());

    let viewer = Arc::new(ConsoleViewer::new(config.output_format));
    server.set_viewer(viewer.clone());

    let acceptor = {
        let server = Arc::clone(&server);
        thread::Builder::new()
            .name("acceptor".to_string())
            .spawn(move || server.run())?
    };

    let stdout = io::stdout();
    while !acceptor.is_finished() {
        viewer.flush_closed(&mut stdout.lock())?;
        thread::sleep(config.poll_interval);
    }
    viewer.flush_closed(&mut stdout.lock())?;

    match acceptor.join() {
        Ok(result) => result?,
        Err(_) => error!("Acceptor thread panicked"),
    }
    Ok(())
}
