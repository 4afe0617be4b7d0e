use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use clap::Parser;

pub const ADDR_ENV: &str = "TETRIS_MIRROR_ADDR";
pub const PORT_ENV: &str = "TETRIS_MIRROR_PORT";
pub const ENGINE_URL_ENV: &str = "TETRIS_ENGINE_URL";

/// The engine pushes state to the front end's dev-server port, so listen there by default.
pub const DEFAULT_PORT: u16 = 5173;
pub const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "tetris-mirror",
    about = "Mirrors Tetris engine state over HTTP and relays keypresses to the engine"
)]
pub struct Cli {
    /// Full listen address, e.g. 0.0.0.0:5173.
    #[arg(long)]
    pub addr: Option<SocketAddr>,
    /// Port to listen on at 127.0.0.1.
    #[arg(long)]
    pub port: Option<u16>,
    /// Base URL of the Tetris engine.
    #[arg(long)]
    pub engine_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    pub engine_url: String,
}

impl ServerConfig {
    /// Flags win over environment variables, which win over defaults.
    pub fn resolve<F>(cli: &Cli, mut get_env: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        Self {
            listen: resolve_listen_addr(cli, &mut get_env),
            engine_url: resolve_engine_url(cli, &mut get_env),
        }
    }
}

fn localhost(port: u16) -> SocketAddr {
    SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), port)
}

pub fn resolve_listen_addr<F>(cli: &Cli, get_env: &mut F) -> SocketAddr
where
    F: FnMut(&str) -> Option<String>,
{
    if let Some(addr) = cli.addr {
        return addr;
    }

    if let Some(port) = cli.port {
        return localhost(port);
    }

    if let Some(addr) = get_env(ADDR_ENV).and_then(|v| v.trim().parse().ok()) {
        return addr;
    }

    if let Some(port) = get_env(PORT_ENV).and_then(|v| v.trim().parse::<u16>().ok()) {
        return localhost(port);
    }

    localhost(DEFAULT_PORT)
}

pub fn resolve_engine_url<F>(cli: &Cli, get_env: &mut F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    cli.engine_url
        .clone()
        .or_else(|| get_env(ENGINE_URL_ENV))
        .map(|url| url.trim().trim_end_matches('/').to_string())
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_ENGINE_URL.to_string())
}
