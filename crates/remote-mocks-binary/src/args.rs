use std::net::SocketAddr;

use clap::Parser;

/// Deterministic stand-in for the remote services called by custom
/// resolvers during end-to-end tests.
#[derive(Debug, Parser)]
#[command(name = "remote-mocks-server", version)]
pub(crate) struct Args {
    /// IP address and port on which the simulator listens for the engine
    /// under test.
    #[arg(short, long, env = "MOCK_LISTEN_ADDRESS", default_value = "127.0.0.1:8888")]
    pub listen_address: SocketAddr,
}

pub(crate) fn parse() -> Args {
    Args::parse()
}
