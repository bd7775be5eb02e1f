// Entrypoint for the CLI application.
// - Keeps `main` small: parse arguments, create the frame client, dispatch.
// - Returns `anyhow::Result` so any failure prints its cause and exits
//   nonzero; clap itself handles --help and invalid invocations.

use camframe_cli::{api::FrameClient, cli};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Base URL comes from `FRAME_API_URL` or the built-in default.
    let client = FrameClient::from_env()?;

    cli::run(args, client)
}
