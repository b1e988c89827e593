//! piclaw - Provision an always-on agent gateway on a Raspberry Pi

use clap::Parser;

use piclaw::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
