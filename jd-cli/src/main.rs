//! jd-cli - drought severity and water-security reports for Indian states.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "jd-cli",
    version,
    about = "JalDrishti drought severity and water-security toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: jd_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    jd_cmd::run(cli.command).await
}
