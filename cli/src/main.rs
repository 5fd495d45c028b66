mod commands;
mod terminal;

use commands::{CommandLine, scan};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging();

    let cfg = commands.to_config();
    scan::scan(&commands.targets, &commands.vhosts, &cfg).await
}
