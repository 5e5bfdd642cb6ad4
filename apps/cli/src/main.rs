//! Occupancy CLI: room and course lookups against the FH SWF VPIS.
//!
//! Answers "what is going on in room H409 today?" and "when does
//! Programmierung mit C++2 take place?" and generates the room/course
//! vocabularies a speech front-end is primed with.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
