use anyhow::Result;
use clap::Parser;
use sexpr_eval::cli::Cli;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    cli.run()
}
