#![cfg_attr(not(test), warn(unused_crate_dependencies))]

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    cli::Cli::parse().run()
}
