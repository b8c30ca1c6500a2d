//! argconf: print the resolved configuration of a sample twelve-factor program
//!
//! Demonstrates option resolution from command-line flags, environment
//! variables and defaults.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
