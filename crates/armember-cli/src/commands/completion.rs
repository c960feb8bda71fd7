//! Shell completion generation command.

use crate::cli::Cli;
use clap::CommandFactory;
use clap_complete::Shell;
use std::io;
use std::io::Write;

/// Writes the completion script for `shell` to `out`.
fn generate(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "armember", out);
}

/// Generates shell completions for the specified shell on stdout.
pub fn execute(shell: Shell) {
    generate(shell, &mut io::stdout());
}
