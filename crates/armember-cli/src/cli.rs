//! CLI argument parsing using clap.

use armember_core::ScanConfig;
use clap::Parser;
use clap::Subcommand;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "armember")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether names are archive member references
    Check(CheckArgs),
    /// Print the modification time of archive members
    Mtime(MtimeArgs),
    /// Set the modification time of archive members to now
    Touch(TouchArgs),
    /// Expand a member pattern into sorted references
    Glob(GlobArgs),
    /// List archive members
    List(ListArgs),
    /// Generate shell completion scripts
    Completion(CompletionArgs),
}

/// Limits shared by every command that reads archives.
#[derive(clap::Args)]
pub struct ScanArgs {
    /// Maximum number of members to accept in one archive
    #[arg(long, default_value = "100000", value_parser = clap::value_parser!(u64).range(1..))]
    pub max_members: u64,

    /// Maximum long-name table size in bytes (K and M suffixes accepted)
    #[arg(long, default_value = "16M", value_parser = parse_byte_size)]
    pub max_name_table_size: u64,
}

impl ScanArgs {
    pub fn to_config(&self) -> ScanConfig {
        ScanConfig::default()
            .with_max_members(usize::try_from(self.max_members).unwrap_or(usize::MAX))
            .with_max_name_table_size(self.max_name_table_size)
    }
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Names to classify, e.g. 'libfoo.a(foo.o)'
    #[arg(value_name = "NAME", required = true)]
    pub names: Vec<String>,
}

#[derive(clap::Args)]
pub struct MtimeArgs {
    /// Member references of the form ARCHIVE(MEMBER)
    #[arg(value_name = "REFERENCE", required = true)]
    pub references: Vec<String>,

    #[command(flatten)]
    pub scan: ScanArgs,
}

#[derive(clap::Args)]
pub struct TouchArgs {
    /// Member references of the form ARCHIVE(MEMBER)
    #[arg(value_name = "REFERENCE", required = true)]
    pub references: Vec<String>,

    #[command(flatten)]
    pub scan: ScanArgs,
}

#[derive(clap::Args)]
pub struct GlobArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: String,

    /// Member name pattern using *, ? and [...]
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Treat backslash as an ordinary character
    #[arg(long)]
    pub no_escape: bool,

    #[command(flatten)]
    pub scan: ScanArgs,
}

#[derive(clap::Args)]
pub struct ListArgs {
    /// Path to the archive file
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Show size, date, owner and mode of each member
    #[arg(short, long)]
    pub long: bool,

    #[command(flatten)]
    pub scan: ScanArgs,
}

#[derive(clap::Args)]
pub struct CompletionArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Parse byte size with optional suffix (K, M)
fn parse_byte_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty byte size".to_string());
    }

    let (digits, multiplier) = match s.as_bytes()[s.len() - 1] {
        b'K' | b'k' => (&s[..s.len() - 1], 1024),
        b'M' | b'm' => (&s[..s.len() - 1], 1024 * 1024),
        _ => (s, 1),
    };

    digits
        .parse::<u64>()
        .map_err(|_| format!("invalid byte size: {s}"))
        .and_then(|n| {
            n.checked_mul(multiplier)
                .ok_or_else(|| format!("byte size overflow: {s}"))
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_byte_size() {
        assert_eq!(parse_byte_size("100").unwrap(), 100);
        assert_eq!(parse_byte_size("1K").unwrap(), 1024);
        assert_eq!(parse_byte_size("16M").unwrap(), 16 * 1024 * 1024);
        assert_eq!(parse_byte_size("2m").unwrap(), 2 * 1024 * 1024);
        assert!(parse_byte_size("invalid").is_err());
        assert!(parse_byte_size("").is_err());
        assert!(parse_byte_size("1G").is_err());
        assert!(parse_byte_size("18446744073709551615K").is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_args_defaults_match_library() {
        let cli = Cli::try_parse_from(["armember", "mtime", "lib.a(a.o)"]).unwrap();
        let Commands::Mtime(args) = cli.command else {
            panic!("expected mtime command");
        };
        assert_eq!(args.scan.to_config(), ScanConfig::default());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["armember", "-v", "-q", "check", "x"]);
        assert!(result.is_err());
    }
}
