//! List command implementation

use crate::cli::ListArgs;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use armember_core::formats::ArScanner;
use armember_core::list_members;

pub fn execute(args: &ListArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let scanner = ArScanner::new(args.scan.to_config());
    let members = add_archive_context(list_members(&args.archive, &scanner))?;

    if args.long {
        formatter.format_members_long(&args.archive, &members)
    } else {
        formatter.format_members_short(&args.archive, &members)
    }
}
