//! Mtime command implementation

use crate::cli::MtimeArgs;
use crate::error::add_archive_context;
use crate::output::MtimeOutcome;
use crate::output::OutputFormatter;
use anyhow::Result;
use armember_core::FileCache;
use armember_core::formats::ArScanner;
use armember_core::member_mtime;

pub fn execute(args: &MtimeArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let scanner = ArScanner::new(args.scan.to_config());
    let mut cache = FileCache::new();

    let mut results = Vec::with_capacity(args.references.len());
    for reference in &args.references {
        let mtime = add_archive_context(member_mtime(reference, &scanner, &mut cache))?;
        results.push(MtimeOutcome {
            reference: reference.clone(),
            mtime: mtime.seconds(),
        });
    }

    formatter.format_mtimes(&results)
}
