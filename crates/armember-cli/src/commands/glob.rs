//! Glob command implementation

use crate::cli::GlobArgs;
use crate::output::OutputFormatter;
use anyhow::Result;
use armember_core::GlobOptions;
use armember_core::MatchOptions;
use armember_core::formats::ArScanner;
use armember_core::glob_members_with;

pub fn execute(args: &GlobArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let scanner = ArScanner::new(args.scan.to_config());
    let options = GlobOptions {
        honor_escapes: !args.no_escape,
        matching: MatchOptions {
            noescape: args.no_escape,
            ..MatchOptions::member()
        },
    };

    let references = glob_members_with(&args.archive, &args.pattern, &scanner, options);
    formatter.format_glob(&args.archive, &args.pattern, &references)
}
