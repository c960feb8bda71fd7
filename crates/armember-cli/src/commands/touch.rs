//! Touch command implementation

use crate::cli::TouchArgs;
use crate::error::convert_ar_error;
use crate::output::OutputFormatter;
use crate::output::TouchOutcome;
use anyhow::Result;
use anyhow::bail;
use armember_core::FileCache;
use armember_core::formats::ArScanner;
use armember_core::touch_member;

/// Touches every reference in order.
///
/// Usage errors abort before anything else is touched; ordinary failures are
/// reported per reference and make the command fail at the end.
pub fn execute(args: &TouchArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let scanner = ArScanner::new(args.scan.to_config());
    let mut cache = FileCache::new();

    let mut results = Vec::with_capacity(args.references.len());
    for reference in &args.references {
        let error = match touch_member(reference, &scanner, &mut cache) {
            Ok(()) => None,
            Err(err) if err.is_fatal() => return Err(convert_ar_error(err)),
            Err(err) => match err.touch_error() {
                Some(touch) => Some(touch.to_string()),
                None => return Err(convert_ar_error(err)),
            },
        };
        results.push(TouchOutcome {
            reference: reference.clone(),
            touched: error.is_none(),
            error,
        });
    }

    formatter.format_touch_results(&results)?;

    let failed = results.iter().filter(|r| !r.touched).count();
    if failed > 0 {
        bail!(
            "{failed} of {} member(s) could not be touched",
            results.len()
        );
    }
    Ok(())
}
