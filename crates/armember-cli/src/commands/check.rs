//! Check command implementation

use crate::cli::CheckArgs;
use crate::output::CheckOutcome;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use armember_core::MemberReference;
use armember_core::is_member_reference;

pub fn execute(args: &CheckArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let results: Vec<CheckOutcome> = args.names.iter().map(|name| classify(name)).collect();
    formatter.format_check_results(&results)?;

    let failed = results.iter().filter(|r| r.error.is_some()).count();
    if failed > 0 {
        bail!("{failed} name(s) use unsupported features");
    }
    Ok(())
}

fn classify(name: &str) -> CheckOutcome {
    let mut outcome = CheckOutcome {
        name: name.to_string(),
        is_reference: is_member_reference(name),
        archive: None,
        member: None,
        error: None,
    };
    if !outcome.is_reference {
        return outcome;
    }

    match MemberReference::parse(name) {
        Ok(reference) => {
            let (archive, member) = reference.into_parts();
            outcome.archive = Some(archive);
            outcome.member = Some(member);
        }
        Err(err) => outcome.error = Some(err.to_string()),
    }
    outcome
}
