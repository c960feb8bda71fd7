//! Human-readable output formatter with colors and styling.

use super::formatter::CheckOutcome;
use super::formatter::MtimeOutcome;
use super::formatter::OutputFormatter;
use super::formatter::TouchOutcome;
use anyhow::Result;
use armember_core::MemberInfo;
use console::Term;
use console::style;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
    err_term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
            err_term: Term::stderr(),
        }
    }

    /// Renders permission bits the way `ar tv` does, e.g. `rw-r--r--`.
    fn format_mode(mode: u32) -> String {
        const FLAGS: [(u32, char); 9] = [
            (0o400, 'r'),
            (0o200, 'w'),
            (0o100, 'x'),
            (0o040, 'r'),
            (0o020, 'w'),
            (0o010, 'x'),
            (0o004, 'r'),
            (0o002, 'w'),
            (0o001, 'x'),
        ];

        FLAGS
            .iter()
            .map(|&(bit, c)| if mode & bit == 0 { '-' } else { c })
            .collect()
    }

    fn write_failure(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .err_term
                .write_line(&format!("{} {message}", style("✗").red().bold()));
        } else {
            let _ = self.err_term.write_line(message);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_check_results(&self, results: &[CheckOutcome]) -> Result<()> {
        for outcome in results {
            if let Some(error) = &outcome.error {
                self.write_failure(error);
                continue;
            }
            if self.quiet {
                continue;
            }

            let line = match (&outcome.archive, &outcome.member) {
                (Some(archive), Some(member)) => format!(
                    "{}: archive '{archive}', member '{member}'",
                    outcome.name
                ),
                _ => format!("{}: not a member reference", outcome.name),
            };
            let _ = self.term.write_line(&line);
        }
        Ok(())
    }

    fn format_mtimes(&self, results: &[MtimeOutcome]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for outcome in results {
            let mtime = outcome
                .mtime
                .map_or_else(|| "unknown".to_string(), |secs| secs.to_string());
            let mtime = if self.use_colors && outcome.mtime.is_none() {
                style(mtime).yellow().to_string()
            } else {
                mtime
            };
            let _ = self
                .term
                .write_line(&format!("{mtime}\t{}", outcome.reference));
        }
        Ok(())
    }

    fn format_touch_results(&self, results: &[TouchOutcome]) -> Result<()> {
        for outcome in results {
            if let Some(error) = &outcome.error {
                self.write_failure(error);
            } else if self.verbose {
                let _ = self
                    .term
                    .write_line(&format!("touched {}", outcome.reference));
            }
        }

        if !self.quiet {
            let touched = results.iter().filter(|r| r.touched).count();
            if self.use_colors && touched == results.len() {
                let _ = self.term.write_line(&format!(
                    "{} Touched {touched} member(s)",
                    style("✓").green().bold()
                ));
            } else {
                let _ = self.term.write_line(&format!(
                    "Touched {touched} of {} member(s)",
                    results.len()
                ));
            }
        }
        Ok(())
    }

    fn format_glob(&self, archive: &str, pattern: &str, references: &[String]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        if references.is_empty() && self.verbose {
            let _ = self
                .err_term
                .write_line(&format!("no members of '{archive}' match '{pattern}'"));
        }
        for reference in references {
            let _ = self.term.write_line(reference);
        }
        Ok(())
    }

    fn format_members_short(&self, archive: &Path, members: &[MemberInfo]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for member in members {
            let _ = self.term.write_line(&member.name);
        }

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "\n{} member(s) in {}",
                members.len(),
                archive.display()
            ));
        }
        Ok(())
    }

    fn format_members_long(&self, archive: &Path, members: &[MemberInfo]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for member in members {
            let name = if member.truncated && self.use_colors {
                style(&member.name).dim().to_string()
            } else {
                member.name.clone()
            };
            let _ = self.term.write_line(&format!(
                "{} {:>5}/{:<5} {:>10} {:>12} {name}",
                Self::format_mode(member.mode),
                member.uid,
                member.gid,
                member.size,
                member.date,
            ));
        }

        let total: u64 = members.iter().map(|m| m.size).sum();
        let _ = self.term.write_line(&format!(
            "\n{} member(s), {total} bytes in {}",
            members.len(),
            archive.display()
        ));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mode() {
        assert_eq!(HumanFormatter::format_mode(0o644), "rw-r--r--");
        assert_eq!(HumanFormatter::format_mode(0o755), "rwxr-xr-x");
        assert_eq!(HumanFormatter::format_mode(0), "---------");
        assert_eq!(HumanFormatter::format_mode(0o100_600), "rw-------");
    }
}
