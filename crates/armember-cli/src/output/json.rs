//! JSON output formatter for machine-readable results.

use super::formatter::CheckOutcome;
use super::formatter::JsonOutput;
use super::formatter::MtimeOutcome;
use super::formatter::OutputFormatter;
use super::formatter::TouchOutcome;
use anyhow::Result;
use armember_core::MemberInfo;
use serde::Serialize;
use std::io;
use std::io::Write;
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct MemberOutput<'a> {
    name: &'a str,
    truncated: bool,
    size: u64,
    date: i64,
    uid: u32,
    gid: u32,
    mode: String,
}

impl<'a> From<&'a MemberInfo> for MemberOutput<'a> {
    fn from(info: &'a MemberInfo) -> Self {
        Self {
            name: &info.name,
            truncated: info.truncated,
            size: info.size,
            date: info.date,
            uid: info.uid,
            gid: info.gid,
            mode: format!("{:o}", info.mode),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_check_results(&self, results: &[CheckOutcome]) -> Result<()> {
        let failed = results.iter().filter(|r| r.error.is_some()).count();
        if failed == 0 {
            Self::output(&JsonOutput::success("check", results))
        } else {
            Self::output(&JsonOutput::partial(
                "check",
                results,
                format!("{failed} name(s) use unsupported features"),
            ))
        }
    }

    fn format_mtimes(&self, results: &[MtimeOutcome]) -> Result<()> {
        Self::output(&JsonOutput::success("mtime", results))
    }

    fn format_touch_results(&self, results: &[TouchOutcome]) -> Result<()> {
        let failed = results.iter().filter(|r| !r.touched).count();
        if failed == 0 {
            Self::output(&JsonOutput::success("touch", results))
        } else {
            Self::output(&JsonOutput::partial(
                "touch",
                results,
                format!("{failed} of {} member(s) could not be touched", results.len()),
            ))
        }
    }

    fn format_glob(&self, archive: &str, pattern: &str, references: &[String]) -> Result<()> {
        #[derive(Serialize)]
        struct GlobOutput<'a> {
            archive: &'a str,
            pattern: &'a str,
            references: &'a [String],
        }

        Self::output(&JsonOutput::success(
            "glob",
            GlobOutput {
                archive,
                pattern,
                references,
            },
        ))
    }

    fn format_members_short(&self, archive: &Path, members: &[MemberInfo]) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            archive: String,
            member_count: usize,
            members: Vec<&'a str>,
        }

        let data = ListOutput {
            archive: archive.display().to_string(),
            member_count: members.len(),
            members: members.iter().map(|m| m.name.as_str()).collect(),
        };
        Self::output(&JsonOutput::success("list", data))
    }

    fn format_members_long(&self, archive: &Path, members: &[MemberInfo]) -> Result<()> {
        #[derive(Serialize)]
        struct ListOutput<'a> {
            archive: String,
            member_count: usize,
            total_size: u64,
            members: Vec<MemberOutput<'a>>,
        }

        let data = ListOutput {
            archive: archive.display().to_string(),
            member_count: members.len(),
            total_size: members.iter().map(|m| m.size).sum(),
            members: members.iter().map(MemberOutput::from).collect(),
        };
        Self::output(&JsonOutput::success("list", data))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_json_output_shape() {
        let outcomes = vec![MtimeOutcome {
            reference: "lib.a(a.o)".to_string(),
            mtime: None,
        }];
        let value = serde_json::to_value(JsonOutput::success("mtime", &outcomes)).unwrap();
        assert_eq!(value["operation"], "mtime");
        assert_eq!(value["status"], "success");
        assert!(value["data"][0]["mtime"].is_null());
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_partial_output_carries_error() {
        let outcomes = vec![TouchOutcome {
            reference: "lib.a(a.o)".to_string(),
            touched: false,
            error: Some("touch: Archive 'lib.a' does not exist".to_string()),
        }];
        let value =
            serde_json::to_value(JsonOutput::partial("touch", &outcomes, "1 failed")).unwrap();
        assert_eq!(value["status"], "partial");
        assert_eq!(value["error"], "1 failed");
        assert_eq!(
            value["data"][0]["error"],
            "touch: Archive 'lib.a' does not exist"
        );
    }

    #[test]
    fn test_member_output_mode_is_octal() {
        let info = MemberInfo {
            name: "a.o".to_string(),
            truncated: false,
            header_offset: 8,
            data_offset: 68,
            size: 3,
            date: 10,
            uid: 0,
            gid: 0,
            mode: 0o644,
        };
        let value = serde_json::to_value(MemberOutput::from(&info)).unwrap();
        assert_eq!(value["mode"], "644");
        assert_eq!(value["name"], "a.o");
    }
}
