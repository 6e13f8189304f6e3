//! Terminal output: completion notice, JSON summary, failure banner.

use std::io::Write;

use colored::Colorize;
use iam_copy_role_core::{CopyReport, CopyRoleError};

const FAILURE_BANNER: &str = r"
              ████████████
            ████  ██████████
            ████████████████
            ████████                    ████
            ████████████                ████
██        ████████                      ████
████    ██████████████      ████  ████  ████  ████
██████████████████  ██      ████  ████  ████  ████
██████████████████          ████  ████  ████  ████
  ████████████████      ██  ████  ████  ████  ████
    ████████████        ██  ████████████████████████
      ████████          ██  ████    ████████████
      ████  ██          ████████        ████
      ██    ██              ████        ████
";

/// Write the success output: the JSON report with `--json`, otherwise a completion notice.
pub fn write_success<W: Write>(out: &mut W, report: &CopyReport, json: bool) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(report)?)?;
    } else {
        writeln!(
            out,
            "\nCopied {} to {} ({} inline, {} managed policies).",
            report.source_role,
            report.target_role,
            report.inline_policies.len(),
            report.managed_policies.len()
        )?;
        writeln!(out, "Done!")?;
    }
    Ok(())
}

pub fn write_failure<W: Write>(err_out: &mut W, error: &CopyRoleError) -> std::io::Result<()> {
    writeln!(err_out, "{}", FAILURE_BANNER.red())?;
    writeln!(err_out, "{}", error.to_string().red().bold())?;
    if error.leaves_partial_target() {
        writeln!(
            err_out,
            "{}",
            "The target role was created but not fully configured. Remove it or finish it manually."
                .yellow()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iam_copy_role_core::AwsError;

    fn report() -> CopyReport {
        CopyReport {
            source_role: "srcRole".to_string(),
            target_role: "dstRole".to_string(),
            target_role_arn: Some("arn:aws:iam::123456789012:role/dstRole".to_string()),
            assumed_role_arn: None,
            inline_policies: vec!["p1".to_string()],
            managed_policies: vec!["arn:aws:iam::aws:policy/X".to_string()],
        }
    }

    #[test]
    fn test_success_text() {
        let mut buf = Vec::new();
        write_success(&mut buf, &report(), false).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Copied srcRole to dstRole (1 inline, 1 managed policies)."));
        assert!(text.trim_end().ends_with("Done!"));
    }

    #[test]
    fn test_success_json() {
        let mut buf = Vec::new();
        write_success(&mut buf, &report(), true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["TargetRole"], "dstRole");
        assert_eq!(value["ManagedPolicies"][0], "arn:aws:iam::aws:policy/X");
    }

    #[test]
    fn test_failure_contains_message() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        let error = CopyRoleError::RoleFetchFailed {
            role_name: "srcRole".to_string(),
            source: AwsError::IamError("NoSuchEntity".to_string()),
        };
        write_failure(&mut buf, &error).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("████"));
        assert!(text.contains("Failed to fetch source role srcRole"));
        assert!(!text.contains("not fully configured"));
    }

    #[test]
    fn test_failure_after_create_mentions_partial_role() {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        let error = CopyRoleError::PolicyAttachFailed {
            policy_identifier: "p1".to_string(),
            source: AwsError::IamError("MalformedPolicyDocument".to_string()),
        };
        write_failure(&mut buf, &error).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("not fully configured"));
    }
}
