//! Markdown report for one analyzed contract.

use crate::pipeline::ContractAnalysis;
use chrono::NaiveDate;

/// Table cells cannot hold raw pipes or newlines.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

pub fn render_markdown(analysis: &ContractAnalysis, date: NaiveDate) -> String {
    let mut report = String::new();

    report.push_str(&format!("# Security Report: {}\n\n", analysis.name()));
    report.push_str(&format!("**Date**: {}\n", date.format("%Y-%m-%d")));
    report.push_str(&format!(
        "**Security Score**: {}/100 (Grade {})\n\n",
        analysis.score.score, analysis.score.grade
    ));

    report.push_str("## Vulnerabilities\n\n");
    if analysis.vulnerabilities.is_empty() {
        report.push_str("None found\n\n");
    } else {
        report.push_str("| # | Severity | Finding | Function | Line | Remediation |\n");
        report.push_str("|---|----------|---------|----------|------|-------------|\n");
        for (idx, vuln) in analysis.vulnerabilities.iter().enumerate() {
            report.push_str(&format!(
                "| {} | {} {} | {} | `{}` | {} | {} |\n",
                idx + 1,
                vuln.severity.emoji(),
                vuln.severity,
                cell(&vuln.title),
                vuln.function,
                vuln.line,
                cell(&vuln.remediation)
            ));
        }
        report.push('\n');
    }

    report.push_str("## Invariants\n\n");
    if analysis.invariants.is_empty() {
        report.push_str("None found\n\n");
    } else {
        report.push_str("| ID | Severity | Title | Assertion |\n");
        report.push_str("|----|----------|-------|-----------|\n");
        for invariant in &analysis.invariants {
            let assertion = invariant
                .assertion
                .as_deref()
                .map(|a| format!("`{}`", cell(a)))
                .unwrap_or_else(|| "-".to_string());
            report.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                invariant.id,
                invariant.severity,
                cell(&invariant.title),
                assertion
            ));
        }
        report.push('\n');
    }

    report.push_str("## Gas Optimizations\n\n");
    if analysis.gas_findings.is_empty() {
        report.push_str("None found\n\n");
    } else {
        report.push_str("| ID | Subject | Line | Suggestion |\n");
        report.push_str("|----|---------|------|------------|\n");
        for finding in &analysis.gas_findings {
            report.push_str(&format!(
                "| {} | `{}` | {} | {} |\n",
                finding.id,
                finding.subject,
                finding.line,
                cell(&finding.suggestion)
            ));
        }
        report.push('\n');
    }

    report.push_str("## Score Breakdown\n\n");
    if analysis.score.breakdown.is_empty() {
        report.push_str("None found\n");
    } else {
        report.push_str("| Finding | Severity | Points |\n");
        report.push_str("|---------|----------|--------|\n");
        for deduction in &analysis.score.breakdown {
            report.push_str(&format!(
                "| {} | {} | -{} |\n",
                deduction.vulnerability.id, deduction.vulnerability.severity, deduction.points
            ));
        }
        report.push_str(&format!(
            "| **Total** | | -{} |\n",
            analysis.score.total_deducted()
        ));
    }

    report
}
