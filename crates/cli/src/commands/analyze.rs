//! Shared runner behind `analyze`, `generate` and `full`.

use anyhow::{Context, Result};
use chrono::Local;
use colored::*;
use kensa_scanners::{analyze_source, AnalysisConfig, ContractAnalysis};

use super::{output, OutputFormat, RunArgs};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Analyze,
    Generate,
    Full,
}

impl Mode {
    fn reports(&self) -> bool {
        matches!(self, Self::Analyze | Self::Full)
    }

    fn generates(&self) -> bool {
        matches!(self, Self::Generate | Self::Full)
    }
}

fn load_config(args: &RunArgs) -> Result<AnalysisConfig> {
    match &args.config {
        Some(path) => AnalysisConfig::from_path(path)
            .with_context(|| format!("Failed to load config: {}", path.display())),
        None => AnalysisConfig::from_env().context("Invalid KENSA_* environment override"),
    }
}

pub fn execute(args: &RunArgs, mode: Mode) -> Result<()> {
    let config = load_config(args)?;

    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read file: {}", args.file.display()))?;

    let analyses = analyze_source(&source, &config)
        .with_context(|| format!("Failed to analyze {}", args.file.display()))?;

    let terminal = args.format == OutputFormat::Terminal;

    if analyses.is_empty() {
        match args.format {
            OutputFormat::Json if mode.reports() => println!("[]"),
            _ => println!("⚠️  No contracts found in {}", args.file.display()),
        }
        return Ok(());
    }

    if mode.reports() {
        match args.format {
            OutputFormat::Terminal => {
                for analysis in &analyses {
                    print_analysis(analysis);
                }
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&analyses)
                    .context("Failed to serialize analysis")?;
                println!("{}", json);
            }
            OutputFormat::Md => {}
        }
    }

    if args.format == OutputFormat::Md {
        let date = Local::now().date_naive();
        for analysis in &analyses {
            let path = output::write_report(&args.output_dir, analysis, date)?;
            println!("📝 Report written to {}", path.display());
        }
    }

    if mode.generates() {
        let source_file = args
            .file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Contract.sol".to_string());

        let mut total = 0;
        for analysis in &analyses {
            let tests = analysis.generate_tests(&config.synthesis, &source_file);
            let written = output::write_tests(&args.output_dir, analysis, &tests)?;
            total += written.len();
            if terminal {
                for path in &written {
                    println!("🧪 {}", path.display());
                }
            }
        }

        if terminal {
            if total == 0 {
                println!("{}", "No findings, no test suites generated".bright_green());
            } else {
                println!(
                    "\n✅ {} test suite(s) written to {}",
                    total,
                    args.output_dir.display()
                );
            }
        }
    }

    Ok(())
}

fn print_analysis(analysis: &ContractAnalysis) {
    let score = &analysis.score;

    println!("\n{}", format!("📄 {}", analysis.name()).bright_blue().bold());
    println!("{}", "=".repeat(50).bright_blue());

    let grade = score.grade.to_string();
    let grade = if score.score >= 80 {
        grade.bright_green()
    } else if score.score >= 60 {
        grade.yellow()
    } else {
        grade.red()
    };
    println!("🛡️  Security score: {}/100 (Grade {})", score.score, grade.bold());

    if analysis.vulnerabilities.is_empty() {
        println!("\n✅ No vulnerabilities found");
    } else {
        println!(
            "\n⚠️  {} vulnerabilit{}:",
            analysis.vulnerabilities.len(),
            if analysis.vulnerabilities.len() == 1 { "y" } else { "ies" }
        );
        for vuln in &analysis.vulnerabilities {
            println!(
                "  {} {} {} ({}:{})",
                vuln.severity.emoji(),
                format!("[{}]", vuln.severity).color(vuln.severity.color()).bold(),
                vuln.title,
                vuln.function,
                vuln.line
            );
            if !vuln.remediation.is_empty() {
                println!("     Fix: {}", vuln.remediation);
            }
        }
    }

    if !analysis.invariants.is_empty() {
        println!("\n📐 {} invariant(s):", analysis.invariants.len());
        for invariant in &analysis.invariants {
            println!(
                "  {} {} {}",
                invariant.id.bold(),
                format!("[{}]", invariant.severity).color(invariant.severity.color()),
                invariant.title
            );
        }
    }

    if !analysis.gas_findings.is_empty() {
        println!("\n⛽ {} gas suggestion(s):", analysis.gas_findings.len());
        for finding in &analysis.gas_findings {
            println!("  {} {}", finding.id.dimmed(), finding.suggestion);
        }
    }
}
