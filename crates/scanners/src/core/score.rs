//! Deduction-based security score.

use crate::core::Vulnerability;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MAX_SCORE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    F,
    D,
    C,
    B,
    A,
    #[serde(rename = "A+")]
    APlus,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            95.. => Self::APlus,
            90..=94 => Self::A,
            80..=89 => Self::B,
            70..=79 => Self::C,
            60..=69 => Self::D,
            _ => Self::F,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::APlus => write!(f, "A+"),
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::C => write!(f, "C"),
            Self::D => write!(f, "D"),
            Self::F => write!(f, "F"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDeduction {
    pub points: u32,
    pub vulnerability: Vulnerability,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityScore {
    pub score: u32,
    pub grade: Grade,
    pub breakdown: Vec<ScoreDeduction>,
}

impl SecurityScore {
    pub fn total_deducted(&self) -> u32 {
        self.breakdown.iter().map(|d| d.points).sum()
    }
}

/// Starts at 100 and removes each finding's severity weight in the order
/// given. The breakdown is never re-sorted.
pub fn score(vulnerabilities: &[Vulnerability]) -> SecurityScore {
    let breakdown: Vec<ScoreDeduction> = vulnerabilities
        .iter()
        .map(|v| ScoreDeduction {
            points: v.severity.deduction(),
            vulnerability: v.clone(),
        })
        .collect();

    let deducted: u32 = breakdown.iter().map(|d| d.points).sum();
    let score = MAX_SCORE.saturating_sub(deducted);

    SecurityScore {
        score,
        grade: Grade::from_score(score),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Severity, VulnerabilityKind};

    fn vuln(id: &str, severity: Severity) -> Vulnerability {
        Vulnerability::new(id, VulnerabilityKind::Reentrancy, severity, id, "")
    }

    #[test]
    fn test_no_findings_is_perfect() {
        let result = score(&[]);
        assert_eq!(result.score, 100);
        assert_eq!(result.grade, Grade::APlus);
        assert!(result.breakdown.is_empty());
    }

    #[test]
    fn test_deductions_keep_input_order() {
        let result = score(&[vuln("a", Severity::Low), vuln("b", Severity::Critical)]);
        assert_eq!(result.score, 72);
        assert_eq!(result.grade, Grade::C);
        let points: Vec<u32> = result.breakdown.iter().map(|d| d.points).collect();
        assert_eq!(points, vec![3, 25]);
        assert_eq!(result.breakdown[0].vulnerability.id, "a");
    }

    #[test]
    fn test_score_clamps_at_zero() {
        let many: Vec<_> = (0..6).map(|i| vuln(&i.to_string(), Severity::Critical)).collect();
        let result = score(&many);
        assert_eq!(result.score, 0);
        assert_eq!(result.grade, Grade::F);
        assert_eq!(result.total_deducted(), 150);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(Grade::from_score(95), Grade::APlus);
        assert_eq!(Grade::from_score(94), Grade::A);
        assert_eq!(Grade::from_score(90), Grade::A);
        assert_eq!(Grade::from_score(80), Grade::B);
        assert_eq!(Grade::from_score(70), Grade::C);
        assert_eq!(Grade::from_score(60), Grade::D);
        assert_eq!(Grade::from_score(59), Grade::F);
        assert_eq!(Grade::APlus.to_string(), "A+");
    }
}
