// Data Quality Engine - integrity checks over the static tables
//
// Runs once at startup. Issues are reported, never fatal: the dashboard
// still renders whatever the tables say.

use crate::data::Dataset;
use serde::Serialize;

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub rule_name: String,
    pub table: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationResult {
    pub fn pass(rule_name: &str, table: &str, message: &str) -> Self {
        ValidationResult {
            passed: true,
            rule_name: rule_name.to_string(),
            table: table.to_string(),
            message: message.to_string(),
            severity: Severity::Info,
        }
    }

    pub fn fail(rule_name: &str, table: &str, message: &str, severity: Severity) -> Self {
        ValidationResult {
            passed: false,
            rule_name: rule_name.to_string(),
            table: table.to_string(),
            message: message.to_string(),
            severity,
        }
    }
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub validations: Vec<ValidationResult>,
    pub issues: Vec<QualityIssue>,
    pub passed_count: usize,
    pub failed_count: usize,
}

impl QualityReport {
    pub fn summary(&self) -> String {
        format!(
            "{} checks, {} passed, {} issues ({} critical)",
            self.validations.len(),
            self.passed_count,
            self.issues.len(),
            self.issues
                .iter()
                .filter(|i| i.severity == Severity::Critical)
                .count()
        )
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues
            .iter()
            .any(|i| i.severity == Severity::Critical)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub table: String,
    pub issue: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Severity {
    Critical, // Value is impossible (negative volume, rate above 100%)
    Warning,  // Values disagree with each other beyond rounding
    Info,
}

// ============================================================================
// DATA QUALITY ENGINE
// ============================================================================

/// One percentage column with the volume it is derived from
struct ShareColumn<'a> {
    table: &'a str,
    labels: Vec<&'a str>,
    basis: Vec<f64>,
    shares: Vec<f64>,
}

pub struct DataQualityEngine {
    /// Allowed drift of a percentage column's total from 100
    total_tolerance: f64,

    /// Allowed drift of one share from basis / total * 100
    share_tolerance: f64,
}

impl Default for DataQualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DataQualityEngine {
    pub fn new() -> Self {
        DataQualityEngine {
            total_tolerance: 0.1,
            share_tolerance: 0.01,
        }
    }

    pub fn with_tolerances(total_tolerance: f64, share_tolerance: f64) -> Self {
        DataQualityEngine {
            total_tolerance,
            share_tolerance,
        }
    }

    pub fn check(&self, data: &Dataset) -> QualityReport {
        let mut validations = Vec::new();

        let columns = [
            ShareColumn {
                table: "failures",
                labels: data.failures.iter().map(|f| f.reason.as_str()).collect(),
                basis: data.failures.iter().map(|f| f.count as f64).collect(),
                shares: data.failures.iter().map(|f| f.percentage).collect(),
            },
            ShareColumn {
                table: "countries",
                labels: data.countries.iter().map(|c| c.country.as_str()).collect(),
                basis: data.countries.iter().map(|c| c.volume).collect(),
                shares: data.countries.iter().map(|c| c.market_share).collect(),
            },
            ShareColumn {
                table: "clients",
                labels: data.clients.iter().map(|c| c.client.as_str()).collect(),
                basis: data.clients.iter().map(|c| c.volume).collect(),
                shares: data.clients.iter().map(|c| c.market_share).collect(),
            },
        ];

        // Rules 1-3: percentage columns
        for column in &columns {
            validations.push(self.validate_share_total(column));
            validations.extend(self.validate_share_fractions(column));
            validations.push(self.validate_share_ordering(column));
        }

        // Rule 4: success rates are percentages
        for m in &data.monthly {
            validations.push(self.validate_rate("monthly", &m.month, m.success_rate));
        }

        // Rule 5: volumes are finite and non-negative
        let volumes = data
            .monthly
            .iter()
            .map(|m| ("monthly", m.month.as_str(), m.volume))
            .chain(data.daily.iter().map(|d| ("daily", d.day.as_str(), d.volume)))
            .chain(data.hourly.iter().map(|h| ("hourly", h.hour.as_str(), h.volume)))
            .chain(data.countries.iter().map(|c| ("countries", c.country.as_str(), c.volume)))
            .chain(data.clients.iter().map(|c| ("clients", c.client.as_str(), c.volume)));
        for (table, label, volume) in volumes {
            validations.push(self.validate_volume(table, label, volume));
        }

        let issues: Vec<QualityIssue> = validations
            .iter()
            .filter(|v| !v.passed)
            .map(|v| QualityIssue {
                severity: v.severity.clone(),
                table: v.table.clone(),
                issue: v.message.clone(),
            })
            .collect();

        let passed_count = validations.iter().filter(|v| v.passed).count();
        let failed_count = validations.len() - passed_count;

        QualityReport {
            validations,
            issues,
            passed_count,
            failed_count,
        }
    }

    // ========================================================================
    // VALIDATION RULES
    // ========================================================================

    fn validate_share_total(&self, column: &ShareColumn) -> ValidationResult {
        let total: f64 = column.shares.iter().sum();

        if (total - 100.0).abs() > self.total_tolerance {
            return ValidationResult::fail(
                "share_total",
                column.table,
                &format!("Shares total {:.2}%, expected 100%", total),
                Severity::Warning,
            );
        }

        ValidationResult::pass(
            "share_total",
            column.table,
            &format!("Shares total {:.2}%", total),
        )
    }

    fn validate_share_fractions(&self, column: &ShareColumn) -> Vec<ValidationResult> {
        let total: f64 = column.basis.iter().sum();
        if total <= 0.0 {
            return vec![ValidationResult::fail(
                "share_fraction",
                column.table,
                "Column total is zero, shares cannot be derived",
                Severity::Warning,
            )];
        }

        column
            .labels
            .iter()
            .zip(column.basis.iter().zip(&column.shares))
            .map(|(label, (basis, share))| {
                let expected = basis / total * 100.0;
                if (expected - share).abs() > self.share_tolerance {
                    ValidationResult::fail(
                        "share_fraction",
                        column.table,
                        &format!("{} share {:.2}% but fraction is {:.3}%", label, share, expected),
                        Severity::Warning,
                    )
                } else {
                    ValidationResult::pass(
                        "share_fraction",
                        column.table,
                        &format!("{} share {:.2}%", label, share),
                    )
                }
            })
            .collect()
    }

    /// Larger basis never carries a smaller share
    fn validate_share_ordering(&self, column: &ShareColumn) -> ValidationResult {
        let mut rows: Vec<(&str, f64, f64)> = column
            .labels
            .iter()
            .zip(column.basis.iter().zip(&column.shares))
            .map(|(label, (basis, share))| (*label, *basis, *share))
            .collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1));

        for pair in rows.windows(2) {
            let (bigger, smaller) = (&pair[0], &pair[1]);
            if bigger.2 < smaller.2 {
                return ValidationResult::fail(
                    "share_ordering",
                    column.table,
                    &format!(
                        "{} has more volume than {} but a smaller share ({:.2}% < {:.2}%)",
                        bigger.0, smaller.0, bigger.2, smaller.2
                    ),
                    Severity::Warning,
                );
            }
        }

        ValidationResult::pass("share_ordering", column.table, "Shares follow volume ordering")
    }

    fn validate_rate(&self, table: &str, label: &str, rate: f64) -> ValidationResult {
        if !(0.0..=100.0).contains(&rate) {
            return ValidationResult::fail(
                "rate_range",
                table,
                &format!("{} success rate {} outside 0-100", label, rate),
                Severity::Critical,
            );
        }

        ValidationResult::pass("rate_range", table, &format!("{} success rate {:.2}%", label, rate))
    }

    fn validate_volume(&self, table: &str, label: &str, volume: f64) -> ValidationResult {
        if !volume.is_finite() || volume < 0.0 {
            return ValidationResult::fail(
                "volume_valid",
                table,
                &format!("{} volume {} is not a valid amount", label, volume),
                Severity::Critical,
            );
        }

        ValidationResult::pass("volume_valid", table, &format!("{} volume valid", label))
    }
}
