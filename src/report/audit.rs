//! SEO audit
//!
//! Rule-based scoring of a [`MetaDraft`]. Every rule emits one issue (a pass
//! is recorded as a [`Severity::Success`]) and failing rules deduct from a
//! starting score of 100.

use crate::report::draft::MetaDraft;
use serde::Serialize;
use std::fmt;

const TITLE_MIN_CHARS: usize = 30;
const TITLE_MAX_CHARS: usize = 60;
const DESCRIPTION_MIN_CHARS: usize = 50;
const DESCRIPTION_MAX_CHARS: usize = 160;
const ALT_DEDUCTION_PER_IMAGE: u32 = 2;
const ALT_DEDUCTION_CAP: u32 = 15;

/// Issue severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Hurts the page, large deduction
    Error,
    /// Worth fixing, small deduction
    Warning,
    /// Check passed
    Success,
}

/// One audit finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditIssue {
    /// Severity
    pub severity: Severity,
    /// Stable identifier, e.g. `title_too_short`
    pub code: &'static str,
    /// Human-readable message
    pub message: String,
    /// Points deducted by this finding
    pub deduction: u32,
}

impl AuditIssue {
    fn error(code: &'static str, message: impl Into<String>, deduction: u32) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            deduction,
        }
    }

    fn warning(code: &'static str, message: impl Into<String>, deduction: u32) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            deduction,
        }
    }

    fn success(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            code,
            message: message.into(),
            deduction: 0,
        }
    }
}

/// Health band of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthBand {
    /// 90 and above
    Excellent,
    /// 70 to 89
    Good,
    /// 50 to 69
    Fair,
    /// Below 50
    Poor,
}

impl HealthBand {
    /// Band for `score`
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Self::Excellent,
            70..=89 => Self::Good,
            50..=69 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

impl fmt::Display for HealthBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        };
        f.write_str(label)
    }
}

/// Alt-text coverage status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AltStatus {
    /// The page has no images
    NoImages,
    /// Every image has alt text
    AllHaveAlt,
    /// Fewer than half the images lack alt text
    SomeMissing,
    /// Half or more lack alt text
    ManyMissing,
}

/// Alt-text coverage summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AltCoverage {
    /// Images on the page
    pub total: usize,
    /// Images with alt text
    pub with_alt: usize,
    /// Images without alt text
    pub missing: usize,
    /// Rounded share of images with alt text, 0 when there are none
    pub percentage: u32,
    /// Coverage status
    pub status: AltStatus,
}

impl AltCoverage {
    /// Coverage from image counts
    pub fn new(total: usize, missing: usize) -> Self {
        let missing = missing.min(total);
        let with_alt = total - missing;
        let percentage = if total == 0 {
            0
        } else {
            (with_alt as f64 / total as f64 * 100.0).round() as u32
        };
        let status = if total == 0 {
            AltStatus::NoImages
        } else if missing == 0 {
            AltStatus::AllHaveAlt
        } else if (missing as f64) < total as f64 / 2.0 {
            AltStatus::SomeMissing
        } else {
            AltStatus::ManyMissing
        };

        Self {
            total,
            with_alt,
            missing,
            percentage,
            status,
        }
    }
}

/// Audit result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditReport {
    /// Score out of 100
    pub score: u32,
    /// Health band of the score
    pub band: HealthBand,
    /// Findings in rule order
    pub issues: Vec<AuditIssue>,
    /// Alt-text coverage
    pub alt_coverage: AltCoverage,
}

impl AuditReport {
    /// Run every rule over `draft`
    pub fn run(draft: &MetaDraft) -> Self {
        let mut issues = Vec::new();

        issues.push(length_rule(&draft.title, &TITLE_RULE));
        issues.push(length_rule(&draft.description, &DESCRIPTION_RULE));

        issues.push(if draft.image.is_empty() {
            AuditIssue::error("image_missing", "Social share image is missing", 10)
        } else {
            AuditIssue::success("image_good", "Social share image is set")
        });
        issues.push(presence_rule(&draft.url, ("url_missing", "url_good"), "Canonical URL", 5));
        issues.push(presence_rule(
            &draft.keywords,
            ("keywords_missing", "keywords_good"),
            "Keywords",
            5,
        ));
        issues.push(presence_rule(
            &draft.og_type,
            ("og_type_missing", "og_type_good"),
            "Open Graph type",
            3,
        ));
        issues.push(presence_rule(
            &draft.twitter_card,
            ("twitter_card_missing", "twitter_card_good"),
            "Twitter card type",
            3,
        ));

        issues.push(
            if !draft.schema_type.is_empty() && !draft.schema_name.is_empty() {
                AuditIssue::success("schema_good", "Structured data has a type and a name")
            } else {
                AuditIssue::warning(
                    "schema_missing",
                    "Structured data needs both a type and a name",
                    5,
                )
            },
        );

        if draft.robots.contains("noindex") {
            issues.push(AuditIssue::warning(
                "robots_noindex",
                "Robots directive blocks indexing (noindex)",
                5,
            ));
        }

        issues.push(match draft.headings.h1.len() {
            0 => AuditIssue::error("h1_missing", "Page has no H1 heading", 10),
            1 => AuditIssue::success("h1_good", "Page has exactly one H1 heading"),
            n => AuditIssue::warning("h1_multiple", format!("Page has {n} H1 headings"), 5),
        });
        issues.push(if draft.headings.h2.is_empty() {
            AuditIssue::warning("h2_missing", "Page has no H2 headings", 3)
        } else {
            AuditIssue::success("h2_good", "Page has H2 headings")
        });

        if draft.total_images > 0 {
            issues.push(if draft.images_without_alt > 0 {
                let count = draft.images_without_alt;
                let deduction = u32::try_from(count)
                    .unwrap_or(u32::MAX)
                    .saturating_mul(ALT_DEDUCTION_PER_IMAGE)
                    .min(ALT_DEDUCTION_CAP);
                AuditIssue::error(
                    "alt_missing",
                    format!("{count} image(s) are missing alt text"),
                    deduction,
                )
            } else {
                AuditIssue::success("alt_good", "All images have alt text")
            });
        }

        issues.push(if draft.has_verification() {
            AuditIssue::success("verification_good", "Site verification tag found")
        } else {
            AuditIssue::warning("verification_missing", "No site verification tags found", 3)
        });

        let deducted: u32 = issues.iter().map(|issue| issue.deduction).sum();
        let score = 100u32.saturating_sub(deducted);

        Self {
            score,
            band: HealthBand::from_score(score),
            issues,
            alt_coverage: AltCoverage::new(draft.total_images, draft.images_without_alt),
        }
    }

    /// Number of issues with `severity`
    pub fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}

/// Codes and bounds of a length-checked field
struct LengthRule {
    label: &'static str,
    missing: &'static str,
    too_short: &'static str,
    too_long: &'static str,
    good: &'static str,
    min: usize,
    max: usize,
}

const TITLE_RULE: LengthRule = LengthRule {
    label: "Title",
    missing: "title_missing",
    too_short: "title_too_short",
    too_long: "title_too_long",
    good: "title_good",
    min: TITLE_MIN_CHARS,
    max: TITLE_MAX_CHARS,
};

const DESCRIPTION_RULE: LengthRule = LengthRule {
    label: "Description",
    missing: "description_missing",
    too_short: "description_too_short",
    too_long: "description_too_long",
    good: "description_good",
    min: DESCRIPTION_MIN_CHARS,
    max: DESCRIPTION_MAX_CHARS,
};

/// Missing is an error, out-of-range length a warning. Length is counted in
/// characters.
fn length_rule(value: &str, rule: &LengthRule) -> AuditIssue {
    let LengthRule { label, min, max, .. } = *rule;
    let chars = value.chars().count();
    if chars == 0 {
        AuditIssue::error(rule.missing, format!("{label} is missing"), 15)
    } else if chars < min {
        AuditIssue::warning(
            rule.too_short,
            format!("{label} is too short ({chars} characters, aim for {min}-{max})"),
            5,
        )
    } else if chars > max {
        AuditIssue::warning(
            rule.too_long,
            format!("{label} is too long ({chars} characters, aim for {min}-{max})"),
            5,
        )
    } else {
        AuditIssue::success(rule.good, format!("{label} length looks good"))
    }
}

fn presence_rule(
    value: &str,
    (missing, good): (&'static str, &'static str),
    label: &str,
    deduction: u32,
) -> AuditIssue {
    if value.is_empty() {
        AuditIssue::warning(missing, format!("{label} is missing"), deduction)
    } else {
        AuditIssue::success(good, format!("{label} is set"))
    }
}
