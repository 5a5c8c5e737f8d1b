//! Reports built on top of an extracted record
//!
//! - [`draft`]: the editable projection of a record, with display fallbacks
//! - [`audit`]: rule-based SEO health score
//! - [`codegen`]: ready-to-paste markup in several formats

pub mod audit;
pub mod codegen;
pub mod draft;

pub use audit::{AltCoverage, AltStatus, AuditIssue, AuditReport, HealthBand, Severity};
pub use codegen::{generate_code, schema_json, CodeFormat, CodeOptions};
pub use draft::MetaDraft;
