//! metatags-web - SEO and social meta tag checker
//!
//! Fetches a webpage and derives the record a search engine or social
//! platform sees: title and description, Open Graph and Twitter card tags,
//! article and robots directives, favicon, heading outline, images lacking
//! alt text, site verification tokens and one representative schema.org
//! JSON-LD object.
//!
//! # Features
//!
//! - **Extraction**: tolerant HTML parsing with documented fallbacks
//! - **Audit**: rule-based SEO score with health bands
//! - **Code generation**: HTML, Angular and Next.js snippets
//! - **HTTP API**: `POST /api/fetch-meta` plus health and status endpoints
//!
//! # Architecture
//!
//! ```text
//! raw input ──▶ normalize ──▶ fetch ──▶ parse ──▶ extract ──┐
//!                                                 │         ├──▶ assemble ──▶ PageMetadata
//!                                                 └─▶ JSON-LD ┘
//!                                                                  │
//!                                               MetaDraft ◀────────┘
//!                                               │      │
//!                                            audit   codegen
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use metatags_web::pipeline::MetadataPipeline;
//! use metatags_web::report::{AuditReport, MetaDraft};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let pipeline = MetadataPipeline::new()?;
//!     let meta = pipeline.extract_metadata("example.com").await?;
//!
//!     let draft = MetaDraft::from_page(&meta, "example.com");
//!     let report = AuditReport::run(&draft);
//!     println!("{}: {}/100 ({})", meta.title, report.score, report.band);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod cors;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod handlers;
pub mod pipeline;
pub mod report;
pub mod server;

// Re-exports for convenience
pub use config::Config;
pub use error::{Error, Result};
pub use extraction::{extract_page, MetadataExtractor, PageMetadata, SchemaData};
pub use pipeline::{MetadataPipeline, PageCheck};
pub use report::{generate_code, AuditReport, CodeFormat, CodeOptions, MetaDraft};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
