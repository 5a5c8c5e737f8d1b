//! Metadata extraction module
//!
//! This module turns fetched HTML into a [`PageMetadata`] record: the
//! document adapter parses the markup, the extractor reads meta tags,
//! headings and images, the schema resolver picks a JSON-LD object, and the
//! assembler merges the two and resolves tag-supplied URLs.

pub mod assemble;
pub mod document;
pub mod metadata;
pub mod schema;

pub use assemble::{assemble, extract_page};
pub use document::{HtmlDocument, PageElement};
pub use metadata::{
    Headings, ImageWithoutAlt, MetadataExtractor, PageMetadata, SchemaData,
    DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, DEFAULT_OG_TYPE, DEFAULT_TWITTER_CARD,
};
pub use schema::{SchemaResolver, QUALIFYING_TYPES};
