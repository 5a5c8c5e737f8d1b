//! Result assembly
//!
//! Combines extractor output with the optional JSON-LD group and performs the
//! final URL resolution pass over tag-supplied URLs.

use crate::extraction::document::HtmlDocument;
use crate::extraction::metadata::{MetadataExtractor, PageMetadata, SchemaData};
use crate::extraction::schema::SchemaResolver;
use crate::fetch::normalize::resolve_against;
use tracing::instrument;
use url::Url;

/// Merge `schema` into `extracted` and resolve `ogImage`, `twitterImage`,
/// `favicon` and `ogUrl` against `base`.
///
/// Schema fields are additive; no extracted field is overwritten.
pub fn assemble(mut extracted: PageMetadata, schema: Option<SchemaData>, base: &Url) -> PageMetadata {
    for field in [
        &mut extracted.og_image,
        &mut extracted.twitter_image,
        &mut extracted.favicon,
        &mut extracted.og_url,
    ] {
        *field = resolve_against(field, base);
    }

    extracted.schema = schema;
    extracted
}

/// Run extraction, schema resolution and assembly over raw HTML.
///
/// `base` must be the final (post-redirect) URL of the page. This function is
/// synchronous and never fails; malformed input degrades to defaults.
///
/// # Example
///
/// ```rust
/// use metatags_web::extraction::extract_page;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/").unwrap();
/// let meta = extract_page("<title>Example</title>", &base);
/// assert_eq!(meta.title, "Example");
/// assert_eq!(meta.description, "");
/// assert_eq!(meta.og_type, "website");
/// assert_eq!(meta.twitter_card, "summary_large_image");
/// ```
#[instrument(skip(html), fields(bytes = html.len(), base = %base))]
pub fn extract_page(html: &str, base: &Url) -> PageMetadata {
    let document = HtmlDocument::parse(html);
    let extracted = MetadataExtractor::extract(&document, base);
    let schema = SchemaResolver::resolve(&document);
    assemble(extracted, schema, base)
}
