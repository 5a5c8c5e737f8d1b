//! Page metadata extraction
//!
//! This module derives the SEO-relevant record of a page: title and
//! description, Open Graph and Twitter Card tags, article timestamps, robots
//! directives, favicon, heading outline, images lacking alt text and site
//! verification tokens.
//!
//! Every field is an ordered list of candidate reads; the first non-empty
//! value wins, otherwise the field's documented default is used. A missing
//! tag never fails extraction.

use crate::extraction::document::HtmlDocument;
use crate::fetch::normalize::{is_data_uri, resolve_against};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

/// Fallback for `ogType`
pub const DEFAULT_OG_TYPE: &str = "website";
/// Fallback for `twitterCard`
pub const DEFAULT_TWITTER_CARD: &str = "summary_large_image";
/// Fallback for `imageWidth`
pub const DEFAULT_IMAGE_WIDTH: &str = "1280";
/// Fallback for `imageHeight`
pub const DEFAULT_IMAGE_HEIGHT: &str = "720";

/// Extracted page metadata, serialized with camelCase keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// `<title>` text, else og:title
    pub title: String,
    /// meta description, else og:description
    pub description: String,
    /// meta keywords
    pub keywords: String,
    /// Host of the page URL
    pub hostname: String,

    /// og:title
    pub og_title: String,
    /// og:description
    pub og_description: String,
    /// og:image (absolute when resolvable)
    pub og_image: String,
    /// og:url, else the page URL
    pub og_url: String,
    /// og:site_name
    pub og_site_name: String,
    /// og:type, else "website"
    pub og_type: String,
    /// og:image:width, else "1280"
    pub image_width: String,
    /// og:image:height, else "720"
    pub image_height: String,

    /// twitter:card, else "summary_large_image"
    pub twitter_card: String,
    /// twitter:site
    pub twitter_site: String,
    /// twitter:title
    pub twitter_title: String,
    /// twitter:description
    pub twitter_description: String,
    /// twitter:image (absolute when resolvable)
    pub twitter_image: String,
    /// twitter:label2
    pub twitter_label2: String,
    /// twitter:data2
    pub twitter_data2: String,

    /// article:publisher
    pub article_publisher: String,
    /// article:published_time
    pub article_published_time: String,
    /// article:modified_time
    pub article_modified_time: String,

    /// meta robots
    pub robots: String,
    /// First icon link (absolute when resolvable)
    pub favicon: String,

    /// h1/h2/h3 outline
    pub headings: Headings,
    /// Images with no or empty alt text, excluding empty and inline sources
    pub images_without_alt_data: Vec<ImageWithoutAlt>,
    /// Length of `images_without_alt_data`
    pub images_without_alt: usize,
    /// Every `<img>` in the document
    pub total_images: usize,

    /// google-site-verification
    pub google_verification: String,
    /// facebook-domain-verification
    pub facebook_verification: String,
    /// p:domain_verify
    pub pinterest_verification: String,
    /// msvalidate.01
    pub bing_verification: String,

    /// JSON-LD fields; absent when no qualifying schema object exists
    #[serde(flatten)]
    pub schema: Option<SchemaData>,
}

/// Heading text by level, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headings {
    /// `<h1>` texts
    pub h1: Vec<String>,
    /// `<h2>` texts
    pub h2: Vec<String>,
    /// `<h3>` texts
    pub h3: Vec<String>,
}

impl Headings {
    /// Total number of headings across levels
    pub fn total(&self) -> usize {
        self.h1.len() + self.h2.len() + self.h3.len()
    }
}

/// An image lacking alternative text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageWithoutAlt {
    /// Absolute source URL when resolvable
    pub src: String,
    /// `width` attribute, verbatim
    pub width: String,
    /// `height` attribute, verbatim
    pub height: String,
}

/// Normalized subset of the first qualifying JSON-LD object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaData {
    /// Matched `@type`
    pub schema_type: String,
    /// `name`
    pub schema_name: String,
    /// `description`
    pub schema_description: String,
    /// `offers.priceCurrency` or `offers.lowPrice.currency`
    pub schema_price_currency: String,
    /// `offers.lowPrice` or `offers.price`
    pub schema_low_price: String,
    /// `offers.highPrice`
    pub schema_high_price: String,
    /// `offers.offerCount`
    pub schema_offer_count: String,
    /// `aggregateRating.ratingValue`
    pub schema_rating_value: String,
    /// `aggregateRating.ratingCount` or `aggregateRating.reviewCount`
    pub schema_rating_count: String,
}

/// How a candidate reads its value from a matched element
#[derive(Debug, Clone, Copy)]
enum Read {
    Text,
    Attr(&'static str),
}

/// One step of a fallback chain
#[derive(Debug, Clone, Copy)]
struct Candidate {
    selector: &'static str,
    read: Read,
}

impl Candidate {
    const fn text(selector: &'static str) -> Self {
        Self {
            selector,
            read: Read::Text,
        }
    }

    const fn content(selector: &'static str) -> Self {
        Self {
            selector,
            read: Read::Attr("content"),
        }
    }

    const fn href(selector: &'static str) -> Self {
        Self {
            selector,
            read: Read::Attr("href"),
        }
    }

    fn read(&self, document: &HtmlDocument) -> Option<String> {
        let element = document.select_first(self.selector)?;
        let value = match self.read {
            Read::Text => element.text().trim().to_string(),
            Read::Attr(name) => element.attr(name)?.to_string(),
        };
        (!value.is_empty()).then_some(value)
    }
}

const TITLE: &[Candidate] = &[
    Candidate::text("title"),
    Candidate::content(r#"meta[property="og:title"]"#),
];
const DESCRIPTION: &[Candidate] = &[
    Candidate::content(r#"meta[name="description"]"#),
    Candidate::content(r#"meta[property="og:description"]"#),
];
const FAVICON: &[Candidate] = &[
    Candidate::href(r#"link[rel="icon"]"#),
    Candidate::href(r#"link[rel="shortcut icon"]"#),
    Candidate::href(r#"link[rel="apple-touch-icon"]"#),
];

/// Evaluate a fallback chain, falling back to `default`
fn first_of(document: &HtmlDocument, candidates: &[Candidate], default: &str) -> String {
    candidates
        .iter()
        .find_map(|candidate| candidate.read(document))
        .unwrap_or_else(|| default.to_string())
}

/// `content` of a single named/property meta tag
fn meta(document: &HtmlDocument, selector: &'static str) -> String {
    first_of(document, &[Candidate::content(selector)], "")
}

/// `content` of a meta tag with a non-empty fallback
fn meta_or(document: &HtmlDocument, selector: &'static str, default: &str) -> String {
    first_of(document, &[Candidate::content(selector)], default)
}

/// Metadata extraction functionality
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Extract every non-schema field from `document`.
    ///
    /// `base` is the final page URL; it supplies `hostname`, the `ogUrl`
    /// fallback and the base for image sources.
    #[instrument(skip(document), fields(base = %base))]
    pub fn extract(document: &HtmlDocument, base: &Url) -> PageMetadata {
        let (images_without_alt_data, total_images) = Self::images_without_alt(document, base);

        let metadata = PageMetadata {
            title: first_of(document, TITLE, ""),
            description: first_of(document, DESCRIPTION, ""),
            keywords: meta(document, r#"meta[name="keywords"]"#),
            hostname: base.host_str().unwrap_or_default().to_string(),

            og_title: meta(document, r#"meta[property="og:title"]"#),
            og_description: meta(document, r#"meta[property="og:description"]"#),
            og_image: meta(document, r#"meta[property="og:image"]"#),
            og_url: meta_or(document, r#"meta[property="og:url"]"#, base.as_str()),
            og_site_name: meta(document, r#"meta[property="og:site_name"]"#),
            og_type: meta_or(document, r#"meta[property="og:type"]"#, DEFAULT_OG_TYPE),
            image_width: meta_or(
                document,
                r#"meta[property="og:image:width"]"#,
                DEFAULT_IMAGE_WIDTH,
            ),
            image_height: meta_or(
                document,
                r#"meta[property="og:image:height"]"#,
                DEFAULT_IMAGE_HEIGHT,
            ),

            twitter_card: meta_or(document, r#"meta[name="twitter:card"]"#, DEFAULT_TWITTER_CARD),
            twitter_site: meta(document, r#"meta[name="twitter:site"]"#),
            twitter_title: meta(document, r#"meta[name="twitter:title"]"#),
            twitter_description: meta(document, r#"meta[name="twitter:description"]"#),
            twitter_image: meta(document, r#"meta[name="twitter:image"]"#),
            twitter_label2: meta(document, r#"meta[name="twitter:label2"]"#),
            twitter_data2: meta(document, r#"meta[name="twitter:data2"]"#),

            article_publisher: meta(document, r#"meta[property="article:publisher"]"#),
            article_published_time: meta(document, r#"meta[property="article:published_time"]"#),
            article_modified_time: meta(document, r#"meta[property="article:modified_time"]"#),

            robots: meta(document, r#"meta[name="robots"]"#),
            favicon: first_of(document, FAVICON, ""),

            headings: Self::headings(document),
            images_without_alt: images_without_alt_data.len(),
            images_without_alt_data,
            total_images,

            google_verification: meta(document, r#"meta[name="google-site-verification"]"#),
            facebook_verification: meta(document, r#"meta[name="facebook-domain-verification"]"#),
            pinterest_verification: meta(document, r#"meta[name="p:domain_verify"]"#),
            bing_verification: meta(document, r#"meta[name="msvalidate.01"]"#),

            schema: None,
        };

        debug!(
            title = %metadata.title,
            headings = metadata.headings.total(),
            total_images = metadata.total_images,
            images_without_alt = metadata.images_without_alt,
            "Extracted page metadata"
        );

        metadata
    }

    /// Trimmed h1/h2/h3 text in document order
    pub fn headings(document: &HtmlDocument) -> Headings {
        let level = |tag: &str| -> Vec<String> {
            document
                .select_all(tag)
                .iter()
                .map(|el| el.text().trim().to_string())
                .collect()
        };

        Headings {
            h1: level("h1"),
            h2: level("h2"),
            h3: level("h3"),
        }
    }

    /// Images with a missing or empty `alt`, plus the count of all images.
    ///
    /// Sources are resolved against `base`; entries left with an empty or
    /// `data:` source are dropped.
    pub fn images_without_alt(
        document: &HtmlDocument,
        base: &Url,
    ) -> (Vec<ImageWithoutAlt>, usize) {
        let images = document.select_all("img");
        let total = images.len();

        let missing = images
            .iter()
            .filter(|img| img.attr("alt").map_or(true, str::is_empty))
            .map(|img| ImageWithoutAlt {
                src: resolve_against(img.attr("src").unwrap_or_default(), base),
                width: img.attr("width").unwrap_or_default().to_string(),
                height: img.attr("height").unwrap_or_default().to_string(),
            })
            .filter(|img| !img.src.is_empty() && !is_data_uri(&img.src))
            .collect();

        (missing, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Url {
        Url::parse("https://example.com/articles/one").unwrap()
    }

    fn extract(html: &str) -> PageMetadata {
        MetadataExtractor::extract(&HtmlDocument::parse(html), &base())
    }

    #[test]
    fn test_defaults_for_empty_document() {
        let meta = extract("");
        assert_eq!(meta.title, "");
        assert_eq!(meta.description, "");
        assert_eq!(meta.og_type, "website");
        assert_eq!(meta.twitter_card, "summary_large_image");
        assert_eq!(meta.image_width, "1280");
        assert_eq!(meta.image_height, "720");
        assert_eq!(meta.og_url, "https://example.com/articles/one");
        assert_eq!(meta.hostname, "example.com");
        assert_eq!(meta.total_images, 0);
        assert_eq!(meta.images_without_alt, 0);
        assert!(meta.images_without_alt_data.is_empty());
        assert_eq!(meta.headings, Headings::default());
        assert!(meta.schema.is_none());
    }

    #[test]
    fn test_title_falls_back_to_og_title() {
        let meta = extract(r#"<meta property="og:title" content="From OG">"#);
        assert_eq!(meta.title, "From OG");

        let meta = extract(
            r#"<title>  Real Title
            </title><meta property="og:title" content="From OG">"#,
        );
        assert_eq!(meta.title, "Real Title");
        assert_eq!(meta.og_title, "From OG");
    }

    #[test]
    fn test_whitespace_only_title_falls_through() {
        let meta = extract(
            r#"<title>   
            </title><meta property="og:title" content="From OG">"#,
        );
        assert_eq!(meta.title, "From OG");

        let meta = extract("<title>  </title>");
        assert_eq!(meta.title, "");
    }

    #[test]
    fn test_description_falls_back_to_og_description() {
        let meta = extract(
            r#"<meta name="description" content=""><meta property="og:description" content="OG desc">"#,
        );
        assert_eq!(meta.description, "OG desc");
        assert_eq!(meta.og_description, "OG desc");
    }

    #[test]
    fn test_open_graph_twitter_article_fields() {
        let meta = extract(
            r#"<head>
            <meta property="og:type" content="article">
            <meta property="og:site_name" content="Example">
            <meta property="og:image" content="https://cdn.example.com/a.png">
            <meta property="og:image:width" content="1200">
            <meta property="og:image:height" content="630">
            <meta property="og:url" content="https://example.com/canonical">
            <meta name="twitter:card" content="summary">
            <meta name="twitter:site" content="@example">
            <meta name="twitter:title" content="TW title">
            <meta name="twitter:description" content="TW desc">
            <meta name="twitter:image" content="/tw.png">
            <meta name="twitter:label2" content="Reading time">
            <meta name="twitter:data2" content="3 minutes">
            <meta property="article:publisher" content="https://facebook.com/example">
            <meta property="article:published_time" content="2024-01-01T00:00:00Z">
            <meta property="article:modified_time" content="2024-02-01T00:00:00Z">
            <meta name="robots" content="noindex, nofollow">
            <meta name="keywords" content="a, b, c">
            </head>"#,
        );

        assert_eq!(meta.og_type, "article");
        assert_eq!(meta.og_site_name, "Example");
        assert_eq!(meta.og_image, "https://cdn.example.com/a.png");
        assert_eq!(meta.image_width, "1200");
        assert_eq!(meta.image_height, "630");
        assert_eq!(meta.og_url, "https://example.com/canonical");
        assert_eq!(meta.twitter_card, "summary");
        assert_eq!(meta.twitter_site, "@example");
        assert_eq!(meta.twitter_title, "TW title");
        assert_eq!(meta.twitter_description, "TW desc");
        // Resolution of tag URLs happens at assembly.
        assert_eq!(meta.twitter_image, "/tw.png");
        assert_eq!(meta.twitter_label2, "Reading time");
        assert_eq!(meta.twitter_data2, "3 minutes");
        assert_eq!(meta.article_publisher, "https://facebook.com/example");
        assert_eq!(meta.article_published_time, "2024-01-01T00:00:00Z");
        assert_eq!(meta.article_modified_time, "2024-02-01T00:00:00Z");
        assert_eq!(meta.robots, "noindex, nofollow");
        assert_eq!(meta.keywords, "a, b, c");
    }

    #[test]
    fn test_headings_in_order_and_trimmed() {
        let meta = extract(
            "<h1> Main </h1><h2>First</h2><h3>Sub</h3><h2>\n Second <em>part</em></h2>",
        );
        assert_eq!(meta.headings.h1, vec!["Main"]);
        assert_eq!(meta.headings.h2, vec!["First", "Second part"]);
        assert_eq!(meta.headings.h3, vec!["Sub"]);
        assert_eq!(meta.headings.total(), 4);
    }

    #[test]
    fn test_padded_data_uri_images_are_dropped() {
        let meta = extract(
            r#"<img src=" data:image/gif;base64,R0lGOD">
            <img src="DATA:image/png;base64,AAAA">
            <img src=" /padded.png ">"#,
        );
        assert_eq!(meta.total_images, 3);
        assert_eq!(meta.images_without_alt, 1);
        assert_eq!(
            meta.images_without_alt_data[0].src,
            "https://example.com/padded.png"
        );
    }

    #[test]
    fn test_images_without_alt() {
        let meta = extract(
            r#"<body>
            <img src="/a.png" alt="described">
            <img src="/b.png" width="10" height="20">
            <img src="c.png" alt="">
            <img src="data:image/gif;base64,R0lGOD">
            <img>
            <img src="https://cdn.example.com/d.png" alt>
            <img src="/e.png" alt=" ">
            </body>"#,
        );

        assert_eq!(meta.total_images, 7);
        assert_eq!(
            meta.images_without_alt_data,
            vec![
                ImageWithoutAlt {
                    src: "https://example.com/b.png".to_string(),
                    width: "10".to_string(),
                    height: "20".to_string(),
                },
                ImageWithoutAlt {
                    src: "https://example.com/articles/c.png".to_string(),
                    width: String::new(),
                    height: String::new(),
                },
                ImageWithoutAlt {
                    src: "https://cdn.example.com/d.png".to_string(),
                    width: String::new(),
                    height: String::new(),
                },
            ]
        );
        assert_eq!(meta.images_without_alt, 3);
    }

    #[test]
    fn test_verification_tags_independent() {
        let meta = extract(
            r#"<meta name="google-site-verification" content="g-token">
            <meta name="msvalidate.01" content="b-token">"#,
        );
        assert_eq!(meta.google_verification, "g-token");
        assert_eq!(meta.facebook_verification, "");
        assert_eq!(meta.pinterest_verification, "");
        assert_eq!(meta.bing_verification, "b-token");

        let meta = extract(
            r#"<meta name="facebook-domain-verification" content="f-token">
            <meta name="p:domain_verify" content="p-token">"#,
        );
        assert_eq!(meta.facebook_verification, "f-token");
        assert_eq!(meta.pinterest_verification, "p-token");
    }

    #[test]
    fn test_favicon_precedence() {
        let meta = extract(
            r#"<link rel="apple-touch-icon" href="/apple.png">
            <link rel="shortcut icon" href="/short.ico">"#,
        );
        assert_eq!(meta.favicon, "/short.ico");

        let meta = extract(
            r#"<link rel="apple-touch-icon" href="/apple.png">
            <link rel="icon" href="/icon.svg">"#,
        );
        assert_eq!(meta.favicon, "/icon.svg");

        let meta = extract(r#"<link rel="apple-touch-icon" href="/apple.png">"#);
        assert_eq!(meta.favicon, "/apple.png");
    }

    #[test]
    fn test_serializes_camel_case_without_schema() {
        let json = serde_json::to_value(extract("<title>T</title>")).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["ogType"], "website");
        assert_eq!(json["twitterLabel2"], "");
        assert_eq!(json["imagesWithoutAlt"], 0);
        assert!(json["headings"]["h1"].as_array().unwrap().is_empty());
        assert!(json.get("schemaType").is_none());
    }

    #[test]
    fn test_schema_fields_flatten_into_record() {
        let meta = PageMetadata {
            schema: Some(SchemaData {
                schema_type: "Product".to_string(),
                schema_name: "Widget".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["schemaType"], "Product");
        assert_eq!(json["schemaName"], "Widget");
        assert_eq!(json["schemaLowPrice"], "");

        let parsed: PageMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, meta);
    }
}
