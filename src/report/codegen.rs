//! Markup generation
//!
//! Renders a [`MetaDraft`] as paste-ready code: plain HTML head tags, an
//! Angular `Title`/`Meta` service snippet, or a Next.js `metadata` export.
//! Empty fields are skipped. Values are escaped for the target syntax.

use crate::extraction::{DEFAULT_OG_TYPE, DEFAULT_TWITTER_CARD};
use crate::report::draft::{
    MetaDraft, DEFAULT_IMAGE_TYPE, DEFAULT_PRICE_CURRENCY, DEFAULT_SCHEMA_TYPE,
};
use serde_json::{json, Map, Value};

/// Output used when nothing was generated
pub const EMPTY_PLACEHOLDER: &str = "<!-- Enter your meta data to generate code -->";

const FALLBACK_WIDTH: u64 = 1280;
const FALLBACK_HEIGHT: u64 = 720;

/// Target syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CodeFormat {
    /// `<meta>` tags for a document head
    #[default]
    Html,
    /// Angular `Title` / `Meta` service calls
    Angular,
    /// Next.js app-router `metadata` export
    #[value(name = "nextjs")]
    NextJs,
}

/// Tag groups to include
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeOptions {
    /// Title, description, keywords, canonical, robots
    pub basic: bool,
    /// Open Graph and article tags
    pub open_graph: bool,
    /// Twitter card tags
    pub twitter: bool,
    /// Schema.org JSON-LD (only emitted when a schema name is set)
    pub schema: bool,
}

impl Default for CodeOptions {
    fn default() -> Self {
        Self {
            basic: true,
            open_graph: true,
            twitter: true,
            schema: false,
        }
    }
}

/// Generate code for `draft`
pub fn generate_code(draft: &MetaDraft, format: CodeFormat, options: CodeOptions) -> String {
    let code = match format {
        CodeFormat::Html => html(draft, options),
        CodeFormat::Angular => angular(draft, options),
        CodeFormat::NextJs => nextjs(draft, options),
    };

    if code.trim().is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        code
    }
}

/// The schema.org JSON-LD object for `draft`
pub fn schema_json(draft: &MetaDraft) -> Value {
    let mut schema = Map::new();
    schema.insert("@context".into(), json!("https://schema.org"));
    schema.insert(
        "@type".into(),
        json!(or_default(&draft.schema_type, DEFAULT_SCHEMA_TYPE)),
    );
    insert_non_empty(&mut schema, "name", &draft.schema_name);
    insert_non_empty(&mut schema, "description", &draft.schema_description);
    insert_non_empty(&mut schema, "url", &draft.url);

    if draft.schema_type == "ItemList" {
        let mut items = Vec::new();
        if !draft.schema_name.is_empty() {
            items.push(json!({
                "@type": "ListItem",
                "position": 1,
                "name": draft.schema_name,
                "url": draft.url,
            }));
        }
        schema.insert("itemListElement".into(), Value::Array(items));
    }

    if !draft.schema_low_price.is_empty() || !draft.schema_high_price.is_empty() {
        let mut offers = Map::new();
        offers.insert("@type".into(), json!("AggregateOffer"));
        offers.insert(
            "priceCurrency".into(),
            json!(or_default(&draft.schema_price_currency, DEFAULT_PRICE_CURRENCY)),
        );
        insert_non_empty(&mut offers, "lowPrice", &draft.schema_low_price);
        insert_non_empty(&mut offers, "highPrice", &draft.schema_high_price);
        insert_non_empty(&mut offers, "offerCount", &draft.schema_offer_count);
        insert_non_empty(&mut offers, "url", &draft.url);
        schema.insert("offers".into(), Value::Object(offers));
    }

    if !draft.schema_rating_value.is_empty() || !draft.schema_rating_count.is_empty() {
        let mut rating = Map::new();
        rating.insert("@type".into(), json!("AggregateRating"));
        insert_non_empty(&mut rating, "ratingValue", &draft.schema_rating_value);
        insert_non_empty(&mut rating, "ratingCount", &draft.schema_rating_count);
        schema.insert("aggregateRating".into(), Value::Object(rating));
    }

    Value::Object(schema)
}

fn schema_text(draft: &MetaDraft) -> String {
    pretty(&schema_json(draft))
}

fn html(draft: &MetaDraft, options: CodeOptions) -> String {
    let mut out = String::new();

    if options.basic {
        out.push_str("<!-- Primary Meta Tags -->\n");
        if !draft.title.is_empty() {
            out.push_str(&format!("<title>{}</title>\n", escape_html(&draft.title)));
        }
        for (name, value) in [
            ("title", &draft.title),
            ("description", &draft.description),
            ("keywords", &draft.keywords),
        ] {
            push_meta(&mut out, "name", name, value);
        }
        if !draft.url.is_empty() {
            out.push_str(&format!(
                "<link rel=\"canonical\" href=\"{}\">\n",
                escape_html(&draft.url)
            ));
        }
        push_meta(&mut out, "name", "robots", &draft.robots);
        out.push('\n');
    }

    if options.open_graph {
        out.push_str("<!-- Open Graph / Facebook -->\n");
        push_meta(
            &mut out,
            "property",
            "og:type",
            or_default(&draft.og_type, DEFAULT_OG_TYPE),
        );
        for (property, value) in open_graph_fields(draft) {
            push_meta(&mut out, "property", property, value);
        }
        out.push('\n');
    }

    if options.twitter {
        out.push_str("<!-- Twitter -->\n");
        for (name, value) in twitter_fields(draft) {
            push_meta(&mut out, "name", name, value);
        }
        out.push('\n');
    }

    if options.schema && !draft.schema_name.is_empty() {
        out.push_str("<!-- Schema.org JSON-LD -->\n");
        out.push_str(&format!(
            "<script type=\"application/ld+json\">\n{}\n</script>\n",
            // JSON-LD is raw text; only a closing tag can break out of it
            schema_text(draft).replace("</", "<\\/")
        ));
    }

    out
}

fn angular(draft: &MetaDraft, options: CodeOptions) -> String {
    let mut lines: Vec<String> = [
        "// Import services in your component",
        "import { Title, Meta } from '@angular/platform-browser';",
        "import { DOCUMENT } from '@angular/common';",
        "import { Inject } from '@angular/core';",
        "",
        "// In your component constructor:",
        "constructor(private titleService: Title, private metaService: Meta, @Inject(DOCUMENT) private dom: Document) {}",
        "",
        "// In ngOnInit() or your setup method:",
        "",
    ]
    .iter()
    .map(|line| line.to_string())
    .collect();

    if options.basic {
        if !draft.title.is_empty() {
            lines.push("// Set title".into());
            lines.push(format!("this.titleService.setTitle('{}');", js_str(&draft.title)));
            lines.push(String::new());
        }

        lines.push("// Basic meta tags".into());
        for (name, value) in [
            ("description", &draft.description),
            ("keywords", &draft.keywords),
            ("robots", &draft.robots),
        ] {
            if !value.is_empty() {
                lines.push("this.metaService.updateTag({".into());
                lines.push(format!("  name: '{name}',"));
                lines.push(format!("  content: '{}'", js_str(value)));
                lines.push("});".into());
            }
        }
        lines.push(String::new());

        if !draft.url.is_empty() {
            lines.push("// Canonical link".into());
            lines.push("const head = this.dom.getElementsByTagName('head')[0];".into());
            lines.push(
                "const element: HTMLLinkElement = this.dom.createElement('link') as HTMLLinkElement;"
                    .into(),
            );
            lines.push("head.appendChild(element);".into());
            lines.push("element.setAttribute('rel', 'canonical');".into());
            lines.push(format!("element.setAttribute('href', '{}');", js_str(&draft.url)));
            lines.push(String::new());
        }
    }

    if options.open_graph {
        lines.push("// Open Graph tags".into());
        lines.push(update_tag("og:type", or_default(&draft.og_type, DEFAULT_OG_TYPE)));
        for (property, value) in open_graph_fields(draft) {
            if !value.is_empty() {
                lines.push(update_tag(property, value));
            }
        }
        lines.push(String::new());
    }

    if options.twitter {
        lines.push("// Twitter Card tags".into());
        for (property, value) in twitter_fields(draft) {
            if !value.is_empty() {
                lines.push(update_tag(property, value));
            }
        }
        lines.push(String::new());
    }

    if options.schema && !draft.schema_name.is_empty() {
        lines.push("// Schema.org JSON-LD".into());
        lines.push("const schemaScript = this.dom.createElement('script');".into());
        lines.push("schemaScript.type = 'application/ld+json';".into());
        lines.push(format!("schemaScript.text = `{}`;", js_template(&schema_text(draft))));
        lines.push("this.dom.head.appendChild(schemaScript);".into());
    }

    lines.join("\n")
}

fn nextjs(draft: &MetaDraft, options: CodeOptions) -> String {
    let mut metadata = Map::new();

    if options.basic {
        insert_non_empty(&mut metadata, "title", &draft.title);
        insert_non_empty(&mut metadata, "description", &draft.description);
        if !draft.keywords.is_empty() {
            let keywords: Vec<&str> = draft.keywords.split(',').map(str::trim).collect();
            metadata.insert("keywords".into(), json!(keywords));
        }
        insert_non_empty(&mut metadata, "robots", &draft.robots);
    }

    if options.open_graph || options.twitter {
        let mut open_graph = Map::new();
        open_graph.insert(
            "type".into(),
            json!(or_default(&draft.og_type, DEFAULT_OG_TYPE)),
        );
        insert_non_empty(&mut open_graph, "title", &draft.title);
        insert_non_empty(&mut open_graph, "description", &draft.description);
        insert_non_empty(&mut open_graph, "url", &draft.url);
        insert_non_empty(&mut open_graph, "siteName", &draft.site_name);
        if !draft.image.is_empty() {
            open_graph.insert(
                "images".into(),
                json!([{
                    "url": draft.image,
                    "width": leading_int(&draft.image_width).unwrap_or(FALLBACK_WIDTH),
                    "height": leading_int(&draft.image_height).unwrap_or(FALLBACK_HEIGHT),
                    "type": or_default(&draft.image_type, DEFAULT_IMAGE_TYPE),
                }]),
            );
        }
        insert_non_empty(&mut open_graph, "publishedTime", &draft.article_published_time);
        insert_non_empty(&mut open_graph, "modifiedTime", &draft.article_modified_time);
        metadata.insert("openGraph".into(), Value::Object(open_graph));
    }

    if options.twitter {
        let mut twitter = Map::new();
        twitter.insert(
            "card".into(),
            json!(or_default(&draft.twitter_card, DEFAULT_TWITTER_CARD)),
        );
        insert_non_empty(&mut twitter, "title", &draft.title);
        insert_non_empty(&mut twitter, "description", &draft.description);
        if !draft.image.is_empty() {
            twitter.insert("images".into(), json!([draft.image]));
        }
        insert_non_empty(&mut twitter, "site", &draft.twitter_site);
        metadata.insert("twitter".into(), Value::Object(twitter));
    }

    let mut code = format!(
        "import type {{ Metadata }} from 'next'\n\nexport const metadata: Metadata = {}\n",
        pretty(&Value::Object(metadata))
    );

    if options.schema && !draft.schema_name.is_empty() {
        code.push_str(&format!("\nconst jsonLd = {}\n", schema_text(draft)));
        code.push_str(concat!(
            "\nexport default function Page() {\n",
            "  return (\n",
            "    <>\n",
            "      <script\n",
            "        type=\"application/ld+json\"\n",
            "        dangerouslySetInnerHTML={{ __html: JSON.stringify(jsonLd) }}\n",
            "      />\n",
            "      <div>\n",
            "        {/* Your page content */}\n",
            "      </div>\n",
            "    </>\n",
            "  )\n",
            "}\n",
        ));
    } else {
        code.push_str(concat!(
            "\nexport default function Page() {\n",
            "  return (\n",
            "    <div>\n",
            "      {/* Your page content */}\n",
            "    </div>\n",
            "  )\n",
            "}\n",
        ));
    }

    code
}

/// Open Graph tags after `og:type`, in output order
fn open_graph_fields(draft: &MetaDraft) -> [(&'static str, &str); 11] {
    [
        ("og:url", draft.url.as_str()),
        ("og:title", draft.title.as_str()),
        ("og:description", draft.description.as_str()),
        ("og:image", draft.image.as_str()),
        ("og:image:width", draft.image_width.as_str()),
        ("og:image:height", draft.image_height.as_str()),
        ("og:image:type", draft.image_type.as_str()),
        ("og:site_name", draft.site_name.as_str()),
        ("article:publisher", draft.article_publisher.as_str()),
        ("article:published_time", draft.article_published_time.as_str()),
        ("article:modified_time", draft.article_modified_time.as_str()),
    ]
}

fn twitter_fields(draft: &MetaDraft) -> [(&'static str, &str); 11] {
    [
        ("twitter:card", draft.twitter_card.as_str()),
        ("twitter:url", draft.url.as_str()),
        ("twitter:title", draft.title.as_str()),
        ("twitter:description", draft.description.as_str()),
        ("twitter:image", draft.image.as_str()),
        ("twitter:image:width", draft.image_width.as_str()),
        ("twitter:image:height", draft.image_height.as_str()),
        ("twitter:image:type", draft.image_type.as_str()),
        ("twitter:site", draft.twitter_site.as_str()),
        ("twitter:label2", draft.twitter_label2.as_str()),
        ("twitter:data2", draft.twitter_data2.as_str()),
    ]
}

fn push_meta(out: &mut String, attr: &str, key: &str, value: &str) {
    if !value.is_empty() {
        out.push_str(&format!(
            "<meta {attr}=\"{key}\" content=\"{}\">\n",
            escape_html(value)
        ));
    }
}

fn update_tag(property: &str, value: &str) -> String {
    format!(
        "this.metaService.updateTag({{ property: '{property}', content: '{}' }});",
        js_str(value)
    )
}

fn escape_html(value: &str) -> String {
    htmlescape::encode_minimal(value)
}

/// Escape for a single-quoted JS string literal
fn js_str(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n")
}

/// Escape for a JS template literal
fn js_template(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

fn insert_non_empty(map: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        map.insert(key.to_string(), json!(value));
    }
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

/// Leading decimal integer of `value`, ignoring trailing units such as `px`.
/// Zero counts as missing.
fn leading_int(value: &str) -> Option<u64> {
    let digits: String = value
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok().filter(|n| *n != 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn draft() -> MetaDraft {
        MetaDraft {
            title: "Widgets & Co".to_string(),
            description: "Buy \"great\" widgets".to_string(),
            keywords: "widgets, tools ,shop".to_string(),
            url: "https://example.com/widgets".to_string(),
            site_name: "Example".to_string(),
            image: "https://example.com/og.png".to_string(),
            twitter_site: "@example".to_string(),
            schema_name: "Widget Course".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_html_sections_and_escaping() {
        let code = generate_code(&draft(), CodeFormat::Html, CodeOptions::default());
        assert!(code.starts_with("<!-- Primary Meta Tags -->\n<title>Widgets &amp; Co</title>\n"));
        assert!(code.contains("<meta name=\"description\" content=\"Buy &quot;great&quot; widgets\">"));
        assert!(code.contains("<link rel=\"canonical\" href=\"https://example.com/widgets\">"));
        assert!(code.contains("<meta property=\"og:type\" content=\"website\">"));
        assert!(code.contains("<meta property=\"og:image:width\" content=\"1280\">"));
        assert!(code.contains("<meta name=\"twitter:card\" content=\"summary_large_image\">"));
        assert!(code.contains("<meta name=\"twitter:site\" content=\"@example\">"));
        assert!(!code.contains("Schema.org"));
    }

    #[test]
    fn test_html_skips_empty_fields() {
        let code = generate_code(&MetaDraft::default(), CodeFormat::Html, CodeOptions::default());
        assert!(!code.contains("<title>"));
        assert!(!code.contains("og:url"));
        assert!(code.contains("og:type"));
    }

    #[test]
    fn test_nothing_selected_yields_placeholder() {
        let options = CodeOptions {
            basic: false,
            open_graph: false,
            twitter: false,
            schema: true,
        };
        let empty_schema = MetaDraft::default();
        assert_eq!(
            generate_code(&empty_schema, CodeFormat::Html, options),
            EMPTY_PLACEHOLDER
        );
    }

    #[test]
    fn test_schema_json() {
        let mut draft = draft();
        draft.schema_low_price = "499".to_string();
        draft.schema_rating_count = "20".to_string();

        let schema = schema_json(&draft);
        assert_eq!(
            schema,
            json!({
                "@context": "https://schema.org",
                "@type": "Course",
                "name": "Widget Course",
                "url": "https://example.com/widgets",
                "offers": {
                    "@type": "AggregateOffer",
                    "priceCurrency": "INR",
                    "lowPrice": "499",
                    "url": "https://example.com/widgets"
                },
                "aggregateRating": {
                    "@type": "AggregateRating",
                    "ratingCount": "20"
                }
            })
        );
    }

    #[test]
    fn test_item_list_schema() {
        let mut draft = draft();
        draft.schema_type = "ItemList".to_string();
        let schema = schema_json(&draft);
        assert_eq!(schema["itemListElement"][0]["position"], json!(1));
        assert_eq!(schema["itemListElement"][0]["name"], json!("Widget Course"));
    }

    #[test]
    fn test_schema_included_when_requested() {
        let options = CodeOptions {
            schema: true,
            ..Default::default()
        };
        let code = generate_code(&draft(), CodeFormat::Html, options);
        assert!(code.contains("<script type=\"application/ld+json\">\n{\n  \"@context\""));
    }

    #[test]
    fn test_angular_escapes_quotes() {
        let mut draft = draft();
        draft.title = "Bob's widgets".to_string();
        let code = generate_code(&draft, CodeFormat::Angular, CodeOptions::default());
        assert!(code.contains("this.titleService.setTitle('Bob\\'s widgets');"));
        assert!(code.contains("element.setAttribute('href', 'https://example.com/widgets');"));
        assert!(code.contains(
            "this.metaService.updateTag({ property: 'og:type', content: 'website' });"
        ));
    }

    #[test]
    fn test_nextjs_metadata() {
        let mut draft = draft();
        draft.image_width = "1200px".to_string();
        draft.image_height = "0".to_string();
        let code = generate_code(&draft, CodeFormat::NextJs, CodeOptions::default());

        let start = code.find("= {").unwrap() + 2;
        let end = code.find("\n\nexport default").unwrap();
        let metadata: Value = serde_json::from_str(&code[start..end]).unwrap();

        assert_eq!(metadata["keywords"], json!(["widgets", "tools", "shop"]));
        assert_eq!(metadata["openGraph"]["images"][0]["width"], json!(1200));
        assert_eq!(metadata["openGraph"]["images"][0]["height"], json!(720));
        assert_eq!(metadata["twitter"]["images"], json!(["https://example.com/og.png"]));
        assert!(code.starts_with("import type { Metadata } from 'next'"));
        assert!(code.contains("{/* Your page content */}"));
    }

    #[test]
    fn test_leading_int() {
        assert_eq!(leading_int("720"), Some(720));
        assert_eq!(leading_int(" 64px"), Some(64));
        assert_eq!(leading_int("auto"), None);
        assert_eq!(leading_int("0"), None);
    }
}
