//! JSON-LD structured data resolution
//!
//! Scans `<script type="application/ld+json">` blocks in document order and
//! picks the first top-level object typed `Course`, `Product` or
//! `Organization`. `@graph` members and `@type` arrays are a fallback only.
//! Blocks that fail to parse are skipped. The input is page-controlled, so
//! every lookup goes through optional-path accessors over `serde_json::Value`.

use crate::extraction::document::HtmlDocument;
use crate::extraction::metadata::SchemaData;
use serde_json::Value;
use tracing::{debug, instrument, warn};

/// Schema.org types that qualify as the page's representative object
pub const QUALIFYING_TYPES: [&str; 3] = ["Course", "Product", "Organization"];

const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;

const CURRENCY: &[&[&str]] = &[
    &["offers", "priceCurrency"],
    &["offers", "lowPrice", "currency"],
];
const LOW_PRICE: &[&[&str]] = &[&["offers", "lowPrice"], &["offers", "price"]];
const HIGH_PRICE: &[&[&str]] = &[&["offers", "highPrice"]];
const OFFER_COUNT: &[&[&str]] = &[&["offers", "offerCount"]];
const RATING_VALUE: &[&[&str]] = &[&["aggregateRating", "ratingValue"]];
const RATING_COUNT: &[&[&str]] = &[
    &["aggregateRating", "ratingCount"],
    &["aggregateRating", "reviewCount"],
];

/// JSON-LD resolver
pub struct SchemaResolver;

impl SchemaResolver {
    /// Resolve the representative schema object of `document`.
    ///
    /// Each block is normalized to its top-level objects (the object, or the
    /// array's elements) and the first one whose `@type` string is a
    /// qualifying type wins. Only when no block matches that way are `@graph`
    /// members and `@type` arrays considered.
    ///
    /// Returns `None` when no block holds a qualifying object.
    #[instrument(skip_all)]
    pub fn resolve(document: &HtmlDocument) -> Option<SchemaData> {
        let blocks = parse_blocks(document);

        let strict = blocks
            .iter()
            .enumerate()
            .find_map(|(index, value)| Some((index, Self::resolve_value(value)?)));
        let matched = strict.or_else(|| {
            blocks
                .iter()
                .enumerate()
                .find_map(|(index, value)| Some((index, Self::resolve_value_extended(value)?)))
        });

        match matched {
            Some((index, schema)) => {
                debug!(block = index, schema_type = %schema.schema_type, "Matched JSON-LD object");
                Some(schema)
            }
            None => {
                debug!("No qualifying JSON-LD object");
                None
            }
        }
    }

    /// Select and extract the first top-level object of one parsed block
    /// whose `@type` is a qualifying type
    pub fn resolve_value(value: &Value) -> Option<SchemaData> {
        top_level(value).into_iter().find_map(|object| {
            let ty = object.get("@type")?.as_str()?;
            QUALIFYING_TYPES
                .contains(&ty)
                .then(|| extract_fields(object, ty))
        })
    }

    /// Like [`resolve_value`](Self::resolve_value), but also scans `@graph`
    /// members and accepts an `@type` array containing a qualifying type
    pub fn resolve_value_extended(value: &Value) -> Option<SchemaData> {
        top_level(value)
            .into_iter()
            .flat_map(with_graph)
            .find_map(|object| qualifying_type(object).map(|ty| extract_fields(object, ty)))
    }
}

/// Parsed blocks in document order. Empty and malformed blocks are skipped.
fn parse_blocks(document: &HtmlDocument) -> Vec<Value> {
    let mut blocks = Vec::new();
    for (index, block) in document.select_all(JSON_LD_SELECTOR).iter().enumerate() {
        let text = block.text();
        let source = text.trim();
        if source.is_empty() {
            continue;
        }

        match serde_json::from_str(source) {
            Ok(value) => blocks.push(value),
            Err(e) => warn!(block = index, error = %e, "Skipping malformed JSON-LD block"),
        }
    }
    blocks
}

/// The objects of one block: the array's elements, or the value itself
fn top_level(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn with_graph(object: &Value) -> Vec<&Value> {
    let mut out = vec![object];
    if let Some(Value::Array(graph)) = object.get("@graph") {
        out.extend(graph.iter());
    }
    out
}

/// The qualifying `@type` of `object`, if any
fn qualifying_type(object: &Value) -> Option<&str> {
    match object.get("@type")? {
        Value::String(ty) => QUALIFYING_TYPES
            .contains(&ty.as_str())
            .then_some(ty.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|ty| QUALIFYING_TYPES.contains(ty)),
        _ => None,
    }
}

fn extract_fields(object: &Value, schema_type: &str) -> SchemaData {
    SchemaData {
        schema_type: schema_type.to_string(),
        schema_name: first_text(object, &[&["name"]]),
        schema_description: first_text(object, &[&["description"]]),
        schema_price_currency: first_text(object, CURRENCY),
        schema_low_price: first_text(object, LOW_PRICE),
        schema_high_price: first_text(object, HIGH_PRICE),
        schema_offer_count: first_text(object, OFFER_COUNT),
        schema_rating_value: first_text(object, RATING_VALUE),
        schema_rating_count: first_text(object, RATING_COUNT),
    }
}

/// Follow `keys` from `value`. An array met on the way stands for its first
/// element (e.g. a list of offers).
fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .try_fold(value, |current, key| first_if_array(current).get(*key))
}

fn first_if_array(value: &Value) -> &Value {
    match value {
        Value::Array(items) => items.first().unwrap_or(value),
        other => other,
    }
}

/// Scalar rendered as text; null, false, empty strings and containers are
/// treated as missing
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// First non-empty scalar among `paths`, else `""`
fn first_text(object: &Value, paths: &[&[&str]]) -> String {
    paths
        .iter()
        .find_map(|path| lookup(object, path).and_then(scalar_text))
        .unwrap_or_default()
}
