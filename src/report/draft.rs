//! Editable metadata draft
//!
//! A [`MetaDraft`] is what a user edits and what the audit and code
//! generators read. It collapses Open Graph / Twitter / plain fields into one
//! value per concept and fills display defaults.

use crate::extraction::{Headings, ImageWithoutAlt, PageMetadata};
use serde::{Deserialize, Serialize};

/// Default `og:image:type`
pub const DEFAULT_IMAGE_TYPE: &str = "image/webp";
/// Default `twitter:label2`
pub const DEFAULT_TWITTER_LABEL2: &str = "Est. reading time";
/// Default `twitter:data2`
pub const DEFAULT_TWITTER_DATA2: &str = "12 Minutes";
/// Default robots directive
pub const DEFAULT_ROBOTS: &str =
    "index, follow, max-image-preview:large, max-snippet:-1, max-video-preview:-1";
/// Default schema.org type
pub const DEFAULT_SCHEMA_TYPE: &str = "Course";
/// Default offer currency
pub const DEFAULT_PRICE_CURRENCY: &str = "INR";

/// Editable metadata, one value per concept
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct MetaDraft {
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub url: String,
    pub site_name: String,
    pub image: String,
    pub image_width: String,
    pub image_height: String,
    pub image_type: String,
    pub twitter_card: String,
    pub twitter_site: String,
    pub twitter_label2: String,
    pub twitter_data2: String,
    pub article_publisher: String,
    pub article_published_time: String,
    pub article_modified_time: String,
    pub robots: String,
    pub og_type: String,

    pub schema_type: String,
    pub schema_name: String,
    pub schema_description: String,
    pub schema_price_currency: String,
    pub schema_low_price: String,
    pub schema_high_price: String,
    pub schema_offer_count: String,
    pub schema_rating_value: String,
    pub schema_rating_count: String,

    pub headings: Headings,
    pub images_without_alt: usize,
    pub images_without_alt_data: Vec<ImageWithoutAlt>,
    pub total_images: usize,
    pub google_verification: String,
    pub facebook_verification: String,
    pub pinterest_verification: String,
    pub bing_verification: String,
}

impl Default for MetaDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            keywords: String::new(),
            url: String::new(),
            site_name: String::new(),
            image: String::new(),
            image_width: crate::extraction::DEFAULT_IMAGE_WIDTH.to_string(),
            image_height: crate::extraction::DEFAULT_IMAGE_HEIGHT.to_string(),
            image_type: DEFAULT_IMAGE_TYPE.to_string(),
            twitter_card: crate::extraction::DEFAULT_TWITTER_CARD.to_string(),
            twitter_site: String::new(),
            twitter_label2: DEFAULT_TWITTER_LABEL2.to_string(),
            twitter_data2: DEFAULT_TWITTER_DATA2.to_string(),
            article_publisher: String::new(),
            article_published_time: String::new(),
            article_modified_time: String::new(),
            robots: DEFAULT_ROBOTS.to_string(),
            og_type: crate::extraction::DEFAULT_OG_TYPE.to_string(),
            schema_type: DEFAULT_SCHEMA_TYPE.to_string(),
            schema_name: String::new(),
            schema_description: String::new(),
            schema_price_currency: DEFAULT_PRICE_CURRENCY.to_string(),
            schema_low_price: String::new(),
            schema_high_price: String::new(),
            schema_offer_count: String::new(),
            schema_rating_value: String::new(),
            schema_rating_count: String::new(),
            headings: Headings::default(),
            images_without_alt: 0,
            images_without_alt_data: Vec::new(),
            total_images: 0,
            google_verification: String::new(),
            facebook_verification: String::new(),
            pinterest_verification: String::new(),
            bing_verification: String::new(),
        }
    }
}

/// First non-empty value, else `default`
fn pick(values: &[&str], default: &str) -> String {
    values
        .iter()
        .copied()
        .find(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

impl MetaDraft {
    /// Project an extracted record into a draft.
    ///
    /// `requested_url` is the user's input, used when the page has no
    /// `og:url`.
    pub fn from_page(page: &PageMetadata, requested_url: &str) -> Self {
        let defaults = Self::default();
        let schema = page.schema.clone().unwrap_or_default();

        Self {
            title: pick(&[&page.og_title, &page.title], ""),
            description: pick(&[&page.og_description, &page.description], ""),
            keywords: page.keywords.clone(),
            url: pick(&[&page.og_url, requested_url], ""),
            site_name: pick(&[&page.og_site_name, &page.hostname], ""),
            image: pick(&[&page.og_image, &page.twitter_image], ""),
            image_width: pick(&[&page.image_width], &defaults.image_width),
            image_height: pick(&[&page.image_height], &defaults.image_height),
            image_type: defaults.image_type,
            twitter_card: pick(&[&page.twitter_card], &defaults.twitter_card),
            twitter_site: page.twitter_site.clone(),
            twitter_label2: pick(&[&page.twitter_label2], &defaults.twitter_label2),
            twitter_data2: pick(&[&page.twitter_data2], &defaults.twitter_data2),
            article_publisher: page.article_publisher.clone(),
            article_published_time: page.article_published_time.clone(),
            article_modified_time: page.article_modified_time.clone(),
            robots: pick(&[&page.robots], &defaults.robots),
            og_type: pick(&[&page.og_type], &defaults.og_type),

            schema_type: pick(&[&schema.schema_type], &defaults.schema_type),
            schema_name: pick(&[&schema.schema_name, &page.title], ""),
            schema_description: pick(&[&schema.schema_description, &page.description], ""),
            schema_price_currency: pick(
                &[&schema.schema_price_currency],
                &defaults.schema_price_currency,
            ),
            schema_low_price: schema.schema_low_price,
            schema_high_price: schema.schema_high_price,
            schema_offer_count: schema.schema_offer_count,
            schema_rating_value: schema.schema_rating_value,
            schema_rating_count: schema.schema_rating_count,

            headings: page.headings.clone(),
            images_without_alt: page.images_without_alt,
            images_without_alt_data: page.images_without_alt_data.clone(),
            total_images: page.total_images,
            google_verification: page.google_verification.clone(),
            facebook_verification: page.facebook_verification.clone(),
            pinterest_verification: page.pinterest_verification.clone(),
            bing_verification: page.bing_verification.clone(),
        }
    }

    /// Whether any site verification token is set
    pub fn has_verification(&self) -> bool {
        [
            &self.google_verification,
            &self.facebook_verification,
            &self.pinterest_verification,
            &self.bing_verification,
        ]
        .iter()
        .any(|token| !token.is_empty())
    }
}
