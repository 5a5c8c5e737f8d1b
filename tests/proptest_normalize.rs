//! Property-based tests for URL normalization, resolution and the audit.

use metatags_web::fetch::{is_absolute_url, normalize_url, resolve_against};
use metatags_web::report::{AltCoverage, AltStatus, AuditReport, HealthBand, MetaDraft};
use proptest::prelude::*;
use url::Url;

/// Strategy for bare host names such as `shop.example.com`
fn arb_host() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z][a-z0-9]{0,10}", 1..4)
        .prop_map(|labels| format!("{}.com", labels.join(".")))
}

/// Strategy for relative path references
fn arb_relative_path() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9_-]{1,12}", 1..5).prop_map(|segments| segments.join("/"))
}

proptest! {
    #[test]
    fn prop_schemeless_input_gets_https(host in arb_host(), path in arb_relative_path()) {
        let url = normalize_url(&format!("{host}/{path}")).unwrap();
        prop_assert_eq!(url.scheme(), "https");
        prop_assert_eq!(url.host_str(), Some(host.as_str()));
    }

    #[test]
    fn prop_explicit_scheme_is_kept(host in arb_host()) {
        let url = normalize_url(&format!("http://{host}")).unwrap();
        prop_assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn prop_resolution_is_idempotent(host in arb_host(), path in arb_relative_path()) {
        let base = Url::parse(&format!("https://{host}/section/page")).unwrap();
        let once = resolve_against(&path, &base);
        prop_assert!(is_absolute_url(&once));
        prop_assert_eq!(resolve_against(&once, &base), once.clone());
        let prefix = format!("https://{host}/section/");
        prop_assert!(once.starts_with(&prefix));
    }

    #[test]
    fn prop_absolute_urls_are_untouched(host in arb_host(), path in arb_relative_path()) {
        let base = Url::parse("https://base.example.org/").unwrap();
        let absolute = format!("https://{host}/{path}");
        prop_assert_eq!(resolve_against(&absolute, &base), absolute);
    }

    #[test]
    fn prop_score_stays_in_range(
        title in ".{0,80}",
        description in ".{0,200}",
        total in 0usize..50,
        missing in 0usize..50,
    ) {
        let draft = MetaDraft {
            title,
            description,
            total_images: total,
            images_without_alt: missing.min(total),
            ..Default::default()
        };
        let report = AuditReport::run(&draft);
        prop_assert!(report.score <= 100);
        prop_assert_eq!(report.band, HealthBand::from_score(report.score));
    }

    #[test]
    fn prop_alt_coverage_is_consistent(total in 0usize..1000, missing in 0usize..1000) {
        let missing = missing.min(total);
        let coverage = AltCoverage::new(total, missing);
        prop_assert_eq!(coverage.with_alt + coverage.missing, total);
        prop_assert!(coverage.percentage <= 100);
        if total == 0 {
            prop_assert_eq!(coverage.status, AltStatus::NoImages);
        } else if missing == 0 {
            prop_assert_eq!(coverage.percentage, 100);
        }
    }
}
