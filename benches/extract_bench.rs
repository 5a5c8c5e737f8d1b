//! Extraction benchmarks
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use metatags_web::extraction::extract_page;
use metatags_web::report::{generate_code, AuditReport, CodeFormat, CodeOptions, MetaDraft};
use url::Url;

const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sample Product | Example Store</title>
    <meta name="description" content="A sample product page for benchmarking.">
    <meta property="og:image" content="/images/product.jpg">
    <meta name="twitter:card" content="summary">
    <link rel="icon" href="/favicon.ico">
    <script type="application/ld+json">{"@type":"WebSite","name":"Example"}</script>
    <script type="application/ld+json">{"@type":"Product","name":"Sample","offers":{"price":"19.99","priceCurrency":"USD"}}</script>
</head>
<body>
    <h1>Sample Product</h1>
    <h2>Details</h2>
    <img src="/images/a.jpg" alt="Front">
    <img src="/images/b.jpg">
    <p>Body copy.</p>
</body>
</html>"#;

/// Synthetic page with `n` sections, each with a heading and an image
fn large_page(n: usize) -> String {
    let mut body = String::new();
    for i in 0..n {
        body.push_str(&format!(
            "<h2>Section {i}</h2><p>Paragraph {i}</p><img src=\"img/{i}.png\"{}>",
            if i % 3 == 0 { "" } else { " alt=\"x\"" }
        ));
    }
    format!("<html><head><title>Large</title></head><body>{body}</body></html>")
}

fn base() -> Url {
    Url::parse("https://store.example.com/products/sample").unwrap()
}

fn bench_extract_sample(c: &mut Criterion) {
    let base = base();
    c.bench_function("extract_sample", |b| {
        b.iter(|| extract_page(black_box(SAMPLE_HTML), black_box(&base)));
    });
}

fn bench_extract_scaling(c: &mut Criterion) {
    let base = base();
    let mut group = c.benchmark_group("extract_scaling");

    for sections in [10, 100, 1000] {
        let html = large_page(sections);
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sections), &html, |b, html| {
            b.iter(|| extract_page(black_box(html), black_box(&base)));
        });
    }

    group.finish();
}

fn bench_reports(c: &mut Criterion) {
    let meta = extract_page(SAMPLE_HTML, &base());
    let draft = MetaDraft::from_page(&meta, "store.example.com/products/sample");

    c.bench_function("audit", |b| {
        b.iter(|| AuditReport::run(black_box(&draft)));
    });
    c.bench_function("codegen_nextjs", |b| {
        b.iter(|| generate_code(black_box(&draft), CodeFormat::NextJs, CodeOptions::default()));
    });
}

criterion_group!(benches, bench_extract_sample, bench_extract_scaling, bench_reports);
criterion_main!(benches);
