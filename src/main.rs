//! metatags-web command line
//!
//! `mt-web serve` runs the HTTP API, `mt-web check <url>` inspects one page.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use metatags_web::handlers::AppState;
use metatags_web::report::{
    generate_code, AuditReport, CodeFormat, CodeOptions, MetaDraft, Severity,
};
use metatags_web::{server, Config, MetadataPipeline};

/// SEO and social meta tag checker
#[derive(Parser, Debug)]
#[command(name = "mt-web")]
#[command(version)]
#[command(about = "Fetch a page, extract its meta tags, audit them and generate markup")]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the User-Agent sent with fetches
    #[arg(long, global = true)]
    user_agent: Option<String>,

    /// Abort fetches after this many seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind 0.0.0.0 instead of 127.0.0.1
        #[arg(long)]
        bind_all: bool,

        /// Accept requests from any origin
        #[arg(long)]
        cors_permissive: bool,
    },

    /// Check a single page and print the result
    Check {
        /// Page URL; `https://` is assumed when no scheme is given
        url: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Audit)]
        format: OutputFormat,

        /// Include schema.org JSON-LD in generated code
        #[arg(long)]
        schema: bool,

        /// Leave out title, description, keywords, canonical and robots
        #[arg(long)]
        no_basic: bool,

        /// Leave out Open Graph tags
        #[arg(long)]
        no_open_graph: bool,

        /// Leave out Twitter card tags
        #[arg(long)]
        no_twitter: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Extracted record as JSON
    Json,
    /// SEO audit report
    Audit,
    /// HTML head tags
    Html,
    /// Angular service calls
    Angular,
    /// Next.js metadata export
    #[value(name = "nextjs")]
    NextJs,
}

impl OutputFormat {
    fn code_format(self) -> Option<CodeFormat> {
        match self {
            Self::Html => Some(CodeFormat::Html),
            Self::Angular => Some(CodeFormat::Angular),
            Self::NextJs => Some(CodeFormat::NextJs),
            Self::Json | Self::Audit => None,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_env().context("Invalid environment configuration")?;
    if let Some(agent) = args.user_agent {
        config.fetch.user_agent = agent;
    }
    if let Some(secs) = args.timeout_secs.filter(|secs| *secs > 0) {
        config.fetch.timeout = Some(Duration::from_secs(secs));
    }

    let pipeline =
        MetadataPipeline::with_config(config.fetch.clone()).context("Failed to build HTTP client")?;

    match args.command {
        Command::Serve {
            port,
            bind_all,
            cors_permissive,
        } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            if bind_all {
                config.server.bind_addr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);
            }
            config.server.permissive_cors |= cors_permissive;

            tracing::info!("{} v{} starting", metatags_web::NAME, metatags_web::VERSION);
            let state = Arc::new(AppState::new(pipeline)?);
            server::serve(state, &config.server).await?;
        }

        Command::Check {
            url,
            format,
            schema,
            no_basic,
            no_open_graph,
            no_twitter,
        } => {
            let meta = pipeline
                .extract_metadata(&url)
                .await
                .with_context(|| format!("Could not check {url}"))?;

            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&meta)?);
                return Ok(());
            }

            let draft = MetaDraft::from_page(&meta, &url);
            match format.code_format() {
                Some(code_format) => {
                    let options = CodeOptions {
                        basic: !no_basic,
                        open_graph: !no_open_graph,
                        twitter: !no_twitter,
                        schema,
                    };
                    println!("{}", generate_code(&draft, code_format, options));
                }
                None => print_audit(&url, &AuditReport::run(&draft)),
            }
        }
    }

    Ok(())
}

fn print_audit(url: &str, report: &AuditReport) {
    println!("SEO audit for {url}");
    println!("Score: {}/100 ({})", report.score, report.band);
    println!(
        "{} errors, {} warnings, {} passed",
        report.count(Severity::Error),
        report.count(Severity::Warning),
        report.count(Severity::Success)
    );
    println!();

    for issue in &report.issues {
        let marker = match issue.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN ",
            Severity::Success => "OK   ",
        };
        if issue.deduction > 0 {
            println!("[{marker}] {} (-{})", issue.message, issue.deduction);
        } else {
            println!("[{marker}] {}", issue.message);
        }
    }

    let alt = &report.alt_coverage;
    if alt.total > 0 {
        println!();
        println!(
            "Alt text: {}/{} images covered ({}%)",
            alt.with_alt, alt.total, alt.percentage
        );
    }
}
