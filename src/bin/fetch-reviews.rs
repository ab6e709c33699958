//! One-shot review fetch from the command line.
//!
//! usage: fetch-reviews <url> [--max N] [--static-only]

use std::sync::Arc;

use review_scout::core::config::load_scout_config;
use review_scout::scraping::browser_manager::ChromiumRenderer;
use review_scout::scraping::HttpFetcher;
use review_scout::sites::SiteRegistry;
use review_scout::{AppState, Dispatcher, FetchRequest, RenderCapability};

const USAGE: &str = "usage: fetch-reviews <url> [--max N] [--static-only]";

struct Args {
    url: String,
    max_reviews: i64,
    static_only: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut url = None;
    let mut max_reviews = 50;
    let mut static_only = false;

    let mut args = std::env::args().skip(1);
    while let Some(a) = args.next() {
        match a.as_str() {
            "--max" => {
                let v = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--max needs a value\n{}", USAGE))?;
                max_reviews = v.parse()?;
            }
            "--static-only" => static_only = true,
            "--help" | "-h" => anyhow::bail!("{}", USAGE),
            other => {
                if let Some(v) = other.strip_prefix("--max=") {
                    max_reviews = v.parse()?;
                } else if url.is_none() {
                    url = Some(other.to_string());
                } else {
                    anyhow::bail!("unexpected argument: {}\n{}", other, USAGE);
                }
            }
        }
    }

    Ok(Args {
        url: url.ok_or_else(|| anyhow::anyhow!("{}", USAGE))?,
        max_reviews,
        static_only,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    let args = parse_args()?;
    let config = load_scout_config();

    let state = if args.static_only {
        let dispatcher = Dispatcher::new(
            RenderCapability::unavailable(),
            Arc::new(ChromiumRenderer::from_config(&config)),
            Arc::new(HttpFetcher::from_config(&config)?),
        );
        AppState::new(SiteRegistry::with_defaults()?, dispatcher, config)
    } else {
        AppState::from_config(config)?
    };

    let request = FetchRequest::new(args.url, args.max_reviews);
    let (site, result) = review_scout::fetch_reviews(&state, &request).await?;

    eprintln!(
        "{}: {} reviews via {}",
        site.unwrap_or("-"),
        result.len(),
        result.mode.as_str()
    );
    for review in &result.reviews {
        println!("{}", review);
    }
    Ok(())
}
