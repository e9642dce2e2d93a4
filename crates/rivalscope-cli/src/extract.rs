use rivalscope_core::AppConfig;
use rivalscope_scraper::{extract_page, normalize_url, ExtractLimits, PageFetcher};

use crate::ExtractArgs;

pub(crate) async fn run(config: &AppConfig, args: &ExtractArgs) -> anyhow::Result<()> {
    let url = normalize_url(&args.url)?;
    let fetcher = PageFetcher::new(config.fetch_timeout(), &config.user_agent)?;
    let html = fetcher.fetch_html(&url).await?;
    let page = extract_page(&html, &url, &ExtractLimits::from_config(config));

    tracing::info!(
        url = %url,
        chars = page.text_content.len(),
        links = page.links.len(),
        "cli: extracted page"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        println!("{}", page.transcript());
    }
    Ok(())
}
