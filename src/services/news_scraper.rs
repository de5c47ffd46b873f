use std::time::Duration;

use regex::Regex;
use scraper::{Html, Selector};

pub const DEFAULT_MAX_WORDS: usize = 500;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Fetch a news article and return its main text, whitespace-normalized and
/// cut off at `max_words` words. Any fetch or parse failure is logged and
/// collapsed into `None`; callers never see the distinction.
pub async fn extract_news_content(url: &str, max_words: usize) -> Option<String> {
    let client = match reqwest::Client::builder().timeout(FETCH_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build http client: {:?}", e);
            return None;
        }
    };

    let response = match client
        .get(url)
        .header(reqwest::header::USER_AGENT, BROWSER_USER_AGENT)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            log::error!("Error extracting content from {}: {:?}", url, e);
            return None;
        }
    };

    let response = match response.error_for_status() {
        Ok(response) => response,
        Err(e) => {
            log::error!("Bad status fetching {}: {:?}", url, e);
            return None;
        }
    };

    match response.text().await {
        Ok(body) => extract_from_html(&body, max_words),
        Err(e) => {
            log::error!("Failed to read body from {}: {:?}", url, e);
            None
        }
    }
}

/// Pick the most likely article region and return its text.
///
/// Candidates are tried in order: `<article>`, a div with an article-like
/// class, a div with an article-like id, then `<body>`. The first candidate
/// that EXISTS wins even when its text is empty, so an empty `<article>`
/// yields an empty string instead of falling through to a later candidate.
pub fn extract_from_html(html: &str, max_words: usize) -> Option<String> {
    let document = Html::parse_document(html);

    let article_selector = Selector::parse("article").unwrap();
    let div_selector = Selector::parse("div").unwrap();
    let body_selector = Selector::parse("body").unwrap();
    let region_pattern = Regex::new(r"(?i)(article|content|main-content)").unwrap();

    let candidate = document
        .select(&article_selector)
        .next()
        .or_else(|| {
            document.select(&div_selector).find(|div| {
                div.value()
                    .attr("class")
                    .is_some_and(|class| region_pattern.is_match(class))
            })
        })
        .or_else(|| {
            document.select(&div_selector).find(|div| {
                div.value()
                    .attr("id")
                    .is_some_and(|id| region_pattern.is_match(id))
            })
        })
        .or_else(|| document.select(&body_selector).next())?;

    let text: String = candidate.text().collect::<Vec<_>>().join(" ");
    let words: Vec<&str> = text.split_whitespace().take(max_words).collect();

    Some(words.join(" "))
}

pub fn build_impact_prompt(content: &str, field: &str) -> String {
    format!(
        "News Content: {}\n\n\
        Analyze the potential impact of this news on the {} sector:\n\
        - Identify key events or developments\n\
        - Explain potential short-term and long-term consequences\n\
        - Provide specific insights related to {}",
        content, field, field
    )
}

/// Extract article content and wrap it into an impact-analysis prompt for the
/// model. Absent or empty content propagates as `None` without formatting.
pub async fn analyze_news_impact(url: &str, field: &str, max_words: usize) -> Option<String> {
    let content = extract_news_content(url, max_words).await?;
    if content.is_empty() {
        return None;
    }

    Some(build_impact_prompt(&content, field))
}
