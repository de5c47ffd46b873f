use actix_web::{post, web, HttpResponse};

use crate::configuration::ScraperSettings;
use crate::domain::{ChatMessage, ErrorDetail, NewsImpactRequest, NewsImpactResponse};
use crate::services::{analyze_news_impact, LlmClient};

#[post("/news/impact")]
async fn news_impact(
    body: web::Json<NewsImpactRequest>,
    llm_client: web::Data<LlmClient>,
    scraper_settings: web::Data<ScraperSettings>,
) -> HttpResponse {
    let request = body.into_inner();

    log::info!(
        "News impact request | url {} | field {}",
        request.url,
        request.field
    );

    let prompt = match analyze_news_impact(
        request.url.as_str(),
        &request.field,
        scraper_settings.max_words,
    )
    .await
    {
        Some(prompt) => prompt,
        None => {
            return HttpResponse::BadRequest().json(ErrorDetail {
                detail: "Unable to extract or analyze the news article content.".to_string(),
            })
        }
    };

    match llm_client.chat_completion(&[ChatMessage::user(prompt)]).await {
        Ok(content) => HttpResponse::Ok().json(NewsImpactResponse { content }),
        Err(e) => {
            log::error!("News impact analysis failed: {:?}", e);
            HttpResponse::InternalServerError().json(ErrorDetail {
                detail: format!("Failed to analyze news impact: {}", e),
            })
        }
    }
}
