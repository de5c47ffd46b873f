use std::sync::{Arc, Mutex};

use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use futures::StreamExt;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{ChatRequest, ChatResponse, ErrorDetail, StreamResponse};
use crate::services::ChatAgent;

const SESSION_HEADER: &str = "X-Session-Id";

// Session issuance is someone else's job; we take whatever the caller sends
// and mint a throwaway id when they send nothing.
fn session_id_from(request: &HttpRequest) -> String {
    request
        .headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn sse_event(response: &StreamResponse) -> Result<web::Bytes, actix_web::Error> {
    let json = serde_json::to_string(response).map_err(actix_web::error::ErrorInternalServerError)?;
    Ok(web::Bytes::from(format!("data: {}\n\n", json)))
}

#[post("/chat")]
async fn chat(
    request: HttpRequest,
    body: web::Json<ChatRequest>,
    agent: web::Data<ChatAgent>,
) -> HttpResponse {
    let session_id = session_id_from(&request);
    let chat_request = body.into_inner();

    if chat_request.messages.is_empty() {
        return HttpResponse::BadRequest().json(ErrorDetail {
            detail: "messages must not be empty".to_string(),
        });
    }

    log::info!(
        "Chat request received | session {} | {} messages",
        session_id,
        chat_request.messages.len()
    );

    match agent.get_response(chat_request.messages, &session_id).await {
        Ok(messages) => HttpResponse::Ok().json(ChatResponse { messages }),
        Err(e) => {
            log::error!("Chat request failed | session {} | {:?}", session_id, e);
            HttpResponse::InternalServerError().json(ErrorDetail {
                detail: e.to_string(),
            })
        }
    }
}

#[post("/chat/stream")]
async fn chat_stream(
    request: HttpRequest,
    body: web::Json<ChatRequest>,
    agent: web::Data<ChatAgent>,
) -> HttpResponse {
    let session_id = session_id_from(&request);
    let chat_request = body.into_inner();

    if chat_request.messages.is_empty() {
        return HttpResponse::BadRequest().json(ErrorDetail {
            detail: "messages must not be empty".to_string(),
        });
    }

    log::info!(
        "Stream chat request received | session {} | {} messages",
        session_id,
        chat_request.messages.len()
    );

    let token_stream = match agent
        .stream_response(chat_request.messages, &session_id)
        .await
    {
        Ok(stream) => stream,
        Err(e) => {
            log::error!("Stream chat failed | session {} | {:?}", session_id, e);
            return HttpResponse::InternalServerError().json(ErrorDetail {
                detail: e.to_string(),
            });
        }
    };

    // Accumulate the reply so it can be stored in the session history once
    // the final done event goes out.
    let assembled = Arc::new(Mutex::new(String::new()));

    let assembled_clone = assembled.clone();
    let events = token_stream.map(move |chunk| match chunk {
        Ok(chunk) => {
            let delta = chunk
                .choices
                .first()
                .and_then(|choice| choice.delta.content.clone())
                .unwrap_or_default();
            assembled_clone.lock().unwrap().push_str(&delta);
            sse_event(&StreamResponse {
                content: delta,
                done: false,
            })
        }
        Err(e) => {
            log::error!("Stream chunk failed: {:?}", e);
            sse_event(&StreamResponse {
                content: e.to_string(),
                done: true,
            })
        }
    });

    let agent = agent.clone();
    let done = futures::stream::once(async move {
        let reply = assembled.lock().unwrap().clone();
        agent.store_assistant_reply(&session_id, reply).await;
        sse_event(&StreamResponse {
            content: String::new(),
            done: true,
        })
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .streaming(events.chain(done))
}

#[get("/messages")]
async fn get_messages(request: HttpRequest, agent: web::Data<ChatAgent>) -> HttpResponse {
    let session_id = session_id_from(&request);
    let messages = agent.history(&session_id).await;

    HttpResponse::Ok().json(ChatResponse { messages })
}

#[delete("/messages")]
async fn clear_messages(request: HttpRequest, agent: web::Data<ChatAgent>) -> HttpResponse {
    let session_id = session_id_from(&request);
    agent.clear_history(&session_id).await;

    log::info!("Chat history cleared | session {}", session_id);
    HttpResponse::Ok().json(json!({ "message": "Chat history cleared successfully" }))
}
