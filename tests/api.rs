use std::net::TcpListener;

use prism::{
    configuration::ScraperSettings,
    services::{ChatAgent, LlmClient},
    startup::run,
};

// The model endpoint points at a closed port: anything that reaches the LLM
// fails fast, which is exactly what these tests want.
fn spawn_app() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let llm_client = LlmClient::new(
        "http://127.0.0.1:1/v1".to_string(),
        "test-key".to_string(),
        "test-model".to_string(),
    );
    let agent = ChatAgent::new(llm_client.clone());

    let server = run(listener, llm_client, agent, ScraperSettings { max_words: 500 })
        .expect("Failed to start server");
    tokio::spawn(server);

    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn default_route_responds() {
    let address = spawn_app();

    let response = reqwest::get(&address).await.unwrap();
    assert!(response.status().is_success());
}

#[tokio::test]
async fn chat_rejects_empty_message_list() {
    let address = spawn_app();
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/v1/chatbot/chat", address))
        .json(&serde_json::json!({ "messages": [] }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn chat_surfaces_model_failure_as_500() {
    let address = spawn_app();
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/v1/chatbot/chat", address))
        .json(&serde_json::json!({
            "messages": [{ "role": "user", "content": "hello" }]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn messages_start_empty_for_a_fresh_session() {
    let address = spawn_app();
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/api/v1/chatbot/messages", address))
        .header("X-Session-Id", "fresh-session")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["messages"], serde_json::json!([]));
}

#[tokio::test]
async fn clearing_messages_reports_success() {
    let address = spawn_app();
    let client = reqwest::Client::new();

    let response = client
        .delete(format!("{}/api/v1/chatbot/messages", address))
        .header("X-Session-Id", "some-session")
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Chat history cleared successfully");
}

#[tokio::test]
async fn news_impact_rejects_malformed_url() {
    let address = spawn_app();
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api/v1/chatbot/news/impact", address))
        .json(&serde_json::json!({ "url": "not a url", "field": "finance" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn news_impact_maps_failed_extraction_to_400() {
    let address = spawn_app();
    let client = reqwest::Client::new();

    // Valid URL, nothing listening behind it
    let response = client
        .post(format!("{}/api/v1/chatbot/news/impact", address))
        .json(&serde_json::json!({
            "url": "http://127.0.0.1:1/article",
            "field": "finance"
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body["detail"],
        "Unable to extract or analyze the news article content."
    );
}
