use std::net::TcpListener;

use env_logger::Env;
use prism::{
    configuration::get_configuration,
    services::{ChatAgent, LlmClient},
    startup::run,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().expect("Failed to read configuration.");

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(address)?;

    let llm_client = LlmClient::new(
        configuration.llm.api_base,
        configuration.llm.api_key,
        configuration.llm.model,
    );
    let agent = ChatAgent::new(llm_client.clone());

    run(listener, llm_client, agent, configuration.scraper)?.await
}
