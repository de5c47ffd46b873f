use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};

use crate::{
    configuration::ScraperSettings,
    routes::{chat_route, default_route, news_route},
    services::{ChatAgent, LlmClient},
};

pub fn run(
    listener: TcpListener,
    llm_client: LlmClient,
    agent: ChatAgent,
    scraper_settings: ScraperSettings,
) -> Result<Server, std::io::Error> {
    let llm_client = web::Data::new(llm_client);
    let agent = web::Data::new(agent);
    let scraper_settings = web::Data::new(scraper_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::default)
            .service(
                web::scope("/api/v1/chatbot")
                    .service(chat_route::chat)
                    .service(chat_route::chat_stream)
                    .service(chat_route::get_messages)
                    .service(chat_route::clear_messages)
                    .service(news_route::news_impact),
            )
            .app_data(llm_client.clone())
            .app_data(agent.clone())
            .app_data(scraper_settings.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
