pub mod agent;
pub mod llm_client;
pub mod news_scraper;

pub use agent::*;
pub use llm_client::*;
pub use news_scraper::*;
