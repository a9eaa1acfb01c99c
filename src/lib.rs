pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod game_source;
pub mod games;
pub mod http_cache;
pub mod http_client;
pub mod query;
pub mod reference;
pub mod render_html;
pub mod render_markdown;
pub mod render_text;
pub mod report;
pub mod streaks;
