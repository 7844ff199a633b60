pub mod auth;
pub mod config;
pub mod content;
pub mod content_query;
pub mod export;
pub mod form_data;
pub mod logger;
pub mod post;
pub mod server;
mod post_list;
mod test_data;
mod text_utils;
mod view;
