pub mod api;
pub mod classify;
pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod imaging;
pub mod inspect;
pub mod llm;
pub mod models;
pub mod notify;
pub mod pipeline;
