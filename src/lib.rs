pub mod cli;
pub mod config;
pub mod db;
pub mod services;
pub mod web;


pub use config::Config;
pub use db::Database;
pub use services::slug::{slugify, slugify_opt, Slug};
