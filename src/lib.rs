pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod repository;
pub mod router;
pub mod types;

pub use error::NaviconomyError;
