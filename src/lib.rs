pub mod aggregates;
pub mod config;
pub mod consumers;
pub mod db;
pub mod error;
pub mod events;
pub mod metrics;
pub mod repository;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
