pub mod config;
pub mod database;
pub mod engine;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod middlewares;
pub mod models;
pub mod repository;
pub mod services;
pub mod swagger;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use repository::{LottoRepository, SharedRepository};
