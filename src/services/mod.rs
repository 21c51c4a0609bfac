pub mod backfill_service;
pub mod draw_service;
pub mod generated_numbers_service;
pub mod history_service;
pub mod recommendation_service;
pub mod recommendation_store;
pub mod winning_service;

pub use backfill_service::*;
pub use draw_service::*;
pub use generated_numbers_service::*;
pub use history_service::*;
pub use recommendation_service::*;
pub use recommendation_store::*;
pub use winning_service::*;
