pub mod recommendation;
pub mod winning;
pub mod draws;
pub mod generated_numbers;
pub mod admin;

pub use recommendation::recommendation_config;
pub use winning::winning_config;
pub use draws::draws_config;
pub use generated_numbers::generated_numbers_config;
pub use admin::admin_config;
