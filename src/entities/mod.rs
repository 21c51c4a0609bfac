pub mod generated_numbers;
pub mod lotto_results;
pub mod recommendation_history;

pub use generated_numbers as generated_number_entity;
pub use generated_numbers::GeneratedNumberStatus;
pub use lotto_results as lotto_result_entity;
pub use recommendation_history as recommendation_history_entity;
