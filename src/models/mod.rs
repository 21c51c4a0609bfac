pub mod common;
pub mod draw;
pub mod generated_numbers;
pub mod recommendation;

pub use common::*;
pub use draw::*;
pub use generated_numbers::*;
pub use recommendation::*;
