pub mod batch;
pub mod client;

pub use batch::get_question_details_batched;
pub use client::{ApiClient, ApiVersion};
