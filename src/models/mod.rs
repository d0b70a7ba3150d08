pub mod question;

pub use question::{AnswerOption, Dataset, Meta, Question, Source, UserStatus};
