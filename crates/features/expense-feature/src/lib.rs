pub mod error;
pub mod service;

pub use error::ExpenseFeatureError;
pub use service::{ExpenseInput, ExpenseListQuery, ExpenseService};
