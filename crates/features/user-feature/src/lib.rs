pub mod error;
pub mod service;

pub use error::UserFeatureError;
pub use service::{CreateUserInput, UpdateUserInput, UserService};
