mod errors;
mod mutation;
mod query;
pub mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;
