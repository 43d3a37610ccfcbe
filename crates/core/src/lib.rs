pub mod config;
pub mod error;
pub mod ids;
pub mod intern;
pub mod model;
pub mod semconv;
pub mod transaction;

pub use error::{Result, TraceqError};
pub use transaction::Transaction;
