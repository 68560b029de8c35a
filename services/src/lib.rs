pub mod error;
pub mod module_ordering;
pub mod progression;

pub use error::OrderingError;
