pub mod model;

mod error;

pub use error::ModelError;
pub use model::*;
