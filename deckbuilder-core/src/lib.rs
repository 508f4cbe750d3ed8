pub mod catalog;
pub mod errors;
pub mod images;
pub mod models;
pub mod repo;
pub mod validation;

pub use catalog::*;
pub use errors::*;
pub use images::*;
pub use models::*;
pub use repo::*;
pub use validation::*;
