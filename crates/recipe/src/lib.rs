pub mod favorite;
pub mod ingredient;
pub mod tag;

mod query;
pub(crate) mod repository;
mod root;
mod validate;

pub use query::*;
pub use root::*;
