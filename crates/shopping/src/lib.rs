mod aggregation;
mod query;
mod root;

pub use aggregation::*;
pub use query::*;
pub use root::*;
