pub mod types;
pub mod filter;
pub mod filter_where;
pub mod filter_order;
pub mod partial_update;
pub mod error;

pub use error::FilterError;
pub use filter::Filter;
pub use partial_update::partial_update;
pub use types::*;
