pub mod aggregator;
pub mod handlers;
pub mod models;
pub mod period;
pub mod repository;

pub use aggregator::*;
pub use handlers::*;
pub use models::*;
pub use period::*;
pub use repository::*;
