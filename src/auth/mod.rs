// Authentication and authorization module
// Verifies bearer tokens and enforces role policies at the routing layer

pub mod error;
pub mod middleware;
pub mod models;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use middleware::{require_role, AuthenticatedUser, RequireRole};
pub use models::{Role, STAFF_ROLES};
pub use token::{Claims, TokenService};
