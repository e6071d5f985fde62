pub mod controller;
pub mod crud;
pub mod interface;
pub mod middleware;
pub mod model;
pub mod routes;
pub mod schema;
pub mod service;

pub use crud::UserCrud;
pub use interface::{AuthError, CredentialStore, UserRepository};
pub use middleware::{require_auth, AuthUser};
pub use routes::{auth_routes, user_routes};
pub use service::IdentityService;
