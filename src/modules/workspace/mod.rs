pub mod controller;
pub mod crud;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;
pub mod service;

pub use crud::WorkspaceCrud;
pub use interface::{WorkspaceError, WorkspaceRepository};
pub use model::{Access, Role};
pub use routes::workspace_routes;
pub use service::WorkspaceService;
