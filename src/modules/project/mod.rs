pub mod controller;
pub mod crud;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;
pub mod service;

pub use crud::ProjectCrud;
pub use interface::ProjectRepository;
pub use routes::project_routes;
pub use service::ProjectService;
