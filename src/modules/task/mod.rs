pub mod controller;
pub mod crud;
pub mod interface;
pub mod model;
pub mod routes;
pub mod schema;
pub mod service;

pub use crud::TaskCrud;
pub use interface::TaskRepository;
pub use routes::task_routes;
pub use service::TaskService;
