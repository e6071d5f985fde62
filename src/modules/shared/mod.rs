pub mod extract;
pub mod schema;

pub use extract::ValidatedJson;
pub use schema::{ErrorResponse, MessageResponse};
