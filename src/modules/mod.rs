pub mod auth;
pub mod metrics;
pub mod project;
pub mod shared;
pub mod task;
pub mod workspace;
