pub mod hashing;
pub mod jwt;
pub mod mailer;
pub mod metrics;
pub mod security;
pub mod sweeper;
