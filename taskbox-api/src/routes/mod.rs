/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `tasks`: The per-user task collection

pub mod auth;
pub mod health;
pub mod tasks;
