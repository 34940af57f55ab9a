/// Database layer
///
/// - [`pool`]: SQLite connection pool management
/// - [`migrations`]: Embedded schema migrations

pub mod migrations;
pub mod pool;
