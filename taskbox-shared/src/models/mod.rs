/// Database models for Taskbox
///
/// # Models
///
/// - `user`: User accounts that own tasks
/// - `task`: Personal tasks with soft-delete and ownership scoping
///
/// # Example
///
/// ```no_run
/// use taskbox_shared::models::user::{CreateUser, User};
/// use taskbox_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(&pool, CreateUser {
///     email: "user@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

pub mod task;
pub mod user;
