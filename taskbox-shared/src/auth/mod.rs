/// Authentication utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: HS256 access token generation and validation
/// - [`authenticator`]: The pluggable "resolve current principal" seam,
///   with a production JWT implementation and a test-mode stub
///
/// The task core never sees an unauthenticated caller: requests without a
/// resolvable principal are rejected before any task operation runs.

pub mod authenticator;
pub mod jwt;
pub mod password;
