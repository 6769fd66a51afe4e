//! Login account management.
//!
//! # Usage
//!
//! ```bash
//! shop-cli user create -u alice -p 'correct horse'
//! shop-cli user set-password -u alice -p 'battery staple'
//! ```

use shopfront_storefront::services::AuthService;

use super::{CommandError, connect};

/// Create a new user with an Argon2id password hash.
pub async fn create(username: &str, password: &str) -> Result<(), CommandError> {
    let pool = connect().await?;

    let user = AuthService::new(&pool).register(username, password).await?;

    tracing::info!("User created: {} (id {})", user.username, user.id);
    Ok(())
}

/// Replace the password of an existing user.
pub async fn set_password(username: &str, password: &str) -> Result<(), CommandError> {
    let pool = connect().await?;

    AuthService::new(&pool)
        .set_password(username, password)
        .await?;

    tracing::info!("Password updated for {username}");
    Ok(())
}
