//! User command handlers

use crate::config::Config;
use crate::state::SharedState;

/// Registers a user, creates its default containers and prints the API key.
pub async fn cmd_user_add(config: Config, username: &str, password: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let login = state.auth.register(username, password).await?;

    println!("✓ Created user {} (id {})", login.username, login.id);
    println!("  API key: {}", login.api_key);
    println!();
    println!("Send it as the X-Api-Key header, or log in at /api/auth/login.");

    Ok(())
}
