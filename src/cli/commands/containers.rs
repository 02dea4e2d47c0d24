//! Container command handlers

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_ensure_defaults(config: Config) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let owners = state.store.users().list_ids().await?;

    if owners.is_empty() {
        println!("No users yet.");
        println!();
        println!("Add one with: larder user add <username> <password>");
        return Ok(());
    }

    for owner in owners {
        let containers = state.containers.ensure_defaults(owner).await?;
        let names: Vec<_> = containers.iter().map(|c| c.name.as_str()).collect();
        println!("User {owner}: {}", names.join(", "));
    }

    Ok(())
}
