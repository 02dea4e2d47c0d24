//! CLI module - Command-line interface for Larder
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Larder - Household food inventory
/// Tracks what is in the fridge, freezer and pantry and when it goes off
#[derive(Parser)]
#[command(name = "larder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    #[command(alias = "daemon", alias = "-d")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Manage the shared food catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Manage storage containers
    Containers {
        #[command(subcommand)]
        command: ContainerCommands,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user and print its API key
    Add {
        /// Login name
        username: String,
        /// Password (at least 8 characters)
        password: String,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// Insert catalog foods that do not exist yet
    Seed {
        /// JSON array of `{ name, category, description }`; built-in samples when omitted
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// List catalog foods
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand)]
pub enum ContainerCommands {
    /// Create the default fridge, freezer, pantry and shopping list for every user
    EnsureDefaults,
}

pub use commands::*;
