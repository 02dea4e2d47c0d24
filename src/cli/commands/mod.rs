mod catalog;
mod containers;
mod init;
mod user;

pub use catalog::{cmd_catalog_list, cmd_catalog_seed, read_seed_file};
pub use containers::cmd_ensure_defaults;
pub use init::cmd_init;
pub use user::cmd_user_add;
