pub mod prelude;

pub mod catalog_foods;
pub mod container_entries;
pub mod containers;
pub mod users;
