pub use super::catalog_foods::Entity as CatalogFoods;
pub use super::container_entries::Entity as ContainerEntries;
pub use super::containers::Entity as Containers;
pub use super::users::Entity as Users;
