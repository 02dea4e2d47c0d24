pub mod catalog;
pub mod container;
pub mod entry;
pub mod user;

pub use catalog::CatalogRepository;
pub use container::ContainerRepository;
pub use entry::EntryRepository;
pub use user::{User, UserRepository};
