pub mod catalog;
pub mod container;
pub mod entry;

pub use catalog::{CatalogFood, NewCatalogFood};
pub use container::{Container, ContainerDetail, ContainerSummary};
pub use entry::{Entry, EntryView, EntryWithFood, NewEntry};
