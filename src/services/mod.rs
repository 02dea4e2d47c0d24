pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, LoginResult, UserInfo};
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService, SeedReport};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod container_service;
pub mod container_service_impl;
pub use container_service::{ContainerError, ContainerService};
pub use container_service_impl::SeaOrmContainerService;

pub mod inventory_service;
pub mod inventory_service_impl;
pub use inventory_service::{
    AddItem, AddOutcome, BatchMoveFailure, BatchMoveReport, ClearCheckedOutcome, DeleteOutcome,
    EntryUpdate, ExpirationChange, ExpiringEntry, InventoryError, InventoryService, MoveItem,
    MoveOutcome, ShoppingAddReport,
};
pub use inventory_service_impl::SeaOrmInventoryService;
