// ABOUTME: Persistent JSON catalog of instances & sessions; read-modify-write with file locking

mod model;
mod store;

pub use model::{CatalogFile, Instance, InstanceStatus, Session, SessionType};
pub use store::{CatalogError, CatalogStore, ListFilter};
