//! Boundary contracts: event snapshot store, identity, directory

pub mod directory;
pub mod error;
pub mod identity;
pub mod store;

pub use directory::{Directory, DirectoryRoom, DirectoryUser, StaticDirectory};
pub use error::{StoreError, StoreResult};
pub use identity::{IdentityProvider, Principal, Role, StaticIdentity};
pub use store::{EventStore, JsonStore, MemoryStore};
