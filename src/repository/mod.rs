//! Database repository layer

pub mod base;
pub mod menu_repo;
pub mod user_repo;

pub use base::CrudRepository;
pub use menu_repo::{MenuRepository, MenuStore};
pub use user_repo::{CredentialStore, InMemoryCredentialStore, UserRepository};
