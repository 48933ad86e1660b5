//! SurrealDB repository implementations.

mod record;
mod user;

pub use record::SurrealMediaRecordRepository;
pub use user::{SurrealUserRepository, verify_password};
