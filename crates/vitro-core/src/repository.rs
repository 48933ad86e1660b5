//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Connectivity failures surface as
//! `Err(..)` from every operation — a caller must never substitute a
//! fallback answer for a failed query. Recoverable domain outcomes
//! (duplicate username, rejected input) are ordinary return values.

use uuid::Uuid;

use crate::error::VitroResult;
use crate::models::record::{
    CreateMediaRecord, MediaRecord, MediaRecordFilter, UpdateMediaRecord,
};
use crate::models::user::{CreateUser, User};

/// Pagination parameters for list queries.
#[derive(Debug, Clone)]
pub struct Pagination {
    pub offset: u64,
    pub limit: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 50,
        }
    }
}

/// A paginated result set.
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub offset: u64,
    pub limit: u64,
}

/// Result of a user create attempt.
///
/// Conflict and rejected input are outcomes, not errors: the caller stays
/// on the same form and surfaces the specific reason.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateUserOutcome {
    Created(User),
    /// The username is already taken. The existing record is untouched.
    DuplicateUsername,
    /// Rejected before any store write (empty username or password).
    InvalidInput(String),
}

pub trait UserRepository: Send + Sync {
    /// True iff at least one account exists. Exposes only the boolean —
    /// never which accounts exist.
    fn any_exists(&self) -> impl Future<Output = VitroResult<bool>> + Send;

    /// Exact-match lookup. Absence is `Ok(None)`, not an error.
    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = VitroResult<Option<User>>> + Send;

    /// Atomic create: on any non-`Created` outcome no partial record
    /// remains in the store.
    fn create(
        &self,
        input: CreateUser,
    ) -> impl Future<Output = VitroResult<CreateUserOutcome>> + Send;
}

pub trait MediaRecordRepository: Send + Sync {
    fn create(
        &self,
        input: CreateMediaRecord,
    ) -> impl Future<Output = VitroResult<MediaRecord>> + Send;

    fn get_by_id(&self, id: Uuid) -> impl Future<Output = VitroResult<MediaRecord>> + Send;

    /// Partial update; returns the updated record so callers can refresh
    /// derived views from the return value instead of re-reading.
    fn update(
        &self,
        id: Uuid,
        input: UpdateMediaRecord,
    ) -> impl Future<Output = VitroResult<MediaRecord>> + Send;

    fn delete(&self, id: Uuid) -> impl Future<Output = VitroResult<()>> + Send;

    fn list(
        &self,
        filter: MediaRecordFilter,
        pagination: Pagination,
    ) -> impl Future<Output = VitroResult<PaginatedResult<MediaRecord>>> + Send;

    /// Distinct species values, for filter affordances.
    fn species(&self) -> impl Future<Output = VitroResult<Vec<String>>> + Send;
}
