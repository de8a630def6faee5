use crate::facility::{Facility, FacilityId};
use crate::worker::{Location, Worker, WorkerId};

/// Errors shared by every repository backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// A lookup matched no record. Carries the queried key (an identifier
    /// or an email) in string form.
    NotFound(String),
    /// An entry point was handed a parameter kind it does not support. The
    /// in-memory operations are statically typed and never produce this;
    /// backends whose lookup entry points admit arbitrary input report it.
    InvalidArgument(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::NotFound(key) => write!(f, "No record found for key: {key}"),
            RepositoryError::InvalidArgument(what) => write!(f, "Invalid argument: {what}"),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Capability set of a worker store.
///
/// Returned records are snapshots of store state: mutating one never
/// affects the store. The only in-place mutation the store offers is
/// [`WorkerRepository::update_location`]. Each call is atomic on its own;
/// a find-then-update sequence is not atomic as a pair.
pub trait WorkerRepository: Send + Sync {
    /// Insert or replace the worker stored under its identifier.
    ///
    /// # Errors
    /// - Never fails in memory; the fallible signature is part of the
    ///   contract so a durable backend can report its own failures.
    fn store(&self, worker: Worker) -> Result<(), RepositoryError>;

    /// Direct key lookup.
    ///
    /// # Errors
    /// - `NotFound` carrying `id` when no worker is stored under it
    fn find_by_id(&self, id: &WorkerId) -> Result<Worker, RepositoryError>;

    /// Linear scan returning the first worker whose email matches. Emails
    /// are not unique; under duplicates the winner follows map iteration
    /// order.
    ///
    /// # Errors
    /// - `NotFound` carrying `email` when no worker matches
    fn find_by_email(&self, email: &str) -> Result<Worker, RepositoryError>;

    /// Snapshot of every stored worker, in unspecified order.
    ///
    /// # Errors
    /// - Never fails in memory; empty store yields an empty vec
    fn find_all(&self) -> Result<Vec<Worker>, RepositoryError>;

    /// Replace only the location preference of the worker stored under
    /// `id` and return the updated record.
    ///
    /// # Errors
    /// - `NotFound` carrying `id` when absent; the store is left untouched
    fn update_location(
        &self,
        id: &WorkerId,
        location: Location,
    ) -> Result<Worker, RepositoryError>;
}

/// Capability set of a facility store. Same semantics as the worker store,
/// minus the email lookup and the field update.
pub trait FacilityRepository: Send + Sync {
    /// Insert or replace the facility stored under its identifier.
    ///
    /// # Errors
    /// - Never fails in memory
    fn store(&self, facility: Facility) -> Result<(), RepositoryError>;

    /// Direct key lookup.
    ///
    /// # Errors
    /// - `NotFound` carrying `id` when no facility is stored under it
    fn find_by_id(&self, id: &FacilityId) -> Result<Facility, RepositoryError>;

    /// Snapshot of every stored facility, in unspecified order.
    ///
    /// # Errors
    /// - Never fails in memory
    fn find_all(&self) -> Result<Vec<Facility>, RepositoryError>;
}
