use in_memory_adapter::InMemoryRepo;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::repository::{RepositoryError, WorkerRepository};

pub type WorkerId = Uuid;

/// Alternate lookup key for workers. The store does not enforce
/// uniqueness; lookups by email return the first match.
pub type Email = String;

/// A place a worker prefers to pick up shifts in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: String,
    pub state: String,
}

impl Location {
    #[must_use]
    pub fn new(city: String, state: String) -> Self {
        Self { city, state }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.city, self.state)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub worker_id: WorkerId,
    pub name: String,
    pub email: Email,
    pub location_preference: Location,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Worker {
    /// Create a worker with a fresh identifier, ready to be stored.
    #[must_use]
    pub fn new(name: String, email: Email, location_preference: Location) -> Self {
        Self {
            worker_id: Uuid::new_v4(),
            name,
            email,
            location_preference,
            created_at: chrono::Utc::now(),
        }
    }
}

/// In-memory worker store. Internally synchronized, so one instance can be
/// shared across threads as-is.
pub type WorkerRepo = InMemoryRepo<Worker, WorkerId>;

/// Returns a new, empty in-memory worker repository.
#[must_use]
pub fn new_worker_repository() -> WorkerRepo {
    InMemoryRepo::new()
}

impl WorkerRepository for WorkerRepo {
    fn store(&self, worker: Worker) -> Result<(), RepositoryError> {
        debug!("Storing worker {}", worker.worker_id);
        self.insert(worker.worker_id, worker);
        Ok(())
    }

    fn find_by_id(&self, id: &WorkerId) -> Result<Worker, RepositoryError> {
        self.get(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    fn find_by_email(&self, email: &str) -> Result<Worker, RepositoryError> {
        self.find(|worker| worker.email == email)
            .ok_or_else(|| RepositoryError::NotFound(email.to_string()))
    }

    fn find_all(&self) -> Result<Vec<Worker>, RepositoryError> {
        Ok(self.values())
    }

    fn update_location(
        &self,
        id: &WorkerId,
        location: Location,
    ) -> Result<Worker, RepositoryError> {
        debug!("Updating location preference for worker {id}");
        self.update(id, |worker| worker.location_preference = location)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }
}
