use in_memory_adapter::InMemoryRepo;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::repository::{FacilityRepository, RepositoryError};
use crate::worker::Location;

pub type FacilityId = Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    pub facility_id: FacilityId,
    pub name: String,
    pub location: Location,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Facility {
    /// Create a facility with a fresh identifier, ready to be stored.
    #[must_use]
    pub fn new(name: String, location: Location) -> Self {
        Self {
            facility_id: Uuid::new_v4(),
            name,
            location,
            created_at: chrono::Utc::now(),
        }
    }
}

/// In-memory facility store. Internally synchronized, so one instance can
/// be shared across threads as-is.
pub type FacilityRepo = InMemoryRepo<Facility, FacilityId>;

/// Returns a new, empty in-memory facility repository.
#[must_use]
pub fn new_facility_repository() -> FacilityRepo {
    InMemoryRepo::new()
}

impl FacilityRepository for FacilityRepo {
    fn store(&self, facility: Facility) -> Result<(), RepositoryError> {
        debug!("Storing facility {}", facility.facility_id);
        self.insert(facility.facility_id, facility);
        Ok(())
    }

    fn find_by_id(&self, id: &FacilityId) -> Result<Facility, RepositoryError> {
        self.get(id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))
    }

    fn find_all(&self) -> Result<Vec<Facility>, RepositoryError> {
        Ok(self.values())
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Arc, thread};

    use super::*;

    fn test_facility(name: &str) -> Facility {
        Facility::new(
            name.to_string(),
            Location::new("Austin".to_string(), "TX".to_string()),
        )
    }

    #[test]
    fn test_store_then_find_by_id_round_trips() {
        let repo = new_facility_repository();
        let facility = test_facility("Downtown Clinic");

        repo.store(facility.clone()).unwrap();

        let found = repo.find_by_id(&facility.facility_id).unwrap();
        assert_eq!(found, facility);
    }

    #[test]
    fn test_store_same_id_replaces_previous_record() {
        let repo = new_facility_repository();
        let first = test_facility("Downtown Clinic");
        let mut second = test_facility("Uptown Clinic");
        second.facility_id = first.facility_id;

        repo.store(first).unwrap();
        repo.store(second.clone()).unwrap();

        let found = repo.find_by_id(&second.facility_id).unwrap();
        assert_eq!(found, second);
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }

    #[test]
    fn test_find_by_id_absent_fails_with_queried_key() {
        let repo = new_facility_repository();
        let id = Uuid::new_v4();

        let err = repo.find_by_id(&id).unwrap_err();
        assert_eq!(err, RepositoryError::NotFound(id.to_string()));
    }

    #[test]
    fn test_find_all_returns_every_facility_exactly_once() {
        let repo = new_facility_repository();
        let mut stored_ids = HashSet::new();
        for i in 0..4 {
            let facility = test_facility(&format!("Facility {i}"));
            stored_ids.insert(facility.facility_id);
            repo.store(facility).unwrap();
        }

        let all = repo.find_all().unwrap();
        assert_eq!(all.len(), 4);

        let found_ids: HashSet<FacilityId> = all.iter().map(|f| f.facility_id).collect();
        assert_eq!(found_ids, stored_ids);
    }

    #[test]
    fn test_find_all_on_empty_store() {
        let repo = new_facility_repository();
        assert!(repo.find_all().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_stores_are_all_retrievable() {
        let repo = Arc::new(new_facility_repository());
        let num_threads = 8;
        let facilities_per_thread = 50;

        let handles: Vec<_> = (0..num_threads)
            .map(|thread_id| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    let mut ids = Vec::new();
                    for i in 0..facilities_per_thread {
                        let facility = test_facility(&format!("Facility {thread_id}-{i}"));
                        ids.push(facility.facility_id);
                        repo.store(facility).unwrap();
                    }
                    ids
                })
            })
            .collect();

        let mut id_chunks = Vec::new();
        for handle in handles {
            id_chunks.push(handle.join().unwrap());
        }

        assert_eq!(
            repo.find_all().unwrap().len(),
            num_threads * facilities_per_thread
        );

        // Read back concurrently as well; every record must come out whole.
        let readers: Vec<_> = id_chunks
            .into_iter()
            .map(|ids| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    for id in ids {
                        assert_eq!(repo.find_by_id(&id).unwrap().facility_id, id);
                    }
                })
            })
            .collect();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
