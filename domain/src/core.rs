use tracing::info;

use crate::{
    facility::{Facility, FacilityRepo, new_facility_repository},
    repository::{FacilityRepository, WorkerRepository},
    worker::{Location, Worker, WorkerRepo, new_worker_repository},
};

/// Aggregate root wiring one store of each kind, handed to callers as a
/// unit. Both stores are internally synchronized, so a shared `StaffX`
/// needs no outer lock; put it behind an `Arc` and clone the handle.
#[derive(Debug)]
pub struct StaffX {
    pub worker_repo: WorkerRepo,
    pub facility_repo: FacilityRepo,
}

impl StaffX {
    #[must_use]
    pub fn new() -> Self {
        StaffX {
            worker_repo: new_worker_repository(),
            facility_repo: new_facility_repository(),
        }
    }

    /// Seed one worker and one facility for local experimentation.
    #[allow(clippy::missing_panics_doc)]
    pub fn debug_populate(&self) {
        let location = Location::new("Austin".to_string(), "TX".to_string());
        let worker = Worker::new(
            "Test Worker".to_string(),
            "test@test.com".to_string(),
            location.clone(),
        );
        let worker_id = worker.worker_id;
        self.worker_repo.store(worker).unwrap();

        let facility = Facility::new("Test Facility".to_string(), location);
        let facility_id = facility.facility_id;
        self.facility_repo.store(facility).unwrap();

        info!("Populated test worker {worker_id} and test facility {facility_id}");
    }
}

impl Default for StaffX {
    fn default() -> Self {
        Self::new()
    }
}
