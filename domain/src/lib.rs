pub mod core;
pub mod facility;
pub mod repository;
pub mod worker;

pub use repository::{FacilityRepository, RepositoryError, WorkerRepository};
