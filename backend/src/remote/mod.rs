pub mod medication_service;

pub use medication_service::{MedicationService, RemoteInfoError};
