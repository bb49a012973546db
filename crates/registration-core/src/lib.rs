//! Registration core - validation and storage of personal registrations.
//!
//! - [`validator`] checks and normalizes name, email and date of birth
//! - [`RegistrationStore`] persists records to an append-only CSV file
//! - [`RegistrationService`] is the entry point used by the tool and HTTP layers

mod error;
mod service;
mod store;
mod types;
pub mod validator;

pub use error::{RegistrationError, RegistrationResult};
pub use service::{AddRegistrationResponse, AddStatus, RegistrationService};
pub use store::{RegistrationStore, DEFAULT_STORE_PATH};
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn service_in(dir: &TempDir) -> RegistrationService {
        RegistrationService::new(RegistrationStore::new(dir.path().join("registrations.csv")))
    }

    #[test]
    fn test_end_to_end_add_and_list() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);

        let response = service
            .add_registration("Jane Smith", "jane@test.com", "1985-06-20")
            .unwrap();
        assert_eq!(response.status, AddStatus::Success);

        let all = service.get_all_registrations().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Jane Smith");
        assert_eq!(all[0].email, "jane@test.com");
        assert_eq!(all[0].date_of_birth.format(DATE_FORMAT).to_string(), "1985-06-20");
        assert_eq!(Some(&all[0]), response.record.as_ref());
    }

    #[test]
    fn test_fresh_store_lists_nothing() {
        let dir = TempDir::new().unwrap();
        assert!(service_in(&dir).get_all_registrations().unwrap().is_empty());
    }

    #[test]
    fn test_every_valid_triple_is_listed_once() {
        let dir = TempDir::new().unwrap();
        let service = service_in(&dir);

        let inputs = [
            (" Bob ", "BOB@example.com", "1970-12-31"),
            ("Ann Lee", "ann.lee@mail.example.org", "2000-02-29"),
            ("Zoë Quinn", "zoe+news@example.io", "1955-07-04"),
        ];

        for (name, email, dob) in inputs {
            let response = service.add_registration(name, email, dob).unwrap();
            assert_eq!(response.status, AddStatus::Success);
        }

        let all = service.get_all_registrations().unwrap();
        assert_eq!(all.len(), inputs.len());

        for (name, email, dob) in inputs {
            let expected = validator::validate_registration(name, email, dob).unwrap();
            let matching: Vec<_> = all
                .iter()
                .filter(|r| {
                    r.name == expected.name().as_str()
                        && r.email == expected.email().as_str()
                        && r.date_of_birth == expected.date_of_birth()
                })
                .collect();
            assert_eq!(matching.len(), 1);
        }
    }

    #[test]
    fn test_store_reopened_sees_previous_records() {
        let dir = TempDir::new().unwrap();
        service_in(&dir)
            .add_registration("John Doe", "john@example.com", "1990-01-15")
            .unwrap();

        // A second instance over the same file still detects the duplicate
        let service = service_in(&dir);
        let response = service
            .add_registration("John Doe", "john@example.com", "1990-01-15")
            .unwrap();
        assert_eq!(response.status, AddStatus::Duplicate);
        assert_eq!(service.get_all_registrations().unwrap().len(), 1);
    }

    #[test]
    fn test_error_classification() {
        assert!(RegistrationError::InvalidName("x".into()).is_validation());
        assert!(RegistrationError::DuplicateEmail("a@b.com".into()).is_rejection());
        assert!(!RegistrationError::DuplicateEmail("a@b.com".into()).is_validation());
        assert!(!RegistrationError::StorageUnavailable("disk full".into()).is_rejection());
        assert_eq!(
            RegistrationError::StorageUnavailable("disk full".into()).code(),
            "STORAGE_UNAVAILABLE"
        );
    }
}
