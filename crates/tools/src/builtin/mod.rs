//! Built-in registration tools.

mod add_registration;
mod get_all_registrations;
mod search_registrations;

pub use add_registration::AddRegistrationTool;
pub use get_all_registrations::GetAllRegistrationsTool;
pub use search_registrations::SearchRegistrationsTool;

use crate::error::ToolError;
use crate::registry::ToolRegistry;
use registration_core::{RegistrationResult, RegistrationService, StoredRecord};
use std::sync::Arc;

/// Register every registration tool against a shared service.
pub fn register_registration_tools(registry: &mut ToolRegistry, service: Arc<RegistrationService>) {
    registry.register(Arc::new(AddRegistrationTool::new(service.clone())));
    registry.register(Arc::new(GetAllRegistrationsTool::new(service.clone())));
    registry.register(Arc::new(SearchRegistrationsTool::new(service)));
}

/// Run a blocking store operation off the async runtime.
async fn run_blocking<T, F>(f: F) -> Result<T, ToolError>
where
    F: FnOnce() -> RegistrationResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ToolError::TaskFailed(e.to_string()))?
        .map_err(ToolError::from)
}

/// Numbered listing, one record per line.
fn format_records(heading: &str, records: &[StoredRecord]) -> String {
    let mut out = format!("{}\n\n", heading);
    for (i, record) in records.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, record.summary()));
    }
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use registration_core::{RegistrationService, RegistrationStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    pub fn service_in(dir: &TempDir) -> Arc<RegistrationService> {
        Arc::new(RegistrationService::new(RegistrationStore::new(
            dir.path().join("registrations.csv"),
        )))
    }
}
