//! The mocking backend capability contract.

use crate::Result;
use std::any::Any;

/// Bridges the scenario lifecycle to a process-wide mocking backend.
///
/// The adapter owns no scenario data. It coordinates a shared mock space
/// that setups register expectations into, so one instance is selected at
/// configuration time and shared by reference across scenarios. Runs against
/// one adapter must be serialized: overlapping runs would clobber each
/// other's expectations.
pub trait MockAdapter: Send + Sync {
    /// Backend identifier used for diagnostics and name-based selection.
    fn framework_name(&self) -> &'static str;

    /// Exposes the concrete adapter so setups can reach backend-specific APIs.
    fn as_any(&self) -> &dyn Any;

    /// Resets the mock space to a clean baseline before a run.
    fn setup_mocks(&self) -> Result<()>;

    /// Checks that every expectation registered since setup was satisfied.
    ///
    /// Fails with [`Error::AdapterVerification`](crate::Error::AdapterVerification)
    /// listing the unmet expectations.
    fn verify_mocks(&self) -> Result<()>;

    /// Resets the mock space back to baseline, whatever verification said.
    fn teardown_mocks(&self) -> Result<()>;
}
