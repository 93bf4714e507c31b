//! Backend test support utilities
//!
//! Shared by the integration tests of `neutrino-backend`: one-time logging
//! initialization and collision-free identifiers.

pub mod test_logging;
pub mod unique_helpers;
