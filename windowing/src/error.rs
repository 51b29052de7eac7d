use thiserror::Error;

/// Setup-time configuration errors.
///
/// These are the only errors the core reports to its caller. Everything that can go wrong
/// later (bad measurements, stale rows) is absorbed and logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Neither a fixed row height nor a row height estimator was configured.
    #[error("either a fixed row height or an estimated row height must be provided")]
    MissingHeightStrategy,
}
