//! Structured logging helpers using the `tracing` crate.
//!
//! Mirrors the zero-overhead macro pattern used across the pack: each macro
//! expands to nothing unless `structured_logging` is enabled, so call sites
//! never pay for formatting when the feature is off.

mod private
{
  /// Logs a retry attempt against the monitoring or control endpoint.
  #[ macro_export ]
  macro_rules! log_retry
  {
    ( $attempt:expr, $max_attempts:expr ) =>
    {
      #[ cfg( feature = "structured_logging" ) ]
      {
        tracing::warn!( attempt = $attempt, max_attempts = $max_attempts, "retrying transport request" );
      }
    };
  }

  /// Logs that a request exhausted all retry attempts.
  #[ macro_export ]
  macro_rules! log_retry_exhausted
  {
    ( $endpoint:expr ) =>
    {
      #[ cfg( feature = "structured_logging" ) ]
      {
        tracing::error!( endpoint = $endpoint, "retry attempts exhausted" );
      }
    };
  }
}

crate::mod_interface!
{
}
