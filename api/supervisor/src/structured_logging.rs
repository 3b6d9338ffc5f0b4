//! Structured logging helpers using the `tracing` crate.
//!
//! Mirrors the zero-overhead macro pattern used across the pack: each macro
//! expands to nothing unless `structured_logging` is enabled, so call sites
//! never pay for formatting when the feature is off.

mod private
{
  /// Logs that a payload was enqueued into the batch queue.
  #[ macro_export ]
  macro_rules! log_enqueue
  {
    ( $batch_id:expr, $batch_len:expr ) =>
    {
      #[ cfg( feature = "structured_logging" ) ]
      {
        tracing::debug!( batch_id = $batch_id, batch_len = $batch_len, "enqueued payload" );
      }
    };
  }

  /// Logs that a batch was handed to the transport for sending.
  #[ macro_export ]
  macro_rules! log_batch_sent
  {
    ( $batch_id:expr, $batch_len:expr ) =>
    {
      #[ cfg( feature = "structured_logging" ) ]
      {
        tracing::info!( batch_id = $batch_id, batch_len = $batch_len, "draining batch" );
      }
    };
  }

  /// Logs that a batch's send attempt raised a transport error.
  #[ macro_export ]
  macro_rules! log_batch_failed
  {
    ( $batch_id:expr, $error:expr ) =>
    {
      #[ cfg( feature = "structured_logging" ) ]
      {
        tracing::warn!( batch_id = $batch_id, error = $error, "batch send failed, re-enqueueing payloads" );
      }
    };
  }

  /// Logs that a call was blocked by the control decision.
  #[ macro_export ]
  macro_rules! log_blocked
  {
    ( $email:expr, $sensitivity:expr ) =>
    {
      #[ cfg( feature = "structured_logging" ) ]
      {
        tracing::warn!( email = $email, sensitivity = $sensitivity, "call blocked by control decision" );
      }
    };
  }

  /// Logs that a registered middleware hook raised an error.
  #[ macro_export ]
  macro_rules! log_middleware_error
  {
    ( $name:expr, $error:expr ) =>
    {
      #[ cfg( feature = "structured_logging" ) ]
      {
        tracing::debug!( middleware = $name, error = $error, "middleware hook failed" );
      }
    };
  }
}

crate::mod_interface!
{
}
