//! Blocking wrapper around [`Client`][crate::Client] for synchronous contexts.
//!
//! Each [`SyncClient`] instance owns a `tokio::runtime::Runtime`. Prefer the
//! async `Client` when possible; use `SyncClient` only for legacy or
//! scripting contexts where async is not an option.

mod private
{
  use crate::error::{ TransportError, Result };
  use crate::{ Client, Environment };
  use std::sync::Arc;
  use tokio::runtime::Runtime;

  /// Blocking wrapper around [`Client`] for use in synchronous contexts.
  ///
  /// Each instance owns a `tokio::runtime::Runtime`. Do not create many
  /// instances; prefer the async [`Client`] when possible.
  #[ derive( Debug ) ]
  pub struct SyncClient< E >
  where
    E : Environment,
  {
    client  : Client< E >,
    runtime : Arc< Runtime >,
  }

  impl< E > SyncClient< E >
  where
    E : Environment,
  {
    /// Wraps an async `Client` in a new dedicated tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the tokio runtime cannot be created.
    #[ inline ]
    pub fn new( client : Client< E > ) -> Result< Self >
    {
      let runtime = Runtime::new()
        .map_err( | e | TransportError::Network( e.to_string() ) )?;
      Ok( Self { client, runtime : Arc::new( runtime ) } )
    }

    /// Sends a blocking POST request to the monitoring endpoint, retrying
    /// up to `max_retries` additional times on failure.
    ///
    /// # Errors
    ///
    /// Returns network, timeout, or deserialisation errors.
    #[ inline ]
    pub fn send_monitoring_with_retry< I, O >( &self, body : &I, max_retries : u32 ) -> Result< O >
    where
      I : serde::Serialize,
      O : serde::de::DeserializeOwned,
    {
      self.runtime.block_on( self.client.send_monitoring_with_retry( body, max_retries ) )
    }

    /// Sends a blocking POST request to the control endpoint, retrying up
    /// to `max_retries` additional times on failure.
    ///
    /// # Errors
    ///
    /// Returns network, timeout, or deserialisation errors.
    #[ inline ]
    pub fn send_control_with_retry< I, O >( &self, body : &I, max_retries : u32 ) -> Result< O >
    where
      I : serde::Serialize,
      O : serde::de::DeserializeOwned,
    {
      self.runtime.block_on( self.client.send_control_with_retry( body, max_retries ) )
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    SyncClient,
  };
}
