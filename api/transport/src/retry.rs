//! Retrying wrappers around [`Client::post_monitoring`][crate::Client::post_monitoring]
//! and [`Client::post_control`][crate::Client::post_control].
//!
//! Retry delay doubles from one second up to a thirty-second cap
//! (`min(1s * 2^attempt, 30s)`), matching the monitoring SDK's original retry
//! formula. Each attempt is logged via [`crate::log_retry`] when the
//! `structured_logging` feature is enabled.
//!
//! Configuration errors ([`TransportError::ApiKeyMissing`] and
//! [`TransportError::UrlConfiguration`]) are never retried — they cannot
//! succeed on a later attempt, so the first occurrence is returned
//! immediately without consuming any backoff delay.

mod private
{
  use crate::client::Client;
  use crate::environment::Environment;
  use crate::error::{ TransportError, Result };
  use core::time::Duration;

  /// Backoff policy matching `min(1000ms * 2^attempt, 30_000ms)`, capped at
  /// a fixed number of additional attempts after the first.
  struct DoublingBackoff
  {
    attempt : u32,
    max_retries : u32,
  }

  impl DoublingBackoff
  {
    fn new( max_retries : u32 ) -> Self
    {
      Self { attempt : 0, max_retries }
    }
  }

  impl backoff::backoff::Backoff for DoublingBackoff
  {
    fn reset( &mut self )
    {
      self.attempt = 0;
    }

    fn next_backoff( &mut self ) -> Option< Duration >
    {
      if self.attempt >= self.max_retries
      {
        return None;
      }
      let delay_ms = 1000u64.saturating_mul( 1u64 << self.attempt.min( 31 ) ).min( 30_000 );
      self.attempt += 1;
      Some( Duration::from_millis( delay_ms ) )
    }
  }

  impl< E > Client< E >
  where
    E : Environment,
  {
    /// Sends a POST request to the monitoring endpoint, retrying up to
    /// `max_retries` additional times on failure.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::RetryExhausted`] wrapping the last error if
    /// every attempt fails. Returns [`TransportError::ApiKeyMissing`] or
    /// [`TransportError::UrlConfiguration`] immediately, unwrapped, without
    /// retrying.
    pub async fn send_monitoring_with_retry< I, O >
    (
      &self,
      body : &I,
      max_retries : u32,
    ) -> Result< O >
    where
      I : serde::Serialize,
      O : serde::de::DeserializeOwned,
    {
      self.send_with_retry( max_retries, | | self.post_monitoring( body ) ).await
    }

    /// Sends a POST request to the control endpoint, retrying up to
    /// `max_retries` additional times on failure.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::RetryExhausted`] wrapping the last error if
    /// every attempt fails. Returns [`TransportError::ApiKeyMissing`] or
    /// [`TransportError::UrlConfiguration`] immediately, unwrapped, without
    /// retrying.
    pub async fn send_control_with_retry< I, O >
    (
      &self,
      body : &I,
      max_retries : u32,
    ) -> Result< O >
    where
      I : serde::Serialize,
      O : serde::de::DeserializeOwned,
    {
      self.send_with_retry( max_retries, | | self.post_control( body ) ).await
    }

    async fn send_with_retry< O, F, Fut >( &self, max_retries : u32, mut operation : F ) -> Result< O >
    where
      F : FnMut() -> Fut,
      Fut : core::future::Future< Output = Result< O > >,
    {
      let mut backoff = DoublingBackoff::new( max_retries );
      let mut attempt = 0u32;
      let mut last_error;

      loop
      {
        match operation().await
        {
          Ok( value ) => return Ok( value ),
          Err( e ) =>
          {
            if matches!
            (
              e.downcast_ref::< TransportError >(),
              Some( TransportError::ApiKeyMissing | TransportError::UrlConfiguration( _ ) )
            )
            {
              return Err( e );
            }

            last_error = Some( e );
            #[ cfg( feature = "structured_logging" ) ]
            crate::log_retry!( attempt + 1, max_retries + 1 );

            match backoff::backoff::Backoff::next_backoff( &mut backoff )
            {
              Some( delay ) =>
              {
                tokio::time::sleep( delay ).await;
                attempt += 1;
              }
              None => break,
            }
          }
        }
      }

      Err
      (
        TransportError::RetryExhausted
        (
          last_error.map( | e | e.to_string() ).unwrap_or_default()
        ).into()
      )
    }
  }
}

crate::mod_interface!
{
}
