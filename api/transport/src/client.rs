//! Async HTTP client for monitoring and control-plane requests, with
//! exponential-backoff retry.
//!
//! The [`Client`] is generic over an environment `E` so callers can supply
//! different credential sources and endpoint URLs without changing client
//! code.

mod private
{
  use crate::error::{ TransportError, Result };
  use crate::environment::Environment;
  use core::time::Duration;
  use reqwest::Client as HttpClient;

  /// Async HTTP client for monitoring and control-plane REST calls.
  ///
  /// Generic over an environment `E` so callers can supply different
  /// credential sources and endpoint URLs without changing client code.
  ///
  /// Construct via [`build`][Client::build]. All request methods are `async`.
  #[ derive( Debug ) ]
  pub struct Client< E >
  where
    E : Environment,
  {
    /// Underlying reqwest HTTP client, pre-configured with timeout settings.
    http_client : HttpClient,
    /// Environment supplying credentials and endpoint URLs.
    environment : E,
  }

  impl< E > Client< E >
  where
    E : Environment,
  {
    /// Builds an HTTP client configured from the given environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying `reqwest::Client` cannot be built.
    #[ inline ]
    pub fn build( env : E ) -> Result< Self >
    {
      let http_client = HttpClient::builder()
        .timeout( env.timeout() )
        .connect_timeout( Duration::from_secs( 15 ) )
        .build()
        .map_err( | e | TransportError::Network( e.to_string() ) )?;
      Ok( Self { http_client, environment : env } )
    }

    /// Returns the environment this client was built with.
    #[ inline ]
    pub fn environment( &self ) -> &E
    {
      &self.environment
    }

    /// Sends a single POST request to the monitoring endpoint and
    /// deserialises the JSON response. Does not retry; see
    /// [`send_with_retry`][Client::send_with_retry] for the retrying variant
    /// used by the queue manager.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::UrlConfiguration`] if no monitoring URL is
    /// configured, or network/timeout/deserialisation errors otherwise.
    #[ inline ]
    pub async fn post_monitoring< I, O >( &self, body : &I ) -> Result< O >
    where
      I : serde::Serialize,
      O : serde::de::DeserializeOwned,
    {
      let url = self.environment.monitoring_url()
        .ok_or_else( || TransportError::UrlConfiguration( "monitoring URL is not set".to_owned() ) )?;
      self.post( url, body ).await
    }

    /// Sends a single POST request to the control endpoint and deserialises
    /// the JSON response.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::UrlConfiguration`] if no control URL is
    /// configured, or network/timeout/deserialisation errors otherwise.
    #[ inline ]
    pub async fn post_control< I, O >( &self, body : &I ) -> Result< O >
    where
      I : serde::Serialize,
      O : serde::de::DeserializeOwned,
    {
      let url = self.environment.control_url()
        .ok_or_else( || TransportError::UrlConfiguration( "control URL is not set".to_owned() ) )?;
      self.post( url, body ).await
    }

    async fn post< I, O >( &self, url : &str, body : &I ) -> Result< O >
    where
      I : serde::Serialize,
      O : serde::de::DeserializeOwned,
    {
      let headers = self.environment.headers()?;
      let response = self.http_client
        .post( url )
        .headers( headers )
        .json( body )
        .send()
        .await
        .map_err( TransportError::from )?;
      Self::handle_response( response ).await
    }

    async fn handle_response< O >( response : reqwest::Response ) -> Result< O >
    where
      O : serde::de::DeserializeOwned,
    {
      let status = response.status();
      if status.is_success()
      {
        response
          .json::< O >()
          .await
          .map_err( TransportError::from )
          .map_err( Into::into )
      }
      else
      {
        let body = response
          .text()
          .await
          .unwrap_or_else( | _ | status.to_string() );
        Err( TransportError::ApiResponse( body ).into() )
      }
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    Client,
  };
}
