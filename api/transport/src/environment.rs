//! Environment configuration trait and default implementation.
//!
//! The [`Environment`] trait abstracts over credential sources and endpoint
//! configuration, enabling the same [`crate::Client`] to target any
//! monitoring/control deployment without changing client code.

mod private
{
  use crate::error::{ TransportError, Result };
  use core::time::Duration;
  use reqwest::header;

  /// Configuration contract for a monitoring/control API environment.
  ///
  /// Implementors supply the API key and the two endpoint URLs; a default
  /// `headers()` implementation builds the standard `x-api-key` header.
  ///
  /// # Trait Bounds
  ///
  /// `Send + Sync + 'static` are required for use across async task boundaries.
  pub trait Environment : Send + Sync + 'static
  {
    /// Returns the raw API key string.
    fn api_key( &self ) -> &str;

    /// Returns the monitoring endpoint URL, or `None` if not configured.
    fn monitoring_url( &self ) -> Option< &str >;

    /// Returns the control endpoint URL, or `None` if not configured.
    fn control_url( &self ) -> Option< &str >;

    /// Returns the per-request timeout duration.
    fn timeout( &self ) -> Duration;

    /// Constructs the HTTP headers required for every request.
    ///
    /// Default implementation adds `x-api-key: <api_key>`.
    ///
    /// # Errors
    ///
    /// Returns an error if header value construction fails (e.g. key contains
    /// non-ASCII characters that reqwest rejects).
    #[ inline ]
    fn headers( &self ) -> Result< header::HeaderMap >
    {
      let mut map = header::HeaderMap::new();
      let key_value = self.api_key()
        .parse::< header::HeaderValue >()
        .map_err( | _e | TransportError::ApiKeyMissing )?;
      map.insert( "x-api-key", key_value );
      map.insert
      (
        header::CONTENT_TYPE,
        header::HeaderValue::from_static( "application/json" ),
      );
      Ok( map )
    }
  }

  /// Default environment backed by in-memory values.
  ///
  /// Construct with [`new()`][EnvironmentImpl::new], then chain builder
  /// methods to override defaults.
  #[ derive( Debug, Clone ) ]
  pub struct EnvironmentImpl
  {
    api_key        : String,
    monitoring_url : Option< String >,
    control_url    : Option< String >,
    timeout        : Duration,
  }

  impl EnvironmentImpl
  {
    /// Default request timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS : u64 = 30;

    /// Creates a new environment with no endpoints configured and a
    /// 30-second timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_key` is empty.
    #[ inline ]
    pub fn new( api_key : impl Into< String > ) -> Result< Self >
    {
      let api_key = api_key.into();
      if api_key.is_empty()
      {
        return Err( TransportError::ApiKeyMissing.into() );
      }
      Ok( Self
      {
        api_key,
        monitoring_url : None,
        control_url : None,
        timeout : Duration::from_secs( Self::DEFAULT_TIMEOUT_SECS ),
      })
    }

    /// Overrides the monitoring endpoint URL, returning the modified environment.
    #[ must_use ]
    #[ inline ]
    pub fn with_monitoring_url( mut self, url : impl Into< String > ) -> Self
    {
      self.monitoring_url = Some( url.into() );
      self
    }

    /// Overrides the control endpoint URL, returning the modified environment.
    #[ must_use ]
    #[ inline ]
    pub fn with_control_url( mut self, url : impl Into< String > ) -> Self
    {
      self.control_url = Some( url.into() );
      self
    }

    /// Overrides the request timeout, returning the modified environment.
    #[ must_use ]
    #[ inline ]
    pub fn with_timeout( mut self, timeout : Duration ) -> Self
    {
      self.timeout = timeout;
      self
    }
  }

  impl Environment for EnvironmentImpl
  {
    #[ inline ]
    fn api_key( &self ) -> &str
    {
      &self.api_key
    }

    #[ inline ]
    fn monitoring_url( &self ) -> Option< &str >
    {
      self.monitoring_url.as_deref()
    }

    #[ inline ]
    fn control_url( &self ) -> Option< &str >
    {
      self.control_url.as_deref()
    }

    #[ inline ]
    fn timeout( &self ) -> Duration
    {
      self.timeout
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    Environment,
    EnvironmentImpl,
  };
}
