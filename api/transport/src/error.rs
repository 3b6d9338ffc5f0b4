//! Error type and result alias for monitoring/control transport operations.

mod private
{
  use error_tools::dependency::thiserror;

  /// Error variants for monitoring/control transport operations.
  ///
  /// Covers transport failures, API-level errors, and configuration problems.
  /// Convert from `reqwest::Error` and `serde_json::Error` via `From` impls.
  #[ derive( Debug, Clone, PartialEq, thiserror::Error ) ]
  #[ non_exhaustive ]
  pub enum TransportError
  {
    /// API key is absent from the environment.
    #[ error( "API key is missing" ) ]
    ApiKeyMissing,

    /// A required endpoint URL (monitoring or control) is not configured.
    #[ error( "URL configuration error : {0}" ) ]
    UrlConfiguration( String ),

    /// Request exceeded the configured timeout.
    #[ error( "Timeout : {0}" ) ]
    Timeout( String ),

    /// The API returned a non-success status with a response body.
    #[ error( "API response error : {0}" ) ]
    ApiResponse( String ),

    /// Network connectivity error (DNS, TCP, etc.).
    #[ error( "Network error : {0}" ) ]
    Network( String ),

    /// All retry attempts were exhausted without success.
    #[ error( "Retry attempts exhausted : {0}" ) ]
    RetryExhausted( String ),

    /// Failed to deserialise the response body.
    #[ error( "Deserialisation error : {0}" ) ]
    Deserialise( String ),
  }

  /// Crate-level result type backed by a boxed dynamic error.
  pub type Result< T > = error_tools::untyped::Result< T >;

  impl From< reqwest::Error > for TransportError
  {
    #[ inline ]
    fn from( e : reqwest::Error ) -> Self
    {
      if e.is_timeout()
      {
        Self::Timeout( e.to_string() )
      }
      else if e.is_connect()
      {
        Self::Network( e.to_string() )
      }
      else
      {
        Self::Network( e.to_string() )
      }
    }
  }

  impl From< serde_json::Error > for TransportError
  {
    #[ inline ]
    fn from( e : serde_json::Error ) -> Self
    {
      Self::Deserialise( e.to_string() )
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    TransportError,
    Result,
  };
}
