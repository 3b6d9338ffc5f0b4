//! Error type and result alias for supervision, queueing, and storage operations.

mod private
{
  use error_tools::dependency::thiserror;

  /// Error variants surfaced by the supervisor, queue manager, and storage layer.
  ///
  /// Only [`SupervisorError::Blocked`] and the user function's own errors are
  /// meant to reach application code unchanged; every other variant is logged
  /// and swallowed internally per the fail-open monitoring policy.
  #[ derive( Debug, Clone, PartialEq, thiserror::Error ) ]
  #[ non_exhaustive ]
  pub enum SupervisorError
  {
    /// A call was gated and the control decision was `allowed = false`.
    #[ error( "Function execution blocked by Olakai" ) ]
    Blocked
    {
      /// Sensitivity categories the control service detected.
      detected_sensitivity : Vec< String >,
      /// Whether the caller's persona is allowed at all.
      is_allowed_persona : bool,
      /// Optional human-readable detail from the control service.
      message : Option< String >,
    },

    /// The queue manager was used before it finished initializing.
    #[ error( "Queue manager is not initialized" ) ]
    QueueNotInitialized,

    /// A client was used before its configuration finished initializing.
    #[ error( "Configuration is not initialized" ) ]
    ConfigNotInitialized,

    /// Sanitization of a payload value failed.
    #[ error( "Sanitization error : {0}" ) ]
    Sanitization( String ),

    /// A registered middleware raised an error.
    #[ error( "Middleware error : {0}" ) ]
    MiddlewareError( String ),

    /// Client or subsystem construction failed.
    #[ error( "Initialization error : {0}" ) ]
    Initialization( String ),
  }

  /// Crate-level result type backed by a boxed dynamic error.
  pub type Result< T > = error_tools::untyped::Result< T >;

  #[ cfg( test ) ]
  mod tests
  {
    use super::*;

    #[ test ]
    fn blocked_display_is_stable()
    {
      let err = SupervisorError::Blocked
      {
        detected_sensitivity : vec![ "pii".to_owned() ],
        is_allowed_persona : true,
        message : None,
      };
      assert_eq!( err.to_string(), "Function execution blocked by Olakai" );
    }

    #[ test ]
    fn initialization_display_includes_detail()
    {
      let err = SupervisorError::Initialization( "bad key".to_owned() );
      assert_eq!( err.to_string(), "Initialization error : bad key" );
    }

    #[ test ]
    fn converts_into_boxed_result_via_into()
    {
      let result : Result< () > = Err( SupervisorError::ConfigNotInitialized.into() );
      assert!( result.is_err() );
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    SupervisorError,
    Result,
  };
}
