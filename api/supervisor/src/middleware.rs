//! Ordered, append-on-register middleware pipeline run around every
//! supervised call.

mod private
{
  use serde_json::Value;
  use std::fmt;
  use std::sync::Arc;

  /// A single registered middleware hook set.
  ///
  /// Any of the three hooks may be absent. `before_call` may replace the
  /// call's arguments; `after_call` may replace the call's result; `on_error`
  /// observes (but cannot suppress or replace) an error.
  #[ derive( Clone ) ]
  pub struct Middleware
  {
    /// Name used for lookup by [`MiddlewareRegistry::remove`] and in logs.
    pub name : String,
    /// Runs before the wrapped function; may replace the call's arguments.
    pub before_call : Option< Arc< dyn Fn( Value ) -> crate::error::Result< Value > + Send + Sync > >,
    /// Runs after a successful call; may replace the call's result.
    pub after_call : Option< Arc< dyn Fn( Value ) -> crate::error::Result< Value > + Send + Sync > >,
    /// Runs when the wrapped function raises; observes only.
    pub on_error : Option< Arc< dyn Fn( &str ) + Send + Sync > >,
  }

  impl fmt::Debug for Middleware
  {
    fn fmt( &self, f : &mut fmt::Formatter< '_ > ) -> fmt::Result
    {
      f.debug_struct( "Middleware" )
        .field( "name", &self.name )
        .field( "before_call", &self.before_call.is_some() )
        .field( "after_call", &self.after_call.is_some() )
        .field( "on_error", &self.on_error.is_some() )
        .finish()
    }
  }

  impl Middleware
  {
    /// Creates a bare middleware with the given name and no hooks.
    #[ inline ]
    #[ must_use ]
    pub fn new( name : impl Into< String > ) -> Self
    {
      Self { name : name.into(), before_call : None, after_call : None, on_error : None }
    }

    /// Attaches a `before_call` hook, returning the modified middleware.
    #[ must_use ]
    #[ inline ]
    pub fn with_before_call
    (
      mut self,
      f : impl Fn( Value ) -> crate::error::Result< Value > + Send + Sync + 'static,
    ) -> Self
    {
      self.before_call = Some( Arc::new( f ) );
      self
    }

    /// Attaches an `after_call` hook, returning the modified middleware.
    #[ must_use ]
    #[ inline ]
    pub fn with_after_call
    (
      mut self,
      f : impl Fn( Value ) -> crate::error::Result< Value > + Send + Sync + 'static,
    ) -> Self
    {
      self.after_call = Some( Arc::new( f ) );
      self
    }

    /// Attaches an `on_error` hook, returning the modified middleware.
    #[ must_use ]
    #[ inline ]
    pub fn with_on_error( mut self, f : impl Fn( &str ) + Send + Sync + 'static ) -> Self
    {
      self.on_error = Some( Arc::new( f ) );
      self
    }
  }

  /// Ordered registry of [`Middleware`]. Append-on-register, read-only during
  /// a call: a registration made while a call is in flight only affects
  /// subsequent calls.
  #[ derive( Debug, Default ) ]
  pub struct MiddlewareRegistry
  {
    entries : parking_lot::RwLock< Vec< Middleware > >,
  }

  impl MiddlewareRegistry
  {
    /// Creates an empty registry.
    #[ inline ]
    #[ must_use ]
    pub fn new() -> Self
    {
      Self { entries : parking_lot::RwLock::new( Vec::new() ) }
    }

    /// Appends a middleware to the end of the registration order.
    #[ inline ]
    pub fn register( &self, middleware : Middleware )
    {
      self.entries.write().push( middleware );
    }

    /// Removes the middleware with the given name, if registered. Returns
    /// `true` if an entry was removed.
    #[ inline ]
    pub fn remove( &self, name : &str ) -> bool
    {
      let mut entries = self.entries.write();
      let before = entries.len();
      entries.retain( | m | m.name != name );
      entries.len() != before
    }

    /// Runs every registered `before_call` hook in order against `args`.
    ///
    /// If a hook raises, the pre-pass stops there and the last successfully
    /// transformed value is returned; the error is logged by the caller, not
    /// here, and never aborts the supervised call.
    #[ inline ]
    #[ must_use ]
    pub fn run_before_call( &self, mut args : Value ) -> Value
    {
      let entries = self.entries.read();
      for middleware in entries.iter()
      {
        let Some( hook ) = middleware.before_call.as_ref() else { continue };
        match hook( args.clone() )
        {
          Ok( replaced ) => args = replaced,
          Err( e ) =>
          {
            #[ cfg( feature = "structured_logging" ) ]
            crate::log_middleware_error!( middleware.name.as_str(), e.to_string().as_str() );
            break;
          }
        }
      }
      args
    }

    /// Runs every registered `after_call` hook in order against `result`.
    ///
    /// Each hook's error is logged and skipped; subsequent hooks still run
    /// against the last good value.
    #[ inline ]
    #[ must_use ]
    pub fn run_after_call( &self, mut result : Value ) -> Value
    {
      let entries = self.entries.read();
      for middleware in entries.iter()
      {
        let Some( hook ) = middleware.after_call.as_ref() else { continue };
        match hook( result.clone() )
        {
          Ok( replaced ) => result = replaced,
          Err( e ) =>
          {
            #[ cfg( feature = "structured_logging" ) ]
            crate::log_middleware_error!( middleware.name.as_str(), e.to_string().as_str() );
          }
        }
      }
      result
    }

    /// Runs every registered `on_error` hook in order with the error message.
    #[ inline ]
    pub fn run_on_error( &self, message : &str )
    {
      let entries = self.entries.read();
      for middleware in entries.iter()
      {
        if let Some( hook ) = middleware.on_error.as_ref()
        {
          hook( message );
        }
      }
    }
  }

  #[ cfg( test ) ]
  mod tests
  {
    use super::*;
    use serde_json::json;

    #[ test ]
    fn register_then_remove_by_name()
    {
      let registry = MiddlewareRegistry::new();
      registry.register( Middleware::new( "one" ) );
      assert!( registry.remove( "one" ) );
      assert!( !registry.remove( "one" ) );
    }

    #[ test ]
    fn before_call_hooks_run_in_registration_order()
    {
      let registry = MiddlewareRegistry::new();
      registry.register( Middleware::new( "a" ).with_before_call( | v |
      {
        let mut v = v;
        v[ "trail" ] = json!( "a" );
        Ok( v )
      } ) );
      registry.register( Middleware::new( "b" ).with_before_call( | v |
      {
        let mut v = v;
        v[ "trail" ] = json!( format!( "{}-b", v[ "trail" ].as_str().unwrap_or( "" ) ) );
        Ok( v )
      } ) );
      let out = registry.run_before_call( json!( {} ) );
      assert_eq!( out[ "trail" ], json!( "a-b" ) );
    }

    #[ test ]
    fn before_call_stops_at_first_erroring_hook()
    {
      let registry = MiddlewareRegistry::new();
      registry.register( Middleware::new( "ok" ).with_before_call( | v |
      {
        let mut v = v;
        v[ "seen" ] = json!( true );
        Ok( v )
      } ) );
      registry.register( Middleware::new( "broken" ).with_before_call( | _v |
      {
        Err( crate::error::SupervisorError::MiddlewareError( "boom".to_owned() ).into() )
      } ) );
      registry.register( Middleware::new( "never_runs" ).with_before_call( | v |
      {
        let mut v = v;
        v[ "never" ] = json!( true );
        Ok( v )
      } ) );
      let out = registry.run_before_call( json!( {} ) );
      assert_eq!( out[ "seen" ], json!( true ) );
      assert!( out.get( "never" ).is_none() );
    }

    #[ test ]
    fn after_call_keeps_running_past_an_erroring_hook()
    {
      let registry = MiddlewareRegistry::new();
      registry.register( Middleware::new( "broken" ).with_after_call( | _v |
      {
        Err( crate::error::SupervisorError::MiddlewareError( "boom".to_owned() ).into() )
      } ) );
      registry.register( Middleware::new( "ok" ).with_after_call( | v |
      {
        let mut v = v;
        v[ "seen" ] = json!( true );
        Ok( v )
      } ) );
      let out = registry.run_after_call( json!( {} ) );
      assert_eq!( out[ "seen" ], json!( true ) );
    }

    #[ test ]
    fn on_error_hooks_all_run_and_only_observe()
    {
      let registry = MiddlewareRegistry::new();
      let seen = Arc::new( parking_lot::Mutex::new( Vec::new() ) );
      let seen_a = Arc::clone( &seen );
      let seen_b = Arc::clone( &seen );
      registry.register( Middleware::new( "a" ).with_on_error( move | msg | seen_a.lock().push( msg.to_owned() ) ) );
      registry.register( Middleware::new( "b" ).with_on_error( move | msg | seen_b.lock().push( msg.to_owned() ) ) );
      registry.run_on_error( "kaboom" );
      assert_eq!( *seen.lock(), vec![ "kaboom".to_owned(), "kaboom".to_owned() ] );
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    Middleware,
    MiddlewareRegistry,
  };
}
