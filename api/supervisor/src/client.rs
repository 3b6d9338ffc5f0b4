//! The `Client` facade: wires an `SdkConfig` together with the supervisor,
//! queue manager, and middleware registry it owns.

mod private
{
  use crate::config::SdkConfig;
  use crate::middleware::{ Middleware, MiddlewareRegistry };
  use crate::queue_manager::QueueManager;
  use crate::supervisor::{ SuperviseError, SuperviseOptions, Supervisor };
  use api_transport::Environment;
  use core::future::Future;
  use core::time::Duration;
  use serde::Serialize;
  use serde_json::Value;
  use std::sync::Arc;

  /// Default grace period for [`Client::shutdown`].
  pub const DEFAULT_SHUTDOWN_GRACE : Duration = Duration::from_secs( 5 );

  /// Top-level entry point: owns the configuration, queue manager, transport,
  /// and middleware registry wired from one `SdkConfig`.
  #[ derive( Debug ) ]
  pub struct Client< E >
  where
    E : Environment,
  {
    config : Arc< SdkConfig >,
    supervisor : Arc< Supervisor< E > >,
  }

  impl< E > Client< E >
  where
    E : Environment,
  {
    /// Builds a client from a configuration and an environment supplying
    /// credentials/URLs/timeout for the underlying transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport client or (with `sync_api`) the
    /// background worker pool cannot be built.
    #[ inline ]
    pub fn build( config : SdkConfig, environment : E ) -> crate::error::Result< Self >
    {
      let config = Arc::new( config );
      let supervisor = Supervisor::build( Arc::clone( &config ), environment )?;
      Ok( Self { config, supervisor } )
    }

    /// The configuration this client was built with.
    #[ inline ]
    #[ must_use ]
    pub fn config( &self ) -> &SdkConfig
    {
      &self.config
    }

    /// The queue manager backing this client's monitoring dispatch.
    #[ inline ]
    #[ must_use ]
    pub fn queue( &self ) -> &Arc< QueueManager< E > >
    {
      self.supervisor.queue()
    }

    /// Registers a middleware, appended to the end of the registration order.
    #[ inline ]
    pub fn add_middleware( &self, middleware : Middleware )
    {
      self.supervisor.middleware().register( middleware );
    }

    /// Removes the middleware with the given name, if registered.
    #[ inline ]
    pub fn remove_middleware( &self, name : &str ) -> bool
    {
      self.supervisor.middleware().remove( name )
    }

    /// Number of batches currently queued.
    #[ inline ]
    #[ must_use ]
    pub fn size( &self ) -> usize
    {
      self.supervisor.queue().size()
    }

    /// Drops both the in-memory queue and the persisted blob without sending
    /// anything.
    #[ inline ]
    pub fn clear( &self )
    {
      self.supervisor.queue().clear();
    }

    /// Forces an immediate drain cycle; completes when the current head
    /// batch has been attempted.
    #[ inline ]
    pub async fn flush( &self )
    {
      self.supervisor.queue().flush().await;
    }

    /// Wraps an async target function with gating, monitoring, and
    /// middleware. See [`Supervisor::supervise_async`].
    ///
    /// # Errors
    ///
    /// See [`Supervisor::supervise_async`].
    #[ inline ]
    pub async fn supervise_async< F, Fut, R, Err >
    (
      &self,
      opts : &SuperviseOptions,
      args : Value,
      f : F,
    ) -> Result< R, SuperviseError< Err > >
    where
      F : FnOnce( Value ) -> Fut,
      Fut : Future< Output = Result< R, Err > >,
      R : Serialize,
      Err : core::fmt::Display,
    {
      self.supervisor.supervise_async( opts, args, f ).await
    }

    /// Wraps a synchronous target function with gating and background-dispatched
    /// monitoring. See [`Supervisor::supervise_sync`].
    ///
    /// # Errors
    ///
    /// See [`Supervisor::supervise_sync`].
    #[ cfg( feature = "sync_api" ) ]
    #[ inline ]
    pub fn supervise_sync< F, R, Err >
    (
      &self,
      opts : &SuperviseOptions,
      args : Value,
      f : F,
    ) -> Result< R, SuperviseError< Err > >
    where
      F : FnOnce( Value ) -> Result< R, Err >,
      R : Serialize + Send + 'static,
      Err : core::fmt::Display,
    {
      self.supervisor.supervise_sync( opts, args, f )
    }

    /// Attempts one final flush of the queue, giving up after `grace_period`
    /// elapses (default [`DEFAULT_SHUTDOWN_GRACE`]).
    #[ inline ]
    pub async fn shutdown( &self, grace_period : Option< Duration > )
    {
      self.supervisor.queue().shutdown( grace_period.unwrap_or( DEFAULT_SHUTDOWN_GRACE ) ).await;
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    Client,
    DEFAULT_SHUTDOWN_GRACE,
  };
}
