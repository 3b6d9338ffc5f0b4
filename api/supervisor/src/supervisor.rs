//! The request lifecycle around one wrapped call: pre-call gating,
//! execution, success/error capture, sanitization, and background dispatch.

mod private
{
  use crate::capture::Capture;
  use crate::config::SdkConfig;
  use crate::error::SupervisorError;
  use crate::middleware::MiddlewareRegistry;
  use crate::queue_manager::QueueManager;
  use crate::sanitize::{ RegexSanitizer, SANITIZATION_FAILURE_PLACEHOLDER };
  use crate::types::{ ControlDetails, ControlPayload, ControlResponse, MonitorPayload, MonitoringApiResponse, Priority };
  use api_transport::{ Client, Environment };
  use core::future::Future;
  use former::Former;
  use serde::Serialize;
  use serde_json::Value;
  use std::sync::Arc;

  /// Source of a call's `email` or `chat_id` identity: a fixed string, or a
  /// thunk evaluated per call. A thunk returning `None` is treated as having
  /// raised, falling back to the caller's documented default.
  #[ derive( Clone ) ]
  pub enum IdentitySource
  {
    /// A fixed identity string.
    Static( String ),
    /// Evaluated once per call; `None` falls back to the default.
    Thunk( Arc< dyn Fn() -> Option< String > + Send + Sync > ),
  }

  impl core::fmt::Debug for IdentitySource
  {
    fn fmt( &self, f : &mut core::fmt::Formatter< '_ > ) -> core::fmt::Result
    {
      match self
      {
        Self::Static( s ) => f.debug_tuple( "Static" ).field( s ).finish(),
        Self::Thunk( _ ) => write!( f, "Thunk(..)" ),
      }
    }
  }

  impl From< &str > for IdentitySource
  {
    #[ inline ]
    fn from( s : &str ) -> Self
    {
      Self::Static( s.to_owned() )
    }
  }

  impl From< String > for IdentitySource
  {
    #[ inline ]
    fn from( s : String ) -> Self
    {
      Self::Static( s )
    }
  }

  /// Per-wrap configuration for [`Supervisor::supervise_async`] /
  /// [`Supervisor::supervise_sync`].
  #[ derive( Debug, Clone, Former ) ]
  pub struct SuperviseOptions
  {
    /// How `{input, output}` are derived from the call's arguments and result.
    pub capture : Capture,
    /// Whether captured input/output are redacted before enqueueing. Default `true`.
    pub sanitize : bool,
    /// Whether a failed call still enqueues a monitoring payload. Default `false`.
    pub send_on_function_error : bool,
    /// Drain priority for this call's monitoring payload. Default `Normal`.
    pub priority : Priority,
    /// Caller identity; falls back to `"anonymous@olakai.ai"` if unset or raising.
    pub email : Option< IdentitySource >,
    /// Conversation identity; falls back to `"anonymous"` if unset or raising.
    pub chat_id : Option< IdentitySource >,
    /// Optional task label attached to both the control and monitor payloads.
    pub task : Option< String >,
    /// Optional sub-task label attached to both the control and monitor payloads.
    pub sub_task : Option< String >,
    /// Caller-supplied criteria overrides for the control decision.
    pub override_control_criteria : Option< Vec< String > >,
  }

  impl Default for SuperviseOptions
  {
    #[ inline ]
    fn default() -> Self
    {
      Self
      {
        capture : Capture::default(),
        sanitize : true,
        send_on_function_error : false,
        priority : Priority::default(),
        email : None,
        chat_id : None,
        task : None,
        sub_task : None,
        override_control_criteria : None,
      }
    }
  }

  const ANONYMOUS_EMAIL : &str = "anonymous@olakai.ai";
  const ANONYMOUS_CHAT_ID : &str = "anonymous";
  const BLOCKED_MESSAGE : &str = "Function execution blocked by Olakai";

  /// Outcome of a supervised call that did not return the user function's
  /// own value: either the call was blocked by the control decision, or the
  /// user function itself raised.
  ///
  /// The user function's error type passes through unchanged, matching the
  /// contract that only a block may replace a would-be execution.
  #[ derive( Debug ) ]
  pub enum SuperviseError< Err >
  {
    /// The control decision was `allowed = false`.
    Blocked
    {
      /// Sensitivity/persona details behind the decision.
      details : ControlDetails,
      /// Optional human-readable detail from the control service.
      message : Option< String >,
    },
    /// The wrapped function itself raised; carried through unchanged.
    Function( Err ),
  }

  impl< Err : core::fmt::Display > core::fmt::Display for SuperviseError< Err >
  {
    fn fmt( &self, f : &mut core::fmt::Formatter< '_ > ) -> core::fmt::Result
    {
      match self
      {
        Self::Blocked { .. } => write!( f, "{BLOCKED_MESSAGE}" ),
        Self::Function( e ) => write!( f, "{e}" ),
      }
    }
  }

  impl< Err : core::fmt::Debug + core::fmt::Display > std::error::Error for SuperviseError< Err > {}

  /// Wraps target functions so each invocation is gated, observed, and
  /// monitored, independent of whether the target is synchronous or
  /// asynchronous.
  pub struct Supervisor< E >
  where
    E : Environment,
  {
    config : Arc< SdkConfig >,
    transport : Arc< Client< E > >,
    queue : Arc< QueueManager< E > >,
    middleware : Arc< MiddlewareRegistry >,
    sanitizer : RegexSanitizer,
    #[ cfg( feature = "sync_api" ) ]
    worker_pool : Arc< crate::sync_api::WorkerPool >,
  }

  impl< E > core::fmt::Debug for Supervisor< E >
  where
    E : Environment,
  {
    fn fmt( &self, f : &mut core::fmt::Formatter< '_ > ) -> core::fmt::Result
    {
      f.debug_struct( "Supervisor" ).field( "config", &self.config ).finish_non_exhaustive()
    }
  }

  impl< E > Supervisor< E >
  where
    E : Environment,
  {
    /// Builds a supervisor, constructing its own transport client and queue
    /// manager from `config` and `environment`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport client cannot be built.
    #[ inline ]
    pub fn build( config : Arc< SdkConfig >, environment : E ) -> crate::error::Result< Arc< Self > >
    {
      let transport = Arc::new
      (
        Client::build( environment )
          .map_err( | e | SupervisorError::Initialization( e.to_string() ) )?
      );
      let queue = QueueManager::build( Arc::clone( &config ), Arc::clone( &transport ) );
      let sanitizer = RegexSanitizer::new( config.sanitize_patterns() );

      Ok( Arc::new( Self
      {
        config,
        transport,
        queue,
        middleware : Arc::new( MiddlewareRegistry::new() ),
        sanitizer,
        #[ cfg( feature = "sync_api" ) ]
        worker_pool : crate::sync_api::WorkerPool::build()?,
      } ) )
    }

    /// The queue manager backing this supervisor's monitoring dispatch.
    #[ inline ]
    #[ must_use ]
    pub fn queue( &self ) -> &Arc< QueueManager< E > >
    {
      &self.queue
    }

    /// The middleware registry for this supervisor.
    #[ inline ]
    #[ must_use ]
    pub fn middleware( &self ) -> &Arc< MiddlewareRegistry >
    {
      &self.middleware
    }

    fn resolve_email( opts : &SuperviseOptions ) -> String
    {
      match &opts.email
      {
        Some( IdentitySource::Static( s ) ) => s.clone(),
        Some( IdentitySource::Thunk( f ) ) => f().unwrap_or_else( | | ANONYMOUS_EMAIL.to_owned() ),
        None => ANONYMOUS_EMAIL.to_owned(),
      }
    }

    fn resolve_chat_id( opts : &SuperviseOptions ) -> String
    {
      match &opts.chat_id
      {
        Some( IdentitySource::Static( s ) ) => s.clone(),
        Some( IdentitySource::Thunk( f ) ) => f().unwrap_or_else( | | ANONYMOUS_CHAT_ID.to_owned() ),
        None => ANONYMOUS_CHAT_ID.to_owned(),
      }
    }

    /// Converts a function result to JSON, substituting
    /// [`SANITIZATION_FAILURE_PLACEHOLDER`] if the value cannot be
    /// represented as JSON.
    fn result_to_value< R : Serialize >( value : &R ) -> Value
    {
      serde_json::to_value( value ).unwrap_or_else( | e |
      {
        #[ cfg( feature = "structured_logging" ) ]
        tracing::debug!( error = %e, "failed to convert call result to JSON, substituting placeholder" );
        #[ cfg( not( feature = "structured_logging" ) ) ]
        let _ = e;
        Value::String( SANITIZATION_FAILURE_PLACEHOLDER.to_owned() )
      } )
    }

    fn build_control_payload( opts : &SuperviseOptions, email : &str, chat_id : &str, args : &Value ) -> ControlPayload
    {
      ControlPayload
      {
        email : email.to_owned(),
        chat_id : chat_id.to_owned(),
        prompt : args.clone(),
        task : opts.task.clone(),
        sub_task : opts.sub_task.clone(),
        tokens : 0,
        override_control_criteria : opts.override_control_criteria.clone(),
      }
    }

    fn build_blocked_payload( opts : &SuperviseOptions, email : &str, chat_id : &str, args : &Value, details : &ControlDetails ) -> MonitorPayload
    {
      MonitorPayload
      {
        email : email.to_owned(),
        chat_id : chat_id.to_owned(),
        prompt : args.clone(),
        response : Value::String( BLOCKED_MESSAGE.to_owned() ),
        blocked : true,
        tokens : 0,
        request_time : 0,
        task : opts.task.clone(),
        sub_task : opts.sub_task.clone(),
        error_message : None,
        sensitivity : details.detected_sensitivity.clone(),
      }
    }

    /// Evaluates the control decision for a call, failing open (allowed) on
    /// transport error and failing closed only on an explicit
    /// `allowed = false` response.
    async fn decide( &self, control_payload : &ControlPayload ) -> ControlResponse
    {
      match self.transport.send_control_with_retry::< _, ControlResponse >( control_payload, self.config.retries() ).await
      {
        Ok( response ) => response,
        Err( e ) =>
        {
          #[ cfg( feature = "structured_logging" ) ]
          tracing::debug!( error = %e, "control call failed, failing open" );
          #[ cfg( not( feature = "structured_logging" ) ) ]
          let _ = e;
          ControlResponse
          {
            allowed : true,
            details : ControlDetails { detected_sensitivity : Vec::new(), is_allowed_persona : true },
            message : None,
          }
        }
      }
    }

    /// Sends one monitoring payload, either by enqueueing it (batching on)
    /// or by sending it directly on the critical path (batching off).
    /// Failures are logged at debug level and never propagate.
    async fn dispatch_monitor( self : &Arc< Self >, payload : MonitorPayload, priority : Priority )
    {
      if self.config.batching_enabled()
      {
        self.queue.add_to_queue( payload, 0, priority );
        return;
      }
      if let Err( e ) = self.transport.send_monitoring_with_retry::< _, MonitoringApiResponse >( core::slice::from_ref( &payload ), self.config.retries() ).await
      {
        #[ cfg( feature = "structured_logging" ) ]
        tracing::debug!( error = %e, "direct monitoring send failed" );
        #[ cfg( not( feature = "structured_logging" ) ) ]
        let _ = e;
      }
    }

    fn sanitize_capture( &self, opts : &SuperviseOptions, capture : crate::capture::CaptureResult ) -> ( Value, Value )
    {
      if opts.sanitize
      {
        ( self.sanitizer.sanitize( &capture.input ), self.sanitizer.sanitize( &capture.output ) )
      }
      else
      {
        ( capture.input, capture.output )
      }
    }

    /// Wraps an async target function: control gating, middleware, execution,
    /// and success/error monitoring all run on the caller's own executor.
    ///
    /// # Errors
    ///
    /// Returns [`SuperviseError::Blocked`] if the control decision denies the
    /// call, or [`SuperviseError::Function`] carrying `f`'s own error
    /// unchanged.
    #[ inline ]
    pub async fn supervise_async< F, Fut, R, Err >
    (
      self : &Arc< Self >,
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
      let email = Self::resolve_email( opts );
      let chat_id = Self::resolve_chat_id( opts );
      let control_payload = Self::build_control_payload( opts, &email, &chat_id, &args );

      let decision = self.decide( &control_payload ).await;
      if !decision.allowed
      {
        let blocked_payload = Self::build_blocked_payload( opts, &email, &chat_id, &args, &decision.details );

        #[ cfg( feature = "structured_logging" ) ]
        crate::log_blocked!( email.as_str(), decision.details.detected_sensitivity.join( "," ).as_str() );

        self.dispatch_monitor( blocked_payload, Priority::High ).await;
        return Err( SuperviseError::Blocked { details : decision.details, message : decision.message } );
      }

      let pre_args = self.middleware.run_before_call( args );
      let start = std::time::Instant::now();
      let outcome = f( pre_args.clone() ).await;
      let elapsed_ms = u64::try_from( start.elapsed().as_millis() ).unwrap_or( u64::MAX );

      match outcome
      {
        Ok( value ) =>
        {
          let result_value = Self::result_to_value( &value );
          let result_value = self.middleware.run_after_call( result_value );
          let capture = opts.capture.apply( &pre_args, &result_value );
          let ( input, output ) = self.sanitize_capture( opts, capture );

          let payload = MonitorPayload
          {
            email, chat_id, prompt : input, response : output, blocked : false, tokens : 0,
            request_time : elapsed_ms, task : opts.task.clone(), sub_task : opts.sub_task.clone(),
            error_message : None, sensitivity : Vec::new(),
          };
          self.dispatch_monitor( payload, opts.priority ).await;
          Ok( value )
        }
        Err( err ) =>
        {
          self.middleware.run_on_error( err.to_string().as_str() );
          if opts.send_on_function_error
          {
            let payload = MonitorPayload
            {
              email, chat_id,
              prompt : Value::String( String::new() ), response : Value::String( String::new() ),
              blocked : false, tokens : 0, request_time : elapsed_ms,
              task : opts.task.clone(), sub_task : opts.sub_task.clone(),
              error_message : Some( err.to_string() ), sensitivity : Vec::new(),
            };
            self.dispatch_monitor( payload, Priority::High ).await;
          }
          Err( SuperviseError::Function( err ) )
        }
      }
    }

    /// Wraps a synchronous target function: control gating still blocks the
    /// caller (via a dedicated runtime owned by the supervisor's worker
    /// pool), but success/error monitoring is dispatched onto that bounded
    /// worker pool so the caller never pays transport latency.
    ///
    /// # Errors
    ///
    /// Returns [`SuperviseError::Blocked`] if the control decision denies the
    /// call, or [`SuperviseError::Function`] carrying `f`'s own error
    /// unchanged.
    #[ cfg( feature = "sync_api" ) ]
    #[ inline ]
    pub fn supervise_sync< F, R, Err >
    (
      self : &Arc< Self >,
      opts : &SuperviseOptions,
      args : Value,
      f : F,
    ) -> Result< R, SuperviseError< Err > >
    where
      F : FnOnce( Value ) -> Result< R, Err >,
      R : Serialize + Send + 'static,
      Err : core::fmt::Display,
    {
      let email = Self::resolve_email( opts );
      let chat_id = Self::resolve_chat_id( opts );
      let control_payload = Self::build_control_payload( opts, &email, &chat_id, &args );

      let decision = self.worker_pool.block_on( self.decide( &control_payload ) );
      if !decision.allowed
      {
        let blocked_payload = Self::build_blocked_payload( opts, &email, &chat_id, &args, &decision.details );

        #[ cfg( feature = "structured_logging" ) ]
        crate::log_blocked!( email.as_str(), decision.details.detected_sensitivity.join( "," ).as_str() );

        let this = Arc::clone( self );
        self.worker_pool.spawn_bounded( async move { this.dispatch_monitor( blocked_payload, Priority::High ).await; } );
        return Err( SuperviseError::Blocked { details : decision.details, message : decision.message } );
      }

      let pre_args = self.middleware.run_before_call( args );
      let start = std::time::Instant::now();
      let outcome = f( pre_args.clone() );
      let elapsed_ms = u64::try_from( start.elapsed().as_millis() ).unwrap_or( u64::MAX );

      match outcome
      {
        Ok( value ) =>
        {
          let result_value = Self::result_to_value( &value );
          let this = Arc::clone( self );
          let capture_strategy = opts.capture.clone();
          let sanitize = opts.sanitize;
          let priority = opts.priority;
          let task = opts.task.clone();
          let sub_task = opts.sub_task.clone();

          self.worker_pool.spawn_bounded( async move
          {
            let result_value = this.middleware.run_after_call( result_value );
            let capture = capture_strategy.apply( &pre_args, &result_value );
            let ( input, output ) = if sanitize
            {
              ( this.sanitizer.sanitize( &capture.input ), this.sanitizer.sanitize( &capture.output ) )
            }
            else
            {
              ( capture.input, capture.output )
            };
            let payload = MonitorPayload
            {
              email, chat_id, prompt : input, response : output, blocked : false, tokens : 0,
              request_time : elapsed_ms, task, sub_task, error_message : None, sensitivity : Vec::new(),
            };
            this.dispatch_monitor( payload, priority ).await;
          } );
          Ok( value )
        }
        Err( err ) =>
        {
          self.middleware.run_on_error( err.to_string().as_str() );
          if opts.send_on_function_error
          {
            let this = Arc::clone( self );
            let task = opts.task.clone();
            let sub_task = opts.sub_task.clone();
            let error_message = err.to_string();
            self.worker_pool.spawn_bounded( async move
            {
              let payload = MonitorPayload
              {
                email, chat_id,
                prompt : Value::String( String::new() ), response : Value::String( String::new() ),
                blocked : false, tokens : 0, request_time : elapsed_ms,
                task, sub_task, error_message : Some( error_message ), sensitivity : Vec::new(),
              };
              this.dispatch_monitor( payload, Priority::High ).await;
            } );
          }
          Err( SuperviseError::Function( err ) )
        }
      }
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    Supervisor,
    SuperviseOptions,
    SuperviseError,
    IdentitySource,
  };
}
