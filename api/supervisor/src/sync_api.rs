//! Bounded, process-wide background worker pool used by
//! [`crate::Supervisor::supervise_sync`] to dispatch monitoring work without
//! making a synchronous caller pay transport latency.

mod private
{
  use core::future::Future;
  use std::sync::Arc;
  use tokio::runtime::Runtime;
  use tokio::sync::Semaphore;

  /// Owns a dedicated multi-thread runtime and a semaphore bounding how many
  /// monitoring dispatches may run concurrently. Sized `max(4, available
  /// parallelism)` at construction.
  #[ derive( Debug ) ]
  pub struct WorkerPool
  {
    runtime : Runtime,
    semaphore : Arc< Semaphore >,
  }

  impl WorkerPool
  {
    /// Minimum number of worker threads / concurrent dispatch permits.
    pub const MIN_WORKERS : usize = 4;

    /// Builds a worker pool with its own Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying runtime cannot be built.
    #[ inline ]
    pub fn build() -> crate::error::Result< Arc< Self > >
    {
      let workers = std::thread::available_parallelism()
        .map( | n | n.get() )
        .unwrap_or( 1 )
        .max( Self::MIN_WORKERS );

      let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads( workers )
        .thread_name( "olakai-sdk-worker" )
        .enable_all()
        .build()
        .map_err( | e | crate::error::SupervisorError::Initialization( e.to_string() ) )?;

      Ok( Arc::new( Self { runtime, semaphore : Arc::new( Semaphore::new( workers ) ) } ) )
    }

    /// Runs `future` to completion on this pool's runtime, blocking the
    /// calling thread. Used for the control decision, which a synchronous
    /// caller must still wait for.
    #[ inline ]
    pub fn block_on< F : Future >( &self, future : F ) -> F::Output
    {
      self.runtime.block_on( future )
    }

    /// Submits `future` for background execution, bounded by this pool's
    /// permits. A permit-acquire failure (pool shut down) silently drops the
    /// work rather than propagating a panic back to the caller.
    #[ inline ]
    pub fn spawn_bounded< F >( &self, future : F )
    where
      F : Future< Output = () > + Send + 'static,
    {
      let semaphore = Arc::clone( &self.semaphore );
      self.runtime.spawn( async move
      {
        let Ok( _permit ) = semaphore.acquire().await else { return };
        future.await;
      } );
    }
  }

  #[ cfg( test ) ]
  mod tests
  {
    use super::*;
    use std::sync::atomic::{ AtomicBool, Ordering };

    #[ test ]
    fn block_on_runs_future_to_completion()
    {
      let pool = WorkerPool::build().expect( "build" );
      let value = pool.block_on( async { 1 + 1 } );
      assert_eq!( value, 2 );
    }

    #[ test ]
    fn spawn_bounded_eventually_runs()
    {
      let pool = WorkerPool::build().expect( "build" );
      let done = Arc::new( AtomicBool::new( false ) );
      let done_clone = Arc::clone( &done );
      pool.spawn_bounded( async move { done_clone.store( true, Ordering::SeqCst ); } );
      pool.block_on( async
      {
        for _ in 0 .. 100
        {
          if done.load( Ordering::SeqCst )
          {
            break;
          }
          tokio::time::sleep( core::time::Duration::from_millis( 10 ) ).await;
        }
      } );
      assert!( done.load( Ordering::SeqCst ) );
    }
  }
}

#[ cfg( feature = "sync_api" ) ]
crate::mod_interface!
{
  exposed use
  {
    WorkerPool,
  };
}
