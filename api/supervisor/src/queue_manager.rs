//! In-memory and persisted queue of [`MonitorPayload`]s, coalesced into
//! retry-tracked batches and drained in priority order.

mod private
{
  use crate::config::SdkConfig;
  use crate::storage::{ self, StorageAdapter, StorageType };
  use crate::types::{ BatchRequest, MonitorPayload, MonitoringApiResponse, Priority };
  use api_transport::{ Client, Environment };
  use core::time::Duration;
  use std::collections::HashSet;
  use std::sync::Arc;
  use tokio::task::JoinHandle;

  fn new_batch_id() -> String
  {
    uuid::Uuid::new_v4().to_string()
  }

  fn current_millis() -> u64
  {
    std::time::SystemTime::now()
      .duration_since( std::time::UNIX_EPOCH )
      .map( | d | u64::try_from( d.as_millis() ).unwrap_or( u64::MAX ) )
      .unwrap_or( 0 )
  }

  /// Receives individual [`MonitorPayload`]s and delivers them to the
  /// transport in size-bounded, priority-ordered batches with at-most-once
  /// intent and best-effort durability.
  ///
  /// Every mutating method that spawns background work (`add_to_queue`,
  /// `build` when a persisted queue is non-empty) must run inside an active
  /// Tokio runtime, the same requirement any library with a self-managed
  /// background task carries.
  #[ derive( Debug ) ]
  pub struct QueueManager< E >
  where
    E : Environment,
  {
    config : Arc< SdkConfig >,
    transport : Arc< Client< E > >,
    storage : Arc< dyn StorageAdapter >,
    queue : parking_lot::Mutex< Vec< BatchRequest > >,
    batch_timer : parking_lot::Mutex< Option< JoinHandle< () > > >,
    retry_timer : parking_lot::Mutex< Option< JoinHandle< () > > >,
  }

  impl< E > QueueManager< E >
  where
    E : Environment,
  {
    /// Builds a queue manager, loading any persisted queue immediately and
    /// scheduling an initial drain if it is non-empty.
    ///
    /// # Panics
    ///
    /// Panics if the persisted queue is non-empty and this is called outside
    /// an active Tokio runtime (the initial drain is dispatched via
    /// `tokio::spawn`).
    #[ inline ]
    #[ must_use ]
    pub fn build( config : Arc< SdkConfig >, transport : Arc< Client< E > > ) -> Arc< Self >
    {
      let storage_type = if config.storage_enabled() { config.storage_type() } else { StorageType::Disabled };
      let storage = storage::create_storage( storage_type, &config.storage_file_path() );

      let initial_queue = if config.storage_enabled()
      {
        storage.get_item( storage::DEFAULT_STORAGE_KEY )
          .and_then( | blob | serde_json::from_str::< Vec< BatchRequest > >( &blob ).ok() )
          .unwrap_or_default()
      }
      else
      {
        Vec::new()
      };

      let manager = Arc::new( Self
      {
        config,
        transport,
        storage,
        queue : parking_lot::Mutex::new( initial_queue ),
        batch_timer : parking_lot::Mutex::new( None ),
        retry_timer : parking_lot::Mutex::new( None ),
      } );

      if !manager.queue.lock().is_empty()
      {
        manager.trigger_drain();
      }

      manager
    }

    /// Number of batches currently in the queue.
    #[ inline ]
    #[ must_use ]
    pub fn size( &self ) -> usize
    {
      self.queue.lock().len()
    }

    /// Drops both the in-memory queue and the persisted blob without sending
    /// anything.
    #[ inline ]
    pub fn clear( &self )
    {
      self.queue.lock().clear();
      self.storage.remove_item( storage::DEFAULT_STORAGE_KEY );
    }

    /// Adds one payload to the queue, coalescing it into an existing batch
    /// when possible.
    ///
    /// Scans from the most recently created batch backwards for the first
    /// one whose retry count matches `retries` and whose payload count is
    /// below `batch_size`; if none is found, a new batch is created. A
    /// `high`-priority payload upgrades its absorbing (or newly created)
    /// batch's priority. The resulting batch is drained immediately if it is
    /// now `high` priority or full; otherwise a drain is scheduled.
    #[ inline ]
    pub fn add_to_queue( self : &Arc< Self >, payload : MonitorPayload, retries : u32, priority : Priority )
    {
      let drain_now =
      {
        let mut queue = self.queue.lock();
        let batch_size = self.config.batch_size() as usize;

        let absorbed_index = queue.iter()
          .enumerate()
          .rev()
          .find( | ( _, batch ) | batch.retries == retries && batch.payload.len() < batch_size )
          .map( | ( i, _ ) | i );

        let ( final_priority, final_len ) = if let Some( i ) = absorbed_index
        {
          let batch = &mut queue[ i ];
          batch.payload.push( payload );
          if priority == Priority::High
          {
            batch.priority = Priority::High;
          }
          ( batch.priority, batch.payload.len() )
        }
        else
        {
          let batch = BatchRequest::new( new_batch_id(), payload, current_millis(), retries, priority );
          let len = batch.payload.len();
          let prio = batch.priority;
          queue.push( batch );
          ( prio, len )
        };

        final_priority == Priority::High || final_len >= batch_size
      };

      self.persist_queue();
      self.schedule_retry_cleanup();

      if drain_now
      {
        self.trigger_drain();
      }
      else
      {
        self.schedule_drain();
      }
    }

    /// Forces an immediate drain cycle and waits for the current head batch
    /// to be attempted.
    #[ inline ]
    pub async fn flush( self : &Arc< Self > )
    {
      if let Some( handle ) = self.batch_timer.lock().take()
      {
        handle.abort();
      }
      Arc::clone( self ).process_batch_queue().await;
    }

    /// Attempts one final flush, giving up after `grace_period` elapses.
    #[ inline ]
    pub async fn shutdown( self : &Arc< Self >, grace_period : Duration )
    {
      if tokio::time::timeout( grace_period, self.flush() ).await.is_err()
      {
        #[ cfg( feature = "structured_logging" ) ]
        tracing::warn!( "shutdown grace period elapsed before final flush completed" );
      }
    }

    /// Persists a drain-now request immediately, canceling any pending
    /// scheduled (delayed) drain — draining now supersedes waiting.
    fn trigger_drain( self : &Arc< Self > )
    {
      if let Some( handle ) = self.batch_timer.lock().take()
      {
        handle.abort();
      }
      let this = Arc::clone( self );
      tokio::spawn( async move { this.process_batch_queue().await; } );
    }

    /// Schedules a delayed drain after `batch_timeout_ms`, unless one is
    /// already pending.
    fn schedule_drain( self : &Arc< Self > )
    {
      let mut slot = self.batch_timer.lock();
      if slot.is_some()
      {
        return;
      }
      let this = Arc::clone( self );
      let delay = Duration::from_millis( self.config.batch_timeout_ms().max( 1 ) );
      *slot = Some( tokio::spawn( async move
      {
        tokio::time::sleep( delay ).await;
        this.batch_timer.lock().take();
        this.process_batch_queue().await;
      } ) );
    }

    /// Schedules the retry-cleanup sweep after `batch_timeout_ms`, unless one
    /// is already pending.
    fn schedule_retry_cleanup( self : &Arc< Self > )
    {
      let mut slot = self.retry_timer.lock();
      if slot.is_some()
      {
        return;
      }
      let this = Arc::clone( self );
      let delay = Duration::from_millis( self.config.batch_timeout_ms().max( 1 ) );
      *slot = Some( tokio::spawn( async move
      {
        tokio::time::sleep( delay ).await;
        this.retry_timer.lock().take();
        this.clear_retries_queue();
      } ) );
    }

    /// Drops any batch whose retry count has reached `config.retries`. The
    /// only path in the queue manager that silently discards data; logged at
    /// info level.
    fn clear_retries_queue( self : &Arc< Self > )
    {
      let dropped =
      {
        let mut queue = self.queue.lock();
        let before = queue.len();
        queue.retain( | b | b.retries < self.config.retries() );
        before - queue.len()
      };
      if dropped > 0
      {
        #[ cfg( feature = "structured_logging" ) ]
        tracing::info!( dropped_batches = dropped, "retry-cleanup sweep dropped batches at the retry ceiling" );
        self.persist_queue();
      }
    }

    /// Pops the highest-priority head batch and sends it via the transport's
    /// retrying monitoring call, then reconciles the result.
    async fn process_batch_queue( self : Arc< Self > )
    {
      let batch = match self.pop_head_batch()
      {
        Some( batch ) => batch,
        None => return,
      };
      self.persist_queue();

      #[ cfg( feature = "structured_logging" ) ]
      crate::log_batch_sent!( batch.id.as_str(), batch.payload.len() );

      match self.transport.send_monitoring_with_retry::< _, MonitoringApiResponse >( &batch.payload, self.config.retries() ).await
      {
        Ok( response ) => self.reconcile( batch, response ),
        Err( e ) =>
        {
          #[ cfg( feature = "structured_logging" ) ]
          crate::log_batch_failed!( batch.id.as_str(), e.to_string().as_str() );

          let next_retries = batch.retries + 1;
          let priority = batch.priority;
          for payload in batch.payload
          {
            self.add_to_queue( payload, next_retries, priority );
          }
        }
      }

      if !self.queue.lock().is_empty()
      {
        self.schedule_drain();
      }
    }

    fn pop_head_batch( &self ) -> Option< BatchRequest >
    {
      let mut queue = self.queue.lock();
      if queue.is_empty()
      {
        return None;
      }
      queue.sort_by_key( | b | b.priority.rank() );
      Some( queue.remove( 0 ) )
    }

    /// Rebuilds a follow-up batch from the server's per-item results, or (if
    /// the response carried no per-item results) treats the whole batch as
    /// failed-together when `success` is false.
    fn reconcile( self : &Arc< Self >, batch : BatchRequest, response : MonitoringApiResponse )
    {
      let next_retries = batch.retries + 1;
      let priority = batch.priority;
      let payload_count = batch.payload.len();

      let failed_payloads = match response.results
      {
        Some( results ) =>
        {
          let mut failed_indices : HashSet< usize > = HashSet::new();
          for result in &results
          {
            if result.index >= payload_count
            {
              #[ cfg( feature = "structured_logging" ) ]
              tracing::warn!( index = result.index, batch_len = payload_count, "ignoring out-of-range result index" );
              continue;
            }
            if !result.success
            {
              failed_indices.insert( result.index );
            }
          }
          batch.payload.into_iter()
            .enumerate()
            .filter( | ( i, _ ) | failed_indices.contains( i ) )
            .map( | ( _, payload ) | payload )
            .collect::< Vec< _ > >()
        }
        None => if response.success { Vec::new() } else { batch.payload },
      };

      if !failed_payloads.is_empty()
      {
        let rebuilt = BatchRequest
        {
          id : new_batch_id(),
          payload : failed_payloads,
          timestamp : current_millis(),
          retries : next_retries,
          priority,
        };
        self.queue.lock().push( rebuilt );
        self.persist_queue();
      }
    }

    /// Serializes the whole queue to the storage adapter under
    /// [`storage::DEFAULT_STORAGE_KEY`], evicting the oldest batches first if
    /// the serialized size exceeds `max_storage_size`, down to 80% of the
    /// limit.
    fn persist_queue( &self )
    {
      if !self.config.storage_enabled()
      {
        return;
      }

      let snapshot =
      {
        let mut queue = self.queue.lock();
        let mut serialized = serde_json::to_string( &*queue ).unwrap_or_default();
        let max_size = self.config.max_storage_size();

        if serialized.len() as u64 > max_size
        {
          #[ allow( clippy::cast_precision_loss ) ]
          let target = ( max_size as f64 * 0.8 ) as u64;
          let mut evicted = 0u32;
          while serialized.len() as u64 > target && !queue.is_empty()
          {
            queue.remove( 0 );
            evicted += 1;
            serialized = serde_json::to_string( &*queue ).unwrap_or_default();
          }
          if evicted > 0
          {
            #[ cfg( feature = "structured_logging" ) ]
            tracing::warn!( evicted_batches = evicted, "evicted oldest batches to stay under max_storage_size" );
          }
        }
        serialized
      };

      self.storage.set_item( storage::DEFAULT_STORAGE_KEY, &snapshot );
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    QueueManager,
  };
}
