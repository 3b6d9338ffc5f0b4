//! Pluggable local persistence for the batch queue.
//!
//! All adapters are synchronous: storage in this SDK is always a thin local
//! key-value wrapper, never a network call, so there is no async boundary to
//! cross.

mod file;
mod memory;
mod noop;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use noop::NoOpStorage;

mod private
{
  use serde::{ Deserialize, Serialize };
  use std::path::PathBuf;
  use std::sync::Arc;

  /// Contract every storage backend must satisfy.
  ///
  /// Every method is synchronous and must not raise on a missing key; `get_item`
  /// simply returns `None`.
  pub trait StorageAdapter : core::fmt::Debug + Send + Sync
  {
    /// Reads the stored string for `key`, or `None` if absent.
    fn get_item( &self, key : &str ) -> Option< String >;

    /// Stores `value` under `key`, replacing any existing value.
    fn set_item( &self, key : &str, value : &str );

    /// Removes `key`, if present. A no-op if `key` was never set.
    fn remove_item( &self, key : &str );

    /// Discards every stored key.
    fn clear( &self );
  }

  /// Which storage backend to use for the persisted queue.
  #[ derive( Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize ) ]
  #[ serde( rename_all = "lowercase" ) ]
  pub enum StorageType
  {
    /// One JSON file per key under a base directory.
    File,
    /// In-process memory only; lost on restart.
    Memory,
    /// Probe the working/temp directory for writability; fall back to memory.
    Auto,
    /// Discard everything; used when `storage_enabled = false`.
    Disabled,
  }

  impl Default for StorageType
  {
    #[ inline ]
    fn default() -> Self
    {
      Self::Auto
    }
  }

  /// Default storage key the queue manager persists its state under.
  pub const DEFAULT_STORAGE_KEY : &str = "olakai-sdk-queue";

  /// Builds the storage adapter named by `storage_type`.
  ///
  /// `Auto` probes `base_dir` for writability by creating and deleting a
  /// throwaway file; on failure it falls back to [`super::MemoryStorage`] and
  /// logs a warning. An explicitly requested `File` that fails to initialize
  /// degrades the same way, also with a warning (since the caller asked for
  /// durability they did not get).
  #[ inline ]
  #[ must_use ]
  pub fn create_storage( storage_type : StorageType, base_dir : &std::path::Path ) -> Arc< dyn StorageAdapter >
  {
    match storage_type
    {
      StorageType::Disabled => Arc::new( super::NoOpStorage::new() ),
      StorageType::Memory => Arc::new( super::MemoryStorage::new() ),
      StorageType::File =>
      {
        match super::FileStorage::new( base_dir )
        {
          Ok( storage ) => Arc::new( storage ),
          Err( e ) =>
          {
            #[ cfg( feature = "structured_logging" ) ]
            tracing::warn!( error = %e, "file storage requested but unavailable, falling back to memory" );
            #[ cfg( not( feature = "structured_logging" ) ) ]
            let _ = e;
            Arc::new( super::MemoryStorage::new() )
          }
        }
      }
      StorageType::Auto =>
      {
        if probe_writable( base_dir )
        {
          match super::FileStorage::new( base_dir )
          {
            Ok( storage ) => Arc::new( storage ),
            Err( _e ) => Arc::new( super::MemoryStorage::new() ),
          }
        }
        else
        {
          #[ cfg( feature = "structured_logging" ) ]
          tracing::warn!( "working directory is not writable, falling back to in-memory storage" );
          Arc::new( super::MemoryStorage::new() )
        }
      }
    }
  }

  /// Probes `base_dir` for writability by creating and deleting a temp file.
  fn probe_writable( base_dir : &std::path::Path ) -> bool
  {
    if std::fs::create_dir_all( base_dir ).is_err()
    {
      return false;
    }
    match tempfile::Builder::new().prefix( ".olakai-write-probe" ).tempfile_in( base_dir )
    {
      Ok( probe ) =>
      {
        drop( probe );
        true
      }
      Err( _ ) => false,
    }
  }

  /// Default storage base directory, under the OS temp directory.
  #[ inline ]
  #[ must_use ]
  pub fn default_storage_dir() -> PathBuf
  {
    std::env::temp_dir().join( "olakai-sdk" )
  }
}

crate::mod_interface!
{
  exposed use
  {
    StorageAdapter,
    StorageType,
    DEFAULT_STORAGE_KEY,
    create_storage,
    default_storage_dir,
  };
}
