//! File-backed storage adapter: one JSON file per key under a base directory.

use super::StorageAdapter;
use std::path::PathBuf;

/// Stores each key as `<base_dir>/<key>.json`. Writes are atomic: content is
/// written to a temp file in the same directory, then renamed into place, so
/// a crash mid-write can never leave a half-written file behind.
///
/// All failures (permission errors, disk full, missing directory) are
/// swallowed and logged at debug level; callers see `None` / no-op rather
/// than a propagated error, matching the storage contract's "never raise"
/// guarantee.
#[ derive( Debug, Clone ) ]
pub struct FileStorage
{
  base_dir : PathBuf,
}

impl FileStorage
{
  /// Creates a file storage adapter rooted at `base_dir`, creating the
  /// directory (and its parents) if it does not already exist.
  ///
  /// # Errors
  ///
  /// Returns an error if `base_dir` cannot be created.
  #[ inline ]
  pub fn new( base_dir : impl Into< PathBuf > ) -> crate::error::Result< Self >
  {
    let base_dir = base_dir.into();
    std::fs::create_dir_all( &base_dir )
      .map_err( | e | crate::error::SupervisorError::Initialization( e.to_string() ) )?;
    Ok( Self { base_dir } )
  }

  fn path_for( &self, key : &str ) -> PathBuf
  {
    self.base_dir.join( format!( "{key}.json" ) )
  }
}

impl StorageAdapter for FileStorage
{
  #[ inline ]
  fn get_item( &self, key : &str ) -> Option< String >
  {
    match std::fs::read_to_string( self.path_for( key ) )
    {
      Ok( contents ) => Some( contents ),
      Err( e ) =>
      {
        if e.kind() != std::io::ErrorKind::NotFound
        {
          #[ cfg( feature = "structured_logging" ) ]
          tracing::debug!( key, error = %e, "file storage read failed" );
        }
        None
      }
    }
  }

  #[ inline ]
  fn set_item( &self, key : &str, value : &str )
  {
    let target = self.path_for( key );
    let write_result = tempfile::NamedTempFile::new_in( &self.base_dir )
      .and_then( | mut tmp |
      {
        use std::io::Write;
        tmp.write_all( value.as_bytes() )?;
        tmp.persist( &target ).map_err( | e | e.error )?;
        Ok( () )
      } );
    if let Err( e ) = write_result
    {
      #[ cfg( feature = "structured_logging" ) ]
      tracing::debug!( key, error = %e, "file storage write failed" );
      #[ cfg( not( feature = "structured_logging" ) ) ]
      let _ = e;
    }
  }

  #[ inline ]
  fn remove_item( &self, key : &str )
  {
    if let Err( e ) = std::fs::remove_file( self.path_for( key ) )
    {
      if e.kind() != std::io::ErrorKind::NotFound
      {
        #[ cfg( feature = "structured_logging" ) ]
        tracing::debug!( key, error = %e, "file storage remove failed" );
      }
    }
  }

  #[ inline ]
  fn clear( &self )
  {
    let Ok( entries ) = std::fs::read_dir( &self.base_dir ) else { return };
    for entry in entries.flatten()
    {
      let path = entry.path();
      if path.extension().is_some_and( | ext | ext == "json" )
      {
        let _ = std::fs::remove_file( path );
      }
    }
  }
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  #[ test ]
  fn missing_key_returns_none()
  {
    let dir = tempfile::tempdir().expect( "tempdir" );
    let storage = FileStorage::new( dir.path() ).expect( "construct" );
    assert_eq!( storage.get_item( "missing" ), None );
  }

  #[ test ]
  fn set_then_get_roundtrips()
  {
    let dir = tempfile::tempdir().expect( "tempdir" );
    let storage = FileStorage::new( dir.path() ).expect( "construct" );
    storage.set_item( "queue", "{\"a\":1}" );
    assert_eq!( storage.get_item( "queue" ), Some( "{\"a\":1}".to_owned() ) );
  }

  #[ test ]
  fn remove_missing_key_is_noop()
  {
    let dir = tempfile::tempdir().expect( "tempdir" );
    let storage = FileStorage::new( dir.path() ).expect( "construct" );
    storage.remove_item( "missing" );
  }

  #[ test ]
  fn clear_removes_all_json_files()
  {
    let dir = tempfile::tempdir().expect( "tempdir" );
    let storage = FileStorage::new( dir.path() ).expect( "construct" );
    storage.set_item( "a", "1" );
    storage.set_item( "b", "2" );
    storage.clear();
    assert_eq!( storage.get_item( "a" ), None );
    assert_eq!( storage.get_item( "b" ), None );
  }

  #[ test ]
  fn set_overwrites_existing_value_atomically()
  {
    let dir = tempfile::tempdir().expect( "tempdir" );
    let storage = FileStorage::new( dir.path() ).expect( "construct" );
    storage.set_item( "queue", "first" );
    storage.set_item( "queue", "second" );
    assert_eq!( storage.get_item( "queue" ), Some( "second".to_owned() ) );
  }
}
