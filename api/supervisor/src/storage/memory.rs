//! In-memory storage adapter.

use super::StorageAdapter;
use std::collections::HashMap;
use std::sync::Mutex;

/// Single-process in-memory key-value store. Unbounded; the queue manager's
/// own eviction logic is responsible for bounding size.
#[ derive( Debug, Default ) ]
pub struct MemoryStorage
{
  map : Mutex< HashMap< String, String > >,
}

impl MemoryStorage
{
  /// Creates an empty in-memory store.
  #[ inline ]
  #[ must_use ]
  pub fn new() -> Self
  {
    Self::default()
  }
}

impl StorageAdapter for MemoryStorage
{
  #[ inline ]
  fn get_item( &self, key : &str ) -> Option< String >
  {
    self.map.lock().unwrap().get( key ).cloned()
  }

  #[ inline ]
  fn set_item( &self, key : &str, value : &str )
  {
    self.map.lock().unwrap().insert( key.to_owned(), value.to_owned() );
  }

  #[ inline ]
  fn remove_item( &self, key : &str )
  {
    // Removing a key that was never present is not an error.
    self.map.lock().unwrap().remove( key );
  }

  #[ inline ]
  fn clear( &self )
  {
    self.map.lock().unwrap().clear();
  }
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  #[ test ]
  fn missing_key_returns_none()
  {
    let storage = MemoryStorage::new();
    assert_eq!( storage.get_item( "missing" ), None );
  }

  #[ test ]
  fn remove_missing_key_is_noop()
  {
    let storage = MemoryStorage::new();
    storage.remove_item( "missing" );
    assert_eq!( storage.get_item( "missing" ), None );
  }

  #[ test ]
  fn set_then_get_roundtrips()
  {
    let storage = MemoryStorage::new();
    storage.set_item( "key", "value" );
    assert_eq!( storage.get_item( "key" ), Some( "value".to_owned() ) );
  }

  #[ test ]
  fn clear_empties_the_store()
  {
    let storage = MemoryStorage::new();
    storage.set_item( "key", "value" );
    storage.clear();
    assert_eq!( storage.get_item( "key" ), None );
  }
}
