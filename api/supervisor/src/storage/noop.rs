//! No-op storage adapter, used when persistence is disabled.

use super::StorageAdapter;

/// Discards every write and returns `None` on every read. Used when
/// `SdkConfig::storage_enabled` is `false` or `storage_type` is `Disabled`.
#[ derive( Debug, Default, Clone, Copy ) ]
pub struct NoOpStorage;

impl NoOpStorage
{
  /// Creates a no-op storage adapter.
  #[ inline ]
  #[ must_use ]
  pub fn new() -> Self
  {
    Self
  }
}

impl StorageAdapter for NoOpStorage
{
  #[ inline ]
  fn get_item( &self, _key : &str ) -> Option< String >
  {
    None
  }

  #[ inline ]
  fn set_item( &self, _key : &str, _value : &str ) {}

  #[ inline ]
  fn remove_item( &self, _key : &str ) {}

  #[ inline ]
  fn clear( &self ) {}
}

#[ cfg( test ) ]
mod tests
{
  use super::*;

  #[ test ]
  fn reads_are_always_none()
  {
    let storage = NoOpStorage::new();
    storage.set_item( "key", "value" );
    assert_eq!( storage.get_item( "key" ), None );
  }
}
