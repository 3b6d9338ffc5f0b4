//! Process-wide SDK configuration, immutable once a `Client` is built from it.

mod private
{
  use crate::sanitize::SanitizePattern;
  use crate::storage::StorageType;

  /// Process-wide configuration for one SDK client instance.
  ///
  /// Construct with [`SdkConfig::new`], then chain `with_*` builder methods to
  /// override defaults; the result is handed to `Client::build` and is
  /// immutable for the lifetime of that client, matching the contract in
  /// the data model (`SdkConfig` invariants hold from construction onward).
  #[ derive( Debug, Clone ) ]
  pub struct SdkConfig
  {
    api_key : String,
    monitoring_url : String,
    control_url : String,
    batching_enabled : bool,
    batch_size : u32,
    batch_timeout_ms : u64,
    retries : u32,
    timeout_ms : u64,
    storage_enabled : bool,
    storage_type : StorageType,
    max_storage_size : u64,
    storage_file_path : Option< String >,
    sanitize_patterns : Vec< SanitizePattern >,
    debug : bool,
    verbose : bool,
  }

  impl SdkConfig
  {
    /// Default maximum payloads per batch.
    pub const DEFAULT_BATCH_SIZE : u32 = 10;
    /// Default milliseconds between scheduled drains.
    pub const DEFAULT_BATCH_TIMEOUT_MS : u64 = 300;
    /// Default maximum retry attempts per batch.
    pub const DEFAULT_RETRIES : u32 = 3;
    /// Default per-request timeout, in milliseconds.
    pub const DEFAULT_TIMEOUT_MS : u64 = 20_000;
    /// Default maximum size in bytes of the persisted queue blob.
    pub const DEFAULT_MAX_STORAGE_SIZE : u64 = 1_000_000;

    /// Creates a configuration from an API key and a domain, deriving
    /// `monitoring_url` and `control_url` as `{domain}/api/monitoring/prompt`
    /// and `{domain}/api/control/prompt`.
    ///
    /// # Errors
    ///
    /// Returns an error if `api_key` is empty.
    #[ inline ]
    pub fn new( api_key : impl Into< String >, domain : impl AsRef< str > ) -> crate::error::Result< Self >
    {
      let api_key = api_key.into();
      if api_key.is_empty()
      {
        return Err( crate::error::SupervisorError::Initialization( "API key must not be empty".to_owned() ).into() );
      }
      let domain = domain.as_ref().trim_end_matches( '/' );
      Ok( Self
      {
        api_key,
        monitoring_url : format!( "{domain}/api/monitoring/prompt" ),
        control_url : format!( "{domain}/api/control/prompt" ),
        batching_enabled : false,
        batch_size : Self::DEFAULT_BATCH_SIZE,
        batch_timeout_ms : Self::DEFAULT_BATCH_TIMEOUT_MS,
        retries : Self::DEFAULT_RETRIES,
        timeout_ms : Self::DEFAULT_TIMEOUT_MS,
        storage_enabled : true,
        storage_type : StorageType::default(),
        max_storage_size : Self::DEFAULT_MAX_STORAGE_SIZE,
        storage_file_path : None,
        sanitize_patterns : Vec::new(),
        debug : false,
        verbose : false,
      } )
    }

    /// Loads `OLAKAI_API_KEY` and `OLAKAI_DOMAIN` (optionally via a `.env`
    /// file, loaded with `dotenv`) and constructs a configuration from them.
    ///
    /// # Errors
    ///
    /// Returns an error if either variable is unset or the API key is empty.
    #[ inline ]
    pub fn from_env() -> crate::error::Result< Self >
    {
      let _ = dotenv::dotenv();
      let api_key = std::env::var( "OLAKAI_API_KEY" )
        .map_err( | _e | crate::error::SupervisorError::ConfigNotInitialized )?;
      let domain = std::env::var( "OLAKAI_DOMAIN" )
        .map_err( | _e | crate::error::SupervisorError::ConfigNotInitialized )?;
      Self::new( api_key, domain )
    }

    /// Overrides whether monitoring payloads are batched before sending.
    #[ must_use ]
    #[ inline ]
    pub fn with_batching_enabled( mut self, enabled : bool ) -> Self
    {
      self.batching_enabled = enabled;
      self
    }

    /// Overrides the maximum payloads per batch. Clamped to at least 1.
    #[ must_use ]
    #[ inline ]
    pub fn with_batch_size( mut self, batch_size : u32 ) -> Self
    {
      self.batch_size = batch_size.max( 1 );
      self
    }

    /// Overrides the milliseconds between scheduled drains.
    #[ must_use ]
    #[ inline ]
    pub fn with_batch_timeout_ms( mut self, batch_timeout_ms : u64 ) -> Self
    {
      self.batch_timeout_ms = batch_timeout_ms;
      self
    }

    /// Overrides the maximum retry attempts per batch.
    #[ must_use ]
    #[ inline ]
    pub fn with_retries( mut self, retries : u32 ) -> Self
    {
      self.retries = retries;
      self
    }

    /// Overrides the per-request timeout, in milliseconds. Clamped to at
    /// least 1.
    #[ must_use ]
    #[ inline ]
    pub fn with_timeout_ms( mut self, timeout_ms : u64 ) -> Self
    {
      self.timeout_ms = timeout_ms.max( 1 );
      self
    }

    /// Overrides whether the queue is persisted at all.
    #[ must_use ]
    #[ inline ]
    pub fn with_storage_enabled( mut self, enabled : bool ) -> Self
    {
      self.storage_enabled = enabled;
      self
    }

    /// Overrides the storage backend selection.
    #[ must_use ]
    #[ inline ]
    pub fn with_storage_type( mut self, storage_type : StorageType ) -> Self
    {
      self.storage_type = storage_type;
      self
    }

    /// Overrides the maximum size in bytes of the persisted queue blob.
    #[ must_use ]
    #[ inline ]
    pub fn with_max_storage_size( mut self, max_storage_size : u64 ) -> Self
    {
      self.max_storage_size = max_storage_size;
      self
    }

    /// Overrides the base directory used by file-backed storage.
    #[ must_use ]
    #[ inline ]
    pub fn with_storage_file_path( mut self, path : impl Into< String > ) -> Self
    {
      self.storage_file_path = Some( path.into() );
      self
    }

    /// Overrides the ordered sanitization pattern list.
    #[ must_use ]
    #[ inline ]
    pub fn with_sanitize_patterns( mut self, patterns : Vec< SanitizePattern > ) -> Self
    {
      self.sanitize_patterns = patterns;
      self
    }

    /// Overrides the debug log-level selector.
    #[ must_use ]
    #[ inline ]
    pub fn with_debug( mut self, debug : bool ) -> Self
    {
      self.debug = debug;
      self
    }

    /// Overrides the verbose log-level selector.
    #[ must_use ]
    #[ inline ]
    pub fn with_verbose( mut self, verbose : bool ) -> Self
    {
      self.verbose = verbose;
      self
    }

    /// The configured API key.
    #[ inline ]
    #[ must_use ]
    pub fn api_key( &self ) -> &str { &self.api_key }
    /// The resolved monitoring endpoint URL.
    #[ inline ]
    #[ must_use ]
    pub fn monitoring_url( &self ) -> &str { &self.monitoring_url }
    /// The resolved control endpoint URL.
    #[ inline ]
    #[ must_use ]
    pub fn control_url( &self ) -> &str { &self.control_url }
    /// Whether monitoring payloads are coalesced into batches before sending.
    #[ inline ]
    #[ must_use ]
    pub fn batching_enabled( &self ) -> bool { self.batching_enabled }
    /// Maximum payloads per batch.
    #[ inline ]
    #[ must_use ]
    pub fn batch_size( &self ) -> u32 { self.batch_size }
    /// Milliseconds between scheduled drains.
    #[ inline ]
    #[ must_use ]
    pub fn batch_timeout_ms( &self ) -> u64 { self.batch_timeout_ms }
    /// Maximum retry attempts per batch.
    #[ inline ]
    #[ must_use ]
    pub fn retries( &self ) -> u32 { self.retries }
    /// Per-request timeout, in milliseconds.
    #[ inline ]
    #[ must_use ]
    pub fn timeout_ms( &self ) -> u64 { self.timeout_ms }
    /// Whether the queue is persisted at all.
    #[ inline ]
    #[ must_use ]
    pub fn storage_enabled( &self ) -> bool { self.storage_enabled }
    /// The configured storage backend selection.
    #[ inline ]
    #[ must_use ]
    pub fn storage_type( &self ) -> StorageType { self.storage_type }
    /// Maximum size in bytes of the persisted queue blob.
    #[ inline ]
    #[ must_use ]
    pub fn max_storage_size( &self ) -> u64 { self.max_storage_size }
    /// Base directory used by file-backed storage, or the default
    /// OS-tmp-relative path if not overridden.
    #[ inline ]
    #[ must_use ]
    pub fn storage_file_path( &self ) -> std::path::PathBuf
    {
      self.storage_file_path.as_ref().map_or_else( crate::storage::default_storage_dir, std::path::PathBuf::from )
    }
    /// The ordered sanitization pattern list.
    #[ inline ]
    #[ must_use ]
    pub fn sanitize_patterns( &self ) -> &[ SanitizePattern ] { &self.sanitize_patterns }
    /// The debug log-level selector.
    #[ inline ]
    #[ must_use ]
    pub fn debug( &self ) -> bool { self.debug }
    /// The verbose log-level selector.
    #[ inline ]
    #[ must_use ]
    pub fn verbose( &self ) -> bool { self.verbose }
  }

  #[ cfg( test ) ]
  mod tests
  {
    use super::*;

    #[ test ]
    fn new_rejects_empty_api_key()
    {
      assert!( SdkConfig::new( "", "https://app.olakai.ai" ).is_err() );
    }

    #[ test ]
    fn new_derives_monitoring_and_control_urls_from_domain()
    {
      let config = SdkConfig::new( "key", "https://app.olakai.ai/" ).expect( "construct" );
      assert_eq!( config.monitoring_url(), "https://app.olakai.ai/api/monitoring/prompt" );
      assert_eq!( config.control_url(), "https://app.olakai.ai/api/control/prompt" );
    }

    #[ test ]
    fn defaults_match_documented_constants()
    {
      let config = SdkConfig::new( "key", "https://app.olakai.ai" ).expect( "construct" );
      assert!( !config.batching_enabled() );
      assert_eq!( config.batch_size(), SdkConfig::DEFAULT_BATCH_SIZE );
      assert_eq!( config.batch_timeout_ms(), SdkConfig::DEFAULT_BATCH_TIMEOUT_MS );
      assert_eq!( config.retries(), SdkConfig::DEFAULT_RETRIES );
      assert_eq!( config.timeout_ms(), SdkConfig::DEFAULT_TIMEOUT_MS );
      assert!( config.storage_enabled() );
    }

    #[ test ]
    fn batch_size_override_is_clamped_to_at_least_one()
    {
      let config = SdkConfig::new( "key", "https://app.olakai.ai" ).expect( "construct" ).with_batch_size( 0 );
      assert_eq!( config.batch_size(), 1 );
    }

    #[ test ]
    fn storage_file_path_falls_back_to_default_dir_when_unset()
    {
      let config = SdkConfig::new( "key", "https://app.olakai.ai" ).expect( "construct" );
      assert_eq!( config.storage_file_path(), crate::storage::default_storage_dir() );
    }

    #[ test ]
    fn storage_file_path_override_is_honored()
    {
      let config = SdkConfig::new( "key", "https://app.olakai.ai" ).expect( "construct" )
        .with_storage_file_path( "/tmp/custom" );
      assert_eq!( config.storage_file_path(), std::path::PathBuf::from( "/tmp/custom" ) );
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    SdkConfig,
  };
}
