#![ doc( html_root_url = "https://docs.rs/api_supervisor/latest/api_supervisor/" ) ]
#![ cfg_attr( doc, doc = include_str!( concat!( env!( "CARGO_MANIFEST_DIR" ), "/", "readme.md" ) ) ) ]
#![ allow( clippy::missing_inline_in_public_items ) ]
#![ allow( clippy::std_instead_of_core ) ]
#![ allow( clippy::must_use_candidate ) ]
#![ allow( clippy::mod_module_files ) ]

//! LLM call supervision SDK: wraps application calls with policy-gating,
//! batched usage monitoring, and pluggable local storage.
//!
//! # Governing Principle : "Thin Client, Rich API"
//!
//! One-to-one mapping with the monitoring SDK's two endpoints (monitoring,
//! control), zero automatic decision-making beyond what the caller
//! configures, explicit control over batching, retries, and storage.
//!
//! # Examples
//!
//! ```no_run
//! use api_supervisor::{ Client, SdkConfig, SuperviseOptions };
//! use api_transport::EnvironmentImpl;
//! use serde_json::json;
//!
//! # async fn example() -> Result< (), Box< dyn std::error::Error > > {
//! let config = SdkConfig::new( "my-api-key", "https://app.olakai.ai" )?;
//! let env = EnvironmentImpl::new( "my-api-key" )?;
//! let client = Client::build( config, env )?;
//!
//! let opts = SuperviseOptions::former().email( "user@example.com".to_string() ).form();
//! let result = client.supervise_async( &opts, json!( { "prompt" : "hi" } ), | _args |
//! {
//!   async move { Ok::< _, std::convert::Infallible >( "ok" ) }
//! } ).await;
//! # let _ = result;
//! # Ok( () )
//! # }
//! ```

#[ cfg( feature = "enabled" ) ]
use mod_interface::mod_interface;

mod private {}

#[ cfg( feature = "enabled" ) ]
crate::mod_interface!
{
  /// Error type and result alias.
  layer error;

  /// Wire payload types shared with the transport layer.
  layer types;

  /// Call capture: arguments/result/error snapshotting before sanitization.
  layer capture;

  /// Middleware hook registry invoked around each supervised call.
  layer middleware;

  /// Regex-based sanitization of captured arguments and results.
  layer sanitize;

  /// Pluggable local storage backends for queue persistence.
  layer storage;

  /// SDK-wide configuration.
  layer config;

  /// Batch queue: coalescing, priority, retry, and persistence.
  layer queue_manager;

  /// Supervisor: the gating + monitoring + middleware call wrapper.
  layer supervisor;

  /// `Client` facade wiring configuration, supervisor, and queue together.
  layer client;

  /// Structured logging macros (zero cost unless `structured_logging` is enabled).
  #[ cfg( feature = "structured_logging" ) ]
  layer structured_logging;

  /// Background worker pool backing the blocking `supervise_sync` API.
  #[ cfg( feature = "sync_api" ) ]
  layer sync_api;
}
