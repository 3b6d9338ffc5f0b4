#![ doc( html_root_url = "https://docs.rs/api_transport/latest/api_transport/" ) ]
#![ cfg_attr( doc, doc = include_str!( concat!( env!( "CARGO_MANIFEST_DIR" ), "/", "readme.md" ) ) ) ]
#![ allow( clippy::missing_inline_in_public_items ) ]
#![ allow( clippy::std_instead_of_core ) ]
#![ allow( clippy::must_use_candidate ) ]

//! Generic retrying HTTP transport for monitoring and control-plane calls.
//!
//! # Governing Principle : "Thin Client, Rich API"
//!
//! One-to-one mapping with the two monitoring-SDK endpoints (monitoring,
//! control), zero automatic decision-making beyond the explicitly requested
//! retry count, explicit control over every operation.
//!
//! # Examples
//!
//! ```no_run
//! use api_transport::{ Client, EnvironmentImpl };
//!
//! # async fn example() -> Result< (), Box< dyn std::error::Error > > {
//! let env = EnvironmentImpl::new( "my-key" )?
//!   .with_monitoring_url( "https://app.olakai.ai/api/monitoring/prompt" );
//! let client = Client::build( env )?;
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

  /// Environment configuration trait and default implementation.
  layer environment;

  /// Async HTTP client.
  layer client;

  /// Retrying wrappers around the async client's request methods.
  layer retry;

  /// Structured logging macros (zero cost unless `structured_logging` is enabled).
  #[ cfg( feature = "structured_logging" ) ]
  layer structured_logging;

  /// Blocking wrapper around the async client.
  #[ cfg( feature = "sync_api" ) ]
  layer sync_client;
}
