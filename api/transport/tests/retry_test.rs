//! Tests for the retrying wrappers around `Client::post_monitoring` /
//! `Client::post_control`.
//!
//! Uses paused tokio time so the doubling-backoff delays (1s, 2s, 4s, ...)
//! are advanced virtually instead of actually slept through.

#![ cfg( feature = "enabled" ) ]

use api_transport::{ Client, EnvironmentImpl };
use serde_json::json;

/// A missing URL is a configuration error, never retried: it is returned
/// on the very first attempt, unwrapped, regardless of `max_retries`.
#[ tokio::test( start_paused = true ) ]
async fn configuration_error_is_returned_immediately_without_retrying()
{
  let env = EnvironmentImpl::new( "test-key" ).expect( "valid key" );
  let client = Client::build( env ).expect( "client builds" );

  let body = json!( { "probe" : true } );
  let result : Result< serde_json::Value, _ > =
    client.send_monitoring_with_retry( &body, 0 ).await;

  let err = result.expect_err( "no monitoring URL must fail" );
  let message = err.to_string();
  assert!( !message.contains( "Retry attempts exhausted" ), "got: {message}" );
  assert!( message.contains( "monitoring URL is not set" ), "got: {message}" );
}

/// Even with `max_retries = 2`, a configuration error never consumes any
/// backoff delay — it is not one of the retryable variants.
#[ tokio::test( start_paused = true ) ]
async fn configuration_error_is_not_retried_even_with_retries_configured()
{
  let env = EnvironmentImpl::new( "test-key" ).expect( "valid key" );
  let client = Client::build( env ).expect( "client builds" );

  let body = json!( { "probe" : true } );
  let result : Result< serde_json::Value, _ > =
    client.send_control_with_retry( &body, 2 ).await;

  let err = result.expect_err( "no control URL must fail" );
  let message = err.to_string();
  assert!( !message.contains( "Retry attempts exhausted" ), "got: {message}" );
  assert!( message.contains( "control URL is not set" ), "got: {message}" );
}
