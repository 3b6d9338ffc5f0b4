//! Tests for `Environment` trait and `EnvironmentImpl`.
//!
//! Covers construction defaults, builder overrides, and header generation.

#![ cfg( feature = "enabled" ) ]

use api_transport::{ Environment, EnvironmentImpl };
use core::time::Duration;

#[ test ]
fn new_has_no_endpoints_and_default_timeout()
{
  let env = EnvironmentImpl::new( "test-key" )
    .expect( "new() must succeed with a non-empty key" );

  assert_eq!( env.monitoring_url(), None );
  assert_eq!( env.control_url(), None );
  assert_eq!( env.timeout().as_secs(), 30 );
}

#[ test ]
fn new_rejects_empty_key()
{
  let result = EnvironmentImpl::new( "" );
  assert!( result.is_err(), "empty API key must be rejected" );
}

#[ test ]
fn with_monitoring_and_control_url_overrides()
{
  let env = EnvironmentImpl::new( "test-key" )
    .expect( "new() must succeed" )
    .with_monitoring_url( "https://app.olakai.ai/api/monitoring/prompt" )
    .with_control_url( "https://app.olakai.ai/api/control/prompt" );

  assert_eq!( env.monitoring_url(), Some( "https://app.olakai.ai/api/monitoring/prompt" ) );
  assert_eq!( env.control_url(), Some( "https://app.olakai.ai/api/control/prompt" ) );
}

#[ test ]
fn with_timeout_overrides()
{
  let custom = Duration::from_secs( 120 );
  let env = EnvironmentImpl::new( "test-key" )
    .expect( "new() must succeed" )
    .with_timeout( custom );

  assert_eq!( env.timeout(), custom );
}

#[ test ]
fn headers_returns_api_key_and_content_type()
{
  let key = "my-secret-key-12345";
  let env = EnvironmentImpl::new( key ).expect( "new() must succeed" );

  let headers = env.headers().expect( "headers() must succeed with a valid environment" );

  let api_key = headers
    .get( "x-api-key" )
    .expect( "x-api-key header must be present" )
    .to_str()
    .expect( "x-api-key value must be valid UTF-8" );
  assert_eq!( api_key, key );

  let ct = headers
    .get( "Content-Type" )
    .expect( "Content-Type header must be present" )
    .to_str()
    .expect( "Content-Type value must be valid UTF-8" );
  assert_eq!( ct, "application/json" );
}
