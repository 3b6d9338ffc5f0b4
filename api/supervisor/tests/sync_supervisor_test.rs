//! Tests for `Client::supervise_sync`, exercised from a plain (non-async)
//! test function — the whole point of the sync API is that it needs no
//! caller-provided executor.

#![ cfg( all( feature = "enabled", feature = "sync_api" ) ) ]

use api_supervisor::{ Client, SdkConfig, SuperviseError, SuperviseOptions };
use api_transport::EnvironmentImpl;
use serde_json::json;

fn build_client( batching : bool ) -> Client< EnvironmentImpl >
{
  let config = SdkConfig::new( "test-key", "https://app.olakai.ai" )
    .expect( "valid config" )
    .with_storage_enabled( false )
    .with_batching_enabled( batching )
    .with_retries( 0 );
  let env = EnvironmentImpl::new( "test-key" ).expect( "valid key" );
  Client::build( config, env ).expect( "client builds" )
}

#[ test ]
fn supervise_sync_returns_the_function_result_without_a_caller_runtime()
{
  let client = build_client( false );
  let opts = SuperviseOptions::former().form();

  let result = client.supervise_sync( &opts, json!( { "n" : 1 } ), | args |
  {
    Ok::< _, std::convert::Infallible >( args[ "n" ].as_i64().unwrap_or( 0 ) + 1 )
  } );

  assert_eq!( result.expect( "call must succeed" ), 2 );
}

#[ test ]
fn supervise_sync_passes_through_function_errors()
{
  let client = build_client( false );
  let opts = SuperviseOptions::former().form();

  let result = client.supervise_sync::< _, (), _ >( &opts, json!( {} ), | _args | Err( "boom" ) );

  match result
  {
    Err( SuperviseError::Function( e ) ) => assert_eq!( e, "boom" ),
    other => panic!( "expected Function error, got {other:?}" ),
  }
}
