//! End-to-end tests for `Client::supervise_async` / `supervise_sync`.
//!
//! No live control/monitoring endpoint is configured, so the control call
//! always fails and the fail-open policy lets every call proceed; these
//! tests cover gating pass-through, capture/sanitize, middleware, and the
//! user error pass-through contract rather than an actual `Blocked` outcome
//! (which requires a real control response).

#![ cfg( feature = "enabled" ) ]

use api_supervisor::{ Client, Middleware, SdkConfig, SuperviseError, SuperviseOptions };
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

#[ tokio::test ]
async fn successful_call_passes_through_and_enqueues_when_batching_enabled()
{
  let client = build_client( true );
  let opts = SuperviseOptions::former().form();

  let result = client.supervise_async( &opts, json!( { "prompt" : "hi" } ), | args |
  {
    async move { Ok::< _, std::convert::Infallible >( args ) }
  } ).await;

  assert!( result.is_ok() );
  assert_eq!( client.size(), 1, "batching enabled must enqueue the monitoring payload" );
}

#[ tokio::test ]
async fn successful_call_does_not_enqueue_when_batching_disabled()
{
  let client = build_client( false );
  let opts = SuperviseOptions::former().form();

  let result = client.supervise_async( &opts, json!( { "prompt" : "hi" } ), | args |
  {
    async move { Ok::< _, std::convert::Infallible >( args ) }
  } ).await;

  assert!( result.is_ok() );
  assert_eq!( client.size(), 0, "batching disabled must send directly, never enqueueing" );
}

#[ tokio::test ]
async fn function_error_passes_through_unchanged()
{
  let client = build_client( false );
  let opts = SuperviseOptions::former().form();

  let result = client.supervise_async::< _, _, (), _ >( &opts, json!( {} ), | _args |
  {
    async move { Err( "boom" ) }
  } ).await;

  match result
  {
    Err( SuperviseError::Function( e ) ) => assert_eq!( e, "boom" ),
    other => panic!( "expected Function error, got {other:?}" ),
  }
}

#[ tokio::test ]
async fn send_on_function_error_enqueues_an_error_payload_when_batching()
{
  let client = build_client( true );
  let opts = SuperviseOptions::former().send_on_function_error( true ).form();

  let _ = client.supervise_async::< _, _, (), _ >( &opts, json!( {} ), | _args |
  {
    async move { Err( "boom" ) }
  } ).await;

  assert_eq!( client.size(), 1 );
}

#[ tokio::test ]
async fn before_call_middleware_replaces_arguments()
{
  let client = build_client( false );
  client.add_middleware( Middleware::new( "inject" ).with_before_call( | mut v |
  {
    v[ "injected" ] = json!( true );
    Ok( v )
  } ) );

  let opts = SuperviseOptions::former().form();
  let result = client.supervise_async( &opts, json!( {} ), | args |
  {
    async move { Ok::< _, std::convert::Infallible >( args[ "injected" ].clone() ) }
  } ).await.expect( "call must succeed" );

  assert_eq!( result, json!( true ) );
}

#[ tokio::test ]
async fn remove_middleware_returns_false_for_unknown_name()
{
  let client = build_client( false );
  assert!( !client.remove_middleware( "never-registered" ) );
}

#[ tokio::test ]
async fn clear_and_flush_do_not_panic_without_a_live_endpoint()
{
  let client = build_client( true );
  let opts = SuperviseOptions::former().form();
  let _ = client.supervise_async( &opts, json!( {} ), | args |
  {
    async move { Ok::< _, std::convert::Infallible >( args ) }
  } ).await;

  client.flush().await;
  client.clear();
  assert_eq!( client.size(), 0 );
}
