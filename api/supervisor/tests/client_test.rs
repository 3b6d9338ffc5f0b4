//! Tests for the `Client` facade's lifecycle methods.

#![ cfg( feature = "enabled" ) ]

use api_supervisor::{ Client, SdkConfig };
use api_transport::EnvironmentImpl;

fn build_client() -> Client< EnvironmentImpl >
{
  let config = SdkConfig::new( "test-key", "https://app.olakai.ai" )
    .expect( "valid config" )
    .with_storage_enabled( false );
  let env = EnvironmentImpl::new( "test-key" ).expect( "valid key" );
  Client::build( config, env ).expect( "client builds" )
}

#[ tokio::test ]
async fn build_exposes_the_configuration_it_was_given()
{
  let client = build_client();
  assert_eq!( client.config().api_key(), "test-key" );
}

#[ tokio::test ]
async fn size_starts_at_zero()
{
  let client = build_client();
  assert_eq!( client.size(), 0 );
}

#[ tokio::test ]
async fn shutdown_with_an_empty_queue_returns_promptly()
{
  let client = build_client();
  client.shutdown( Some( core::time::Duration::from_millis( 100 ) ) ).await;
}

#[ tokio::test ]
async fn shutdown_uses_the_default_grace_period_when_none_given()
{
  let client = build_client();
  client.shutdown( None ).await;
}
