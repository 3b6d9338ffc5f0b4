//! Wire and queue data types shared by the supervisor, queue manager, and
//! transport layer.

mod private
{
  use serde::{ Deserialize, Serialize };
  use serde_json::Value;

  /// Drain and dispatch priority for a batch or payload.
  ///
  /// Governs drain order (`high` first) and forces an immediate drain when a
  /// payload enqueued at `high` priority upgrades its absorbing batch.
  #[ derive( Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize ) ]
  #[ serde( rename_all = "lowercase" ) ]
  pub enum Priority
  {
    /// Drains before `normal` and `low`; forces an immediate drain on enqueue.
    High,
    /// Default priority.
    Normal,
    /// Drains after `normal` and `high`.
    Low,
  }

  impl Priority
  {
    /// Sort rank used for stable priority-ordered draining: `high` sorts first.
    #[ inline ]
    #[ must_use ]
    pub fn rank( self ) -> u8
    {
      match self
      {
        Self::High => 0,
        Self::Normal => 1,
        Self::Low => 2,
      }
    }
  }

  impl Default for Priority
  {
    #[ inline ]
    fn default() -> Self
    {
      Self::Normal
    }
  }

  /// One observation of a supervised function call, queued for monitoring.
  #[ derive( Debug, Clone, PartialEq, Serialize, Deserialize ) ]
  #[ serde( rename_all = "camelCase" ) ]
  pub struct MonitorPayload
  {
    /// Caller identity, resolved from `SuperviseOptions::email` or its fallback.
    pub email : String,
    /// Conversation identity, resolved from `SuperviseOptions::chat_id` or its fallback.
    pub chat_id : String,
    /// Captured call input, as a JSON value.
    pub prompt : Value,
    /// Captured call output, as a JSON value.
    pub response : Value,
    /// Whether the call was denied by the control service.
    pub blocked : bool,
    /// Token usage recorded for the call, if known.
    pub tokens : u64,
    /// Wall-clock duration of the call in milliseconds.
    pub request_time : u64,
    /// Optional task label.
    #[ serde( skip_serializing_if = "Option::is_none" ) ]
    pub task : Option< String >,
    /// Optional sub-task label.
    #[ serde( skip_serializing_if = "Option::is_none" ) ]
    pub sub_task : Option< String >,
    /// Error message captured on the error path, if any.
    #[ serde( skip_serializing_if = "Option::is_none" ) ]
    pub error_message : Option< String >,
    /// Sensitivity categories detected by the control service, if any.
    pub sensitivity : Vec< String >,
  }

  /// Gating request sent to the control endpoint before a supervised call runs.
  #[ derive( Debug, Clone, PartialEq, Serialize, Deserialize ) ]
  #[ serde( rename_all = "camelCase" ) ]
  pub struct ControlPayload
  {
    /// Caller identity.
    pub email : String,
    /// Conversation identity.
    pub chat_id : String,
    /// The call's captured input, as a JSON value.
    pub prompt : Value,
    /// Optional task label.
    #[ serde( skip_serializing_if = "Option::is_none" ) ]
    pub task : Option< String >,
    /// Optional sub-task label.
    #[ serde( skip_serializing_if = "Option::is_none" ) ]
    pub sub_task : Option< String >,
    /// Token usage estimate for the call, if known.
    pub tokens : u64,
    /// Caller-supplied criteria overrides for the control decision.
    #[ serde( skip_serializing_if = "Option::is_none" ) ]
    pub override_control_criteria : Option< Vec< String > >,
  }

  /// Nested sensitivity/persona details attached to a [`ControlResponse`].
  #[ derive( Debug, Clone, PartialEq, Serialize, Deserialize ) ]
  #[ serde( rename_all = "camelCase" ) ]
  pub struct ControlDetails
  {
    /// Sensitivity categories the control service detected in the call input.
    pub detected_sensitivity : Vec< String >,
    /// Whether the caller's persona is permitted to proceed at all.
    pub is_allowed_persona : bool,
  }

  /// Response from the control endpoint.
  #[ derive( Debug, Clone, PartialEq, Serialize, Deserialize ) ]
  #[ serde( rename_all = "camelCase" ) ]
  pub struct ControlResponse
  {
    /// Whether the call is permitted to proceed.
    pub allowed : bool,
    /// Sensitivity and persona details behind the decision.
    pub details : ControlDetails,
    /// Optional human-readable message.
    #[ serde( skip_serializing_if = "Option::is_none" ) ]
    pub message : Option< String >,
  }

  /// Per-item result within a [`MonitoringApiResponse`], index-aligned with the
  /// submitted batch payload array.
  #[ derive( Debug, Clone, PartialEq, Serialize, Deserialize ) ]
  #[ serde( rename_all = "camelCase" ) ]
  pub struct MonitoringResponse
  {
    /// Index into the submitted batch's payload array.
    pub index : usize,
    /// Whether this specific payload was accepted.
    pub success : bool,
    /// Server-assigned id for the accepted prompt, if any.
    #[ serde( skip_serializing_if = "Option::is_none" ) ]
    pub prompt_request_id : Option< String >,
    /// Error detail for this specific payload, if rejected.
    #[ serde( skip_serializing_if = "Option::is_none" ) ]
    pub error : Option< String >,
  }

  /// Response from the monitoring endpoint for a submitted batch.
  #[ derive( Debug, Clone, PartialEq, Serialize, Deserialize ) ]
  #[ serde( rename_all = "camelCase" ) ]
  pub struct MonitoringApiResponse
  {
    /// Whether the batch as a whole was accepted.
    pub success : bool,
    /// Total number of payloads submitted in the batch.
    pub total_requests : u64,
    /// Number of payloads accepted.
    pub success_count : u64,
    /// Number of payloads rejected.
    pub failure_count : u64,
    /// Index-aligned per-payload results. Absent means "treat every item as
    /// failed together".
    #[ serde( skip_serializing_if = "Option::is_none" ) ]
    pub results : Option< Vec< MonitoringResponse > >,
    /// Optional human-readable message.
    #[ serde( skip_serializing_if = "Option::is_none" ) ]
    pub message : Option< String >,
  }

  /// A queued, retry-tracked group of [`MonitorPayload`]s sent in one
  /// monitoring POST.
  #[ derive( Debug, Clone, PartialEq, Serialize, Deserialize ) ]
  pub struct BatchRequest
  {
    /// Unique id for this batch, used only for logging/diagnostics.
    pub id : String,
    /// Payloads contained in this batch, preserving insertion order.
    pub payload : Vec< MonitorPayload >,
    /// Creation timestamp, in milliseconds since the Unix epoch.
    pub timestamp : u64,
    /// Shared retry counter for every payload currently in this batch.
    pub retries : u32,
    /// Drain priority of this batch.
    pub priority : Priority,
  }

  impl BatchRequest
  {
    /// Creates a new single-payload batch at the given retry count and priority.
    #[ inline ]
    #[ must_use ]
    pub fn new( id : String, payload : MonitorPayload, timestamp : u64, retries : u32, priority : Priority ) -> Self
    {
      Self { id, payload : vec![ payload ], timestamp, retries, priority }
    }
  }

  #[ cfg( test ) ]
  mod tests
  {
    use super::*;

    #[ test ]
    fn priority_rank_orders_high_before_normal_before_low()
    {
      assert!( Priority::High.rank() < Priority::Normal.rank() );
      assert!( Priority::Normal.rank() < Priority::Low.rank() );
    }

    #[ test ]
    fn priority_default_is_normal()
    {
      assert_eq!( Priority::default(), Priority::Normal );
    }

    #[ test ]
    fn batch_request_new_wraps_one_payload()
    {
      let payload = MonitorPayload
      {
        email : "a@b.com".to_owned(), chat_id : "c".to_owned(), prompt : Value::Null, response : Value::Null,
        blocked : false, tokens : 0, request_time : 0, task : None, sub_task : None,
        error_message : None, sensitivity : Vec::new(),
      };
      let batch = BatchRequest::new( "id-1".to_owned(), payload, 1000, 0, Priority::Normal );
      assert_eq!( batch.payload.len(), 1 );
      assert_eq!( batch.retries, 0 );
    }

    #[ test ]
    fn priority_serializes_lowercase()
    {
      assert_eq!( serde_json::to_string( &Priority::High ).unwrap(), "\"high\"" );
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    Priority,
    MonitorPayload,
    ControlPayload,
    ControlDetails,
    ControlResponse,
    MonitoringResponse,
    MonitoringApiResponse,
    BatchRequest,
  };
}
