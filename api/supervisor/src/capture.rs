//! Strategies for deriving the `{input, output}` pair recorded in a
//! [`crate::MonitorPayload`] from a supervised call's arguments and result.

mod private
{
  use serde_json::Value;
  use std::fmt;
  use std::sync::Arc;

  /// The `{input, output}` pair captured for one supervised call.
  #[ derive( Debug, Clone, PartialEq ) ]
  pub struct CaptureResult
  {
    /// Value recorded as `MonitorPayload::prompt`.
    pub input : Value,
    /// Value recorded as `MonitorPayload::response`.
    pub output : Value,
  }

  /// How a supervised call's arguments and result are turned into a
  /// [`CaptureResult`].
  ///
  /// `args` is a single JSON value representing everything the caller wants
  /// recorded as the call's input; Rust has no variadic `*args, **kwargs`
  /// equivalent, so the caller is responsible for assembling that value
  /// (typically `serde_json::json!(...)` over the call's parameters) before
  /// invoking `supervise_async` / `supervise_sync`.
  #[ derive( Clone ) ]
  pub enum Capture
  {
    /// Record both input and output. The default.
    All,
    /// Record only the input; output is recorded as `null`.
    InputOnly,
    /// Record only the output; input is recorded as `null`.
    OutputOnly,
    /// Caller-supplied capture function.
    Custom( Arc< dyn Fn( &Value, &Value ) -> CaptureResult + Send + Sync > ),
  }

  impl Capture
  {
    /// Applies this capture strategy to a call's arguments and result.
    #[ inline ]
    #[ must_use ]
    pub fn apply( &self, args : &Value, result : &Value ) -> CaptureResult
    {
      match self
      {
        Self::All => CaptureResult { input : args.clone(), output : result.clone() },
        Self::InputOnly => CaptureResult { input : args.clone(), output : Value::Null },
        Self::OutputOnly => CaptureResult { input : Value::Null, output : result.clone() },
        Self::Custom( f ) => f( args, result ),
      }
    }
  }

  impl Default for Capture
  {
    #[ inline ]
    fn default() -> Self
    {
      Self::All
    }
  }

  impl fmt::Debug for Capture
  {
    fn fmt( &self, f : &mut fmt::Formatter< '_ > ) -> fmt::Result
    {
      match self
      {
        Self::All => write!( f, "Capture::All" ),
        Self::InputOnly => write!( f, "Capture::InputOnly" ),
        Self::OutputOnly => write!( f, "Capture::OutputOnly" ),
        Self::Custom( _ ) => write!( f, "Capture::Custom(..)" ),
      }
    }
  }

  #[ cfg( test ) ]
  mod tests
  {
    use super::*;
    use serde_json::json;

    #[ test ]
    fn all_captures_both_input_and_output()
    {
      let args = json!( { "q" : "hi" } );
      let result = json!( { "a" : "ho" } );
      let captured = Capture::All.apply( &args, &result );
      assert_eq!( captured.input, args );
      assert_eq!( captured.output, result );
    }

    #[ test ]
    fn input_only_nulls_the_output()
    {
      let args = json!( { "q" : "hi" } );
      let result = json!( { "a" : "ho" } );
      let captured = Capture::InputOnly.apply( &args, &result );
      assert_eq!( captured.input, args );
      assert_eq!( captured.output, Value::Null );
    }

    #[ test ]
    fn output_only_nulls_the_input()
    {
      let args = json!( { "q" : "hi" } );
      let result = json!( { "a" : "ho" } );
      let captured = Capture::OutputOnly.apply( &args, &result );
      assert_eq!( captured.input, Value::Null );
      assert_eq!( captured.output, result );
    }

    #[ test ]
    fn custom_strategy_runs_caller_supplied_function()
    {
      let capture = Capture::Custom( Arc::new( | args, _result |
      {
        CaptureResult { input : args.clone(), output : json!( "overridden" ) }
      } ) );
      let captured = capture.apply( &json!( "in" ), &json!( "out" ) );
      assert_eq!( captured.output, json!( "overridden" ) );
    }

    #[ test ]
    fn default_is_all()
    {
      assert!( matches!( Capture::default(), Capture::All ) );
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    Capture,
    CaptureResult,
  };
}
