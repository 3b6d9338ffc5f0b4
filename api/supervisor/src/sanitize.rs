//! Redaction of sensitive values before they leave the process in a
//! monitoring or control payload.

mod private
{
  use regex::Regex;
  use serde_json::Value;

  /// Default replacement text used when a pattern matches without one
  /// configured explicitly.
  pub const DEFAULT_REPLACEMENT : &str = "[REDACTED]";

  /// Substitute value used when sanitization itself fails.
  pub const SANITIZATION_FAILURE_PLACEHOLDER : &str = "[SANITIZED]";

  /// One configured redaction rule.
  ///
  /// `Regex` patterns apply to the stringified value of every string leaf;
  /// `Key` patterns apply only to string leaves whose containing object key
  /// matches.
  #[ derive( Debug, Clone ) ]
  pub enum SanitizePattern
  {
    /// Match leaves whose string value matches `pattern`.
    Regex
    {
      /// Regular expression source.
      pattern : String,
      /// Replacement text; defaults to [`DEFAULT_REPLACEMENT`] if empty.
      replacement : String,
    },
    /// Match leaves whose containing object key equals `key`.
    Key
    {
      /// Object key to match.
      key : String,
      /// Replacement text; defaults to [`DEFAULT_REPLACEMENT`] if empty.
      replacement : String,
    },
  }

  enum CompiledPattern
  {
    Regex( Regex, String ),
    Key( String, String ),
  }

  /// Recursively redacts string leaves of a JSON value using an ordered
  /// sequence of [`SanitizePattern`]s.
  ///
  /// Invalid regex patterns are skipped at construction time and logged at
  /// warning level; they do not prevent the remaining patterns from being
  /// used.
  #[ derive( Debug ) ]
  pub struct RegexSanitizer
  {
    patterns : Vec< CompiledPattern >,
  }

  impl std::fmt::Debug for CompiledPattern
  {
    fn fmt( &self, f : &mut std::fmt::Formatter< '_ > ) -> std::fmt::Result
    {
      match self
      {
        Self::Regex( r, repl ) => f.debug_tuple( "Regex" ).field( &r.as_str() ).field( repl ).finish(),
        Self::Key( k, repl ) => f.debug_tuple( "Key" ).field( k ).field( repl ).finish(),
      }
    }
  }

  impl RegexSanitizer
  {
    /// Compiles the given patterns, skipping (and logging) any invalid regex.
    #[ inline ]
    #[ must_use ]
    pub fn new( patterns : &[ SanitizePattern ] ) -> Self
    {
      let mut compiled = Vec::with_capacity( patterns.len() );
      for pattern in patterns
      {
        match pattern
        {
          SanitizePattern::Regex { pattern, replacement } =>
          {
            let replacement = if replacement.is_empty() { DEFAULT_REPLACEMENT.to_owned() } else { replacement.clone() };
            match Regex::new( pattern )
            {
              Ok( re ) => compiled.push( CompiledPattern::Regex( re, replacement ) ),
              Err( e ) =>
              {
                #[ cfg( feature = "structured_logging" ) ]
                tracing::warn!( pattern = pattern.as_str(), error = %e, "skipping invalid sanitize pattern" );
                #[ cfg( not( feature = "structured_logging" ) ) ]
                let _ = e;
              }
            }
          }
          SanitizePattern::Key { key, replacement } =>
          {
            let replacement = if replacement.is_empty() { DEFAULT_REPLACEMENT.to_owned() } else { replacement.clone() };
            compiled.push( CompiledPattern::Key( key.clone(), replacement ) );
          }
        }
      }
      Self { patterns : compiled }
    }

    /// Applies every configured pattern, in order, to every string leaf of
    /// `value`, recursing through objects and arrays.
    #[ inline ]
    #[ must_use ]
    pub fn sanitize( &self, value : &Value ) -> Value
    {
      self.sanitize_with_key( value, None )
    }

    fn sanitize_with_key( &self, value : &Value, containing_key : Option< &str > ) -> Value
    {
      match value
      {
        Value::String( s ) =>
        {
          let mut current = s.clone();
          for pattern in &self.patterns
          {
            current = match pattern
            {
              CompiledPattern::Regex( re, replacement ) =>
                re.replace_all( &current, replacement.as_str() ).into_owned(),
              CompiledPattern::Key( key, replacement ) =>
                if containing_key == Some( key.as_str() ) { replacement.clone() } else { current },
            };
          }
          Value::String( current )
        }
        Value::Object( map ) =>
        {
          let mut out = serde_json::Map::with_capacity( map.len() );
          for ( k, v ) in map
          {
            out.insert( k.clone(), self.sanitize_with_key( v, Some( k.as_str() ) ) );
          }
          Value::Object( out )
        }
        Value::Array( items ) =>
          Value::Array( items.iter().map( | v | self.sanitize_with_key( v, containing_key ) ).collect() ),
        other => other.clone(),
      }
    }
  }

  #[ cfg( test ) ]
  mod tests
  {
    use super::*;
    use serde_json::json;

    #[ test ]
    fn regex_pattern_redacts_matching_string_leaves()
    {
      let sanitizer = RegexSanitizer::new( &[ SanitizePattern::Regex
      {
        pattern : r"\d{3}-\d{2}-\d{4}".to_owned(),
        replacement : String::new(),
      } ] );
      let value = json!( { "note" : "ssn is 123-45-6789" } );
      let sanitized = sanitizer.sanitize( &value );
      assert_eq!( sanitized[ "note" ], json!( "ssn is [REDACTED]" ) );
    }

    #[ test ]
    fn key_pattern_redacts_only_matching_key()
    {
      let sanitizer = RegexSanitizer::new( &[ SanitizePattern::Key
      {
        key : "password".to_owned(),
        replacement : String::new(),
      } ] );
      let value = json!( { "password" : "hunter2", "username" : "hunter2" } );
      let sanitized = sanitizer.sanitize( &value );
      assert_eq!( sanitized[ "password" ], json!( "[REDACTED]" ) );
      assert_eq!( sanitized[ "username" ], json!( "hunter2" ) );
    }

    #[ test ]
    fn recurses_through_nested_arrays_and_objects()
    {
      let sanitizer = RegexSanitizer::new( &[ SanitizePattern::Key
      {
        key : "secret".to_owned(),
        replacement : "x".to_owned(),
      } ] );
      let value = json!( { "items" : [ { "secret" : "a" }, { "secret" : "b" } ] } );
      let sanitized = sanitizer.sanitize( &value );
      assert_eq!( sanitized[ "items" ][ 0 ][ "secret" ], json!( "x" ) );
      assert_eq!( sanitized[ "items" ][ 1 ][ "secret" ], json!( "x" ) );
    }

    #[ test ]
    fn invalid_regex_is_skipped_without_panicking()
    {
      let sanitizer = RegexSanitizer::new( &[ SanitizePattern::Regex
      {
        pattern : "(".to_owned(),
        replacement : String::new(),
      } ] );
      let value = json!( { "note" : "unchanged" } );
      assert_eq!( sanitizer.sanitize( &value ), value );
    }

    #[ test ]
    fn no_patterns_leaves_value_unchanged()
    {
      let sanitizer = RegexSanitizer::new( &[] );
      let value = json!( { "a" : 1, "b" : [ "x", "y" ] } );
      assert_eq!( sanitizer.sanitize( &value ), value );
    }
  }
}

crate::mod_interface!
{
  exposed use
  {
    SanitizePattern,
    RegexSanitizer,
    DEFAULT_REPLACEMENT,
    SANITIZATION_FAILURE_PLACEHOLDER,
  };
}
