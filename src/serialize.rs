//! Serialization Strategy Module
//!
//! Defines the pluggable strategy that turns structured values into the
//! strings a remote key-value store can hold, and back again. A single
//! strategy instance is configured once and shared read-only by every
//! remote tier that caches a non-primitive type.

use serde_json::Value;
use thiserror::Error;

// == Serialize Error ==
/// Failure modes of a serialization strategy.
///
/// The two variants are deliberately distinct: a missing strategy for a
/// type is a fatal configuration problem, while a corrupt payload is
/// recoverable (the remote tier treats it as a miss and self-heals).
#[derive(Error, Debug)]
pub enum SerializeError {
    /// The strategy cannot represent the value type
    #[error("no serializer available: {0}")]
    Unsupported(String),

    /// The stored payload does not decode under this strategy
    #[error("malformed payload: {0}")]
    Corrupt(String),
}

// == Serialization Adapter ==
/// Strategy for encoding structured values to and from strings.
///
/// Values are handed to the adapter as a [`serde_json::Value`] tree, so an
/// adapter only decides the textual representation; the remote tier handles
/// the typed conversion through serde. Implementations must be stateless
/// with respect to individual calls.
pub trait SerializationAdapter: Send + Sync {
    /// Encodes a value tree into its stored string form.
    fn encode(&self, value: &Value) -> Result<String, SerializeError>;

    /// Decodes a stored string back into a value tree.
    fn decode(&self, raw: &str) -> Result<Value, SerializeError>;
}

// == JSON Adapter ==
/// The built-in JSON strategy backed by serde_json.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonAdapter;

impl SerializationAdapter for JsonAdapter {
    fn encode(&self, value: &Value) -> Result<String, SerializeError> {
        serde_json::to_string(value).map_err(|err| SerializeError::Unsupported(err.to_string()))
    }

    fn decode(&self, raw: &str) -> Result<Value, SerializeError> {
        serde_json::from_str(raw).map_err(|err| SerializeError::Corrupt(err.to_string()))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_adapter_round_trip() {
        let adapter = JsonAdapter;
        let tree = json!({"id": 42, "name": "alice"});

        let encoded = adapter.encode(&tree).unwrap();
        let decoded = adapter.decode(&encoded).unwrap();

        assert_eq!(decoded, tree);
    }

    #[test]
    fn test_json_adapter_corrupt_payload() {
        let adapter = JsonAdapter;

        let result = adapter.decode("{not json at all");
        assert!(matches!(result, Err(SerializeError::Corrupt(_))));
    }
}
