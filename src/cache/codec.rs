//! Value Codec Module
//!
//! How the remote tier turns values into the strings a key-value store can
//! hold. The codec is chosen once, at cache construction, from the declared
//! value type: a fixed set of string-coercible scalars round-trips through
//! plain string parsing, everything else goes through the configured
//! serialization strategy.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{CacheError, Result};
use crate::serialize::{SerializationAdapter, SerializeError};

// == Decode Outcome ==
/// Result of decoding a stored payload.
///
/// `Invalid` is not an error: the remote tier maps it to a miss. Whether it
/// also triggers a self-heal depends on [`ValueCodec::self_heals`].
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<V> {
    /// The payload decoded cleanly
    Value(V),
    /// The payload does not represent a value of the declared type
    Invalid(String),
}

// == Value Codec ==
/// String encoding policy for one remotely cached value type.
pub trait ValueCodec<V>: Send + Sync {
    /// Encodes a value into its stored string form.
    fn encode(&self, value: &V) -> Result<String>;

    /// Decodes a stored string. Fatal conditions (payloads that cannot
    /// legally exist for the type) are errors; recoverable mismatches are
    /// [`Decoded::Invalid`].
    fn decode(&self, raw: &str) -> Result<Decoded<V>>;

    /// Whether an invalid payload should be purged from the store.
    ///
    /// Only the structured-serialization path self-heals; the primitive
    /// path treats unparsable payloads as plain misses.
    fn self_heals(&self) -> bool {
        false
    }
}

// == Primitive Values ==
/// The string-coercible scalars the remote tier stores without a
/// serialization strategy.
pub trait PrimitiveValue: Clone + Send + Sync + 'static {
    /// The plain string representation written to the store.
    fn to_cache_string(&self) -> String;

    /// Parses the stored representation back.
    fn from_cache_string(raw: &str) -> Result<Decoded<Self>>;
}

macro_rules! parsed_primitive {
    ($($ty:ty),* $(,)?) => {$(
        impl PrimitiveValue for $ty {
            fn to_cache_string(&self) -> String {
                self.to_string()
            }

            fn from_cache_string(raw: &str) -> Result<Decoded<Self>> {
                Ok(match raw.parse::<$ty>() {
                    Ok(value) => Decoded::Value(value),
                    Err(_) => Decoded::Invalid(format!(
                        "{:?} is not a valid {}",
                        raw,
                        stringify!($ty)
                    )),
                })
            }
        }
    )*};
}

parsed_primitive!(i8, i16, i32, i64, f32, f64);

impl PrimitiveValue for bool {
    fn to_cache_string(&self) -> String {
        self.to_string()
    }

    // Anything other than "true" (case-insensitive) reads as false, so a
    // stored boolean never decodes as invalid.
    fn from_cache_string(raw: &str) -> Result<Decoded<Self>> {
        Ok(Decoded::Value(raw.eq_ignore_ascii_case("true")))
    }
}

impl PrimitiveValue for char {
    fn to_cache_string(&self) -> String {
        self.to_string()
    }

    fn from_cache_string(raw: &str) -> Result<Decoded<Self>> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Decoded::Value(c)),
            _ => Err(CacheError::InvalidValue(format!(
                "stored payload {:?} is not a single character",
                raw
            ))),
        }
    }
}

impl PrimitiveValue for String {
    fn to_cache_string(&self) -> String {
        self.clone()
    }

    fn from_cache_string(raw: &str) -> Result<Decoded<Self>> {
        Ok(Decoded::Value(raw.to_string()))
    }
}

// == Primitive Codec ==
/// Codec for [`PrimitiveValue`] types. Never self-heals.
pub struct PrimitiveCodec<V> {
    _marker: PhantomData<fn() -> V>,
}

impl<V> PrimitiveCodec<V> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<V> Default for PrimitiveCodec<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PrimitiveValue> ValueCodec<V> for PrimitiveCodec<V> {
    fn encode(&self, value: &V) -> Result<String> {
        Ok(value.to_cache_string())
    }

    fn decode(&self, raw: &str) -> Result<Decoded<V>> {
        V::from_cache_string(raw)
    }
}

// == Serde Codec ==
/// Codec routing through the configured [`SerializationAdapter`].
///
/// A payload the adapter cannot decode, or whose shape no longer matches
/// the declared type, is reported as [`Decoded::Invalid`] so the remote
/// tier can self-heal the entry.
pub struct SerdeCodec<V> {
    adapter: Arc<dyn SerializationAdapter>,
    _marker: PhantomData<fn() -> V>,
}

impl<V> SerdeCodec<V> {
    pub fn new(adapter: Arc<dyn SerializationAdapter>) -> Self {
        Self {
            adapter,
            _marker: PhantomData,
        }
    }
}

impl<V> ValueCodec<V> for SerdeCodec<V>
where
    V: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    fn encode(&self, value: &V) -> Result<String> {
        let tree = serde_json::to_value(value)
            .map_err(|err| CacheError::Unsupported(err.to_string()))?;
        Ok(self.adapter.encode(&tree)?)
    }

    fn decode(&self, raw: &str) -> Result<Decoded<V>> {
        let tree = match self.adapter.decode(raw) {
            Ok(tree) => tree,
            Err(SerializeError::Corrupt(reason)) => return Ok(Decoded::Invalid(reason)),
            Err(err @ SerializeError::Unsupported(_)) => return Err(err.into()),
        };

        match serde_json::from_value(tree) {
            Ok(value) => Ok(Decoded::Value(value)),
            Err(err) => Ok(Decoded::Invalid(err.to_string())),
        }
    }

    fn self_heals(&self) -> bool {
        true
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::JsonAdapter;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Account {
        id: i64,
        name: String,
    }

    fn serde_codec<V>() -> SerdeCodec<V> {
        SerdeCodec::new(Arc::new(JsonAdapter))
    }

    #[test]
    fn test_numeric_parse_failure_is_invalid() {
        let codec = PrimitiveCodec::<i32>::new();

        assert_eq!(codec.decode("17").unwrap(), Decoded::Value(17));
        assert!(matches!(
            codec.decode("seventeen").unwrap(),
            Decoded::Invalid(_)
        ));
    }

    #[test]
    fn test_bool_defaults_to_false() {
        let codec = PrimitiveCodec::<bool>::new();

        assert_eq!(codec.decode("TRUE").unwrap(), Decoded::Value(true));
        assert_eq!(codec.decode("banana").unwrap(), Decoded::Value(false));
    }

    #[test]
    fn test_char_wrong_length_is_fatal() {
        let codec = PrimitiveCodec::<char>::new();

        assert_eq!(codec.decode("x").unwrap(), Decoded::Value('x'));
        assert!(matches!(
            codec.decode("xy"),
            Err(CacheError::InvalidValue(_))
        ));
        assert!(matches!(codec.decode(""), Err(CacheError::InvalidValue(_))));
    }

    #[test]
    fn test_string_is_identity() {
        let codec = PrimitiveCodec::<String>::new();

        assert_eq!(codec.encode(&"raw".to_string()).unwrap(), "raw");
        assert_eq!(
            codec.decode("raw").unwrap(),
            Decoded::Value("raw".to_string())
        );
    }

    #[test]
    fn test_primitive_codec_never_heals() {
        assert!(!PrimitiveCodec::<i64>::new().self_heals());
    }

    #[test]
    fn test_serde_codec_round_trip() {
        let codec = serde_codec::<Account>();
        let account = Account {
            id: 7,
            name: "alice".to_string(),
        };

        let encoded = codec.encode(&account).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), Decoded::Value(account));
    }

    #[test]
    fn test_serde_codec_corrupt_payload_is_invalid() {
        let codec = serde_codec::<Account>();

        assert!(matches!(
            codec.decode("{definitely broken").unwrap(),
            Decoded::Invalid(_)
        ));
    }

    #[test]
    fn test_serde_codec_schema_mismatch_is_invalid() {
        let codec = serde_codec::<Account>();

        // Valid JSON, wrong shape for the declared type.
        assert!(matches!(
            codec.decode(r#"{"unexpected": true}"#).unwrap(),
            Decoded::Invalid(_)
        ));
    }

    #[test]
    fn test_serde_codec_heals() {
        assert!(serde_codec::<Account>().self_heals());
    }

    #[test]
    fn test_serde_codec_handles_lists() {
        let codec = serde_codec::<Vec<Account>>();
        let accounts = vec![
            Account {
                id: 1,
                name: "a".to_string(),
            },
            Account {
                id: 2,
                name: "b".to_string(),
            },
        ];

        let encoded = codec.encode(&accounts).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), Decoded::Value(accounts));
    }
}
