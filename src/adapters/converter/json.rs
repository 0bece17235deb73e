//! JSON argument converter backed by serde_json.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::foundation::ConversionError;
use crate::ports::ArgumentConverter;

/// Converts raw JSON arguments with `serde_json::from_value`.
///
/// Missing and null values become `T::default()`: a missing number is `0`,
/// a missing string is empty, a missing `Option<_>` is `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonArgumentConverter;

impl JsonArgumentConverter {
    pub fn new() -> Self {
        Self
    }
}

impl ArgumentConverter for JsonArgumentConverter {
    fn convert<T>(&self, raw: Option<&Value>, position: usize) -> Result<T, ConversionError>
    where
        T: DeserializeOwned + Default,
    {
        match raw {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => T::deserialize(value).map_err(|e| {
                ConversionError::invalid_value(position, std::any::type_name::<T>(), e.to_string())
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Quote {
        symbol: String,
        price: f64,
    }

    #[test]
    fn converts_primitives() {
        let converter = JsonArgumentConverter::new();
        let text: String = converter.convert(Some(&json!("AAPL")), 0).unwrap();
        let price: f64 = converter.convert(Some(&json!(193.2)), 1).unwrap();
        assert_eq!(text, "AAPL");
        assert_eq!(price, 193.2);
    }

    #[test]
    fn null_and_missing_become_default() {
        let converter = JsonArgumentConverter::new();
        let number: i64 = converter.convert(Some(&Value::Null), 0).unwrap();
        let missing: f64 = converter.convert(None, 1).unwrap();
        let optional: Option<String> = converter.convert(Some(&Value::Null), 2).unwrap();
        assert_eq!(number, 0);
        assert_eq!(missing, 0.0);
        assert_eq!(optional, None);
    }

    #[test]
    fn converts_structs() {
        let converter = JsonArgumentConverter::new();
        let quote: Quote = converter
            .convert(Some(&json!({"symbol": "MSFT", "price": 411.5})), 0)
            .unwrap();
        assert_eq!(
            quote,
            Quote {
                symbol: "MSFT".to_string(),
                price: 411.5
            }
        );
    }

    #[test]
    fn type_mismatch_reports_position_and_target() {
        let converter = JsonArgumentConverter::new();
        let err = converter
            .convert::<u32>(Some(&json!("not a number")), 3)
            .unwrap_err();
        match err {
            ConversionError::InvalidValue {
                position, target, ..
            } => {
                assert_eq!(position, 3);
                assert_eq!(target, "u32");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
