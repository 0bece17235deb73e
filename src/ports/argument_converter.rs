//! ArgumentConverter port - Decodes one opaque wire value into a target type.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::foundation::ConversionError;

/// Port for converting raw hub arguments.
///
/// A missing (`None`) or null raw value must convert to `T::default()`
/// rather than fail: absent fields are a normal part of hub payloads.
pub trait ArgumentConverter: Send + Sync + 'static {
    /// Convert the argument at `position` into `T`.
    fn convert<T>(&self, raw: Option<&Value>, position: usize) -> Result<T, ConversionError>
    where
        T: DeserializeOwned + Default;
}
