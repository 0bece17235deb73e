//! HubTransport port - Interface to the named, variadic events of a hub.
//!
//! The real-time transport owns connection lifecycle, serialization and
//! message delivery. This port only exposes what the bridge needs: register
//! a handler under an event name, get a token back, hand the token back to
//! stop.

use std::sync::Arc;

use serde_json::Value;

use crate::domain::foundation::{RegistrationToken, TransportError};

use super::ArgumentConverter;

/// Handler invoked by the transport with the raw argument list of one message.
///
/// The transport may call it from any thread, and may call it concurrently
/// for different registrations.
pub type ArgumentsHandler = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Port for registering against named hub events.
///
/// Implementations must:
/// - Invoke each registration's handler in the order messages arrive
/// - Tolerate `deregister` being called from inside a handler invocation
/// - Treat `deregister` of an unknown token as a no-op
///
/// # Example
///
/// ```ignore
/// let token = transport.register("priceUpdate", Arc::new(|args: &[Value]| {
///     println!("{} args", args.len());
/// }))?;
/// transport.deregister(token);
/// ```
pub trait HubTransport: Send + Sync + 'static {
    /// Converter used to decode raw arguments into typed values.
    type Converter: ArgumentConverter + Clone;

    /// Register `handler` for messages named `event_name`.
    fn register(
        &self,
        event_name: &str,
        handler: ArgumentsHandler,
    ) -> Result<RegistrationToken, TransportError>;

    /// Remove the registration identified by `token`.
    fn deregister(&self, token: RegistrationToken);

    /// The conversion capability of this transport.
    fn converter(&self) -> Self::Converter;
}
