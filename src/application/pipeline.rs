//! Hub pipeline stages as observable sequences.
//!
//! A hub server runs every connection and invocation through a pipeline.
//! [`PipelineEvents`] is a module the host plugs into that pipeline: the
//! host calls the `on_*` hooks, and each hook publishes a value on the
//! matching stage's [`Subject`]. Hooks never gate: every `on_before_*`
//! returns `true` so later modules and the hub method always run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::TransportError;
use crate::domain::reactive::{EventStream, Observer, Subject, Subscription};

/// Hub and connection a pipeline stage relates to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubContext {
    pub hub_name: String,
    pub connection_id: String,
}

impl HubContext {
    pub fn new(hub_name: impl Into<String>, connection_id: impl Into<String>) -> Self {
        Self {
            hub_name: hub_name.into(),
            connection_id: connection_id.into(),
        }
    }
}

/// A client asking to subscribe to a hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectRequest {
    pub hub: HubContext,
    #[serde(default)]
    pub query: Vec<(String, String)>,
}

/// A client invoking a server-side hub method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingInvocation {
    pub hub: HubContext,
    pub method_name: String,
    pub args: Vec<Value>,
}

/// Result of a completed server-side invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResult {
    pub invocation: IncomingInvocation,
    pub result: Value,
}

/// A server invoking a client-side method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutgoingInvocation {
    pub hub_name: String,
    pub method_name: String,
    pub args: Vec<Value>,
    /// Connection, group or user the call is addressed to.
    pub target: String,
}

/// A server-side invocation that failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingError {
    pub invocation: IncomingInvocation,
    pub error: TransportError,
}

/// One subject per pipeline stage.
pub struct PipelineEvents {
    hub_filter: Option<String>,
    before_authorize_connect: Subject<ConnectRequest>,
    before_connect: Subject<HubContext>,
    after_connect: Subject<HubContext>,
    before_reconnect: Subject<HubContext>,
    after_reconnect: Subject<HubContext>,
    before_disconnect: Subject<HubContext>,
    after_disconnect: Subject<HubContext>,
    before_incoming: Subject<IncomingInvocation>,
    after_incoming: Subject<InvocationResult>,
    before_outgoing: Subject<OutgoingInvocation>,
    after_outgoing: Subject<OutgoingInvocation>,
    incoming_error: Subject<IncomingError>,
}

/// Read-only view of one stage, offering `subscribe` and `stream`.
pub struct SubjectEvent<'a, T> {
    subject: &'a Subject<T>,
}

impl<T> SubjectEvent<'_, T>
where
    T: Clone + Send + 'static,
{
    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: Observer<T> + 'static,
    {
        self.subject.subscribe(observer)
    }

    pub fn stream(&self) -> EventStream<T> {
        self.subject.stream()
    }
}

impl PipelineEvents {
    /// Observes every hub.
    pub fn new() -> Self {
        Self::with_filter(None)
    }

    /// Observes only stages of the hub named `hub_name`.
    pub fn for_hub(hub_name: impl Into<String>) -> Self {
        Self::with_filter(Some(hub_name.into()))
    }

    fn with_filter(hub_filter: Option<String>) -> Self {
        Self {
            hub_filter,
            before_authorize_connect: Subject::new(),
            before_connect: Subject::new(),
            after_connect: Subject::new(),
            before_reconnect: Subject::new(),
            after_reconnect: Subject::new(),
            before_disconnect: Subject::new(),
            after_disconnect: Subject::new(),
            before_incoming: Subject::new(),
            after_incoming: Subject::new(),
            before_outgoing: Subject::new(),
            after_outgoing: Subject::new(),
            incoming_error: Subject::new(),
        }
    }

    fn matches(&self, hub_name: &str) -> bool {
        self.hub_filter
            .as_deref()
            .map_or(true, |filter| filter == hub_name)
    }

    // === Stage streams ===

    pub fn before_authorize_connect(&self) -> SubjectEvent<'_, ConnectRequest> {
        SubjectEvent { subject: &self.before_authorize_connect }
    }

    pub fn before_connect(&self) -> SubjectEvent<'_, HubContext> {
        SubjectEvent { subject: &self.before_connect }
    }

    pub fn after_connect(&self) -> SubjectEvent<'_, HubContext> {
        SubjectEvent { subject: &self.after_connect }
    }

    pub fn before_reconnect(&self) -> SubjectEvent<'_, HubContext> {
        SubjectEvent { subject: &self.before_reconnect }
    }

    pub fn after_reconnect(&self) -> SubjectEvent<'_, HubContext> {
        SubjectEvent { subject: &self.after_reconnect }
    }

    pub fn before_disconnect(&self) -> SubjectEvent<'_, HubContext> {
        SubjectEvent { subject: &self.before_disconnect }
    }

    pub fn after_disconnect(&self) -> SubjectEvent<'_, HubContext> {
        SubjectEvent { subject: &self.after_disconnect }
    }

    pub fn before_incoming(&self) -> SubjectEvent<'_, IncomingInvocation> {
        SubjectEvent { subject: &self.before_incoming }
    }

    pub fn after_incoming(&self) -> SubjectEvent<'_, InvocationResult> {
        SubjectEvent { subject: &self.after_incoming }
    }

    pub fn before_outgoing(&self) -> SubjectEvent<'_, OutgoingInvocation> {
        SubjectEvent { subject: &self.before_outgoing }
    }

    pub fn after_outgoing(&self) -> SubjectEvent<'_, OutgoingInvocation> {
        SubjectEvent { subject: &self.after_outgoing }
    }

    pub fn incoming_error(&self) -> SubjectEvent<'_, IncomingError> {
        SubjectEvent { subject: &self.incoming_error }
    }

    // === Hooks called by the host pipeline ===

    pub fn on_before_authorize_connect(&self, request: &ConnectRequest) -> bool {
        if self.matches(&request.hub.hub_name) {
            self.before_authorize_connect.publish(request.clone());
        }
        true
    }

    pub fn on_before_connect(&self, hub: &HubContext) -> bool {
        self.publish_hub(&self.before_connect, hub);
        true
    }

    pub fn on_after_connect(&self, hub: &HubContext) {
        self.publish_hub(&self.after_connect, hub);
    }

    pub fn on_before_reconnect(&self, hub: &HubContext) -> bool {
        self.publish_hub(&self.before_reconnect, hub);
        true
    }

    pub fn on_after_reconnect(&self, hub: &HubContext) {
        self.publish_hub(&self.after_reconnect, hub);
    }

    pub fn on_before_disconnect(&self, hub: &HubContext) -> bool {
        self.publish_hub(&self.before_disconnect, hub);
        true
    }

    pub fn on_after_disconnect(&self, hub: &HubContext) {
        self.publish_hub(&self.after_disconnect, hub);
    }

    pub fn on_before_incoming(&self, invocation: &IncomingInvocation) -> bool {
        if self.matches(&invocation.hub.hub_name) {
            self.before_incoming.publish(invocation.clone());
        }
        true
    }

    /// Publishes the result and hands it back unchanged.
    pub fn on_after_incoming(&self, result: Value, invocation: &IncomingInvocation) -> Value {
        if self.matches(&invocation.hub.hub_name) {
            self.after_incoming.publish(InvocationResult {
                invocation: invocation.clone(),
                result: result.clone(),
            });
        }
        result
    }

    pub fn on_before_outgoing(&self, invocation: &OutgoingInvocation) -> bool {
        if self.matches(&invocation.hub_name) {
            self.before_outgoing.publish(invocation.clone());
        }
        true
    }

    pub fn on_after_outgoing(&self, invocation: &OutgoingInvocation) {
        if self.matches(&invocation.hub_name) {
            self.after_outgoing.publish(invocation.clone());
        }
    }

    pub fn on_incoming_error(&self, error: TransportError, invocation: &IncomingInvocation) {
        if self.matches(&invocation.hub.hub_name) {
            tracing::debug!(
                hub = %invocation.hub.hub_name,
                method = %invocation.method_name,
                error = %error,
                "Hub invocation failed"
            );
            self.incoming_error.publish(IncomingError {
                invocation: invocation.clone(),
                error,
            });
        }
    }

    fn publish_hub(&self, subject: &Subject<HubContext>, hub: &HubContext) {
        if self.matches(&hub.hub_name) {
            subject.publish(hub.clone());
        }
    }
}

impl Default for PipelineEvents {
    fn default() -> Self {
        Self::new()
    }
}
