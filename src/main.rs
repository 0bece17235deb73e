//! Demo: wires an in-memory hub end to end.
//!
//! Subscribes to a two-argument price event and the `closed` signal, then
//! plays a few messages through the transport.

use std::sync::Arc;

use futures::StreamExt;
use serde_json::json;

use reactive_hub::adapters::{InMemoryHub, ThreadDispatcher};
use reactive_hub::application::{ConnectionSignalsExt, DeliveryContext, HubTransportExt};
use reactive_hub::config::AppConfig;
use reactive_hub::domain::foundation::{ConnectionState, StateChange};
use reactive_hub::domain::reactive::FnObserver;
use reactive_hub::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Falling back to default configuration: {err}");
            AppConfig::default()
        }
    };
    config.validate()?;
    telemetry::init_tracing(&config.logging)?;

    let hub = Arc::new(InMemoryHub::new());
    let delivery = ThreadDispatcher::spawn(config.bridge.delivery_thread_name.clone())?;
    let context = DeliveryContext::from_dispatcher(delivery);

    let mut prices = hub
        .on::<(String, f64)>("priceUpdate")?
        .with_arity_policy(config.bridge.arity_policy)
        .stream()?;

    let _state_log = hub.state_changed_events().observe_on(context).subscribe(FnObserver::new(
        |change: StateChange| {
            tracing::info!(
                old = ?change.old_state,
                new = ?change.new_state,
                thread = ?std::thread::current().name(),
                "Connection state changed"
            );
        },
    ));
    let mut closed = hub.closed_events().stream();

    hub.transition(ConnectionState::Connecting);
    hub.transition(ConnectionState::Connected);
    hub.deliver("priceUpdate", vec![json!("AAPL"), json!(193.2)]);
    hub.deliver("priceUpdate", vec![json!("MSFT"), json!(null)]);

    for _ in 0..2 {
        if let Some(update) = prices.next().await {
            let (symbol, price) = update?;
            tracing::info!(%symbol, price, "Price update");
        }
    }

    hub.raise_closed();
    if closed.next().await.is_some() {
        tracing::info!("Connection closed");
    }

    prices.dispose();
    tracing::info!(
        registrations = hub.registration_count("priceUpdate"),
        "Price stream disposed"
    );
    Ok(())
}
