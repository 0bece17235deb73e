//! Reactive Hub - Observable streams over real-time hub connections
//!
//! This crate adapts a hub client's callback-style events into typed,
//! composable streams. Named server-to-client events with up to sixteen
//! arguments become `HubEvent`s, fixed connection signals (closed, error,
//! reconnecting) become `SignalEvent`s, and either can be delivered on an
//! explicit `DeliveryContext`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use futures::StreamExt;
//! use reactive_hub::adapters::InMemoryHub;
//! use reactive_hub::application::HubTransportExt;
//!
//! # async fn demo() -> Result<(), reactive_hub::domain::foundation::BridgeError> {
//! let hub = Arc::new(InMemoryHub::new());
//! let mut prices = hub.on::<(String, f64)>("priceUpdate")?.stream()?;
//! while let Some(update) = prices.next().await {
//!     let (symbol, price) = update?;
//!     println!("{symbol}: {price}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
