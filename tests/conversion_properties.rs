//! Property tests for argument decoding through the event bridge.
//!
//! Delivered values must come out converted position by position, and a
//! null at any position must come out as that type's default.

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use serde_json::{json, Value};

use reactive_hub::adapters::InMemoryHub;
use reactive_hub::application::HubTransportExt;
use reactive_hub::domain::reactive::FnObserver;

type Triple = (String, i64, bool);

/// Delivers `args` once to a fresh `(String, i64, bool)` subscription.
fn deliver_triple(args: Vec<Value>) -> Vec<Triple> {
    let hub = Arc::new(InMemoryHub::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();

    let subscription = hub
        .on::<Triple>("triple")
        .unwrap()
        .subscribe(FnObserver::new(move |value: Triple| {
            sink.lock().unwrap().push(value);
        }))
        .unwrap();
    hub.deliver("triple", args);
    drop(subscription);

    let values = seen.lock().unwrap().clone();
    values
}

proptest! {
    #[test]
    fn values_convert_in_declared_order(text in ".*", number in any::<i64>(), flag in any::<bool>()) {
        let seen = deliver_triple(vec![json!(text), json!(number), json!(flag)]);

        prop_assert_eq!(seen, vec![(text, number, flag)]);
    }

    #[test]
    fn nulls_become_defaults(
        text in ".*",
        number in any::<i64>(),
        flag in any::<bool>(),
        nulls in prop::array::uniform3(any::<bool>()),
    ) {
        let raw = [json!(text), json!(number), json!(flag)];
        let args: Vec<Value> = raw
            .iter()
            .zip(nulls)
            .map(|(value, null)| if null { Value::Null } else { value.clone() })
            .collect();

        let seen = deliver_triple(args);

        let expected = (
            if nulls[0] { String::new() } else { text },
            if nulls[1] { 0 } else { number },
            if nulls[2] { false } else { flag },
        );
        prop_assert_eq!(seen, vec![expected]);
    }

    #[test]
    fn any_other_length_is_rejected(len in (0usize..8).prop_filter("declared arity", |n| *n != 3)) {
        let seen = deliver_triple(vec![json!(null); len]);

        prop_assert!(seen.is_empty());
    }
}
