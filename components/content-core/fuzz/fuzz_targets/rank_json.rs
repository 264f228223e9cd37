#![no_main]

use libfuzzer_sys::fuzz_target;
use serde_json::Value;
use site_content_core::rank_related_json;

fuzz_target!(|data: &[u8]| {
    let Ok(payload) = serde_json::from_slice::<Value>(data) else {
        return;
    };

    let current = payload.get(0).cloned().unwrap_or(Value::Null);
    let related = rank_related_json(&payload, &current, 3);
    assert!(related.len() <= 3);
});
