#![no_main]

use libfuzzer_sys::fuzz_target;
use site_content_core::sanitizer::sanitize;

fuzz_target!(|data: &[u8]| {
    let html = String::from_utf8_lossy(data);
    let output = sanitize(html.as_ref());
    let _ = sanitize(output.as_str());
});
