#![no_main]

use libfuzzer_sys::fuzz_target;
use lonko_content::markup::{contains_tag, strip_markup};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let stripped = strip_markup(text);
    if !text.contains('&') && !contains_tag(text) {
        assert_eq!(stripped, text);
    }
});
