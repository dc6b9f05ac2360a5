#![no_main]

use libfuzzer_sys::fuzz_target;
use pricebook::core::parse_reference;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; a parsed number must format back under the same label.
        for label in ["2025", "2024/2025"] {
            if let Some(n) = parse_reference(s, label) {
                let again = format!("{n:03}/{label}");
                assert_eq!(parse_reference(&again, label), Some(n));
            }
        }
    }
});
