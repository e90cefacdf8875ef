#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Pattern matching must not panic for any node name, and any
        // reported match must reconstruct a substring of the input
        if let Some(parsed) = agrupa::parse_cluster_name(input) {
            let matched = format!("{}{}", parsed.prefix, parsed.suffix);
            assert!(input.contains(&matched));
        }
    }
});
