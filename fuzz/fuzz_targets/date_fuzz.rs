//! Fuzz target for date formatting.
//!
//! Unparseable input must come back unchanged; nothing may panic.
//!
//! Run with: cargo +nightly fuzz run date_fuzz -- -max_total_time=60

#![no_main]

use certus_render::{ChronoDateFormatter, DateFormatter};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let formatter = ChronoDateFormatter::default();
        let date = formatter.format_date(input);
        let datetime = formatter.format_datetime(input);
        assert_eq!(date.is_empty(), input.is_empty());
        assert_eq!(datetime.is_empty(), input.is_empty());
    }
});
