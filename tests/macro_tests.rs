//! Tests for the `trial_test!` macro (feature `macros`).

#![cfg(feature = "macros")]

use std::time::Duration;

time_trial::trial_test!(summation_meets_target {
    runs: 20,
    target: Duration::from_millis(250),
    routine: || std::hint::black_box((0..500u64).sum::<u64>()),
});

time_trial::trial_test!(default_run_count_meets_target {
    target: Duration::from_millis(500),
    routine: || std::hint::black_box(17u64 * 3),
});
