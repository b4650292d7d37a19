//! Fingerprint fuzzer.
//!
//! Feeds arbitrary bytes through the fingerprint invariant checks: cached and
//! uncached results agree, fingerprints are trimmed, and incidental whitespace
//! never changes the outcome. Non-UTF-8 input is skipped.

use honggfuzz::fuzz;
use sql_fingerprint_rs::testing::test_fingerprint;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            test_fingerprint(data);
        });
    }
}
