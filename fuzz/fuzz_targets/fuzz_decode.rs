#![no_main]

use libfuzzer_sys::fuzz_target;
use shapeio::core::dfs::decode;
use shapeio::core::volume::ScalarVolume;

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must surface as an error, never a panic
    let _ = decode(data);
    let _ = ScalarVolume::from_bytes(data);
});
