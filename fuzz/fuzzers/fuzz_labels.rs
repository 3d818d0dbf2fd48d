#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate webcharset;
use webcharset::labels;

fuzz_target!(|data: &[u8]| {
    let label = String::from_utf8_lossy(data);
    if let Some(name) = labels::canonical_name(&label) {
        assert!(labels::is_canonical_name(name));
    }
});
