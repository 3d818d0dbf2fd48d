// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#![no_main]
#[macro_use]
extern crate libfuzzer_sys;
extern crate webcharset;

use webcharset::labels::NAMES;
use webcharset::{ErrorMode, Registry};

fuzz_target!(|data: &[u8]| {
    // First byte picks the encoding, second the chunk size.
    if data.len() < 2 {
        return;
    }
    let name = NAMES[data[0] as usize % NAMES.len()];
    if name == "replacement" {
        return;
    }
    let chunk_size = (data[1] as usize % 8) + 1;
    let input = &data[2..];

    let registry = Registry::new();
    let whole = registry.decode(input, name, ErrorMode::Replace).unwrap();
    let mut decoder = registry.make_incremental_decoder(name, ErrorMode::Replace).unwrap();
    let mut pieces = String::new();
    for chunk in input.chunks(chunk_size) {
        pieces.push_str(&decoder.decode(chunk, false).unwrap());
    }
    pieces.push_str(&decoder.decode(b"", true).unwrap());
    assert_eq!(whole, pieces);
    assert_eq!(decoder.decode(b"", true).unwrap(), "");

    let mut encoder = registry.make_incremental_encoder(name, ErrorMode::Replace).unwrap();
    let mut bytes = Vec::new();
    for c in whole.chars() {
        let mut buf = [0u8; 4];
        bytes.extend(encoder.encode(c.encode_utf8(&mut buf), false).unwrap());
    }
    bytes.extend(encoder.encode("", true).unwrap());
    assert_eq!(bytes, registry.encode(&whole, name, ErrorMode::Replace).unwrap());
});
