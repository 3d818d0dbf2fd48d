// Copyright 2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use super::*;

pub fn decode_with_codec(codec: Codec, bytes: &[u8], expect: &str) {
    assert_eq!(codec.decode(bytes, ErrorMode::Strict).as_ref().map(String::as_str),
               Ok(expect));
    // Same thing one byte at a time.
    let mut decoder = codec.new_decoder();
    let mut dest = String::new();
    for byte in bytes.chunks(1) {
        decoder.decode_to_string(byte, &mut dest, false, ErrorMode::Strict).unwrap();
    }
    decoder.decode_to_string(b"", &mut dest, true, ErrorMode::Strict).unwrap();
    assert_eq!(&dest[..], expect);
}

pub fn encode_with_codec(codec: Codec, string: &str, expect: &[u8]) {
    assert_eq!(codec.encode(string, ErrorMode::Strict).as_ref().map(Vec::as_slice),
               Ok(expect));
    let mut encoder = codec.new_encoder();
    let mut dest = Vec::new();
    for c in string.chars() {
        let mut buf = [0u8; 4];
        encoder.encode_to_vec(c.encode_utf8(&mut buf), &mut dest, false, ErrorMode::Strict)
            .unwrap();
    }
    encoder.encode_to_vec("", &mut dest, true, ErrorMode::Strict).unwrap();
    assert_eq!(&dest[..], expect);
}

/// Splits `bytes` into two chunks at every possible point and checks that
/// both the push and the pull decoder agree with one-shot decoding.
pub fn decode_with_every_split(label: &str, bytes: &[u8], expect: &str) {
    let registry = Registry::new();
    assert_eq!(registry.decode(bytes, label, ErrorMode::Replace).unwrap(), expect);
    for split in 0..=bytes.len() {
        let (head, tail) = bytes.split_at(split);

        let mut decoder = registry.make_incremental_decoder(label, ErrorMode::Replace).unwrap();
        let mut output = decoder.decode(head, false).unwrap();
        output.push_str(&decoder.decode(tail, false).unwrap());
        output.push_str(&decoder.decode(b"", true).unwrap());
        assert_eq!(output, expect, "split at {}", split);

        let output: String = registry.iter_decode(vec![head, tail], label, ErrorMode::Replace)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(output, expect, "split at {}", split);
    }
}
