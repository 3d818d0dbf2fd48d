// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::variant::*;

/// UTF-16 encoder. Rust strings never hold lone surrogates, so every
/// character is encodable and no error mode applies.
pub struct Utf16Encoder {
    big_endian: bool,
}

impl Utf16Encoder {
    pub fn new(big_endian: bool) -> VariantEncoder {
        VariantEncoder::Utf16(Utf16Encoder { big_endian })
    }

    pub fn max_buffer_length_from_utf8(&self, byte_length: usize) -> usize {
        // One UTF-8 byte becomes at most two bytes; a four-byte sequence
        // becomes a four-byte surrogate pair.
        byte_length * 2
    }

    pub fn encode_to_vec(&mut self, src: &str, dst: &mut Vec<u8>, _last: bool) {
        dst.reserve(self.max_buffer_length_from_utf8(src.len()));
        for unit in src.encode_utf16() {
            if self.big_endian {
                dst.extend_from_slice(&unit.to_be_bytes());
            } else {
                dst.extend_from_slice(&unit.to_le_bytes());
            }
        }
    }
}

// Any copyright to the test code below this comment is dedicated to the
// Public Domain. http://creativecommons.org/publicdomain/zero/1.0/
