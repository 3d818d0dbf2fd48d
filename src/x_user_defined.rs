// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::variant::*;
use crate::{CodecError, ErrorMode};

/// Offset between a high byte and its private use code point.
const PUA_OFFSET: u32 = 0xF700;

#[inline(always)]
fn decode_byte(b: u8) -> char {
    if b < 0x80 {
        return b as char;
    }
    // U+F780..=U+F7FF are all scalar values.
    std::char::from_u32(b as u32 + PUA_OFFSET).unwrap_or('\u{FFFD}')
}

pub struct UserDefinedDecoder;

impl UserDefinedDecoder {
    pub fn new() -> VariantDecoder {
        VariantDecoder::UserDefined(UserDefinedDecoder)
    }

    pub fn max_utf8_buffer_length(&self, byte_length: usize) -> usize {
        byte_length * 3
    }

    pub fn decode_to_string(&mut self, src: &[u8], dst: &mut String, _last: bool) {
        dst.reserve(self.max_utf8_buffer_length(src.len()));
        dst.extend(src.iter().map(|&b| decode_byte(b)));
    }
}

pub struct UserDefinedEncoder;

impl UserDefinedEncoder {
    pub fn new() -> VariantEncoder {
        VariantEncoder::UserDefined(UserDefinedEncoder)
    }

    pub fn max_buffer_length_from_utf8(&self, byte_length: usize) -> usize {
        byte_length
    }

    pub fn encode_to_vec(&mut self,
                         src: &str,
                         dst: &mut Vec<u8>,
                         _last: bool,
                         errors: ErrorMode)
                         -> Result<(), CodecError> {
        dst.reserve(self.max_buffer_length_from_utf8(src.len()));
        for c in src.chars() {
            if c <= '\u{7F}' {
                dst.push(c as u8);
                continue;
            }
            if c >= '\u{F780}' && c <= '\u{F7FF}' {
                dst.push((c as u32 - PUA_OFFSET) as u8);
                continue;
            }
            match errors {
                ErrorMode::Strict => return Err(CodecError::Unmappable(c)),
                ErrorMode::Replace => dst.push(b'?'),
                ErrorMode::Ignore => {}
            }
        }
        Ok(())
    }
}

// Any copyright to the test code below this comment is dedicated to the
// Public Domain. http://creativecommons.org/publicdomain/zero/1.0/
