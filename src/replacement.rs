// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The replacement encoding stands for labels of encodings that must not
//! be decoded at all (ISO-2022-KR, HZ-GB-2312 and the like). Every call
//! fails, empty or not, in every error mode.

use crate::variant::*;
use crate::CodecError;

pub struct ReplacementDecoder;

impl ReplacementDecoder {
    pub fn new() -> VariantDecoder {
        VariantDecoder::Replacement(ReplacementDecoder)
    }

    pub fn decode_to_string(&mut self,
                            _src: &[u8],
                            _dst: &mut String,
                            _last: bool)
                            -> Result<(), CodecError> {
        Err(CodecError::Replacement)
    }
}

pub struct ReplacementEncoder;

impl ReplacementEncoder {
    pub fn new() -> VariantEncoder {
        VariantEncoder::Replacement(ReplacementEncoder)
    }

    pub fn encode_to_vec(&mut self,
                         _src: &str,
                         _dst: &mut Vec<u8>,
                         _last: bool)
                         -> Result<(), CodecError> {
        Err(CodecError::Replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::super::*;

    fn assert_replacement_error<T: std::fmt::Debug>(result: Result<T, Error>) {
        assert_eq!(result.unwrap_err(),
                   Error::Codec {
                       encoding: "replacement",
                       source: CodecError::Replacement,
                   });
    }

    #[test]
    fn test_replacement_decode() {
        let registry = Registry::new();
        for &mode in &[ErrorMode::Strict, ErrorMode::Replace, ErrorMode::Ignore] {
            assert_replacement_error(registry.decode(b"", "replacement", mode));
            assert_replacement_error(registry.decode(b"A", "iso-2022-kr", mode));
            assert_replacement_error(registry.decode(b"AB", "hz-gb-2312", mode));
        }
    }

    #[test]
    fn test_replacement_encode() {
        let registry = Registry::new();
        assert_replacement_error(registry.encode("", "replacement", ErrorMode::Replace));
        assert_replacement_error(registry.encode("A", "csiso2022kr", ErrorMode::Strict));
    }

    #[test]
    fn test_replacement_bom_wins() {
        // A BOM switches away from the fallback before it gets to fail.
        let registry = Registry::new();
        assert_eq!(registry.decode(b"\xEF\xBB\xBFA", "replacement", ErrorMode::Strict),
                   Ok("A".to_string()));
    }

    #[test]
    fn test_replacement_incremental() {
        let registry = Registry::new();
        let mut encoder = registry.make_incremental_encoder("replacement", ErrorMode::Strict)
            .unwrap();
        assert_replacement_error(encoder.encode("", false));
        assert_replacement_error(encoder.encode("", true));

        let mut decoder = registry.make_incremental_decoder("replacement", ErrorMode::Strict)
            .unwrap();
        // Still sniffing for a BOM, so the codec hasn't been reached.
        assert_eq!(decoder.decode(b"", false), Ok(String::new()));
        assert_replacement_error(decoder.decode(b"abc", false));
        assert_replacement_error(decoder.decode(b"", false));
        assert_replacement_error(decoder.decode(b"", true));
    }
}
