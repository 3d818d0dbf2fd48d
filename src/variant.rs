// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! This module provides enums that wrap the various decoders and encoders.
//! The set of codecs is finite (the `encoding_rs` ones plus the few that
//! are implemented here), so the dispatch is written out explicitly instead
//! of going through trait objects. That keeps `IncrementalDecoder` and
//! `IncrementalEncoder` `Sized` and free of extra allocations.

use crate::bom::Bom;
use crate::platform;
use crate::replacement::*;
use crate::utf_16::*;
use crate::x_user_defined::*;
use crate::{CodecError, ErrorMode};

/// The primitives behind an `Encoding`: one-shot decode and encode plus
/// constructors for incremental decoders and encoders.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Codec {
    /// Decoding and encoding both go through `encoding_rs`.
    Platform(&'static encoding_rs::Encoding),
    /// Decoding goes through `encoding_rs`; encoding is done here, because
    /// `encoding_rs` encodes UTF-16 as UTF-8.
    Utf16 { big_endian: bool },
    UserDefined,
    Replacement,
}

impl Codec {
    /// The codec a byte order mark switches decoding to.
    pub fn for_bom(bom: Bom) -> Codec {
        match bom {
            Bom::Utf8 => Codec::Platform(encoding_rs::UTF_8),
            Bom::Utf16Be => Codec::Utf16 { big_endian: true },
            Bom::Utf16Le => Codec::Utf16 { big_endian: false },
        }
    }

    /// A fresh decoder. BOM handling is not its business; the caller has
    /// already sniffed and stripped any BOM.
    pub fn new_decoder(self) -> VariantDecoder {
        match self {
            Codec::Platform(encoding) => {
                VariantDecoder::Platform(encoding.new_decoder_without_bom_handling())
            }
            Codec::Utf16 { big_endian: true } => {
                VariantDecoder::Platform(encoding_rs::UTF_16BE.new_decoder_without_bom_handling())
            }
            Codec::Utf16 { big_endian: false } => {
                VariantDecoder::Platform(encoding_rs::UTF_16LE.new_decoder_without_bom_handling())
            }
            Codec::UserDefined => UserDefinedDecoder::new(),
            Codec::Replacement => ReplacementDecoder::new(),
        }
    }

    pub fn new_encoder(self) -> VariantEncoder {
        match self {
            Codec::Platform(encoding) => VariantEncoder::Platform(encoding.new_encoder()),
            Codec::Utf16 { big_endian } => Utf16Encoder::new(big_endian),
            Codec::UserDefined => UserDefinedEncoder::new(),
            Codec::Replacement => ReplacementEncoder::new(),
        }
    }

    /// Decodes a complete input. No BOM sniffing.
    pub fn decode(self, src: &[u8], errors: ErrorMode) -> Result<String, CodecError> {
        let mut decoder = self.new_decoder();
        let mut dst = String::new();
        decoder.decode_to_string(src, &mut dst, true, errors)?;
        Ok(dst)
    }

    /// Encodes a complete input.
    pub fn encode(self, src: &str, errors: ErrorMode) -> Result<Vec<u8>, CodecError> {
        let mut encoder = self.new_encoder();
        let mut dst = Vec::new();
        encoder.encode_to_vec(src, &mut dst, true, errors)?;
        Ok(dst)
    }
}

pub enum VariantDecoder {
    Platform(encoding_rs::Decoder),
    UserDefined(UserDefinedDecoder),
    Replacement(ReplacementDecoder),
}

impl VariantDecoder {
    /// Decodes `src`, appending to `dst`. Partial sequences at the end of
    /// `src` are kept in the decoder unless `last` is set.
    pub fn decode_to_string(&mut self,
                            src: &[u8],
                            dst: &mut String,
                            last: bool,
                            errors: ErrorMode)
                            -> Result<(), CodecError> {
        match *self {
            VariantDecoder::Platform(ref mut d) => {
                platform::decode_to_string(d, src, dst, last, errors)
            }
            VariantDecoder::UserDefined(ref mut d) => {
                d.decode_to_string(src, dst, last);
                Ok(())
            }
            VariantDecoder::Replacement(ref mut d) => d.decode_to_string(src, dst, last),
        }
    }
}

pub enum VariantEncoder {
    Platform(encoding_rs::Encoder),
    Utf16(Utf16Encoder),
    UserDefined(UserDefinedEncoder),
    Replacement(ReplacementEncoder),
}

impl VariantEncoder {
    /// Encodes `src`, appending to `dst`.
    pub fn encode_to_vec(&mut self,
                         src: &str,
                         dst: &mut Vec<u8>,
                         last: bool,
                         errors: ErrorMode)
                         -> Result<(), CodecError> {
        match *self {
            VariantEncoder::Platform(ref mut e) => {
                platform::encode_to_vec(e, src, dst, last, errors)
            }
            VariantEncoder::Utf16(ref mut e) => {
                e.encode_to_vec(src, dst, last);
                Ok(())
            }
            VariantEncoder::UserDefined(ref mut e) => e.encode_to_vec(src, dst, last, errors),
            VariantEncoder::Replacement(ref mut e) => e.encode_to_vec(src, dst, last),
        }
    }
}
