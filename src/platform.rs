// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Codecs backed by `encoding_rs`, and the error handling modes layered
//! over its decoder and encoder.

use encoding_rs::{CoderResult, Decoder, DecoderResult, Encoder, EncoderResult};

use crate::{Codec, CodecError, Error, ErrorMode};

/// Growth used when `encoding_rs` cannot give a worst-case bound.
const MIN_GROWTH: usize = 16;

/// Supplies the codec for a canonical name.
///
/// `Registry` calls `resolve()` at most once per name. The names passed in
/// are always from `labels::NAMES`, excluding `x-user-defined` and
/// `replacement`.
///
/// `resolve()` runs with the registry's cache lock held, and that lock is
/// not reentrant: a provider must not call back into the `Registry` that
/// owns it, or it deadlocks. A failed `resolve()` is not cached, so the
/// next use of the name asks again.
pub trait CodecProvider: Send + Sync {
    fn resolve(&self, name: &'static str) -> Result<Codec, Error>;
}

/// The default provider: every encoding of the standard via `encoding_rs`.
#[derive(Debug, Default, Copy, Clone)]
pub struct PlatformCodecs;

impl CodecProvider for PlatformCodecs {
    fn resolve(&self, name: &'static str) -> Result<Codec, Error> {
        match name {
            "utf-16be" => Ok(Codec::Utf16 { big_endian: true }),
            "utf-16le" => Ok(Codec::Utf16 { big_endian: false }),
            _ => encoding_rs::Encoding::for_label_no_replacement(name.as_bytes())
                // Anything whose encoder would write a different encoding
                // can't round-trip.
                .filter(|encoding| encoding.output_encoding() == *encoding)
                .map(Codec::Platform)
                .ok_or_else(|| Error::UnsupportedEncoding(name.to_string())),
        }
    }
}

fn grow_string(dst: &mut String) {
    let additional = dst.capacity().max(MIN_GROWTH);
    dst.reserve(additional);
}

fn grow_vec(dst: &mut Vec<u8>) {
    let additional = dst.capacity().max(MIN_GROWTH);
    dst.reserve(additional);
}

pub fn decode_to_string(decoder: &mut Decoder,
                        mut src: &[u8],
                        dst: &mut String,
                        last: bool,
                        errors: ErrorMode)
                        -> Result<(), CodecError> {
    let worst_case = match errors {
        ErrorMode::Replace => decoder.max_utf8_buffer_length(src.len()),
        ErrorMode::Strict | ErrorMode::Ignore => {
            decoder.max_utf8_buffer_length_without_replacement(src.len())
        }
    };
    dst.reserve(worst_case.unwrap_or(MIN_GROWTH));
    loop {
        if errors == ErrorMode::Replace {
            let (result, read, _) = decoder.decode_to_string(src, dst, last);
            src = &src[read..];
            match result {
                CoderResult::InputEmpty => return Ok(()),
                CoderResult::OutputFull => grow_string(dst),
            }
            continue;
        }
        let (result, read) = decoder.decode_to_string_without_replacement(src, dst, last);
        src = &src[read..];
        match result {
            DecoderResult::InputEmpty => return Ok(()),
            DecoderResult::OutputFull => grow_string(dst),
            DecoderResult::Malformed(length, _) => {
                if errors == ErrorMode::Strict {
                    return Err(CodecError::Malformed { length: length as usize });
                }
            }
        }
    }
}

pub fn encode_to_vec(encoder: &mut Encoder,
                     mut src: &str,
                     dst: &mut Vec<u8>,
                     last: bool,
                     errors: ErrorMode)
                     -> Result<(), CodecError> {
    let worst_case = encoder.max_buffer_length_from_utf8_without_replacement(src.len());
    dst.reserve(worst_case.unwrap_or(MIN_GROWTH));
    loop {
        let (result, read) = encoder.encode_from_utf8_to_vec_without_replacement(src, dst, last);
        src = &src[read..];
        match result {
            EncoderResult::InputEmpty => return Ok(()),
            EncoderResult::OutputFull => grow_vec(dst),
            EncoderResult::Unmappable(c) => {
                match errors {
                    ErrorMode::Strict => return Err(CodecError::Unmappable(c)),
                    // Goes through the encoder so that a stateful encoder
                    // (ISO-2022-JP) switches back to ASCII first.
                    ErrorMode::Replace => encode_to_vec(encoder, "?", dst, false, ErrorMode::Strict)?,
                    ErrorMode::Ignore => {}
                }
            }
        }
    }
}

// Any copyright to the test code below this comment is dedicated to the
// Public Domain. http://creativecommons.org/publicdomain/zero/1.0/
