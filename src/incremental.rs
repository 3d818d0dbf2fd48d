// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Push-based transcoding.

use std::mem;

use crate::bom::{self, Sniff};
use crate::variant::*;
use crate::{Codec, Error, ErrorMode};

enum Phase {
    /// No decision about a BOM yet. Holds everything received so far.
    Buffering(Vec<u8>),
    /// The decoder is fixed for the rest of the stream.
    Resolved {
        name: &'static str,
        codec: Codec,
        decoder: VariantDecoder,
    },
}

/// A decoder that is fed one chunk of bytes at a time.
///
/// Until it has seen three bytes (or `last` is set) the decoder only
/// buffers, because a BOM may still turn up. Once it has decided between
/// the BOM's encoding and the fallback, that choice is final and all
/// buffered bytes are decoded at once.
///
/// Multi-byte sequences split across chunks are held back until they are
/// complete. Pass `last = true` on the final call to flush them; calling
/// again with empty input and `last = true` is harmless. Input given after
/// a final call is decoded as a new stream in the same encoding, without
/// looking for a BOM again.
///
/// Not meant for concurrent use: each stream gets its own decoder.
pub struct IncrementalDecoder {
    fallback_name: &'static str,
    fallback: Codec,
    errors: ErrorMode,
    phase: Phase,
}

impl IncrementalDecoder {
    pub(crate) fn new(fallback_name: &'static str,
                      fallback: Codec,
                      errors: ErrorMode)
                      -> IncrementalDecoder {
        IncrementalDecoder {
            fallback_name,
            fallback,
            errors,
            phase: Phase::Buffering(Vec::new()),
        }
    }

    /// The canonical name of the encoding in use, or `None` while still
    /// waiting for enough bytes to rule a BOM in or out.
    pub fn encoding_name(&self) -> Option<&'static str> {
        match self.phase {
            Phase::Buffering(_) => None,
            Phase::Resolved { name, .. } => Some(name),
        }
    }

    pub fn decode(&mut self, input: &[u8], last: bool) -> Result<String, Error> {
        let mut output = String::new();
        let errors = self.errors;
        let buffered = match self.phase {
            Phase::Resolved { name, codec, ref mut decoder } => {
                let result = decoder.decode_to_string(input, &mut output, last, errors);
                if last {
                    // A finished decoder must not be fed again.
                    *decoder = codec.new_decoder();
                }
                result.map_err(|source| Error::codec(name, source))?;
                return Ok(output);
            }
            Phase::Buffering(ref mut buffer) => {
                buffer.extend_from_slice(input);
                mem::take(buffer)
            }
        };
        let (name, codec, bom_length) = match bom::sniff(&buffered, last) {
            Sniff::Pending => {
                self.phase = Phase::Buffering(buffered);
                return Ok(output);
            }
            Sniff::Bom(found) => {
                debug!("{:?} BOM overrides {}", found, self.fallback_name);
                (found.name(), Codec::for_bom(found), found.len())
            }
            Sniff::NoBom => (self.fallback_name, self.fallback, 0),
        };
        let mut decoder = codec.new_decoder();
        let result = decoder.decode_to_string(&buffered[bom_length..], &mut output, last, errors);
        if last {
            decoder = codec.new_decoder();
        }
        self.phase = Phase::Resolved {
            name,
            codec,
            decoder,
        };
        result.map_err(|source| Error::codec(name, source))?;
        Ok(output)
    }
}

/// An encoder that is fed one chunk of text at a time. There is no BOM
/// handling and nothing is buffered here.
pub struct IncrementalEncoder {
    name: &'static str,
    encoder: VariantEncoder,
    errors: ErrorMode,
}

impl IncrementalEncoder {
    pub(crate) fn new(name: &'static str, codec: Codec, errors: ErrorMode) -> IncrementalEncoder {
        IncrementalEncoder {
            name,
            encoder: codec.new_encoder(),
            errors,
        }
    }

    pub fn encoding_name(&self) -> &'static str {
        self.name
    }

    pub fn encode(&mut self, input: &str, last: bool) -> Result<Vec<u8>, Error> {
        let mut output = Vec::new();
        self.encoder
            .encode_to_vec(input, &mut output, last, self.errors)
            .map_err(|source| Error::codec(self.name, source))?;
        Ok(output)
    }
}

// Any copyright to the test code below this comment is dedicated to the
// Public Domain. http://creativecommons.org/publicdomain/zero/1.0/
