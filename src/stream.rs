// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pull-based transcoding on top of the incremental objects.

use std::iter::FusedIterator;

use crate::{Error, IncrementalDecoder, IncrementalEncoder};

/// Iterator returned by `iter_decode()`.
///
/// Each input chunk is fed to an `IncrementalDecoder`; empty outputs are
/// skipped. Once the input runs out the decoder is flushed exactly once.
/// After an error or the flush the iterator returns `None` forever.
pub struct IterDecode<I> {
    input: I,
    decoder: IncrementalDecoder,
    done: bool,
}

impl<I> IterDecode<I> {
    pub(crate) fn new(input: I, decoder: IncrementalDecoder) -> IterDecode<I> {
        IterDecode {
            input,
            decoder,
            done: false,
        }
    }
}

impl<I> Iterator for IterDecode<I>
    where I: Iterator,
          I::Item: AsRef<[u8]>
{
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for chunk in self.input.by_ref() {
            match self.decoder.decode(chunk.as_ref(), false) {
                Ok(ref output) if output.is_empty() => continue,
                Ok(output) => return Some(Ok(output)),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        self.done = true;
        match self.decoder.decode(b"", true) {
            Ok(ref output) if output.is_empty() => None,
            result => Some(result),
        }
    }
}

impl<I> FusedIterator for IterDecode<I>
    where I: Iterator,
          I::Item: AsRef<[u8]>
{}

/// Iterator returned by `iter_encode()`. Same shape as `IterDecode`.
pub struct IterEncode<I> {
    input: I,
    encoder: IncrementalEncoder,
    done: bool,
}

impl<I> IterEncode<I> {
    pub(crate) fn new(input: I, encoder: IncrementalEncoder) -> IterEncode<I> {
        IterEncode {
            input,
            encoder,
            done: false,
        }
    }
}

impl<I> Iterator for IterEncode<I>
    where I: Iterator,
          I::Item: AsRef<str>
{
    type Item = Result<Vec<u8>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for chunk in self.input.by_ref() {
            match self.encoder.encode(chunk.as_ref(), false) {
                Ok(ref output) if output.is_empty() => continue,
                Ok(output) => return Some(Ok(output)),
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        self.done = true;
        match self.encoder.encode("", true) {
            Ok(ref output) if output.is_empty() => None,
            result => Some(result),
        }
    }
}

impl<I> FusedIterator for IterEncode<I>
    where I: Iterator,
          I::Item: AsRef<str>
{}

// Any copyright to the test code below this comment is dedicated to the
// Public Domain. http://creativecommons.org/publicdomain/zero/1.0/

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_iter_decode_skips_empty_output() {
        let registry = Registry::new();
        let chunks: Vec<&[u8]> = vec![b"", b"\xEF", b"", b"", b"\xBB\xBF\xC3", b"\xA9"];
        let output: Vec<String> = registry.iter_decode(chunks, "latin1", ErrorMode::Replace)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(output, vec!["\u{E9}".to_string()]);
    }

    #[test]
    fn test_iter_decode_flushes_once() {
        let registry = Registry::new();
        let mut iter = registry.iter_decode(vec![&b"ab\xE2\x98"[..]], "utf-8", ErrorMode::Replace)
            .unwrap();
        assert_eq!(iter.next(), Some(Ok("ab".to_string())));
        assert_eq!(iter.next(), Some(Ok("\u{FFFD}".to_string())));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_iter_decode_short_input_flush() {
        // Never reaches three bytes, so everything comes out of the flush.
        let registry = Registry::new();
        let output: Vec<String> = registry.iter_decode(vec!["a", "b"], "ascii", ErrorMode::Strict)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(output, vec!["ab".to_string()]);
    }

    #[test]
    fn test_iter_decode_empty_input() {
        let registry = Registry::new();
        let chunks: Vec<Vec<u8>> = Vec::new();
        let mut iter = registry.iter_decode(chunks, "utf-8", ErrorMode::Strict).unwrap();
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_iter_decode_unknown_label_is_eager() {
        let registry = Registry::new();
        let chunks: Vec<Vec<u8>> = Vec::new();
        assert_eq!(registry.iter_decode(chunks, "nonsense", ErrorMode::Strict).err(),
                   Some(Error::UnknownLabel("nonsense".to_string())));
        let chunks: Vec<String> = Vec::new();
        assert_eq!(registry.iter_encode(chunks, "nonsense", ErrorMode::Strict).err(),
                   Some(Error::UnknownLabel("nonsense".to_string())));
    }

    #[test]
    fn test_iter_decode_fuses_after_error() {
        let registry = Registry::new();
        let chunks: Vec<&[u8]> = vec![b"abc", b"\xFF", b"def"];
        let mut iter = registry.iter_decode(chunks, "utf-8", ErrorMode::Strict).unwrap();
        assert_eq!(iter.next(), Some(Ok("abc".to_string())));
        assert!(iter.next().unwrap().is_err());
        assert_eq!(iter.next(), None);
    }

    #[test]
    fn test_iter_decode_lazy_input() {
        let registry = Registry::new();
        let chunks = std::iter::repeat(&b"abc"[..]);
        let output: Vec<String> = registry.iter_decode(chunks, "utf-8", ErrorMode::Strict)
            .unwrap()
            .take(3)
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(output.concat(), "abcabcabc");
    }

    #[test]
    fn test_iter_encode() {
        let registry = Registry::new();
        let output: Vec<Vec<u8>> = registry.iter_encode(vec!["", "caf", "\u{E9}", ""],
                                                      "latin1",
                                                      ErrorMode::Strict)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(output, vec![b"caf".to_vec(), b"\xE9".to_vec()]);
    }

    #[test]
    fn test_iter_encode_flush() {
        let registry = Registry::new();
        let output: Vec<Vec<u8>> = registry.iter_encode(vec!["\u{3042}"],
                                                      "iso-2022-jp",
                                                      ErrorMode::Strict)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(output, vec![b"\x1B$B$\"".to_vec(), b"\x1B(B".to_vec()]);
    }

    #[test]
    fn test_iter_encode_error() {
        let registry = Registry::new();
        let encoding = registry.get_encoding("ascii").unwrap();
        let mut iter = encoding.iter_encode(vec!["a", "\u{2603}", "b"], ErrorMode::Strict);
        assert_eq!(iter.next(), Some(Ok(b"a".to_vec())));
        assert_eq!(iter.next(),
                   Some(Err(Error::Codec {
                       encoding: "windows-1252",
                       source: CodecError::Unmappable('\u{2603}'),
                   })));
        assert_eq!(iter.next(), None);
    }
}
