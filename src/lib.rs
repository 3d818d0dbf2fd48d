// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! webcharset resolves encoding labels as found in protocol text (HTTP
//! `Content-Type` parameters, `<meta charset>`, XML declarations) to the
//! encodings of the [Encoding Standard][1] and transcodes with them.
//!
//! Decoding follows the standard's _decode_ algorithm: a UTF-8 or UTF-16
//! byte order mark at the start of the input takes precedence over the
//! declared (fallback) encoding. Encoding never writes a BOM.
//!
//! The byte-level conversion tables come from [`encoding_rs`][2]. This crate
//! adds the label table, the BOM precedence rule, error handling modes and
//! streaming wrappers on top.
//!
//! # Availability
//!
//! There are three ways to transcode:
//!
//!  * One-shot: `Encoding::decode()` and `Encoding::encode()`.
//!  * Pull: `Encoding::iter_decode()` and `Encoding::iter_encode()` wrap an
//!    iterator of input chunks into an iterator of output chunks.
//!  * Push: `Encoding::make_incremental_decoder()` and
//!    `Encoding::make_incremental_encoder()` return objects that are fed one
//!    chunk at a time.
//!
//! `Registry` offers the same operations taking either a label or an
//! already-resolved `Encoding`, and caches one `Encoding` per canonical
//! name.
//!
//! ```
//! use webcharset::{ErrorMode, Registry};
//!
//! let registry = Registry::new();
//! let text = registry.decode(b"caf\xE9", "latin1", ErrorMode::Replace)?;
//! assert_eq!(text, "caf\u{E9}");
//!
//! // The BOM wins over the declared encoding.
//! let text = registry.decode(b"\xEF\xBB\xBFcaf\xC3\xA9", "latin1", ErrorMode::Replace)?;
//! assert_eq!(text, "caf\u{E9}");
//! # Ok::<(), webcharset::Error>(())
//! ```
//!
//! [1]: https://encoding.spec.whatwg.org/
//! [2]: https://crates.io/crates/encoding_rs

#[macro_use]
extern crate log;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize, Serializer};

pub mod bom;
mod incremental;
pub mod labels;
mod platform;
mod replacement;
mod stream;
mod utf_16;
mod variant;
mod x_user_defined;

#[cfg(test)]
mod testing;

pub use crate::incremental::{IncrementalDecoder, IncrementalEncoder};
pub use crate::platform::{CodecProvider, PlatformCodecs};
pub use crate::stream::{IterDecode, IterEncode};
pub use crate::variant::Codec;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// What to do about a malformed byte sequence (when decoding) or an
/// unmappable character (when encoding).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ErrorMode {
    /// Fail with `Error::Codec`.
    Strict,
    /// Substitute U+FFFD when decoding or `?` when encoding.
    Replace,
    /// Drop the offending input.
    Ignore,
}

impl ErrorMode {
    /// The customary mode for decoding: bytes from outside are untrusted,
    /// so errors are replaced rather than fatal.
    pub const DECODE_DEFAULT: ErrorMode = ErrorMode::Replace;

    /// The customary mode for encoding.
    pub const ENCODE_DEFAULT: ErrorMode = ErrorMode::Strict;

    pub fn as_str(self) -> &'static str {
        match self {
            ErrorMode::Strict => "strict",
            ErrorMode::Replace => "replace",
            ErrorMode::Ignore => "ignore",
        }
    }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<ErrorMode, Error> {
        match s {
            "strict" => Ok(ErrorMode::Strict),
            "replace" => Ok(ErrorMode::Replace),
            "ignore" => Ok(ErrorMode::Ignore),
            _ => Err(Error::UnknownErrorMode(s.to_string())),
        }
    }
}

/// A transcoding failure reported by a codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Strict decoding hit a malformed byte sequence of `length` bytes.
    #[error("malformed byte sequence of length {length}")]
    Malformed { length: usize },

    /// Strict encoding hit a character the encoding cannot represent.
    #[error("unmappable character {0:?}")]
    Unmappable(char),

    /// The replacement encoding refuses all transcoding.
    #[error("the replacement encoding cannot be transcoded")]
    Replacement,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The label doesn't name an encoding. Raised before any input is
    /// looked at.
    #[error("unknown encoding label {0:?}")]
    UnknownLabel(String),

    #[error("{encoding}: {source}")]
    Codec {
        encoding: &'static str,
        #[source]
        source: CodecError,
    },

    /// The codec provider has no codec for a name in the label table.
    #[error("no codec available for encoding {0:?}")]
    UnsupportedEncoding(String),

    #[error("unknown error handling mode {0:?}")]
    UnknownErrorMode(String),
}

impl Error {
    pub(crate) fn codec(encoding: &'static str, source: CodecError) -> Error {
        Error::Codec { encoding, source }
    }
}

/// An encoding of the Encoding Standard, identified by its canonical name.
///
/// Instances are created by a `Registry` and shared as `Arc<Encoding>`.
/// They are immutable.
#[derive(Debug, Clone)]
pub struct Encoding {
    name: &'static str,
    codec: Codec,
}

impl Encoding {
    pub(crate) fn new(name: &'static str, codec: Codec) -> Encoding {
        Encoding { name, codec }
    }

    /// The canonical (lowercase) name, e.g. `"windows-1252"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The codec backing this encoding.
    pub fn codec(&self) -> Codec {
        self.codec
    }

    /// Decodes `input` in one go.
    ///
    /// A UTF-8 or UTF-16 BOM at the start of `input` overrides this
    /// encoding. The BOM itself is not part of the output.
    pub fn decode(&self, input: &[u8], errors: ErrorMode) -> Result<String, Error> {
        let (name, codec, bom_length) = match bom::sniff(input, true) {
            bom::Sniff::Bom(found) => {
                debug!("{:?} BOM overrides {}", found, self.name);
                (found.name(), Codec::for_bom(found), found.len())
            }
            _ => (self.name, self.codec, 0),
        };
        codec
            .decode(&input[bom_length..], errors)
            .map_err(|source| Error::codec(name, source))
    }

    /// Encodes `input` in one go. No BOM is written.
    pub fn encode(&self, input: &str, errors: ErrorMode) -> Result<Vec<u8>, Error> {
        self.codec
            .encode(input, errors)
            .map_err(|source| Error::codec(self.name, source))
    }

    /// Pull-based decoding of a sequence of byte chunks.
    pub fn iter_decode<I>(&self, input: I, errors: ErrorMode) -> IterDecode<I::IntoIter>
        where I: IntoIterator,
              I::Item: AsRef<[u8]>
    {
        IterDecode::new(input.into_iter(), self.make_incremental_decoder(errors))
    }

    /// Pull-based encoding of a sequence of text chunks.
    pub fn iter_encode<I>(&self, input: I, errors: ErrorMode) -> IterEncode<I::IntoIter>
        where I: IntoIterator,
              I::Item: AsRef<str>
    {
        IterEncode::new(input.into_iter(), self.make_incremental_encoder(errors))
    }

    /// Push-based decoding with this encoding as the fallback.
    pub fn make_incremental_decoder(&self, errors: ErrorMode) -> IncrementalDecoder {
        IncrementalDecoder::new(self.name, self.codec, errors)
    }

    /// Push-based encoding.
    pub fn make_incremental_encoder(&self, errors: ErrorMode) -> IncrementalEncoder {
        IncrementalEncoder::new(self.name, self.codec, errors)
    }
}

impl PartialEq for Encoding {
    fn eq(&self, other: &Encoding) -> bool {
        self.name == other.name
    }
}

impl Eq for Encoding {}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Encoding {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where S: Serializer
    {
        serializer.serialize_str(self.name)
    }
}

/// Either an already-resolved encoding or a label still to be resolved.
///
/// All `Registry` transcoding methods take `Into<EncodingOrLabel>`, so both
/// `"latin1"` and an `Arc<Encoding>` can be passed.
#[derive(Debug, Clone)]
pub enum EncodingOrLabel<'a> {
    Encoding(Arc<Encoding>),
    Label(&'a str),
}

impl<'a> From<&'a str> for EncodingOrLabel<'a> {
    fn from(label: &'a str) -> EncodingOrLabel<'a> {
        EncodingOrLabel::Label(label)
    }
}

impl<'a> From<&'a String> for EncodingOrLabel<'a> {
    fn from(label: &'a String) -> EncodingOrLabel<'a> {
        EncodingOrLabel::Label(label)
    }
}

impl<'a> From<Arc<Encoding>> for EncodingOrLabel<'a> {
    fn from(encoding: Arc<Encoding>) -> EncodingOrLabel<'a> {
        EncodingOrLabel::Encoding(encoding)
    }
}

impl<'a> From<&'a Arc<Encoding>> for EncodingOrLabel<'a> {
    fn from(encoding: &'a Arc<Encoding>) -> EncodingOrLabel<'a> {
        EncodingOrLabel::Encoding(Arc::clone(encoding))
    }
}

/// Resolves labels and owns the `Encoding` instances.
///
/// Each canonical name is handed to the `CodecProvider` at most once; later
/// lookups of any label of the same encoding return the same `Arc`.
/// `x-user-defined` and `replacement` are built in and never reach the
/// provider.
pub struct Registry {
    provider: Box<dyn CodecProvider>,
    cache: Mutex<HashMap<&'static str, Arc<Encoding>>>,
}

impl Registry {
    /// A registry backed by `encoding_rs`.
    pub fn new() -> Registry {
        Registry::with_provider(PlatformCodecs)
    }

    pub fn with_provider<P>(provider: P) -> Registry
        where P: CodecProvider + 'static
    {
        Registry {
            provider: Box::new(provider),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Implements the
    /// [_get an encoding_](https://encoding.spec.whatwg.org/#concept-encoding-get)
    /// algorithm.
    ///
    /// Returns `None` for a label that isn't in the table. Never fails.
    pub fn lookup(&self, label: &str) -> Option<Arc<Encoding>> {
        let name = labels::canonical_name(label)?;
        match self.encoding_for_name(name) {
            Ok(encoding) => Some(encoding),
            Err(err) => {
                warn!("label {:?} resolves to {} but {}", label, name, err);
                None
            }
        }
    }

    /// Like `lookup()`, but an unknown label is an `Error::UnknownLabel`.
    /// An `Encoding` is returned unchanged.
    pub fn get_encoding<'a, E>(&self, encoding: E) -> Result<Arc<Encoding>, Error>
        where E: Into<EncodingOrLabel<'a>>
    {
        match encoding.into() {
            EncodingOrLabel::Encoding(encoding) => Ok(encoding),
            EncodingOrLabel::Label(label) => {
                let name = labels::canonical_name(label)
                    .ok_or_else(|| Error::UnknownLabel(label.to_string()))?;
                self.encoding_for_name(name)
            }
        }
    }

    /// The canonical names constructed so far.
    pub fn cached_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.cache.lock().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    fn encoding_for_name(&self, name: &'static str) -> Result<Arc<Encoding>, Error> {
        // The lock is held across the provider call so that concurrent
        // first uses don't construct twice.
        let mut cache = self.cache.lock();
        if let Some(encoding) = cache.get(name) {
            return Ok(Arc::clone(encoding));
        }
        let codec = match name {
            "x-user-defined" => Codec::UserDefined,
            "replacement" => Codec::Replacement,
            _ => self.provider.resolve(name)?,
        };
        trace!("constructing encoding {} with {:?}", name, codec);
        let encoding = Arc::new(Encoding::new(name, codec));
        cache.insert(name, Arc::clone(&encoding));
        Ok(encoding)
    }

    /// Decodes `input` with BOM sniffing; `fallback` is used when there's
    /// no BOM. The label is checked before the input is looked at.
    pub fn decode<'a, E>(&self,
                         input: &[u8],
                         fallback: E,
                         errors: ErrorMode)
                         -> Result<String, Error>
        where E: Into<EncodingOrLabel<'a>>
    {
        self.get_encoding(fallback)?.decode(input, errors)
    }

    /// Encodes `input`. Pass `"utf-8"` for the customary default.
    pub fn encode<'a, E>(&self,
                         input: &str,
                         encoding: E,
                         errors: ErrorMode)
                         -> Result<Vec<u8>, Error>
        where E: Into<EncodingOrLabel<'a>>
    {
        self.get_encoding(encoding)?.encode(input, errors)
    }

    /// Pull-based decoding. Fails eagerly on an unknown label, even if
    /// `input` is empty.
    pub fn iter_decode<'a, I, E>(&self,
                                 input: I,
                                 fallback: E,
                                 errors: ErrorMode)
                                 -> Result<IterDecode<I::IntoIter>, Error>
        where I: IntoIterator,
              I::Item: AsRef<[u8]>,
              E: Into<EncodingOrLabel<'a>>
    {
        Ok(self.get_encoding(fallback)?.iter_decode(input, errors))
    }

    /// Pull-based encoding. Fails eagerly on an unknown label.
    pub fn iter_encode<'a, I, E>(&self,
                                 input: I,
                                 encoding: E,
                                 errors: ErrorMode)
                                 -> Result<IterEncode<I::IntoIter>, Error>
        where I: IntoIterator,
              I::Item: AsRef<str>,
              E: Into<EncodingOrLabel<'a>>
    {
        Ok(self.get_encoding(encoding)?.iter_encode(input, errors))
    }

    pub fn make_incremental_decoder<'a, E>(&self,
                                           fallback: E,
                                           errors: ErrorMode)
                                           -> Result<IncrementalDecoder, Error>
        where E: Into<EncodingOrLabel<'a>>
    {
        Ok(self.get_encoding(fallback)?.make_incremental_decoder(errors))
    }

    pub fn make_incremental_encoder<'a, E>(&self,
                                           encoding: E,
                                           errors: ErrorMode)
                                           -> Result<IncrementalEncoder, Error>
        where E: Into<EncodingOrLabel<'a>>
    {
        Ok(self.get_encoding(encoding)?.make_incremental_encoder(errors))
    }
}

impl Default for Registry {
    fn default() -> Registry {
        Registry::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Registry")
            .field("cached", &self.cached_names())
            .finish()
    }
}

// Any copyright to the test code below this comment is dedicated to the
// Public Domain. http://creativecommons.org/publicdomain/zero/1.0/

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl CodecProvider for CountingProvider {
        fn resolve(&self, name: &'static str) -> Result<Codec, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            PlatformCodecs.resolve(name)
        }
    }

    struct EmptyProvider;

    struct FailingProvider {
        calls: Arc<AtomicUsize>,
    }

    impl CodecProvider for FailingProvider {
        fn resolve(&self, name: &'static str) -> Result<Codec, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Error::UnsupportedEncoding(name.to_string()))
        }
    }

    impl CodecProvider for EmptyProvider {
        fn resolve(&self, name: &'static str) -> Result<Codec, Error> {
            Err(Error::UnsupportedEncoding(name.to_string()))
        }
    }

    #[test]
    fn test_lookup() {
        let registry = Registry::new();
        assert_eq!(registry.lookup("utf-8").unwrap().name(), "utf-8");
        assert_eq!(registry.lookup("UTF-8"), registry.lookup("utf8"));
        assert_eq!(registry.lookup("utf8"), registry.lookup(" \r\nutf8\t"));
        assert_eq!(registry.lookup("u8"), None);
        assert_eq!(registry.lookup("latin1").unwrap().name(), "windows-1252");
        assert_eq!(registry.lookup("US-ASCII").unwrap().name(), "windows-1252");
        assert_eq!(registry.lookup("latin-1"), None);
        assert_eq!(registry.lookup("LATİN1"), None);
    }

    #[test]
    fn test_lookup_shares_instances() {
        let registry = Registry::new();
        let a = registry.lookup("latin1").unwrap();
        let b = registry.lookup("ISO-8859-1").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.cached_names(), vec!["windows-1252"]);
    }

    #[test]
    fn test_provider_called_once_per_name() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = Registry::with_provider(CountingProvider {
            calls: Arc::clone(&calls),
        });
        for label in &["latin1", "ascii", "windows-1252", "cp1252", "utf8", "utf-8"] {
            registry.get_encoding(*label).unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        registry.get_encoding("x-user-defined").unwrap();
        registry.get_encoding("hz-gb-2312").unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_get_encoding() {
        let registry = Registry::new();
        let encoding = registry.get_encoding("koi8").unwrap();
        assert_eq!(encoding.name(), "koi8-r");
        let same = registry.get_encoding(&encoding).unwrap();
        assert!(Arc::ptr_eq(&encoding, &same));
        assert_eq!(registry.get_encoding("latin-1"),
                   Err(Error::UnknownLabel("latin-1".to_string())));
    }

    #[test]
    fn test_unsupported_encoding() {
        let registry = Registry::with_provider(EmptyProvider);
        assert_eq!(registry.get_encoding("utf-8"),
                   Err(Error::UnsupportedEncoding("utf-8".to_string())));
        assert_eq!(registry.lookup("utf-8"), None);
        // Built in, so unaffected by the provider.
        assert!(registry.lookup("x-user-defined").is_some());
    }

    #[test]
    fn test_failed_resolve_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = Registry::with_provider(FailingProvider {
            calls: Arc::clone(&calls),
        });
        assert_eq!(registry.lookup("gbk"), None);
        assert_eq!(registry.lookup("gbk"), None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(registry.cached_names().is_empty());
        // The lock is released after a failure, so the registry stays usable.
        assert!(registry.get_encoding("replacement").is_ok());
    }

    #[test]
    fn test_every_name_constructs() {
        let registry = Registry::new();
        for &name in labels::NAMES.iter() {
            let encoding = registry.get_encoding(name).unwrap();
            assert_eq!(encoding.name(), name);
        }
        assert_eq!(registry.cached_names().len(), labels::NAMES.len());
    }

    #[test]
    fn test_error_mode_parse() {
        assert_eq!("strict".parse::<ErrorMode>(), Ok(ErrorMode::Strict));
        assert_eq!("replace".parse::<ErrorMode>(), Ok(ErrorMode::Replace));
        assert_eq!("ignore".parse::<ErrorMode>(), Ok(ErrorMode::Ignore));
        assert_eq!("Strict".parse::<ErrorMode>(),
                   Err(Error::UnknownErrorMode("Strict".to_string())));
        assert_eq!(ErrorMode::Ignore.to_string(), "ignore");
        assert_eq!(ErrorMode::DECODE_DEFAULT, ErrorMode::Replace);
        assert_eq!(ErrorMode::ENCODE_DEFAULT, ErrorMode::Strict);
    }

    #[test]
    fn test_error_display() {
        let err = Error::codec("windows-1252", CodecError::Unmappable('\u{2603}'));
        assert_eq!(err.to_string(), "windows-1252: unmappable character '\u{2603}'");
        assert_eq!(Error::UnknownLabel("u8".to_string()).to_string(),
                   "unknown encoding label \"u8\"");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let registry = Registry::new();
        let encoding = registry.get_encoding("latin1").unwrap();
        assert_eq!(serde_json::to_string(&*encoding).unwrap(), "\"windows-1252\"");
        assert_eq!(serde_json::to_string(&ErrorMode::Replace).unwrap(), "\"replace\"");
        let mode: ErrorMode = serde_json::from_str("\"ignore\"").unwrap();
        assert_eq!(mode, ErrorMode::Ignore);
    }
}
