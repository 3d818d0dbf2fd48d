// Copyright 2015-2016 Mozilla Foundation. See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// https://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or https://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Byte order mark sniffing.
//!
//! A BOM at the start of the input overrides the declared encoding when
//! decoding. Three bytes of lookahead are always enough to tell UTF-8,
//! UTF-16BE, UTF-16LE and "no BOM" apart.

/// The longest BOM, in bytes.
pub const MAX_BOM_LENGTH: usize = 3;

/// A recognized byte order mark.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Bom {
    Utf8,
    Utf16Be,
    Utf16Le,
}

impl Bom {
    /// The length of the BOM itself, which is consumed and never decoded.
    pub fn len(self) -> usize {
        match self {
            Bom::Utf8 => 3,
            Bom::Utf16Be | Bom::Utf16Le => 2,
        }
    }

    /// The canonical name of the encoding the BOM forces.
    pub fn name(self) -> &'static str {
        match self {
            Bom::Utf8 => "utf-8",
            Bom::Utf16Be => "utf-16be",
            Bom::Utf16Le => "utf-16le",
        }
    }
}

/// Outcome of looking at a prefix of the input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Sniff {
    /// The input starts with a BOM.
    Bom(Bom),
    /// The input definitely doesn't start with a BOM; use the fallback.
    NoBom,
    /// Too few bytes to tell and more may follow.
    Pending,
}

/// Classifies the start of `prefix`.
///
/// `last` signals that no more bytes will follow, which turns the
/// `Pending` case into `NoBom`.
pub fn sniff(prefix: &[u8], last: bool) -> Sniff {
    if prefix.starts_with(b"\xFE\xFF") {
        return Sniff::Bom(Bom::Utf16Be);
    }
    if prefix.starts_with(b"\xFF\xFE") {
        return Sniff::Bom(Bom::Utf16Le);
    }
    if prefix.starts_with(b"\xEF\xBB\xBF") {
        return Sniff::Bom(Bom::Utf8);
    }
    if last || prefix.len() >= MAX_BOM_LENGTH {
        Sniff::NoBom
    } else {
        Sniff::Pending
    }
}
