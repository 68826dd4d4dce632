// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Packed-buffer frame decoder.
//!
//! The raw frame always carries every channel, active or not, back-to-back
//! in ascending index order. Decoding compacts the active channels into the
//! front of the output buffer while leaving the source geometry untouched:
//! the read cursor advances over every channel, the write cursor only over
//! active ones. No numeric interpretation happens here.

use crate::channels::{Channel, ScanMask};

/// Copy the active channels' bytes out of `raw` into `out`, preserving
/// ascending channel order, and return the packed length.
///
/// `raw` must cover the full unmasked frame and `out` must have room for
/// the sum of the active channels' widths. Writes only to `out`.
pub fn decode_frame(raw: &[u8], channels: &[Channel], mask: ScanMask, out: &mut [u8]) -> usize {
    let mut src = 0;
    let mut dst = 0;
    for ch in channels {
        let width = ch.byte_width();
        if mask.contains_index(ch.index) {
            out[dst..dst + width].copy_from_slice(&raw[src..src + width]);
            dst += width;
        }
        src += width;
    }
    dst
}
