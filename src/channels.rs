// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Channel descriptors and the active scan mask.
//!
//! The quaternion device exposes five data channels (X, Y, Z, W/module and
//! an accuracy figure) followed by a synthetic timestamp channel appended by
//! the host framework. The descriptors here are layout metadata only; the
//! raw frame always carries every channel back-to-back in ascending index
//! order, and the scan mask decides which of them survive into the packed
//! per-sample buffer.

use bitflags::bitflags;

use crate::constants::NUM_DATA_CHANNELS;

/// Semantic role of a data channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRole {
    /// Quaternion X component
    X,
    /// Quaternion Y component
    Y,
    /// Quaternion Z component
    Z,
    /// Quaternion W (module) component
    Module,
    /// Fusion accuracy estimate
    Accuracy,
}

/// Immutable per-channel descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    /// Position in the raw frame and in the scan mask
    pub index: usize,
    /// What the channel carries
    pub role: ChannelRole,
    /// Storage width in bits
    pub storage_bits: u16,
    /// Little-endian signed fixed-point when true, raw unsigned otherwise
    pub signed: bool,
    /// Right-shift applied to raw reads of fixed-point channels
    pub shift: u8,
    /// Whether a scale (gain) query is meaningful for this channel
    pub has_scale: bool,
}

impl Channel {
    /// Storage width in bytes
    pub const fn byte_width(&self) -> usize {
        (self.storage_bits as usize) >> 3
    }
}

/// The quaternion channel table, constructed once at load and never mutated.
///
/// Channels 0-3 are 32-bit signed little-endian fixed-point values, channel
/// 4 is a single unsigned accuracy byte with no scale.
pub const QUAT_CHANNELS: [Channel; NUM_DATA_CHANNELS] = [
    Channel {
        index: 0,
        role: ChannelRole::X,
        storage_bits: 32,
        signed: true,
        shift: 0,
        has_scale: true,
    },
    Channel {
        index: 1,
        role: ChannelRole::Y,
        storage_bits: 32,
        signed: true,
        shift: 0,
        has_scale: true,
    },
    Channel {
        index: 2,
        role: ChannelRole::Z,
        storage_bits: 32,
        signed: true,
        shift: 0,
        has_scale: true,
    },
    Channel {
        index: 3,
        role: ChannelRole::Module,
        storage_bits: 32,
        signed: true,
        shift: 0,
        has_scale: true,
    },
    Channel {
        index: 4,
        role: ChannelRole::Accuracy,
        storage_bits: 8,
        signed: false,
        shift: 0,
        has_scale: false,
    },
];

/// Length of a full raw frame: every data channel back-to-back
pub const fn frame_len() -> usize {
    let mut len = 0;
    let mut i = 0;
    while i < QUAT_CHANNELS.len() {
        len += QUAT_CHANNELS[i].byte_width();
        i += 1;
    }
    len
}

/// Fixed byte offset of a channel inside the full unmasked frame
pub fn channel_offset(channels: &[Channel], index: usize) -> usize {
    channels
        .iter()
        .take_while(|ch| ch.index < index)
        .map(|ch| ch.byte_width())
        .sum()
}

bitflags! {
    /// Active scan mask: one bit per data channel, ascending index order.
    ///
    /// Owned and mutated by the host framework; the core only reads
    /// snapshots of it. Iteration over channels is always done through the
    /// channel table so the ascending-index ordering is fixed regardless of
    /// which bits are set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ScanMask: u8 {
        /// Quaternion X
        const X = 1 << 0;
        /// Quaternion Y
        const Y = 1 << 1;
        /// Quaternion Z
        const Z = 1 << 2;
        /// Quaternion W (module)
        const MODULE = 1 << 3;
        /// Accuracy byte
        const ACCURACY = 1 << 4;
    }
}

impl ScanMask {
    /// Mask with the single bit for `index` set, if in range
    pub fn from_index(index: usize) -> Option<Self> {
        if index < NUM_DATA_CHANNELS {
            Self::from_bits(1 << index)
        } else {
            None
        }
    }

    /// Is the channel at `index` active
    pub fn contains_index(&self, index: usize) -> bool {
        index < NUM_DATA_CHANNELS && self.bits() & (1 << index) != 0
    }

    /// Packed sample length for this mask: sum of active channels' widths
    pub fn payload_len(&self, channels: &[Channel]) -> usize {
        channels
            .iter()
            .filter(|ch| self.contains_index(ch.index))
            .map(|ch| ch.byte_width())
            .sum()
    }
}
