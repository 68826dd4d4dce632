// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Device identity table and configuration defaults.

/// Number of data channels in a quaternion frame
pub const NUM_DATA_CHANNELS: usize = 5;

/// Index of the synthetic timestamp channel appended by the host framework
pub const TIMESTAMP_CHANNEL_INDEX: usize = 5;

/// Sensor family name prefixes
pub const LIS331EB_DEV_NAME: &str = "lis331eb";
pub const LSM6DB0_DEV_NAME: &str = "lsm6db0";

/// The twelve logical device identities served by this driver: plain, game
/// and geomagnetic quaternions, each in a normal and a wake-capable variant,
/// across both supported sensor families. The wake suffixes are irregular
/// between families; the table is authoritative, not the naming pattern.
pub const DEVICE_IDS: [&str; 12] = [
    "lis331eb_quat",
    "lsm6db0_quat",
    "lis331eb_game_quat",
    "lsm6db0_game_quat",
    "lis331eb_geo_quat",
    "lsm6db0_geo_quat",
    "lis331eb_quat_wk",
    "lsm6db0_quat_wk",
    "lis331eb_game_q_wk",
    "lsm6db0_game_quat_wk",
    "lis331eb_geo_q_wk",
    "lsm6db0_geo_quat_wk",
];

/// Does this driver serve the named device instance
pub fn is_supported_device(name: &str) -> bool {
    DEVICE_IDS.contains(&name)
}

/// Is the named identity a wake-capable variant
pub fn is_wake_device(name: &str) -> bool {
    name.ends_with("_wk")
}

/// Default sampling frequency applied at attach, in Hz
pub const DEFAULT_SAMPLING_FREQUENCY_HZ: u16 = 50;

/// Sampling frequencies the attribute surface advertises, in Hz
pub const SAMPLING_FREQUENCY_AVAIL_HZ: [u16; 5] = [5, 15, 50, 100, 200];

/// Batch modes the attribute surface advertises
pub const BATCH_MODES_AVAIL: [&str; 2] = ["none", "fifo"];

/// Default batch-mode maximum event count
pub const DEFAULT_BATCH_MAX_EVENT_COUNT: u32 = 0;

/// Default batch-mode buffer length, in samples
pub const DEFAULT_BATCH_BUFFER_LENGTH: u32 = 0;

/// Default batch-mode timeout, in milliseconds
pub const DEFAULT_BATCH_TIMEOUT_MS: u32 = 0;
