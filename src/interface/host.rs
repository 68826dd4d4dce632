// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host device/buffer framework interface.

use crate::channels::{Channel, ScanMask};
use crate::Error;

/// Opaque identifier for a device instance held by the host framework
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceHandle(pub u32);

/// Which access mode the device is currently in.
///
/// The two modes are mutually exclusive: on-demand reads are only permitted
/// in `Direct` mode and fail fast with `Busy` while `Triggered` streaming is
/// active. Mode transitions are owned by the host framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// On-demand single-shot reads permitted, streaming disabled
    Direct,
    /// Streaming active, on-demand reads rejected
    Triggered,
}

/// The host device/buffer framework, as consumed by the driver core.
///
/// Device allocation, registration and buffer/trigger bookkeeping follow the
/// attach sequence in [`crate::driver::QuatDriver::attach`]; the host owns
/// the active scan mask and the current access mode, the core only reads
/// snapshots of them. Implementations use interior synchronization, all
/// methods take `&self`.
pub trait SensorHost {
    /// Allocate a device instance with the given channel table. The host
    /// appends its synthetic timestamp channel itself.
    fn alloc_device(&self, name: &str, channels: &'static [Channel])
        -> Result<DeviceHandle, Error>;

    /// Make the device visible and usable by consumers
    fn register_device(&self, handle: DeviceHandle) -> Result<(), Error>;

    /// Withdraw the device from consumers
    fn unregister_device(&self, handle: DeviceHandle);

    /// Release the allocated device instance
    fn free_device(&self, handle: DeviceHandle);

    /// Set up the buffer resources required for streaming mode
    fn setup_buffer(&self, handle: DeviceHandle) -> Result<(), Error>;

    /// Release the buffer resources
    fn cleanup_buffer(&self, handle: DeviceHandle);

    /// Associate the device with its interrupt/poll trigger source
    fn setup_trigger(&self, handle: DeviceHandle) -> Result<(), Error>;

    /// Remove the trigger association
    fn remove_trigger(&self, handle: DeviceHandle);

    /// Current access mode of the device
    fn current_mode(&self, handle: DeviceHandle) -> AccessMode;

    /// Live snapshot of the consumer-controlled scan mask
    fn active_scan_mask(&self, handle: DeviceHandle) -> ScanMask;

    /// Deliver one decoded sample into the host's buffer queue. Queue-full
    /// and not-ready conditions are absorbed by the host's own contract.
    fn push_sample(&self, handle: DeviceHandle, sample: &[u8], timestamp_ns: i64);
}
