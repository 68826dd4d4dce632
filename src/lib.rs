// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Sensor-hub quaternion driver core.
//!
//! Bridges a remote sensing sub-processor that produces fused quaternion
//! frames (X/Y/Z/W plus an accuracy byte) to a generic sensor-framework
//! host. Two access modes are supported: continuous streaming, where the
//! transport pushes frames that get mask-filtered into the host's buffer
//! queue, and synchronous on-demand single-shot reads that run a full
//! enable/read/disable round-trip against the remote sensor.

pub mod channels;
pub mod constants;
pub mod decoder;
pub mod driver;
pub mod interface;

pub use channels::{Channel, ChannelRole, ScanMask};
pub use driver::{DeviceConfig, QuatDriver, ValueKind};
pub use interface::{
    AccessMode, DeviceHandle, FrameSink, HubTransport, SensorCommonData, SensorHost,
};

/// Errors in this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Scratch or sample buffer allocation failed
    Alloc,
    /// A round-trip with the remote sensor failed
    Transport(TransportOp),
    /// On-demand read attempted while the device is streaming
    Busy,
    /// Channel index out of range, or the query is not supported on it
    InvalidChannel(usize),
    /// An attach sub-step failed; completed steps were rolled back
    Setup(SetupStep),
}

/// Which transport operation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportOp {
    /// Calibration lookup in the shared device registry
    CommonData,
    /// Single-shot enable request
    Enable,
    /// Blocking frame read
    Read,
    /// Single-shot disable request
    Disable,
    /// Streaming callback registration
    RegisterSink,
}

/// Which attach sub-step failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    /// Host-side device allocation
    AllocDevice,
    /// Calibration lookup from the transport registry
    CommonData,
    /// Buffer resource setup
    BufferSetup,
    /// Trigger-consumer association
    TriggerSetup,
    /// Host device registration
    Register,
    /// Streaming callback registration with the transport
    SinkRegister,
}
