// Copyright 2025 Au-Zone Technologies Inc.
// SPDX-License-Identifier: Apache-2.0

//! Remote sensor-hub transport interface.

use std::sync::Arc;

use crate::Error;

/// Per-instance calibration data kept in the transport-side device registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorCommonData {
    /// Calibration gain reported to scale queries
    pub gain: i32,
    /// Length in bytes of the full multi-channel payload the remote sensor
    /// returns for one acquisition
    pub payload_len: usize,
}

/// Receiver for frames pushed by the transport in continuous mode.
///
/// The transport owns the call-time dispatch and guarantees pushes for one
/// instance are delivered one at a time, non-overlapping; the sink owns the
/// data. Registered as a weak observer via
/// [`HubTransport::register_frame_sink`].
pub trait FrameSink: Send + Sync {
    /// Handle one raw frame. No return value toward the transport; any
    /// downstream failure is absorbed.
    fn on_frame(&self, raw: &[u8], timestamp_ns: i64);
}

/// The transport that talks to the remote sensing sub-processor.
///
/// Instances are keyed by index into the transport's shared device
/// registry. The synchronous read has no timeout of its own; if the remote
/// sub-processor stalls, the caller stalls with it.
pub trait HubTransport {
    /// Look up calibration data for an instance
    fn common_data(&self, index: usize) -> Result<SensorCommonData, Error>;

    /// Enable or disable the sensor. `sync` requests a synchronous
    /// round-trip, `exclusive` single-shot ownership of the sensor.
    fn set_enable(
        &self,
        index: usize,
        enabled: bool,
        sync: bool,
        delay_ms: u32,
        exclusive: bool,
    ) -> Result<(), Error>;

    /// Blocking read of exactly `out.len()` bytes of frame data
    fn read_frame(&self, index: usize, out: &mut [u8]) -> Result<(), Error>;

    /// Register the streaming callback for an instance. Future pushed
    /// frames for that instance reach the sink.
    fn register_frame_sink(&self, index: usize, sink: Arc<dyn FrameSink>) -> Result<(), Error>;

    /// Drop the streaming callback for an instance
    fn unregister_frame_sink(&self, index: usize);
}
