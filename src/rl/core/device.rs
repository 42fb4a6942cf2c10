//! Compute Device
//!
//! The agent's tensor work runs on a device the loop does not manage. The
//! loop only needs to know whether the device is there and to seed it.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use super::seeding::{derive_seed, stream_rng, streams, Seedable};

/// Device selection in the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    /// NVIDIA accelerator
    Cuda,
    /// Host CPU
    Cpu,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Cuda => f.write_str("cuda"),
            DeviceKind::Cpu => f.write_str("cpu"),
        }
    }
}

/// Device the agent computes on
pub trait ComputeDevice: Seedable {
    fn name(&self) -> String;

    /// Whether the device can be used right now
    fn is_available(&self) -> bool;
}

/// Host CPU; always available
#[derive(Debug)]
pub struct HostDevice {
    rng: Option<StdRng>,
}

impl HostDevice {
    pub fn new() -> Self {
        Self { rng: None }
    }

    /// Host generator, present once seeded
    pub fn rng(&mut self) -> Option<&mut StdRng> {
        self.rng.as_mut()
    }
}

impl Default for HostDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Seedable for HostDevice {
    fn reseed(&mut self, seed: u64) {
        self.rng = Some(stream_rng(seed, streams::HOST));
    }
}

impl ComputeDevice for HostDevice {
    fn name(&self) -> String {
        DeviceKind::Cpu.to_string()
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// NVIDIA accelerator, detected through the kernel driver
#[derive(Debug)]
pub struct CudaDevice {
    host: HostDevice,
    /// Seed applied to every visible device
    device_seed: Option<u64>,
}

const NVIDIA_DRIVER_PROC: &str = "/proc/driver/nvidia/version";

impl CudaDevice {
    pub fn new() -> Self {
        Self {
            host: HostDevice::new(),
            device_seed: None,
        }
    }

    pub fn device_seed(&self) -> Option<u64> {
        self.device_seed
    }

    fn visible_devices_hidden() -> bool {
        matches!(
            std::env::var("CUDA_VISIBLE_DEVICES").as_deref(),
            Ok("") | Ok("-1")
        )
    }
}

impl Default for CudaDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Seedable for CudaDevice {
    fn reseed(&mut self, seed: u64) {
        self.host.reseed(seed);
        self.device_seed = Some(derive_seed(seed, streams::DEVICE));
    }
}

impl ComputeDevice for CudaDevice {
    fn name(&self) -> String {
        DeviceKind::Cuda.to_string()
    }

    fn is_available(&self) -> bool {
        Path::new(NVIDIA_DRIVER_PROC).exists() && !Self::visible_devices_hidden()
    }
}

/// Build the device named in the configuration
pub fn device_for(kind: DeviceKind) -> Box<dyn ComputeDevice> {
    match kind {
        DeviceKind::Cuda => Box::new(CudaDevice::new()),
        DeviceKind::Cpu => Box::new(HostDevice::new()),
    }
}

impl<T: ComputeDevice + ?Sized> Seedable for Box<T> {
    fn reseed(&mut self, seed: u64) {
        (**self).reseed(seed);
    }
}

impl<T: ComputeDevice + ?Sized> ComputeDevice for Box<T> {
    fn name(&self) -> String {
        (**self).name()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}
