use std::fmt;
use std::str::FromStr;

use candle_core::Device;
use tracing::{info, warn};

use super::error::EmbeddingError;

/// Backend requested for the BGE-M3 encoder (`VIDORE_DEVICE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DevicePreference {
    /// First compiled GPU backend that initializes, otherwise CPU.
    #[default]
    Auto,
    Cpu,
    Cuda,
    Metal,
}

impl DevicePreference {
    pub const ENV_VAR: &'static str = "VIDORE_DEVICE";

    pub fn as_str(self) -> &'static str {
        match self {
            DevicePreference::Auto => "auto",
            DevicePreference::Cpu => "cpu",
            DevicePreference::Cuda => "cuda",
            DevicePreference::Metal => "metal",
        }
    }
}

impl fmt::Display for DevicePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DevicePreference {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(DevicePreference::Auto),
            "cpu" => Ok(DevicePreference::Cpu),
            "cuda" => Ok(DevicePreference::Cuda),
            "metal" => Ok(DevicePreference::Metal),
            other => Err(EmbeddingError::InvalidConfig {
                reason: format!("unknown device '{other}' (expected auto, cpu, cuda or metal)"),
            }),
        }
    }
}

/// GPU backends compiled into this build, in the order `Auto` tries them.
const GPU_BACKENDS: &[DevicePreference] = &[
    #[cfg(feature = "metal")]
    DevicePreference::Metal,
    #[cfg(feature = "cuda")]
    DevicePreference::Cuda,
];

/// Opens the device for `preference`.
///
/// An explicit GPU request fails if that backend is missing from the build or
/// cannot be initialized. `Auto` tries each compiled GPU backend, then CPU.
pub fn select_device(preference: DevicePreference) -> Result<Device, EmbeddingError> {
    match preference {
        DevicePreference::Cpu => Ok(Device::Cpu),
        DevicePreference::Cuda | DevicePreference::Metal => open_gpu(preference),
        DevicePreference::Auto => {
            let mut failures = Vec::new();
            for &backend in GPU_BACKENDS {
                match open_gpu(backend) {
                    Ok(device) => return Ok(device),
                    Err(e) => {
                        warn!(device = %backend, error = %e, "GPU backend unavailable");
                        failures.push(e.to_string());
                    }
                }
            }

            let reason = if failures.is_empty() {
                "no GPU backend compiled".to_string()
            } else {
                failures.join("; ")
            };
            warn!(reason = %reason, "BGE-M3 encoder running on CPU");
            Ok(Device::Cpu)
        }
    }
}

fn open_gpu(backend: DevicePreference) -> Result<Device, EmbeddingError> {
    let opened = match backend {
        #[cfg(feature = "cuda")]
        DevicePreference::Cuda => Device::new_cuda(0),
        #[cfg(feature = "metal")]
        DevicePreference::Metal => Device::new_metal(0),
        _ => Err(candle_core::Error::Msg(
            "backend not compiled into this build".to_string(),
        )),
    };

    let device = opened.map_err(|e| EmbeddingError::DeviceUnavailable {
        device: backend.to_string(),
        reason: e.to_string(),
    })?;
    info!(device = %backend, "BGE-M3 encoder running on GPU");
    Ok(device)
}
