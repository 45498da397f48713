//! Loader configuration.

use crate::SceneError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Images wider than this are downscaled under [`ResolutionPolicy::Auto`].
pub const AUTO_MAX_WIDTH: u32 = 1600;

/// Compute target camera images are loaded for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    #[default]
    Cpu,
    /// GPU adapter index.
    Gpu(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu => write!(f, "cpu"),
            Device::Gpu(index) => write!(f, "gpu:{}", index),
        }
    }
}

impl FromStr for Device {
    type Err = SceneError;

    /// Accepts `cpu`, `gpu`, `gpu:N`, and `cuda`/`cuda:N` as an alias for GPU.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (kind, index) = match lower.split_once(':') {
            Some((kind, index)) => (kind, Some(index)),
            None => (lower.as_str(), None),
        };
        match (kind, index) {
            ("cpu", None) => Ok(Device::Cpu),
            ("gpu" | "cuda", None) => Ok(Device::Gpu(0)),
            ("gpu" | "cuda", Some(index)) => index
                .parse()
                .map(Device::Gpu)
                .map_err(|_| SceneError::InvalidDevice(s.to_string())),
            _ => Err(SceneError::InvalidDevice(s.to_string())),
        }
    }
}

/// How native image resolution is reduced before the resolution scale applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "RawResolutionPolicy")]
pub enum ResolutionPolicy {
    /// Keep native resolution, except that images wider than
    /// [`AUTO_MAX_WIDTH`] are brought down to that width.
    #[default]
    Auto,
    /// Divide both sides by 1, 2, 4 or 8 (rounded).
    Divisor(u32),
    /// Downscale to this target width.
    Width(u32),
}

impl ResolutionPolicy {
    /// Reject zero sizes and treat a divisor other than 1, 2, 4 or 8 as a
    /// target width.
    pub fn validate(self) -> Result<Self, SceneError> {
        match self {
            ResolutionPolicy::Divisor(0) | ResolutionPolicy::Width(0) => {
                Err(SceneError::InvalidResolution(format!("{:?}", self)))
            }
            ResolutionPolicy::Divisor(d) if !matches!(d, 1 | 2 | 4 | 8) => {
                Ok(ResolutionPolicy::Width(d))
            }
            policy => Ok(policy),
        }
    }
}

// Unchecked wire form, validated on the way in.
#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum RawResolutionPolicy {
    Auto,
    Divisor(u32),
    Width(u32),
}

impl TryFrom<RawResolutionPolicy> for ResolutionPolicy {
    type Error = SceneError;

    fn try_from(raw: RawResolutionPolicy) -> Result<Self, Self::Error> {
        match raw {
            RawResolutionPolicy::Auto => Ok(ResolutionPolicy::Auto),
            RawResolutionPolicy::Divisor(d) => ResolutionPolicy::Divisor(d).validate(),
            RawResolutionPolicy::Width(w) => ResolutionPolicy::Width(w).validate(),
        }
    }
}

impl FromStr for ResolutionPolicy {
    type Err = SceneError;

    /// `auto` or `-1` for [`ResolutionPolicy::Auto`], `1|2|4|8` for a divisor,
    /// any other positive integer for a target width.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") || s == "-1" {
            return Ok(ResolutionPolicy::Auto);
        }
        match s.parse::<u32>() {
            Ok(d @ (1 | 2 | 4 | 8)) => Ok(ResolutionPolicy::Divisor(d)),
            Ok(width) if width > 0 => Ok(ResolutionPolicy::Width(width)),
            _ => Err(SceneError::InvalidResolution(s.to_string())),
        }
    }
}

/// Options recognized by the scene loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub device: Device,
    pub resolution: ResolutionPolicy,
    /// Image folder name inside the source directory.
    pub images: String,
    /// Hold out test cameras for evaluation.
    pub eval: bool,
}

impl LoaderConfig {
    /// A copy with the resolution policy checked, for configs built in code.
    pub fn validated(&self) -> Result<Self, SceneError> {
        Ok(Self {
            resolution: self.resolution.validate()?,
            ..self.clone()
        })
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            device: Device::default(),
            resolution: ResolutionPolicy::default(),
            images: "images".to_string(),
            eval: false,
        }
    }
}
