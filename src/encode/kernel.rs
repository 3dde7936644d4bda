use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use super::Error;

/// Kernel evaluated at `slope × (point − value)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Smoothing {
    /// Standard normal probability density.
    #[default]
    Norm,
    /// Logistic sigmoid.
    Expit,
    /// `(tanh(x) + 1) / 2`.
    Tanh,
    /// Step: 1 for `x > 0`, else 0.
    ZeroOne,
    /// Box: 1 for `|x| < 1`, else 0.
    Spike,
}

impl Smoothing {
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Smoothing::Norm => (-0.5 * x * x).exp() / (2.0 * PI).sqrt(),
            Smoothing::Expit => 1.0 / (1.0 + (-x).exp()),
            Smoothing::Tanh => (x.tanh() + 1.0) / 2.0,
            Smoothing::ZeroOne => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Smoothing::Spike => {
                if x.abs() < 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Smoothing::Norm => "norm",
            Smoothing::Expit => "expit",
            Smoothing::Tanh => "tanh",
            Smoothing::ZeroOne => "zero_one",
            Smoothing::Spike => "spike",
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Smoothing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "norm" => Ok(Smoothing::Norm),
            "expit" => Ok(Smoothing::Expit),
            "tanh" => Ok(Smoothing::Tanh),
            "zero_one" => Ok(Smoothing::ZeroOne),
            "spike" => Ok(Smoothing::Spike),
            _ => Err(Error::UnknownSmoothing(s.to_string())),
        }
    }
}

/// Transform applied to a raw sample value before it is compared with the
/// evaluation grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spacing {
    #[default]
    Linear,
    Inverse,
    Log,
}

impl Spacing {
    #[inline]
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Spacing::Linear => x,
            Spacing::Inverse => 1.0 / x,
            Spacing::Log => x.ln(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Spacing::Linear => "linear",
            Spacing::Inverse => "inverse",
            Spacing::Log => "log",
        }
    }
}

impl fmt::Display for Spacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Spacing {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Spacing::Linear),
            "inverse" => Ok(Spacing::Inverse),
            "log" => Ok(Spacing::Log),
            _ => Err(Error::UnknownSpacing(s.to_string())),
        }
    }
}
