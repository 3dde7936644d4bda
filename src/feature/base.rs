//! Ready-made transformer kinds that concrete features build on.

use ndarray::Array2;

use super::error::Error;
use super::input::{BaseConfig, Input, RawInput};
use super::introspect::Introspect;
use super::kind::FeatureKind;
use super::param::{Param, ParamKind, ParamSpec};
use crate::encode::{GaussianEncoder, Sample};

pub static BASE_FEATURE: FeatureKind = FeatureKind {
    name: "BaseFeature",
    module: module_path!(),
    parent: None,
    params: &[],
    attributes: &[],
    references: &[],
};

pub static ENCODED_FEATURE: FeatureKind = FeatureKind {
    name: "EncodedFeature",
    module: module_path!(),
    parent: Some(&BASE_FEATURE),
    params: &[
        ParamSpec::new("segments", ParamKind::Int),
        ParamSpec::new("slope", ParamKind::Float),
        ParamSpec::new("start", ParamKind::Float),
        ParamSpec::new("end", ParamKind::Float),
        ParamSpec::new("smoothing", ParamKind::Text),
        ParamSpec::new("spacing", ParamKind::Text),
    ],
    attributes: &[],
    references: &[],
};

/// A transformer carrying only the execution parameters.
///
/// Useful on its own for normalizing inputs and running map/reduce with the
/// configured worker count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseFeature {
    base: BaseConfig,
}

impl BaseFeature {
    pub fn new(base: BaseConfig) -> Self {
        Self { base }
    }

    pub fn convert_input(&self, raw: &RawInput) -> Result<Input, Error> {
        self.base.convert(raw)
    }

    pub fn map<T, U, F>(&self, items: &[T], f: F) -> Result<Vec<U>, Error>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> Result<U, Error> + Sync,
    {
        self.base.executor()?.map(items, f)
    }

    pub fn reduce<T, F>(&self, items: Vec<T>, f: F) -> Result<Option<T>, Error>
    where
        T: Send,
        F: Fn(T, T) -> T + Sync,
    {
        self.base.executor()?.reduce(items, f)
    }
}

impl Introspect for BaseFeature {
    fn kind(&self) -> &'static FeatureKind {
        &BASE_FEATURE
    }

    fn base(&self) -> &BaseConfig {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseConfig {
        &mut self.base
    }
}

/// Base for histogram-style features that discretize continuous samples
/// with a [`GaussianEncoder`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedFeature {
    base: BaseConfig,
    encoder: GaussianEncoder,
}

impl EncodedFeature {
    pub fn new(base: BaseConfig, encoder: GaussianEncoder) -> Self {
        Self { base, encoder }
    }

    pub fn encoder(&self) -> &GaussianEncoder {
        &self.encoder
    }

    pub fn encode_values(&self, samples: &[Sample], slot_count: usize) -> Result<Vec<f64>, Error> {
        Ok(self.encoder.encode_values(samples, slot_count)?)
    }

    pub fn encode_atom_values(
        &self,
        samples: &[Sample],
        atom_count: usize,
        slot_count: usize,
    ) -> Result<Array2<f64>, Error> {
        Ok(self
            .encoder
            .encode_atom_values(samples, atom_count, slot_count)?)
    }
}

impl Introspect for EncodedFeature {
    fn kind(&self) -> &'static FeatureKind {
        &ENCODED_FEATURE
    }

    fn base(&self) -> &BaseConfig {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseConfig {
        &mut self.base
    }

    fn param(&self, name: &str) -> Option<Param> {
        let enc = &self.encoder;
        match name {
            "segments" => Some(Param::from(enc.segments)),
            "slope" => Some(Param::Float(enc.slope)),
            "start" => Some(Param::Float(enc.start)),
            "end" => Some(Param::Float(enc.end)),
            "smoothing" => Some(Param::from(enc.smoothing.name())),
            "spacing" => Some(Param::from(enc.spacing.name())),
            _ => None,
        }
    }

    fn set_param(&mut self, name: &str, value: Param) -> Result<(), Error> {
        let required = || Error::invalid_param(name, "a value is required");
        let enc = &mut self.encoder;
        match name {
            "segments" => {
                let n = value.as_int().ok_or_else(required)?;
                enc.segments = usize::try_from(n)
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| Error::invalid_param(name, "must be a positive integer"))?;
            }
            "slope" => enc.slope = value.as_float().ok_or_else(required)?,
            "start" => enc.start = value.as_float().ok_or_else(required)?,
            "end" => enc.end = value.as_float().ok_or_else(required)?,
            "smoothing" => {
                let text = value.as_str().ok_or_else(required)?;
                enc.smoothing = text
                    .parse()
                    .map_err(|e: crate::encode::Error| Error::invalid_param(name, e.to_string()))?;
            }
            "spacing" => {
                let text = value.as_str().ok_or_else(required)?;
                enc.spacing = text
                    .parse()
                    .map_err(|e: crate::encode::Error| Error::invalid_param(name, e.to_string()))?;
            }
            _ => return Err(Error::UnknownParam(name.to_string())),
        }
        Ok(())
    }
}
