use ndarray::Array2;

use super::error::Error;
use super::input::{Input, RawInput};
use super::introspect::Introspect;
use super::merge::MergeStrategy;

/// The fit → transform lifecycle.
///
/// A concrete feature supplies three per-item pieces: [`fit_one`] computes a
/// partial fit result for one normalized input, [`assign`] stores the merged
/// partials as the fitted attributes, and [`transform_one`] turns one
/// normalized input into a feature row. Batching, normalization, parallel
/// execution and validation are provided.
///
/// [`fit_one`]: Feature::fit_one
/// [`assign`]: Feature::assign
/// [`transform_one`]: Feature::transform_one
pub trait Feature: Introspect {
    type Partial: Send;
    type Merge: MergeStrategy<Self::Partial> + Default + Sync;

    fn fit_one(&self, input: &Input) -> Result<Self::Partial, Error>;

    /// Replaces every fitted attribute with values derived from `merged`.
    fn assign(&mut self, merged: Self::Partial) -> Result<(), Error>;

    fn transform_one(&self, input: &Input) -> Result<Vec<f64>, Error>;

    /// Fixed length of every transformed row, when known from the fitted
    /// state. Gives an empty batch the shape `(0, width)` and checks every
    /// row against it; `None` takes the width from the first row, so an
    /// empty batch becomes `(0, 0)`.
    fn row_width(&self) -> Option<usize> {
        None
    }

    fn fit(&mut self, xs: &[RawInput]) -> Result<(), Error>
    where
        Self: Sized,
    {
        self.fit_with(xs, &<Self::Merge as Default>::default())
    }

    /// [`fit`](Self::fit) with an explicitly supplied merge strategy.
    fn fit_with<M>(&mut self, xs: &[RawInput], strategy: &M) -> Result<(), Error>
    where
        Self: Sized,
        M: MergeStrategy<Self::Partial> + Sync,
    {
        if xs.is_empty() {
            return Err(Error::EmptyInput);
        }
        log::debug!("fitting {} on {} items", self.kind().name, xs.len());

        let this = &*self;
        let executor = this.base().executor()?;
        let partials = executor.map(xs, |raw| {
            let input = this.base().convert(raw)?;
            this.fit_one(&input)
        })?;
        let merged = executor
            .reduce(partials, |a, b| strategy.merge(a, b))?
            .ok_or(Error::EmptyInput)?;

        self.assign(merged)?;
        self.check_fit()
    }

    /// One row per input, stacked into a `(xs.len(), width)` matrix.
    ///
    /// `width` is [`row_width`](Self::row_width) when provided.
    fn transform(&self, xs: &[RawInput]) -> Result<Array2<f64>, Error> {
        self.check_fit()?;
        log::debug!("transforming {} items with {}", xs.len(), self.kind().name);

        let rows = self.base().executor()?.map(xs, |raw| {
            let input = self.base().convert(raw)?;
            self.transform_one(&input)
        })?;
        stack_rows(rows, self.row_width())
    }

    fn fit_transform(&mut self, xs: &[RawInput]) -> Result<Array2<f64>, Error>
    where
        Self: Sized,
    {
        self.fit(xs)?;
        self.transform(xs)
    }
}

fn stack_rows(rows: Vec<Vec<f64>>, width: Option<usize>) -> Result<Array2<f64>, Error> {
    let width = width.unwrap_or_else(|| rows.first().map_or(0, Vec::len));
    for (row, values) in rows.iter().enumerate() {
        if values.len() != width {
            return Err(Error::RaggedRows {
                row,
                expected: width,
                found: values.len(),
            });
        }
    }
    let height = rows.len();
    let flat: Vec<f64> = rows.into_iter().flatten().collect();
    Array2::from_shape_vec((height, width), flat).map_err(Error::feature)
}
