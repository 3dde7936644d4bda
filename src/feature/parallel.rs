//! Map/reduce over a local worker pool.
//!
//! Work is split into at most `workers` contiguous shards. Each call builds its
//! own rayon pool so different transformers can run with different worker
//! counts in the same process.

use rayon::prelude::*;

use super::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Executor {
    workers: usize,
}

impl Default for Executor {
    fn default() -> Self {
        Self { workers: 1 }
    }
}

impl Executor {
    /// `n_jobs == 1` runs in process, `n_jobs > 1` uses that many workers and
    /// a negative value uses every available execution unit.
    pub fn new(n_jobs: i64) -> Result<Self, Error> {
        let workers = match n_jobs {
            0 => {
                return Err(Error::invalid_param(
                    "n_jobs",
                    "must be positive, or negative to use every available core",
                ));
            }
            n if n < 0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => usize::try_from(n).map_err(|_| Error::invalid_param("n_jobs", "too large"))?,
        };
        Ok(Self { workers })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Applies `f` to every item and returns the results in input order.
    ///
    /// The first failure in input order is returned and every other result
    /// is discarded.
    pub fn map<T, U, F>(&self, items: &[T], f: F) -> Result<Vec<U>, Error>
    where
        T: Sync,
        U: Send,
        F: Fn(&T) -> Result<U, Error> + Sync,
    {
        let shards = self.shard_count(items.len());
        if shards <= 1 {
            return items.iter().map(&f).collect();
        }

        let chunk = items.len().div_ceil(shards);
        let shards = items.len().div_ceil(chunk);
        let pool = build_pool(shards)?;
        log::debug!("mapping {} items in {shards} shards", items.len());

        let partials: Vec<Result<Vec<U>, Error>> = pool.install(|| {
            items
                .par_chunks(chunk)
                .map(|shard| shard.iter().map(&f).collect())
                .collect()
        });

        let mut out = Vec::with_capacity(items.len());
        for shard in partials {
            out.extend(shard?);
        }
        Ok(out)
    }

    /// Folds `items` with `f`, returning `None` for an empty input.
    ///
    /// Each shard is folded independently and the shard results are then
    /// folded in order, so `f` must be associative.
    pub fn reduce<T, F>(&self, items: Vec<T>, f: F) -> Result<Option<T>, Error>
    where
        T: Send,
        F: Fn(T, T) -> T + Sync,
    {
        let shards = self.shard_count(items.len());
        if shards <= 1 {
            return Ok(items.into_iter().reduce(&f));
        }

        let chunk = items.len().div_ceil(shards);
        let shards = items.len().div_ceil(chunk);
        let pool = build_pool(shards)?;
        log::debug!("reducing {} items in {shards} shards", items.len());

        let mut split = Vec::with_capacity(shards);
        let mut rest = items;
        while rest.len() > chunk {
            let tail = rest.split_off(chunk);
            split.push(rest);
            rest = tail;
        }
        split.push(rest);

        let partials: Vec<Option<T>> = pool.install(|| {
            split
                .into_par_iter()
                .map(|shard| shard.into_iter().reduce(&f))
                .collect()
        });

        Ok(partials.into_iter().flatten().reduce(&f))
    }

    fn shard_count(&self, len: usize) -> usize {
        self.workers.min(len)
    }
}

/// One thread per shard; never more threads than there is work for.
fn build_pool(threads: usize) -> Result<rayon::ThreadPool, Error> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| Error::ThreadPool(e.to_string()))
}
