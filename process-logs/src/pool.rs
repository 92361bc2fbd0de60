//! Run scenarios in parallel.
//!
//! Scenarios are independent, each worker gets one at a time from a dedicated `rayon` pool.
//! The first failure stops the distribution of new scenarios and is returned.
//!

use eyre::Result;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::info;

use crate::config::Context;
use crate::scenario::Scenario;
use crate::summary::Summary;

#[tracing::instrument(skip(list, ctx))]
pub fn run_all(list: &[Scenario], ctx: &Context) -> Result<Vec<Summary>> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(ctx.jobs)
        .thread_name(|n| format!("worker-{n}"))
        .build()?;

    info!("{} scenarios on {} workers", list.len(), ctx.jobs);
    pool.install(|| {
        list.par_iter()
            .map(|scen| scen.process(ctx))
            .collect::<Result<Vec<_>>>()
    })
}
