// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Memoizing an expensive report through the process-wide store, with logs.
//!
//! Run with:
//!
//! ```text
//! cargo run -p perma_cache --example report --features logs
//! ```

use std::sync::LazyLock;
use std::thread;
use std::time::Duration;

use perma_cache::{Cacheable, Error, KeyObject, Memoized, MemoryStore, Options, RebuildFlags, Telemetry};

struct Quarter {
    year: u16,
    index: u8,
}

impl KeyObject for Quarter {
    fn cache_key(&self) -> Option<Result<String, Error>> {
        Some(Ok(format!("{}/q{}", self.year, self.index)))
    }
}

struct SalesReport {
    quarter: Quarter,
    flags: RebuildFlags,
}

impl SalesReport {
    fn revenue(&self) -> Result<u64, Error> {
        // Stand-in for a slow aggregation query.
        thread::sleep(Duration::from_millis(250));
        Ok(u64::from(self.quarter.year) * 10 + u64::from(self.quarter.index))
    }
}

impl Cacheable for SalesReport {
    type Error = Error;

    fn rebuild_flags(&self) -> &RebuildFlags {
        &self.flags
    }

    fn key_object(&self, name: &str) -> Result<Box<dyn KeyObject + '_>, Error> {
        match name {
            "quarter" => Ok(Box::new(Quarter {
                year: self.quarter.year,
                index: self.quarter.index,
            })),
            other => Err(Error::undefined_method(other)),
        }
    }
}

static REVENUE: LazyLock<Memoized<SalesReport, u64>> = LazyLock::new(|| {
    Memoized::declare(
        "revenue",
        Options::new().version(2).obj("quarter").expires_in(Duration::from_secs(3600)),
        SalesReport::revenue,
    )
    .with_telemetry(Telemetry::new().with_logs())
});

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    perma_cache::set_cache(MemoryStore::builder().name("reports").max_capacity(1_000).build());

    let report = SalesReport {
        quarter: Quarter { year: 2024, index: 3 },
        flags: RebuildFlags::new(),
    };

    println!("key: {}", REVENUE.perma_cache_key(&report)?);

    let revenue = REVENUE.call(&report)?;
    println!("first call: {revenue} (rebuilt: {})", REVENUE.was_rebuilt(&report));

    let revenue = REVENUE.call(&report)?;
    println!("second call: {revenue} (rebuilt: {})", REVENUE.was_rebuilt(&report));

    let revenue = REVENUE.rebuild(&report)?;
    println!("forced rebuild: {revenue}");

    Ok(())
}
