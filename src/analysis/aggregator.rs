//! Catalog aggregation.
//!
//! Three independent passes over the fetched record list. None of them
//! mutate the input and none of them can fail.

use crate::models::{DiscoveryYear, PlanetRecord, Timeline, YearTally};
use std::collections::BTreeMap;
use tracing::debug;

/// Count planets with no host star.
pub fn count_orphans(records: &[PlanetRecord]) -> usize {
    let count = records.iter().filter(|r| r.is_orphan()).count();
    debug!("Counted {} orphan planets in {} records", count, records.len());
    count
}

/// Identifier of the planet orbiting the hottest host star.
///
/// Records without a temperature are skipped. When several records share
/// the maximum temperature the earliest one wins. Returns an empty string
/// if no record has a temperature.
pub fn hottest_star_planet(records: &[PlanetRecord]) -> String {
    let mut hottest: Option<(&PlanetRecord, f64)> = None;

    for record in records {
        let Some(temp) = record.host_star_temp_k else {
            continue;
        };
        match hottest {
            Some((_, max)) if temp <= max => {}
            _ => hottest = Some((record, temp)),
        }
    }

    match hottest {
        Some((record, temp)) => {
            debug!(
                "Hottest host star is {}K ({})",
                temp, record.planet_identifier
            );
            record.planet_identifier.clone()
        }
        None => String::new(),
    }
}

/// Build the discovery timeline grouped by planet size.
///
/// Only the empty-string year marker is dropped. `null`, absent and
/// non-numeric years each form their own group, ordered by their text
/// with absent years last. Records with an unknown radius still register
/// their year but land in no size bucket.
pub fn build_timeline(records: &[PlanetRecord]) -> Timeline {
    let mut by_year: BTreeMap<DiscoveryYear, YearTally> = BTreeMap::new();

    for record in records {
        if record.discovery_year.is_blank() {
            continue;
        }
        let tally = by_year
            .entry(record.discovery_year.clone())
            .or_insert_with(|| YearTally::new(record.discovery_year.clone()));
        if let Some(class) = record.size_class() {
            tally.record(class);
        }
    }

    let entries: Vec<YearTally> = by_year.into_values().collect();
    for tally in &entries {
        debug!(
            "In {} we discovered {} small planets, {} medium planets and {} large planets",
            tally.year, tally.small, tally.medium, tally.large
        );
    }

    Timeline { entries }
}
