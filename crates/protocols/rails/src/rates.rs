//! Read-only views of the rate table
//!
//! The engine never fetches rates. Whatever feeds the table (config file,
//! operator reload, an upstream rate service) does so at the boundary and
//! hands the result in.

use chrono::{DateTime, Utc};
use railwise_core::RateTable;
use serde::{Deserialize, Serialize};

/// Rate table stamped with where and when it was read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatesSnapshot {
    #[serde(flatten)]
    pub rates: RateTable,
    pub last_updated: DateTime<Utc>,
    pub source: String,
}

/// Snapshot of `rates` as of `now`
pub fn current_rates(rates: &RateTable, now: DateTime<Utc>, source: &str) -> RatesSnapshot {
    RatesSnapshot {
        rates: *rates,
        last_updated: now,
        source: source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_snapshot_is_flat() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 12, 0, 0).unwrap();
        let snapshot = current_rates(&RateTable::default(), now, "revolut");
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["gbpToUsd"], 1.2685);
        assert_eq!(json["usdtToNgn"], 1578.25);
        assert_eq!(json["source"], "revolut");
        assert_eq!(json["lastUpdated"], "2025-01-15T12:00:00Z");
    }
}
