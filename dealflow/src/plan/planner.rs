//! Partition-key planning.

use super::months::month_range;
use crate::config::{Epoch, IngestConfig, PartitionMode};
use crate::regions::RegionTable;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A unit of work assigned to one partition worker.
///
/// Keys are immutable value objects; the full set is generated once per job
/// and frozen before dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PartitionKey {
    /// One contract month; regions are walked inside the partition.
    Month {
        /// Contract-month token (`YYYYMM`).
        yymm: String,
    },
    /// One (district, contract month) pair.
    RegionMonth {
        /// 5-character district code.
        region: String,
        /// Contract-month token (`YYYYMM`).
        yymm: String,
    },
}

impl PartitionKey {
    /// Returns the contract-month token of this key.
    #[must_use]
    pub fn yymm(&self) -> &str {
        match self {
            Self::Month { yymm } | Self::RegionMonth { yymm, .. } => yymm,
        }
    }

    /// Returns the district code, if this key carries one.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        match self {
            Self::Month { .. } => None,
            Self::RegionMonth { region, .. } => Some(region),
        }
    }

    /// Returns a short label for logs and reports.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Month { yymm } => yymm.clone(),
            Self::RegionMonth { region, yymm } => format!("{region}-{yymm}"),
        }
    }
}

/// The frozen, ordered set of partition keys for one job run.
#[derive(Debug, Clone, Default)]
pub struct PartitionPlan {
    keys: Vec<PartitionKey>,
}

impl PartitionPlan {
    /// Creates a plan from an already-ordered key set.
    #[must_use]
    pub fn new(keys: Vec<PartitionKey>) -> Self {
        Self { keys }
    }

    /// Returns the number of partitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the plan has no partitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the keys in enumeration order.
    #[must_use]
    pub fn keys(&self) -> &[PartitionKey] {
        &self.keys
    }

    /// Consumes the plan, yielding the keys in enumeration order.
    #[must_use]
    pub fn into_keys(self) -> Vec<PartitionKey> {
        self.keys
    }
}

/// Computes the deterministic partition plan from the time range and the
/// region table.
///
/// Enumeration order is time ascending, then region insertion order; the
/// orchestrator makes no promise about execution order once partitions run
/// concurrently.
#[derive(Debug, Clone, Copy)]
pub struct PartitionPlanner {
    mode: PartitionMode,
    epoch: Epoch,
}

impl PartitionPlanner {
    /// Creates a planner.
    #[must_use]
    pub fn new(mode: PartitionMode, epoch: Epoch) -> Self {
        Self { mode, epoch }
    }

    /// Creates a planner from job configuration.
    #[must_use]
    pub fn from_config(config: &IngestConfig) -> Self {
        Self::new(config.mode, config.epoch)
    }

    /// Plans the partition space ending at the current calendar month.
    #[must_use]
    pub fn plan(&self, regions: &RegionTable) -> PartitionPlan {
        self.plan_at(regions, Utc::now().date_naive())
    }

    /// Plans the partition space ending at `today`'s month.
    ///
    /// Pure function of `today` and the region table, so the same calendar
    /// day always yields the same plan.
    #[must_use]
    pub fn plan_at(&self, regions: &RegionTable, today: NaiveDate) -> PartitionPlan {
        let months = month_range(self.epoch, today);
        let keys = match self.mode {
            PartitionMode::ByMonth => months
                .into_iter()
                .map(|yymm| PartitionKey::Month { yymm })
                .collect(),
            PartitionMode::Cross => months
                .iter()
                .flat_map(|yymm| {
                    regions.codes().map(move |region| PartitionKey::RegionMonth {
                        region: region.to_string(),
                        yymm: yymm.clone(),
                    })
                })
                .collect(),
        };
        PartitionPlan::new(keys)
    }
}
