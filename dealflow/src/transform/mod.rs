//! Raw-to-domain record mapping.

use crate::api::RawDealRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized real-estate transaction record.
///
/// Same semantic fields as the raw upstream row plus the server-assigned
/// ingestion timestamp. Identity is assigned by the sink on commit;
/// re-ingesting a partition inserts new rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealRecord {
    /// Construction year.
    pub construct_year: String,
    /// Contract year.
    pub contract_year: String,
    /// Apartment name.
    pub name: String,
    /// Legal-dong name.
    pub legal_dong: String,
    /// Si/gun/gu name.
    pub si_gun_gu: String,
    /// Contract month.
    pub month: String,
    /// Contract day.
    pub day: String,
    /// Exclusive-use area.
    pub exclusive_area: String,
    /// Parcel number.
    pub parcel_number: String,
    /// District code.
    pub region_code: String,
    /// Floor.
    pub floor: String,
    /// Deal amount.
    pub deal_amount: String,
    /// Cancelled-deal flag.
    pub cancel_deal_type: String,
    /// Cancellation date.
    pub cancel_deal_day: String,
    /// Deal type (brokered or direct).
    pub deal_type: String,
    /// Broker office address.
    pub agent_address: String,
    /// Renewal-right usage flag.
    pub request_renewal_right: String,
    /// Contract type.
    pub contract_type: String,
    /// Contract period.
    pub contract_period: String,
    /// Monthly rent amount.
    pub monthly_rent: String,
    /// Deposit amount.
    pub deposit: String,
    /// Deposit under the prior contract.
    pub deposit_before: String,
    /// Monthly rent under the prior contract.
    pub monthly_rent_before: String,
    /// Server-side ingestion timestamp.
    pub ingested_at: DateTime<Utc>,
}

/// Maps raw upstream rows into domain records.
///
/// Pure field-for-field mapping, except for one wall-clock read per call to
/// stamp the ingestion time. Absent optional fields pass through as empty
/// strings; nothing is validated, reordered, or dropped here.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordTransformer;

impl RecordTransformer {
    /// Creates a new transformer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Transforms one raw record.
    #[must_use]
    pub fn transform(&self, raw: &RawDealRecord) -> DealRecord {
        let now = Utc::now();
        DealRecord {
            construct_year: raw.construct_year.clone(),
            contract_year: raw.contract_year.clone(),
            name: raw.name.clone(),
            legal_dong: raw.legal_dong.clone(),
            si_gun_gu: raw.si_gun_gu.clone(),
            month: raw.month.clone(),
            day: raw.day.clone(),
            exclusive_area: raw.exclusive_area.clone(),
            parcel_number: raw.parcel_number.clone(),
            region_code: raw.region_code.clone(),
            floor: raw.floor.clone(),
            deal_amount: raw.deal_amount.clone(),
            cancel_deal_type: raw.cancel_deal_type.clone(),
            cancel_deal_day: raw.cancel_deal_day.clone(),
            deal_type: raw.deal_type.clone(),
            agent_address: raw.agent_address.clone(),
            request_renewal_right: raw.request_renewal_right.clone(),
            contract_type: raw.contract_type.clone(),
            contract_period: raw.contract_period.clone(),
            monthly_rent: raw.monthly_rent.clone(),
            deposit: raw.deposit.clone(),
            deposit_before: raw.deposit_before.clone(),
            monthly_rent_before: raw.monthly_rent_before.clone(),
            ingested_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_raw() -> RawDealRecord {
        RawDealRecord {
            construct_year: "2019".to_string(),
            contract_year: "2023".to_string(),
            name: "e편한세상염창".to_string(),
            legal_dong: "염창동".to_string(),
            month: "4".to_string(),
            day: "1".to_string(),
            exclusive_area: "59.8873".to_string(),
            parcel_number: "309".to_string(),
            region_code: "11500".to_string(),
            floor: "16".to_string(),
            deposit: "55,000".to_string(),
            monthly_rent: "0".to_string(),
            contract_type: "신규".to_string(),
            contract_period: "23.05~25.05".to_string(),
            ..RawDealRecord::default()
        }
    }

    #[test]
    fn test_transform_maps_every_field() {
        let raw = sample_raw();
        let record = RecordTransformer::new().transform(&raw);

        assert_eq!(record.construct_year, "2019");
        assert_eq!(record.contract_year, "2023");
        assert_eq!(record.name, "e편한세상염창");
        assert_eq!(record.legal_dong, "염창동");
        assert_eq!(record.month, "4");
        assert_eq!(record.day, "1");
        assert_eq!(record.exclusive_area, "59.8873");
        assert_eq!(record.parcel_number, "309");
        assert_eq!(record.region_code, "11500");
        assert_eq!(record.floor, "16");
        assert_eq!(record.deposit, "55,000");
        assert_eq!(record.monthly_rent, "0");
        assert_eq!(record.contract_type, "신규");
        assert_eq!(record.contract_period, "23.05~25.05");
    }

    #[test]
    fn test_absent_fields_pass_through_empty() {
        let record = RecordTransformer::new().transform(&sample_raw());

        assert_eq!(record.deal_amount, "");
        assert_eq!(record.cancel_deal_type, "");
        assert_eq!(record.agent_address, "");
    }

    #[test]
    fn test_transform_is_idempotent_up_to_timestamp() {
        let raw = sample_raw();
        let transformer = RecordTransformer::new();

        let first = transformer.transform(&raw);
        let mut second = transformer.transform(&raw);
        second.ingested_at = first.ingested_at;

        assert_eq!(first, second);
    }

    #[test]
    fn test_ingestion_timestamp_is_recent() {
        let before = Utc::now();
        let record = RecordTransformer::new().transform(&sample_raw());
        let after = Utc::now();

        assert!(record.ingested_at >= before);
        assert!(record.ingested_at <= after);
    }
}
