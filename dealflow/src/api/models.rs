//! Wire types for the upstream transaction API.
//!
//! The provider wraps every page in a `response.header` / `response.body`
//! envelope. Record fields arrive under the provider's Korean names and may
//! be rendered as JSON strings or bare numbers depending on the field and
//! the row; both decode to the string form used downstream.

use serde::{Deserialize, Deserializer, Serialize};

/// Result code the provider uses for a successful envelope.
pub const SUCCESS_RESULT_CODE: &str = "00";

fn de_scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// One raw transaction row as received from the provider.
///
/// Every field is kept in its string form; absent fields decode as empty
/// strings. Trade-only and rent-only fields share one superset shape, since
/// the trade and rent endpoints return overlapping row schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDealRecord {
    /// 갱신요구권사용 — renewal-right usage flag.
    #[serde(rename = "갱신요구권사용", default, deserialize_with = "de_scalar")]
    pub request_renewal_right: String,
    /// 건축년도 — construction year.
    #[serde(rename = "건축년도", default, deserialize_with = "de_scalar")]
    pub construct_year: String,
    /// 계약구분 — contract type.
    #[serde(rename = "계약구분", default, deserialize_with = "de_scalar")]
    pub contract_type: String,
    /// 계약기간 — contract period.
    #[serde(rename = "계약기간", default, deserialize_with = "de_scalar")]
    pub contract_period: String,
    /// 년 — contract year.
    #[serde(rename = "년", default, deserialize_with = "de_scalar")]
    pub contract_year: String,
    /// 아파트 — apartment name.
    #[serde(rename = "아파트", default, deserialize_with = "de_scalar")]
    pub name: String,
    /// 법정동 — legal-dong name.
    #[serde(rename = "법정동", default, deserialize_with = "de_scalar")]
    pub legal_dong: String,
    /// 보증금액 — deposit amount.
    #[serde(rename = "보증금액", default, deserialize_with = "de_scalar")]
    pub deposit: String,
    /// 시군구 — si/gun/gu name.
    #[serde(rename = "시군구", default, deserialize_with = "de_scalar")]
    pub si_gun_gu: String,
    /// 월 — contract month.
    #[serde(rename = "월", default, deserialize_with = "de_scalar")]
    pub month: String,
    /// 월세금액 — monthly rent amount.
    #[serde(rename = "월세금액", default, deserialize_with = "de_scalar")]
    pub monthly_rent: String,
    /// 일 — contract day.
    #[serde(rename = "일", default, deserialize_with = "de_scalar")]
    pub day: String,
    /// 전용면적 — exclusive-use area.
    #[serde(rename = "전용면적", default, deserialize_with = "de_scalar")]
    pub exclusive_area: String,
    /// 종전계약보증금 — deposit under the prior contract.
    #[serde(rename = "종전계약보증금", default, deserialize_with = "de_scalar")]
    pub deposit_before: String,
    /// 종전계약월세 — monthly rent under the prior contract.
    #[serde(rename = "종전계약월세", default, deserialize_with = "de_scalar")]
    pub monthly_rent_before: String,
    /// 지번 — parcel number.
    #[serde(rename = "지번", default, deserialize_with = "de_scalar")]
    pub parcel_number: String,
    /// 지역코드 — district code.
    #[serde(rename = "지역코드", default, deserialize_with = "de_scalar")]
    pub region_code: String,
    /// 층 — floor.
    #[serde(rename = "층", default, deserialize_with = "de_scalar")]
    pub floor: String,
    /// 거래금액 — deal amount.
    #[serde(rename = "거래금액", default, deserialize_with = "de_scalar")]
    pub deal_amount: String,
    /// 해제여부 — cancelled-deal flag.
    #[serde(rename = "해제여부", default, deserialize_with = "de_scalar")]
    pub cancel_deal_type: String,
    /// 해제사유발생일 — cancellation date.
    #[serde(rename = "해제사유발생일", default, deserialize_with = "de_scalar")]
    pub cancel_deal_day: String,
    /// 거래유형 — deal type (brokered or direct).
    #[serde(rename = "거래유형", default, deserialize_with = "de_scalar")]
    pub deal_type: String,
    /// 중개사소재지 — broker office address.
    #[serde(rename = "중개사소재지", default, deserialize_with = "de_scalar")]
    pub agent_address: String,
}

/// Result header of the response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiHeader {
    /// Provider result code; `"00"` on success.
    #[serde(rename = "resultCode", default)]
    pub result_code: String,
    /// Human-readable result message.
    #[serde(rename = "resultMsg", default)]
    pub result_msg: String,
}

/// The `items` node of the envelope body.
///
/// The provider renders this as an object with an `item` array, as an object
/// with a single `item` object when the page has one row, or as an empty
/// string when the page has none.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiItems {
    /// The raw records of this page.
    pub item: Vec<RawDealRecord>,
}

impl<'de> Deserialize<'de> for ApiItems {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        let item = match value {
            serde_json::Value::Object(mut map) => match map.remove("item") {
                Some(serde_json::Value::Array(rows)) => rows
                    .into_iter()
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(serde::de::Error::custom)?,
                Some(row @ serde_json::Value::Object(_)) => {
                    vec![serde_json::from_value(row).map_err(serde::de::Error::custom)?]
                }
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };
        Ok(Self { item })
    }
}

/// Payload and pagination portion of the response envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiBody {
    /// The page's records.
    #[serde(default)]
    pub items: ApiItems,
    /// Rows per page as echoed by the provider.
    #[serde(rename = "numOfRows", default)]
    pub num_of_rows: u32,
    /// 1-based page number.
    #[serde(rename = "pageNo", default)]
    pub page_no: u32,
    /// Total rows available for the query.
    #[serde(rename = "totalCount", default)]
    pub total_count: u32,
}

/// Inner `response` node of the envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiResponse {
    /// Result header.
    #[serde(default)]
    pub header: ApiHeader,
    /// Payload body.
    #[serde(default)]
    pub body: ApiBody,
}

/// The provider's full response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    /// The single `response` node.
    pub response: ApiResponse,
}

impl ApiEnvelope {
    /// Returns true if the envelope carries the success result code.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response.header.result_code == SUCCESS_RESULT_CODE
    }

    /// Converts the envelope into a fetched page.
    #[must_use]
    pub fn into_page(self) -> DealPage {
        let body = self.response.body;
        DealPage {
            records: body.items.item,
            page_no: body.page_no,
            num_of_rows: body.num_of_rows,
            total_count: body.total_count,
        }
    }
}

/// One fetched page of raw records plus its pagination metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealPage {
    /// Records in upstream response order.
    pub records: Vec<RawDealRecord>,
    /// 1-based page number.
    pub page_no: u32,
    /// Rows per page as echoed by the provider.
    pub num_of_rows: u32,
    /// Total rows available for the query.
    pub total_count: u32,
}

impl DealPage {
    /// Returns true if the page carries no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
