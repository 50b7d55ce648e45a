//! Lazy per-partition record reader.
//!
//! A partition expands to an ordered list of sub-units — one (region, month)
//! fetch-and-page cycle each. The reader buffers one upstream page at a time
//! in a FIFO queue and exposes a pull-one-record interface; when the queue
//! and the sub-unit list are both exhausted the partition has ended.

use crate::api::{DealApiClient, RawDealRecord};
use crate::errors::IngestError;
use crate::plan::PartitionKey;
use crate::regions::RegionTable;
use std::collections::VecDeque;
use std::sync::Arc;

/// One (region, month) fetch-and-page cycle inside a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubUnit {
    /// 5-character district code.
    pub region: String,
    /// Contract-month token (`YYYYMM`).
    pub yymm: String,
}

#[derive(Debug)]
struct SubUnitCursor {
    unit: SubUnit,
    next_page: u32,
    fetched: u64,
}

impl SubUnitCursor {
    fn new(unit: SubUnit) -> Self {
        Self {
            unit,
            next_page: 1,
            fetched: 0,
        }
    }
}

/// Streams raw records for one partition, one upstream page at a time.
///
/// The reader does not retry: a fetch failure abandons the remainder of the
/// offending sub-unit and surfaces the typed error, so the caller's skip
/// policy decides what it costs and a subsequent [`next`](Self::next)
/// resumes with the next sub-unit.
pub struct PartitionReader {
    client: Arc<dyn DealApiClient>,
    sub_units: VecDeque<SubUnit>,
    current: Option<SubUnitCursor>,
    queue: VecDeque<RawDealRecord>,
    finished: bool,
}

impl PartitionReader {
    /// Builds a reader for one partition key.
    ///
    /// A month key expands over every region of the table in insertion
    /// order; a (region, month) key carries exactly one sub-unit.
    #[must_use]
    pub fn new(client: Arc<dyn DealApiClient>, key: &PartitionKey, regions: &RegionTable) -> Self {
        let sub_units: VecDeque<SubUnit> = match key {
            PartitionKey::Month { yymm } => regions
                .codes()
                .map(|code| SubUnit {
                    region: code.to_string(),
                    yymm: yymm.clone(),
                })
                .collect(),
            PartitionKey::RegionMonth { region, yymm } => {
                let mut units = VecDeque::with_capacity(1);
                units.push_back(SubUnit {
                    region: region.clone(),
                    yymm: yymm.clone(),
                });
                units
            }
        };
        Self::from_sub_units(client, sub_units)
    }

    /// Builds a reader over an explicit sub-unit list.
    #[must_use]
    pub fn from_sub_units(
        client: Arc<dyn DealApiClient>,
        sub_units: impl Into<VecDeque<SubUnit>>,
    ) -> Self {
        Self {
            client,
            sub_units: sub_units.into(),
            current: None,
            queue: VecDeque::new(),
            finished: false,
        }
    }

    /// Returns the number of sub-units not yet started.
    #[must_use]
    pub fn remaining_sub_units(&self) -> usize {
        self.sub_units.len()
    }

    /// Pulls the next raw record, fetching a page when the buffer runs dry.
    ///
    /// Returns `Ok(None)` once the partition is exhausted; the end state is
    /// idempotent. Records come out in upstream page order (FIFO).
    pub async fn next(&mut self) -> Result<Option<RawDealRecord>, IngestError> {
        loop {
            if let Some(record) = self.queue.pop_front() {
                return Ok(Some(record));
            }
            if self.finished {
                return Ok(None);
            }

            if self.current.is_none() {
                match self.sub_units.pop_front() {
                    Some(unit) => self.current = Some(SubUnitCursor::new(unit)),
                    None => {
                        self.finished = true;
                        return Ok(None);
                    }
                }
            }

            let (region, yymm, page_no) = match self.current.as_ref() {
                Some(cursor) => (
                    cursor.unit.region.clone(),
                    cursor.unit.yymm.clone(),
                    cursor.next_page,
                ),
                None => continue,
            };

            let client = Arc::clone(&self.client);
            match client.fetch_page(&region, &yymm, page_no).await {
                Ok(page) => {
                    let rows = page.records.len() as u64;
                    let total = u64::from(page.total_count);
                    self.queue.extend(page.records);
                    if let Some(cursor) = self.current.as_mut() {
                        cursor.fetched += rows;
                        cursor.next_page += 1;
                        if rows == 0 || cursor.fetched >= total {
                            self.current = None;
                        }
                    }
                }
                Err(err) => {
                    // Abandon the offending sub-unit so the caller can
                    // resume with the next one.
                    self.current = None;
                    tracing::warn!(
                        region = %region,
                        yymm = %yymm,
                        page_no = page_no,
                        error = %err,
                        "page fetch failed"
                    );
                    return Err(err);
                }
            }
        }
    }
}

impl std::fmt::Debug for PartitionReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartitionReader")
            .field("remaining_sub_units", &self.sub_units.len())
            .field("buffered", &self.queue.len())
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::DealPage;
    use parking_lot::Mutex;

    /// A client that replays a fixed script of page results, in call order.
    struct ScriptedClient {
        script: Mutex<VecDeque<Result<DealPage, IngestError>>>,
        calls: Mutex<Vec<(String, String, u32)>>,
    }

    impl ScriptedClient {
        fn new(script: Vec<Result<DealPage, IngestError>>) -> Self {
            Self {
                script: Mutex::new(script.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<(String, String, u32)> {
            self.calls.lock().clone()
        }
    }

    #[async_trait::async_trait]
    impl DealApiClient for ScriptedClient {
        async fn fetch_page(
            &self,
            region: &str,
            yymm: &str,
            page_no: u32,
        ) -> Result<DealPage, IngestError> {
            self.calls
                .lock()
                .push((region.to_string(), yymm.to_string(), page_no));
            self.script
                .lock()
                .pop_front()
                .unwrap_or_else(|| Ok(DealPage::default()))
        }
    }

    fn record(name: &str) -> RawDealRecord {
        RawDealRecord {
            name: name.to_string(),
            ..RawDealRecord::default()
        }
    }

    fn page(names: &[&str], total: u32) -> DealPage {
        DealPage {
            records: names.iter().map(|n| record(n)).collect(),
            page_no: 0,
            num_of_rows: 10,
            total_count: total,
        }
    }

    fn region_month_key() -> PartitionKey {
        PartitionKey::RegionMonth {
            region: "11500".to_string(),
            yymm: "202304".to_string(),
        }
    }

    async fn drain(reader: &mut PartitionReader) -> Vec<String> {
        let mut names = Vec::new();
        while let Some(raw) = reader.next().await.unwrap() {
            names.push(raw.name);
        }
        names
    }

    #[tokio::test]
    async fn test_two_pages_then_end() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok(page(&["a", "b", "c", "d", "e", "f"], 1245)),
            Ok(page(&[], 1245)),
        ]));
        let mut reader =
            PartitionReader::new(client.clone(), &region_month_key(), &RegionTable::default());

        let names = drain(&mut reader).await;
        assert_eq!(names, vec!["a", "b", "c", "d", "e", "f"]);

        // Page 1 was incomplete against the total, so page 2 was tried.
        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ("11500".to_string(), "202304".to_string(), 1));
        assert_eq!(calls[1], ("11500".to_string(), "202304".to_string(), 2));
    }

    #[tokio::test]
    async fn test_end_of_partition_is_idempotent() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(page(&["a"], 1))]));
        let mut reader = PartitionReader::new(client, &region_month_key(), &RegionTable::default());

        assert!(reader.next().await.unwrap().is_some());
        assert!(reader.next().await.unwrap().is_none());
        assert!(reader.next().await.unwrap().is_none());
        assert!(reader.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_total_count_stops_paging() {
        // One page satisfies the reported total; no second fetch happens.
        let client = Arc::new(ScriptedClient::new(vec![Ok(page(&["a", "b"], 2))]));
        let mut reader =
            PartitionReader::new(client.clone(), &region_month_key(), &RegionTable::default());

        let names = drain(&mut reader).await;
        assert_eq!(names.len(), 2);
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_month_key_walks_regions_in_order() {
        let regions = RegionTable::parse(
            "header\n1150000000\tSeoul Gangseo-gu\n2644000000\tBusan Gangseo-gu\n",
        );
        let client = Arc::new(ScriptedClient::new(vec![
            Ok(page(&["a"], 1)),
            Ok(page(&["b"], 1)),
        ]));
        let key = PartitionKey::Month {
            yymm: "202304".to_string(),
        };
        let mut reader = PartitionReader::new(client.clone(), &key, &regions);
        assert_eq!(reader.remaining_sub_units(), 2);

        let names = drain(&mut reader).await;
        assert_eq!(names, vec!["a", "b"]);

        let calls = client.calls();
        assert_eq!(calls[0].0, "11500");
        assert_eq!(calls[1].0, "26440");
        assert!(calls.iter().all(|(_, yymm, _)| yymm == "202304"));
    }

    #[tokio::test]
    async fn test_fetch_error_abandons_sub_unit_and_surfaces() {
        let regions = RegionTable::parse(
            "header\n1150000000\tSeoul Gangseo-gu\n2644000000\tBusan Gangseo-gu\n",
        );
        let client = Arc::new(ScriptedClient::new(vec![
            Err(IngestError::UpstreamServer { status: 503 }),
            Ok(page(&["b"], 1)),
        ]));
        let key = PartitionKey::Month {
            yymm: "202304".to_string(),
        };
        let mut reader = PartitionReader::new(client, &key, &regions);

        let err = reader.next().await.unwrap_err();
        assert!(err.is_skippable());

        // The failed region was abandoned; the next call resumes with the
        // second region.
        let raw = reader.next().await.unwrap();
        assert_eq!(raw.map(|r| r.name), Some("b".to_string()));
        assert!(reader.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_emitted_count_equals_page_size_sum() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok(page(&["a", "b", "c"], 5)),
            Ok(page(&["d", "e"], 5)),
        ]));
        let mut reader = PartitionReader::new(client, &region_month_key(), &RegionTable::default());

        let names = drain(&mut reader).await;
        assert_eq!(names.len(), 5);
    }

    #[tokio::test]
    async fn test_empty_partition_emits_nothing() {
        let client = Arc::new(ScriptedClient::new(vec![Ok(page(&[], 0))]));
        let mut reader = PartitionReader::new(client, &region_month_key(), &RegionTable::default());

        assert!(reader.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_month_key_with_empty_region_table_ends_immediately() {
        let client = Arc::new(ScriptedClient::new(vec![]));
        let key = PartitionKey::Month {
            yymm: "202304".to_string(),
        };
        let mut reader = PartitionReader::new(client.clone(), &key, &RegionTable::default());

        assert!(reader.next().await.unwrap().is_none());
        assert!(client.calls().is_empty());
    }
}
