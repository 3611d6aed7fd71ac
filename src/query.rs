use anyhow::Context;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_dynamodb::types::AttributeValue;
use chrono::{DateTime, Utc};

use crate::config::QueryConfig;
use crate::reading::Reading;

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

pub const KEY_CONDITION: &str = "clientId = :clientId AND ts >= :start_date";

/// Lower sort key bound, in milliseconds, of a window ending at `now_millis`.
pub fn window_start(now_millis: i64, lookback_days: i64) -> i64 {
    now_millis.saturating_sub(lookback_days.saturating_mul(MILLIS_PER_DAY))
}

/// Single-page range query over one client's readings.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    pub table_name: String,
    pub client_id: String,
    pub start_millis: i64,
    pub limit: i32,
    pub consistent_read: bool,
    pub scan_forward: bool,
}

impl RangeQuery {
    pub fn new(config: &QueryConfig, now: DateTime<Utc>) -> Self {
        RangeQuery {
            table_name: config.table_name.clone(),
            client_id: config.client_id.clone(),
            start_millis: window_start(now.timestamp_millis(), config.lookback_days),
            limit: config.page_limit,
            consistent_read: config.consistent_read,
            scan_forward: true,
        }
    }

    pub fn key_condition(&self) -> &'static str {
        KEY_CONDITION
    }

    /// The bound is sent as a string attribute.
    pub fn start_date(&self) -> String {
        self.start_millis.to_string()
    }
}

#[allow(async_fn_in_trait)]
pub trait ReadingStore {
    /// Issues exactly one request; rows beyond the page limit are not fetched.
    async fn query(&self, query: &RangeQuery) -> Result<Vec<Reading>, anyhow::Error>;
}

#[derive(Debug, Clone)]
pub struct DynamoStore {
    client: Client,
}

impl DynamoStore {
    pub fn new(region: &str, credentials: Credentials) -> Self {
        DynamoStore {
            client: Client::from_conf(client_config(region, credentials).build()),
        }
    }
}

fn client_config(region: &str, credentials: Credentials) -> aws_sdk_dynamodb::config::Builder {
    aws_sdk_dynamodb::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .credentials_provider(credentials)
}

impl ReadingStore for DynamoStore {
    async fn query(&self, query: &RangeQuery) -> Result<Vec<Reading>, anyhow::Error> {
        let output = self
            .client
            .query()
            .table_name(&query.table_name)
            .limit(query.limit)
            .consistent_read(query.consistent_read)
            .scan_index_forward(query.scan_forward)
            .key_condition_expression(query.key_condition())
            .expression_attribute_values(":clientId", AttributeValue::S(query.client_id.clone()))
            .expression_attribute_values(":start_date", AttributeValue::S(query.start_date()))
            .send()
            .await
            .with_context(|| format!("Failed to query table {}", query.table_name))?;

        let items = output.items.unwrap_or_default();
        if output.last_evaluated_key.is_some() {
            log::warn!(
                "Result truncated at {} rows, remaining pages are not fetched",
                items.len()
            );
        }

        items
            .iter()
            .map(Reading::from_item)
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to decode query result")
    }
}
