//! DynamoDB store backend.
//!
//! Maps the [`KeyValueStore`] contract onto a single DynamoDB table with
//! three global secondary indexes. Attribute layout:
//!
//! - `pk` / `sk` — primary partition and sort key (strings)
//! - `gsi1pk`/`gsi1sk`, `gsi2pk`/`gsi2sk`, `gsi3pk`/`gsi3sk` — index keys,
//!   present only when the item appears in that index (sparse indexes)
//! - `payload` — serialized entity document (binary)
//! - any other string attribute — scalar attributes visible to conditions
//!
//! The table's GSIs must be named `gsi1`, `gsi2`, `gsi3` and project all
//! attributes. No retries or timeouts are added here; the SDK's defaults
//! apply and failures propagate unchanged.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::error::ProvideErrorMetadata;
use aws_sdk_dynamodb::primitives::Blob;
use aws_sdk_dynamodb::types::{
    AttributeValue, DeleteRequest, PutRequest, WriteRequest as DynamoWriteRequest,
};
use aws_sdk_dynamodb::Client;
use tracing::{debug, warn};

use crate::condition::Condition;
use crate::error::{StoreError, StoreResult};
use crate::item::{IndexKeys, Item, ItemKey, SecondaryIndex};
use crate::query::{Query, QueryIndex, SortCondition};
use crate::write::{WriteRequest, MAX_BATCH_WRITE_REQUESTS};
use crate::KeyValueStore;

const ATTR_PK: &str = "pk";
const ATTR_SK: &str = "sk";
const ATTR_PAYLOAD: &str = "payload";

/// DynamoDB-backed [`KeyValueStore`].
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table: String,
}

impl DynamoStore {
    /// Create a store over an existing client and table.
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        let table = table.into();
        debug!(table = %table, "created dynamodb store");
        Self { client, table }
    }

    /// Create a store from ambient AWS configuration (env, profile, IMDS).
    pub async fn from_env(table: impl Into<String>) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(Client::new(&config), table)
    }

    fn index_attr_names(index: SecondaryIndex) -> (String, String) {
        (format!("{}pk", index.name()), format!("{}sk", index.name()))
    }

    fn to_attr_map(item: &Item) -> HashMap<String, AttributeValue> {
        let mut map = HashMap::new();
        map.insert(ATTR_PK.to_string(), AttributeValue::S(item.key.partition.clone()));
        map.insert(ATTR_SK.to_string(), AttributeValue::S(item.key.sort.clone()));
        for index in SecondaryIndex::ALL {
            if let Some(key) = item.index_keys.get(index) {
                let (pk_attr, sk_attr) = Self::index_attr_names(index);
                map.insert(pk_attr, AttributeValue::S(key.partition.clone()));
                map.insert(sk_attr, AttributeValue::S(key.sort.clone()));
            }
        }
        for (name, value) in &item.attributes {
            map.insert(name.clone(), AttributeValue::S(value.clone()));
        }
        map.insert(ATTR_PAYLOAD.to_string(), AttributeValue::B(Blob::new(item.payload.clone())));
        map
    }

    fn from_attr_map(map: &HashMap<String, AttributeValue>) -> StoreResult<Item> {
        let partition = map
            .get(ATTR_PK)
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| StoreError::internal("item missing pk attribute"))?;
        let sort = map
            .get(ATTR_SK)
            .and_then(|v| v.as_s().ok())
            .ok_or_else(|| StoreError::internal("item missing sk attribute"))?;
        let payload = map
            .get(ATTR_PAYLOAD)
            .and_then(|v| v.as_b().ok())
            .map(|blob| blob.as_ref().to_vec())
            .unwrap_or_default();

        let mut item = Item::new(ItemKey::new(partition.clone(), sort.clone()), payload);

        let mut index_keys = IndexKeys::default();
        for index in SecondaryIndex::ALL {
            let (pk_attr, sk_attr) = Self::index_attr_names(index);
            if let (Some(p), Some(s)) = (
                map.get(&pk_attr).and_then(|v| v.as_s().ok()),
                map.get(&sk_attr).and_then(|v| v.as_s().ok()),
            ) {
                let key = ItemKey::new(p.clone(), s.clone());
                match index {
                    SecondaryIndex::Gsi1 => index_keys.gsi1 = Some(key),
                    SecondaryIndex::Gsi2 => index_keys.gsi2 = Some(key),
                    SecondaryIndex::Gsi3 => index_keys.gsi3 = Some(key),
                }
            }
        }
        item.index_keys = index_keys;

        let index_attrs: Vec<String> = SecondaryIndex::ALL
            .iter()
            .flat_map(|index| {
                let (p, s) = Self::index_attr_names(*index);
                [p, s]
            })
            .collect();
        for (name, value) in map {
            if name == ATTR_PK || name == ATTR_SK || name == ATTR_PAYLOAD {
                continue;
            }
            if index_attrs.iter().any(|attr| attr == name) {
                continue;
            }
            if let Ok(s) = value.as_s() {
                item.attributes.insert(name.clone(), s.clone());
            }
        }

        Ok(item)
    }

    fn key_attr_map(key: &ItemKey) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (ATTR_PK.to_string(), AttributeValue::S(key.partition.clone())),
            (ATTR_SK.to_string(), AttributeValue::S(key.sort.clone())),
        ])
    }

    /// Translate a [`Condition`] into a DynamoDB condition expression with
    /// its attribute name/value maps.
    fn condition_expression(
        condition: &Condition,
    ) -> (String, Option<HashMap<String, String>>, Option<HashMap<String, AttributeValue>>) {
        match condition {
            Condition::NotExists => ("attribute_not_exists(pk)".to_string(), None, None),
            Condition::AttributeEquals { name, value } => (
                "#attr = :val".to_string(),
                Some(HashMap::from([("#attr".to_string(), name.clone())])),
                Some(HashMap::from([(
                    ":val".to_string(),
                    AttributeValue::S(value.clone()),
                )])),
            ),
            Condition::NotExistsOrLessThan { name, value } => (
                "attribute_not_exists(pk) OR #attr < :val".to_string(),
                Some(HashMap::from([("#attr".to_string(), name.clone())])),
                Some(HashMap::from([(
                    ":val".to_string(),
                    AttributeValue::S(value.clone()),
                )])),
            ),
        }
    }
}

/// Map an SDK error to the store taxonomy by service error code.
fn map_sdk_error(key: &str, err: impl ProvideErrorMetadata + std::fmt::Display) -> StoreError {
    match err.code() {
        Some("ConditionalCheckFailedException") => StoreError::condition_failed(key),
        Some("ProvisionedThroughputExceededException")
        | Some("ThrottlingException")
        | Some("RequestLimitExceeded") => StoreError::throttled(err.to_string()),
        _ => StoreError::unavailable(err.to_string()),
    }
}

#[async_trait]
impl KeyValueStore for DynamoStore {
    async fn get(&self, key: &ItemKey) -> StoreResult<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table)
            .set_key(Some(Self::key_attr_map(key)))
            .send()
            .await
            .map_err(|e| map_sdk_error(&key.to_string(), e))?;

        match output.item {
            Some(map) => Ok(Some(Self::from_attr_map(&map)?)),
            None => Ok(None),
        }
    }

    async fn put(&self, item: Item) -> StoreResult<()> {
        let key = item.key.to_string();
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(Self::to_attr_map(&item)))
            .send()
            .await
            .map_err(|e| map_sdk_error(&key, e))?;
        Ok(())
    }

    async fn put_conditional(&self, item: Item, condition: Condition) -> StoreResult<()> {
        let key = item.key.to_string();
        let (expression, names, values) = Self::condition_expression(&condition);
        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(Self::to_attr_map(&item)))
            .condition_expression(expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .send()
            .await
            .map_err(|e| map_sdk_error(&key, e))?;
        Ok(())
    }

    async fn delete(&self, key: &ItemKey) -> StoreResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table)
            .set_key(Some(Self::key_attr_map(key)))
            .send()
            .await
            .map_err(|e| map_sdk_error(&key.to_string(), e))?;
        Ok(())
    }

    async fn delete_conditional(&self, key: &ItemKey, condition: Condition) -> StoreResult<()> {
        let (expression, names, values) = Self::condition_expression(&condition);
        self.client
            .delete_item()
            .table_name(&self.table)
            .set_key(Some(Self::key_attr_map(key)))
            .condition_expression(expression)
            .set_expression_attribute_names(names)
            .set_expression_attribute_values(values)
            .send()
            .await
            .map_err(|e| map_sdk_error(&key.to_string(), e))?;
        Ok(())
    }

    async fn query(&self, query: Query) -> StoreResult<Vec<Item>> {
        let (index_name, pk_attr, sk_attr) = match query.index {
            QueryIndex::Primary => (None, ATTR_PK.to_string(), ATTR_SK.to_string()),
            QueryIndex::Secondary(index) => {
                let (pk, sk) = Self::index_attr_names(index);
                (Some(index.name().to_string()), pk, sk)
            },
        };

        let mut names = HashMap::from([("#pk".to_string(), pk_attr)]);
        let mut values =
            HashMap::from([(":pk".to_string(), AttributeValue::S(query.partition.clone()))]);
        let mut expression = "#pk = :pk".to_string();

        if let Some(sort) = &query.sort {
            names.insert("#sk".to_string(), sk_attr);
            match sort {
                SortCondition::BeginsWith(prefix) => {
                    expression.push_str(" AND begins_with(#sk, :sk)");
                    values.insert(":sk".to_string(), AttributeValue::S(prefix.clone()));
                },
                SortCondition::Between(low, high) => {
                    expression.push_str(" AND #sk BETWEEN :lo AND :hi");
                    values.insert(":lo".to_string(), AttributeValue::S(low.clone()));
                    values.insert(":hi".to_string(), AttributeValue::S(high.clone()));
                },
                SortCondition::AtMost(high) => {
                    expression.push_str(" AND #sk <= :hi");
                    values.insert(":hi".to_string(), AttributeValue::S(high.clone()));
                },
            }
        }

        let mut items = Vec::new();
        let mut exclusive_start_key = None;
        loop {
            let mut request = self
                .client
                .query()
                .table_name(&self.table)
                .key_condition_expression(expression.clone())
                .set_expression_attribute_names(Some(names.clone()))
                .set_expression_attribute_values(Some(values.clone()))
                .scan_index_forward(!query.descending)
                .set_exclusive_start_key(exclusive_start_key.take());
            if let Some(name) = &index_name {
                request = request.index_name(name);
            }
            if let Some(limit) = query.limit {
                request = request.limit(limit as i32);
            }

            let output = request
                .send()
                .await
                .map_err(|e| map_sdk_error(&query.partition, e))?;

            for map in output.items() {
                items.push(Self::from_attr_map(map)?);
                if let Some(limit) = query.limit {
                    if items.len() >= limit {
                        return Ok(items);
                    }
                }
            }

            match output.last_evaluated_key {
                Some(key) => exclusive_start_key = Some(key),
                None => break,
            }
        }

        Ok(items)
    }

    async fn batch_write(&self, requests: Vec<WriteRequest>) -> StoreResult<()> {
        if requests.len() > MAX_BATCH_WRITE_REQUESTS {
            return Err(StoreError::BatchTooLarge {
                given: requests.len(),
                limit: MAX_BATCH_WRITE_REQUESTS,
            });
        }

        let mut dynamo_requests = Vec::with_capacity(requests.len());
        for request in &requests {
            let built = match request {
                WriteRequest::Put(item) => {
                    let put = PutRequest::builder()
                        .set_item(Some(Self::to_attr_map(item)))
                        .build()
                        .map_err(|e| StoreError::internal(e.to_string()))?;
                    DynamoWriteRequest::builder().put_request(put).build()
                },
                WriteRequest::Delete(key) => {
                    let delete = DeleteRequest::builder()
                        .set_key(Some(Self::key_attr_map(key)))
                        .build()
                        .map_err(|e| StoreError::internal(e.to_string()))?;
                    DynamoWriteRequest::builder().delete_request(delete).build()
                },
            };
            dynamo_requests.push(built);
        }

        let output = self
            .client
            .batch_write_item()
            .request_items(&self.table, dynamo_requests)
            .send()
            .await
            .map_err(|e| map_sdk_error(&self.table, e))?;

        // Unprocessed items mean the store shed load mid-call. This layer
        // does not retry; surface it as throttling.
        if let Some(unprocessed) = output.unprocessed_items {
            let remaining: usize = unprocessed.values().map(Vec::len).sum();
            if remaining > 0 {
                warn!(remaining, table = %self.table, "batch write returned unprocessed items");
                return Err(StoreError::throttled(format!(
                    "{} of {} batch requests were not processed",
                    remaining,
                    requests.len()
                )));
            }
        }

        Ok(())
    }

    async fn scan(&self) -> StoreResult<Vec<Item>> {
        let mut items = Vec::new();
        let mut exclusive_start_key = None;
        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(exclusive_start_key.take())
                .send()
                .await
                .map_err(|e| map_sdk_error(&self.table, e))?;

            for map in output.items() {
                items.push(Self::from_attr_map(map)?);
            }

            match output.last_evaluated_key {
                Some(key) => exclusive_start_key = Some(key),
                None => break,
            }
        }
        Ok(items)
    }
}
