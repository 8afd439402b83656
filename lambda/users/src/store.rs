use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use lambda_http::tracing::warn;
use thiserror::Error;

use crate::record::Item;

/// Partition key attribute of the users table.
pub const KEY_ATTRIBUTE: &str = "email";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("conditional check failed")]
    ConditionFailed,
    #[error("store request failed: {0}")]
    Backend(String),
}

/// Guard applied to a put.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutCondition {
    /// Only write when no record with the same key exists.
    IfAbsent,
    /// Only write over an existing record.
    IfPresent,
}

impl PutCondition {
    fn expression(self) -> String {
        match self {
            PutCondition::IfAbsent => format!("attribute_not_exists({KEY_ATTRIBUTE})"),
            PutCondition::IfPresent => format!("attribute_exists({KEY_ATTRIBUTE})"),
        }
    }
}

/// The four table primitives the repository is built on.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_item(&self, email: &str) -> Result<Option<Item>, StoreError>;

    async fn scan(&self) -> Result<Vec<Item>, StoreError>;

    async fn put_item(&self, item: Item, condition: PutCondition) -> Result<(), StoreError>;

    async fn delete_item(&self, email: &str) -> Result<(), StoreError>;
}

pub struct DynamoUserStore {
    client: Client,
    table_name: String,
}

impl DynamoUserStore {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

fn backend<E>(err: E) -> StoreError
where
    E: std::error::Error,
{
    StoreError::Backend(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl UserStore for DynamoUserStore {
    async fn get_item(&self, email: &str) -> Result<Option<Item>, StoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, AttributeValue::S(email.to_string()))
            .send()
            .await
            .map_err(backend)?;

        Ok(output.item)
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .send()
            .await
            .map_err(backend)?;

        if output.last_evaluated_key.is_some() {
            warn!(table = %self.table_name, "scan truncated, returning first page only");
        }

        Ok(output.items.unwrap_or_default())
    }

    async fn put_item(&self, item: Item, condition: PutCondition) -> Result<(), StoreError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression(condition.expression())
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Err(StoreError::ConditionFailed)
            }
            Err(err) => Err(backend(err)),
        }
    }

    async fn delete_item(&self, email: &str) -> Result<(), StoreError> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, AttributeValue::S(email.to_string()))
            .send()
            .await
            .map_err(backend)?;

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conditions_render_key_expressions() {
        assert_eq!(
            PutCondition::IfAbsent.expression(),
            "attribute_not_exists(email)"
        );
        assert_eq!(PutCondition::IfPresent.expression(), "attribute_exists(email)");
    }
}
