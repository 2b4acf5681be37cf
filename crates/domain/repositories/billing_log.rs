use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::billing_log::InsertBillingLogEntity;

#[async_trait]
#[automock]
pub trait BillingLogRepository {
    async fn append(&self, insert_billing_log_entity: InsertBillingLogEntity) -> Result<Uuid>;
}
