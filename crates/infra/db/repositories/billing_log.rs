use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, insert_into};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain;
use crate::infra::db::postgres::{postgres_connection::PgPoolSquad, schema::billing_log};
use domain::{
    entities::billing_log::InsertBillingLogEntity, repositories::billing_log::BillingLogRepository,
};

pub struct BillingLogPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl BillingLogPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl BillingLogRepository for BillingLogPostgres {
    async fn append(&self, insert_billing_log_entity: InsertBillingLogEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let id = insert_into(billing_log::table)
            .values(&insert_billing_log_entity)
            .returning(billing_log::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(id)
    }
}
