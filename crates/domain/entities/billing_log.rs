use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::billing_log;

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = billing_log)]
pub struct InsertBillingLogEntity {
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub amount: i32,
    pub currency: Option<String>,
    pub stripe_payment_intent_id: Option<String>,
    pub package_type: String,
    pub transaction_type: String,
    pub status: Option<String>,
    pub metadata: Option<serde_json::Value>,
}
