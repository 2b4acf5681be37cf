use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::users;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = users)]
pub struct UserEntity {
    pub id: Uuid,
    pub email: Option<String>,
    pub free_trial_used: Option<bool>,
    pub subscription_status: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserEntity {
    pub fn has_used_free_trial(&self) -> bool {
        self.free_trial_used.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct InsertUserEntity {
    pub id: Uuid,
    pub email: Option<String>,
}
