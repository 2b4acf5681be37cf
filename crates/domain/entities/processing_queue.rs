use diesel::prelude::*;
use uuid::Uuid;

use crate::infra::db::postgres::schema::processing_queue;

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = processing_queue)]
pub struct InsertProcessingRequestEntity {
    pub project_id: Uuid,
    pub image_id: Option<Uuid>,
    pub operation_type: String,
    pub payload: serde_json::Value,
}
