use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A named collection of catalog items owned by a single user.
///
/// Serializes to the public JSON shape `{id, category_name}`; the owner
/// and timestamps are never exposed through the JSON API.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = domain::categories::Model)] // OpenAPI schema
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Id,
    pub category_name: String,
    #[serde(skip_serializing, skip_deserializing)]
    pub user_id: Id,
    #[serde(skip_serializing, skip_deserializing)]
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_serializing, skip_deserializing)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
    #[sea_orm(has_many = "super::category_items::Entity")]
    CategoryItems,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::category_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
