use super::error::{EntityApiErrorKind, Error};
use entity::category_items::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, QuerySelect,
};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    item_model: Model,
    user_id: Id,
) -> Result<Model, Error> {
    debug!("New CategoryItem Model to be inserted: {:?}", item_model);

    let now = chrono::Utc::now();

    let item_active_model: ActiveModel = ActiveModel {
        id: Set(Id::new_v4()),
        category_id: Set(item_model.category_id),
        item_name: Set(item_model.item_name),
        description: Set(item_model.description),
        user_id: Set(user_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(item_active_model.insert(db).await?)
}

/// Applies a partial update: `None` fields leave the stored value unchanged.
/// The owning `user_id` is never updatable.
pub async fn update(
    db: &DatabaseConnection,
    id: Id,
    item_name: Option<String>,
    description: Option<String>,
    category_id: Option<Id>,
) -> Result<Model, Error> {
    let existing = find_by_id(db, id).await?;

    debug!("Existing CategoryItem model to be updated: {:?}", existing);

    let active_model: ActiveModel = ActiveModel {
        id: Unchanged(existing.id),
        category_id: match category_id {
            Some(category_id) => Set(category_id),
            None => Unchanged(existing.category_id),
        },
        item_name: match item_name {
            Some(item_name) => Set(item_name),
            None => Unchanged(existing.item_name),
        },
        description: match description {
            Some(description) => Set(Some(description)),
            None => Unchanged(existing.description),
        },
        user_id: Unchanged(existing.user_id),
        created_at: Unchanged(existing.created_at),
        updated_at: Set(chrono::Utc::now().into()),
    };

    Ok(active_model.update(db).await?)
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let result = find_by_id(db, id).await?;

    result.delete(db).await?;
    Ok(())
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Exact-match lookup by display name within one category. Zero rows is a
/// structured `RecordNotFound`, never a panic.
pub async fn find_by_name(
    db: &DatabaseConnection,
    name: &str,
    category_id: Id,
) -> Result<Model, Error> {
    Entity::find()
        .filter(Column::ItemName.eq(name))
        .filter(Column::CategoryId.eq(category_id))
        .one(db)
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })
}

pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().order_by_asc(Column::ItemName).all(db).await?)
}

/// The most recently added items, newest first.
pub async fn find_latest(db: &DatabaseConnection, limit: u64) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await?)
}

pub async fn find_by_category(db: &DatabaseConnection, category_id: Id) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::CategoryId.eq(category_id))
        .order_by_asc(Column::ItemName)
        .all(db)
        .await?)
}
