use super::error::{EntityApiErrorKind, Error};
use entity::categories::{ActiveModel, Column, Entity, Model};
use entity::Id;
use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder, Set};

use log::*;

pub async fn create(
    db: &DatabaseConnection,
    category_model: Model,
    user_id: Id,
) -> Result<Model, Error> {
    debug!("New Category Model to be inserted: {:?}", category_model);

    let now = chrono::Utc::now();

    let category_active_model: ActiveModel = ActiveModel {
        id: Set(Id::new_v4()),
        category_name: Set(category_model.category_name),
        user_id: Set(user_id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(category_active_model.insert(db).await?)
}

pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_asc(Column::CategoryName)
        .all(db)
        .await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Exact-match lookup by display name. Zero rows is a structured
/// `RecordNotFound`, never a panic.
pub async fn find_by_name(db: &DatabaseConnection, name: &str) -> Result<Model, Error> {
    Entity::find()
        .filter(Column::CategoryName.eq(name))
        .one(db)
        .await?
        .ok_or_else(|| Error {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        })
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let result = find_by_id(db, id).await?;

    result.delete(db).await?;
    Ok(())
}
