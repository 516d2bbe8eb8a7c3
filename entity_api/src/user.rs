use super::error::{EntityApiErrorKind, Error};
use chrono::Utc;
use entity::users::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};

pub async fn create(db: &impl ConnectionTrait, user_model: Model) -> Result<Model, Error> {
    debug!("New User Model to be inserted: {user_model:?}");

    let now = Utc::now();
    let user_active_model: ActiveModel = ActiveModel {
        id: Set(Id::new_v4()),
        name: Set(user_model.name),
        email: Set(user_model.email),
        picture: Set(user_model.picture),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    };

    Ok(user_active_model.insert(db).await?)
}

pub async fn find_by_email(db: &impl ConnectionTrait, email: &str) -> Result<Option<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?)
}

pub async fn find_by_id(db: &impl ConnectionTrait, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

/// Resolves a verified external identity to a local user record.
///
/// Idempotent by email: resolving the same email twice returns the same
/// row and never inserts a duplicate.
pub async fn find_or_create_by_email(
    db: &impl ConnectionTrait,
    user_model: Model,
) -> Result<Model, Error> {
    match find_by_email(db, &user_model.email).await? {
        Some(existing_user) => Ok(existing_user),
        None => create(db, user_model).await,
    }
}
