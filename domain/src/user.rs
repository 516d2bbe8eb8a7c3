use crate::error::Error;
use crate::users;
use entity_api::{query, IntoQueryFilterMap};
use sea_orm::DatabaseConnection;

pub use entity_api::user::{create, find_by_email, find_by_id, find_or_create_by_email};

pub async fn find_by(
    db: &DatabaseConnection,
    params: impl IntoQueryFilterMap,
) -> Result<Vec<users::Model>, Error> {
    let users =
        query::find_by::<users::Entity, users::Column>(db, params.into_query_filter_map()).await?;

    Ok(users)
}
