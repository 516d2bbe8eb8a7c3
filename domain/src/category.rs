use crate::categories::Model;
use crate::error::Error;
use entity_api::{categories, query, IntoQueryFilterMap};
use sea_orm::DatabaseConnection;

pub use entity_api::category::{create, delete_by_id, find_all, find_by_id, find_by_name};

pub async fn find_by(
    db: &DatabaseConnection,
    params: impl IntoQueryFilterMap,
) -> Result<Vec<Model>, Error> {
    let categories = query::find_by::<categories::Entity, categories::Column>(
        db,
        params.into_query_filter_map(),
    )
    .await?;

    Ok(categories)
}
