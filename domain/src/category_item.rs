use crate::category_items::Model;
use crate::error::Error;
use entity_api::{category_items, query, IntoQueryFilterMap};
use sea_orm::DatabaseConnection;

pub use entity_api::category_item::{
    create, delete_by_id, find_all, find_by_category, find_by_id, find_by_name, find_latest,
    update,
};

pub async fn find_by(
    db: &DatabaseConnection,
    params: impl IntoQueryFilterMap,
) -> Result<Vec<Model>, Error> {
    let items = query::find_by::<category_items::Entity, category_items::Column>(
        db,
        params.into_query_filter_map(),
    )
    .await?;

    Ok(items)
}
