use domain::{Id, IntoQueryFilterMap, QueryFilterMap};
use sea_orm::Value;
use serde::Deserialize;
use utoipa::IntoParams;

/// Form body for creating a new catalog item. The category is chosen by name
/// from a select box on the form.
#[derive(Debug, Deserialize)]
pub(crate) struct NewItemParams {
    pub(crate) item_name: String,
    pub(crate) description: Option<String>,
    pub(crate) category: String,
}

/// Form body for editing an existing item. Empty fields leave the stored
/// value unchanged. A category name, when given, moves the item into that
/// category.
#[derive(Debug, Deserialize)]
pub(crate) struct EditItemParams {
    pub(crate) item_name: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) category: Option<String>,
}

impl EditItemParams {
    /// Browsers submit unfilled text inputs as empty strings; fold those into
    /// `None` so the update leaves the stored value alone.
    pub(crate) fn normalized(self) -> (Option<String>, Option<String>, Option<String>) {
        (
            self.item_name.filter(|name| !name.is_empty()),
            self.description.filter(|description| !description.is_empty()),
            self.category.filter(|category| !category.is_empty()),
        )
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub(crate) struct IndexParams {
    #[param(value_type = Uuid)]
    pub(crate) category_id: Id,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert(
            "category_id".to_string(),
            Some(Value::Uuid(Some(Box::new(self.category_id)))),
        );

        query_filter_map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_folds_empty_strings_into_none() {
        let params = EditItemParams {
            item_name: Some("".to_string()),
            description: Some("Waxed and tuned".to_string()),
            category: Some("".to_string()),
        };

        let (item_name, description, category) = params.normalized();
        assert_eq!(item_name, None);
        assert_eq!(description.as_deref(), Some("Waxed and tuned"));
        assert_eq!(category, None);
    }
}
