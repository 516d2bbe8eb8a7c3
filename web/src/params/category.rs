use serde::Deserialize;

/// Form body for creating a new category.
#[derive(Debug, Deserialize)]
pub(crate) struct NewCategoryParams {
    pub(crate) category_name: String,
}
