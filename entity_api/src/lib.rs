use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, Value};
use std::collections::HashMap;

pub use entity::{categories, category_items, users, Id};

pub mod category;
pub mod category_item;
pub mod error;
pub mod query;
pub mod user;

/// `QueryFilterMap` is a data structure that serves as a bridge for translating filter parameters
/// between different layers of the application. It is essentially a wrapper around a `HashMap`
/// where the keys are filter parameter names (as `String`) and the values are optional `Value` types
/// from `sea_orm`.
///
/// This structure is particularly useful in scenarios where you need to pass filter parameters
/// from a web request down to the database query layer in a type-safe and organized manner.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::QueryFilterMap;
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("category_id".to_string(), Some(Value::String(Some(Box::new("a_category_id".to_string())))));
/// let filter_value = query_filter_map.get("category_id");
/// ```
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }
}

impl Default for QueryFilterMap {
    fn default() -> Self {
        Self::new()
    }
}

/// `IntoQueryFilterMap` is a trait that provides a method for converting a struct into a `QueryFilterMap`.
/// This is particularly useful for translating data between different layers of the application,
/// such as from web request parameters to database query filters.
///
/// Implementing this trait for a struct allows you to define how the fields of the struct should be
/// mapped to the keys and values of the `QueryFilterMap`. This ensures that the data is passed
/// in a type-safe and organized manner.
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

/// Seeds the database with a demonstration user, a couple of categories and
/// a handful of items so that the freshly-migrated application has something
/// to render.
pub async fn seed_database(db: &DatabaseConnection) {
    let now = Utc::now();

    let demo_user = users::ActiveModel {
        id: Set(Id::new_v4()),
        name: Set("Demo User".to_owned()),
        email: Set("demo.user@example.com".to_owned()),
        picture: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .unwrap();

    let soccer = categories::ActiveModel {
        id: Set(Id::new_v4()),
        category_name: Set("Soccer".to_owned()),
        user_id: Set(demo_user.id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .unwrap();

    let snowboarding = categories::ActiveModel {
        id: Set(Id::new_v4()),
        category_name: Set("Snowboarding".to_owned()),
        user_id: Set(demo_user.id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(db)
    .await
    .unwrap();

    let items = [
        (soccer.id, "Shinguards", "Protective gear worn on the shins."),
        (soccer.id, "Cleats", "Footwear with studs for grass pitches."),
        (
            snowboarding.id,
            "Goggles",
            "Anti-fog lenses for low-visibility runs.",
        ),
        (
            snowboarding.id,
            "Snowboard",
            "All-mountain board, 158cm.",
        ),
    ];

    for (category_id, item_name, description) in items {
        category_items::ActiveModel {
            id: Set(Id::new_v4()),
            category_id: Set(category_id),
            item_name: Set(item_name.to_owned()),
            description: Set(Some(description.to_owned())),
            user_id: Set(demo_user.id),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(db)
        .await
        .unwrap();
    }
}
