pub(crate) mod catalog_controller;
pub(crate) mod category_controller;
pub(crate) mod category_item_controller;
pub(crate) mod health_check_controller;
pub(crate) mod session_controller;
