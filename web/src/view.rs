//! Server-rendered HTML for the catalog pages.
//!
//! Pages are assembled from string fragments around a shared layout. Every
//! user-supplied value passes through [`escape`] before interpolation.

use domain::{categories, category_items, session::LoginSession};

/// Minimal HTML entity escaping for interpolated values.
pub(crate) fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

fn layout(title: &str, session: &LoginSession, body: &str) -> String {
    let nav_link = if session.is_authenticated() {
        let username = escape(session.username.as_deref().unwrap_or("user"));
        format!("<span>Logged in as {username}</span> <a href=\"/gdisconnect\">Logout</a>")
    } else {
        "<a href=\"/login\">Login</a>".to_string()
    };

    format!(
        "<!DOCTYPE html>\n\
        <html lang=\"en\">\n\
        <head>\n\
        <meta charset=\"utf-8\">\n\
        <title>{title}</title>\n\
        <link rel=\"stylesheet\" href=\"/styles.css\">\n\
        </head>\n\
        <body>\n\
        <header><h1><a href=\"/catalog\">Item Catalog</a></h1><nav>{nav_link}</nav></header>\n\
        <main>\n{body}\n</main>\n\
        </body>\n\
        </html>\n",
        title = escape(title),
    )
}

/// The login page. Embeds the anti-forgery state token and the provider's
/// authorization URL for the sign-in flow.
pub(crate) fn login_page(
    session: &LoginSession,
    authorization_url: &str,
    client_id: &str,
) -> String {
    let state_token = escape(session.state_token.as_deref().unwrap_or_default());
    let body = format!(
        "<h2>Sign in</h2>\n\
        <div id=\"signin\" data-state=\"{state_token}\" data-client-id=\"{client_id}\">\n\
        <a class=\"google-signin\" href=\"{authorization_url}\">Sign in with Google</a>\n\
        </div>\n",
        client_id = escape(client_id),
        authorization_url = escape(authorization_url),
    );
    layout("Login", session, &body)
}

/// Fragment returned to the sign-in widget after a successful connect.
pub(crate) fn welcome_fragment(session: &LoginSession) -> String {
    let username = escape(session.username.as_deref().unwrap_or("user"));
    let picture = session.picture.as_deref().map(escape).unwrap_or_default();
    format!(
        "<h2>Welcome, {username}!</h2>\n\
        <img src=\"{picture}\" alt=\"profile picture\" width=\"120\">\n"
    )
}

fn latest_items_list(
    latest: &[category_items::Model],
    category_names: &[(domain::Id, String)],
) -> String {
    let mut list = String::from("<ul class=\"latest-items\">\n");
    for item in latest {
        let category_name = category_names
            .iter()
            .find(|(id, _)| *id == item.category_id)
            .map(|(_, name)| name.as_str())
            .unwrap_or_default();
        list.push_str(&format!(
            "<li><a href=\"/catalog/{category}/{item}/\">{item}</a> ({category})</li>\n",
            category = escape(category_name),
            item = escape(&item.item_name),
        ));
    }
    list.push_str("</ul>\n");
    list
}

/// The home page: all categories plus the latest items. Authenticated
/// sessions additionally see the create links.
pub(crate) fn home_page(
    session: &LoginSession,
    categories: &[categories::Model],
    latest: &[category_items::Model],
) -> String {
    let mut category_list = String::from("<ul class=\"categories\">\n");
    for category in categories {
        category_list.push_str(&format!(
            "<li><a href=\"/catalog/{name}/items\">{name}</a></li>\n",
            name = escape(&category.category_name),
        ));
    }
    category_list.push_str("</ul>\n");

    let category_names: Vec<(domain::Id, String)> = categories
        .iter()
        .map(|category| (category.id, category.category_name.clone()))
        .collect();

    let actions = if session.is_authenticated() {
        "<p><a href=\"/category/new\">Add category</a> \
         <a href=\"/category/new/item\">Add item</a></p>\n"
    } else {
        ""
    };

    let body = format!(
        "<h2>Categories</h2>\n{category_list}\
        <h2>Latest Items</h2>\n{latest_list}{actions}",
        latest_list = latest_items_list(latest, &category_names),
    );
    layout("Catalog", session, &body)
}

/// All items of one category.
pub(crate) fn items_page(
    session: &LoginSession,
    category: &categories::Model,
    items: &[category_items::Model],
) -> String {
    let mut item_list = String::from("<ul class=\"items\">\n");
    for item in items {
        item_list.push_str(&format!(
            "<li><a href=\"/catalog/{category}/{item}/\">{item}</a></li>\n",
            category = escape(&category.category_name),
            item = escape(&item.item_name),
        ));
    }
    item_list.push_str("</ul>\n");

    let actions = if session.is_authenticated() {
        "<p><a href=\"/category/new/item\">Add item</a></p>\n"
    } else {
        ""
    };

    let body = format!(
        "<h2>{name} Items ({count} items)</h2>\n{item_list}{actions}",
        name = escape(&category.category_name),
        count = items.len(),
    );
    layout(&category.category_name, session, &body)
}

/// A single item's description page. Edit and delete links are rendered only
/// when the session owns the item.
pub(crate) fn item_page(
    session: &LoginSession,
    category: &categories::Model,
    item: &category_items::Model,
) -> String {
    let owner_links = if session.user_id == Some(item.user_id) {
        format!(
            "<p><a href=\"/catalog/{category}/{item}/edit\">Edit</a> \
             <a href=\"/catalog/{category}/{item}/delete\">Delete</a></p>\n",
            category = escape(&category.category_name),
            item = escape(&item.item_name),
        )
    } else {
        String::new()
    };

    let body = format!(
        "<h2>{name}</h2>\n<p>{description}</p>\n{owner_links}",
        name = escape(&item.item_name),
        description = escape(item.description.as_deref().unwrap_or_default()),
    );
    layout(&item.item_name, session, &body)
}

pub(crate) fn new_category_page(session: &LoginSession) -> String {
    let body = "<h2>Add a category</h2>\n\
        <form method=\"post\" action=\"/category/new\">\n\
        <label>Name <input type=\"text\" name=\"category_name\" required></label>\n\
        <button type=\"submit\">Create</button>\n\
        </form>\n";
    layout("New Category", session, body)
}

pub(crate) fn new_item_page(session: &LoginSession, categories: &[categories::Model]) -> String {
    let mut options = String::new();
    for category in categories {
        options.push_str(&format!(
            "<option value=\"{name}\">{name}</option>\n",
            name = escape(&category.category_name),
        ));
    }

    let body = format!(
        "<h2>Add an item</h2>\n\
        <form method=\"post\" action=\"/category/new/item\">\n\
        <label>Name <input type=\"text\" name=\"item_name\" required></label>\n\
        <label>Description <textarea name=\"description\"></textarea></label>\n\
        <label>Category <select name=\"category\">\n{options}</select></label>\n\
        <button type=\"submit\">Create</button>\n\
        </form>\n"
    );
    layout("New Item", session, &body)
}

pub(crate) fn edit_item_page(
    session: &LoginSession,
    category: &categories::Model,
    categories: &[categories::Model],
    item: &category_items::Model,
) -> String {
    // Current category preselected; picking another moves the item.
    let mut options = String::new();
    for choice in categories {
        let selected = if choice.id == category.id {
            " selected"
        } else {
            ""
        };
        options.push_str(&format!(
            "<option value=\"{name}\"{selected}>{name}</option>\n",
            name = escape(&choice.category_name),
        ));
    }

    let body = format!(
        "<h2>Edit {name}</h2>\n\
        <form method=\"post\" action=\"/catalog/{category}/{name}/edit\">\n\
        <label>Name <input type=\"text\" name=\"item_name\" value=\"{name}\"></label>\n\
        <label>Description <textarea name=\"description\">{description}</textarea></label>\n\
        <label>Category <select name=\"category\">\n{options}</select></label>\n\
        <button type=\"submit\">Save</button>\n\
        </form>\n",
        category = escape(&category.category_name),
        name = escape(&item.item_name),
        description = escape(item.description.as_deref().unwrap_or_default()),
    );
    layout("Edit Item", session, &body)
}

pub(crate) fn delete_item_page(
    session: &LoginSession,
    category: &categories::Model,
    item: &category_items::Model,
) -> String {
    let body = format!(
        "<h2>Delete {name}?</h2>\n\
        <form method=\"post\" action=\"/catalog/{category}/{name}/delete\">\n\
        <button type=\"submit\">Delete</button> <a href=\"/catalog\">Cancel</a>\n\
        </form>\n",
        category = escape(&category.category_name),
        name = escape(&item.item_name),
    );
    layout("Delete Item", session, &body)
}
