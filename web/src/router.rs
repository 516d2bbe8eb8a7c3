use crate::{middleware::auth::require_auth, AppState};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::controller::{
    catalog_controller, category_controller, category_item_controller, health_check_controller,
    session_controller,
};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Item Catalog API"
    ),
    paths(
        catalog_controller::categories_json,
        catalog_controller::category_items_json,
        catalog_controller::catalog_json,
        session_controller::login,
        session_controller::gconnect,
        session_controller::gdisconnect,
        health_check_controller::health_check,
    ),
    components(
        schemas(
            domain::categories::Model,
            domain::category_items::Model,
            domain::users::Model,
        )
    ),
    tags(
        (name = "item_catalog", description = "Item Catalog API")
    )
)]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(catalog_routes(app_state.clone()))
        .merge(category_routes(app_state.clone()))
        .merge(category_item_routes(app_state.clone()))
        .merge(session_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .fallback_service(static_routes())
}

fn catalog_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(catalog_controller::home))
        .route("/catalog", get(catalog_controller::home))
        .route("/catalog/JSON", get(catalog_controller::catalog_json))
        .route("/category/JSON", get(catalog_controller::categories_json))
        .route(
            "/category/:category_id/items/JSON",
            get(catalog_controller::category_items_json),
        )
        .with_state(app_state)
}

fn category_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/category/new",
            get(category_controller::new_category).post(category_controller::create_category),
        )
        .route_layer(from_fn(require_auth))
        .with_state(app_state)
}

fn category_item_routes(app_state: AppState) -> Router {
    Router::new()
        // Public item views
        .route(
            "/catalog/:category/items",
            get(category_item_controller::category_items),
        )
        .route(
            "/catalog/:category/:item/",
            get(category_item_controller::show_item),
        )
        .merge(
            // Mutation pages; unauthenticated requests are redirected to /login
            Router::new()
                .route(
                    "/category/new/item",
                    get(category_item_controller::new_item)
                        .post(category_item_controller::create_item),
                )
                .route(
                    "/catalog/:category/:item/edit",
                    get(category_item_controller::edit_item)
                        .post(category_item_controller::update_item),
                )
                .route(
                    "/catalog/:category/:item/delete",
                    get(category_item_controller::delete_item)
                        .post(category_item_controller::destroy_item),
                )
                .route_layer(from_fn(require_auth)),
        )
        .with_state(app_state)
}

fn session_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/login", get(session_controller::login))
        .route("/gconnect", post(session_controller::gconnect))
        .route("/gdisconnect", get(session_controller::gdisconnect))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

pub fn static_routes() -> Router {
    Router::new().nest_service("/", ServeDir::new("./public"))
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use domain::session::{LoginSession, SESSION_KEY};
    use domain::{categories, category_items, Id};
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use service::config::Config;
    use std::sync::Arc;
    use time::Duration;
    use tower::ServiceExt;
    use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer, Session};

    fn test_category(name: &str, user_id: Id) -> categories::Model {
        let now = chrono::Utc::now();
        categories::Model {
            id: Id::new_v4(),
            category_name: name.to_string(),
            user_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn test_item(name: &str, category_id: Id, user_id: Id) -> category_items::Model {
        let now = chrono::Utc::now();
        category_items::Model {
            id: Id::new_v4(),
            category_id,
            item_name: name.to_string(),
            description: Some("description".to_string()),
            user_id,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    const TEST_SUBJECT: &str = "108523491234567890";
    const TEST_STATE: &str = "STATETOKEN0000000000000000000000";
    // Unsigned token whose payload is {"sub":"108523491234567890"}.
    const TEST_ID_TOKEN: &str = "eyJhbGciOiJub25lIn0.eyJzdWIiOiIxMDg1MjM0OTEyMzQ1Njc4OTAifQ.sig";

    // Test-only login endpoint that binds a user id into the session.
    async fn test_login(session: Session) -> StatusCode {
        let login_session = LoginSession {
            user_id: Some(test_session_user_id()),
            username: Some("Ada Lovelace".to_string()),
            ..LoginSession::default()
        };
        session.insert(SESSION_KEY, login_session).await.unwrap();
        StatusCode::OK
    }

    // Test-only endpoint that stores a fully connected session, as a
    // completed OAuth round trip would leave it.
    async fn test_connected_login(session: Session) -> StatusCode {
        let login_session = LoginSession {
            state_token: Some(TEST_STATE.to_string()),
            access_token: Some("ya29.test".to_string()),
            google_id: Some(TEST_SUBJECT.to_string()),
            username: Some("Ada Lovelace".to_string()),
            user_id: Some(test_session_user_id()),
            ..LoginSession::default()
        };
        session.insert(SESSION_KEY, login_session).await.unwrap();
        StatusCode::OK
    }

    fn test_session_user_id() -> Id {
        // Stable id so tests can construct rows owned by someone else.
        Id::nil()
    }

    // Writes a Google-format client identity file for handlers that load it.
    fn write_test_client_secrets(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("catalog_rs_{name}_client_secrets.json"));
        std::fs::write(
            &path,
            r#"{"web":{"client_id":"test-client-id","client_secret":"shhh"}}"#,
        )
        .unwrap();
        path
    }

    fn test_app(db: sea_orm::DatabaseConnection) -> Router {
        test_app_with_config(db, Config::default())
    }

    fn test_app_with_config(db: sea_orm::DatabaseConnection, config: Config) -> Router {
        let app_state = AppState::new(config, &Arc::new(db));

        let session_store = MemoryStore::default();
        let session_layer = SessionManagerLayer::new(session_store)
            .with_secure(false)
            .with_expiry(Expiry::OnInactivity(Duration::days(1)));

        Router::new()
            .route("/test-login", get(test_login))
            .route("/test-connected-login", get(test_connected_login))
            .merge(define_routes(app_state))
            .layer(session_layer)
    }

    async fn session_cookie(app: &Router, uri: &str) -> String {
        let login_request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let login_response = app.clone().oneshot(login_request).await.unwrap();

        login_response
            .headers()
            .get("set-cookie")
            .and_then(|c| c.to_str().ok())
            .expect("Login should return session cookie")
            .to_string()
    }

    async fn logged_in_cookie(app: &Router) -> String {
        session_cookie(app, "/test-login").await
    }

    #[tokio::test]
    async fn created_category_appears_in_the_categories_json_mirror() {
        let category = test_category("Woodworking", Id::new_v4());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category.clone()]])
            .into_connection();

        let app = test_app(db);
        let request = Request::builder()
            .uri("/category/JSON")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["categories"][0]["category_name"], "Woodworking");
        assert_eq!(json["categories"][0]["id"], category.id.to_string());
        // Ownership and timestamps are not part of the public JSON shape.
        assert!(json["categories"][0].get("user_id").is_none());
    }

    #[tokio::test]
    async fn unknown_category_id_in_items_json_is_a_404() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<categories::Model>::new()])
            .into_connection();

        let app = test_app(db);
        let request = Request::builder()
            .uri(format!("/category/{}/items/JSON", Id::new_v4()))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_owner_edit_is_rejected_with_403_for_get_and_post_alike() {
        let other_user = Id::new_v4();
        let category = test_category("Soccer", other_user);
        let item = test_item("Shinguards", category.id, other_user);

        // Two request cycles, each resolving category then item; results are
        // consumed in query order.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category.clone()]])
            .append_query_results(vec![vec![item.clone()]])
            .append_query_results(vec![vec![category.clone()]])
            .append_query_results(vec![vec![item.clone()]])
            .into_connection();

        let app = test_app(db);
        let cookie = logged_in_cookie(&app).await;

        let get_request = Request::builder()
            .uri("/catalog/Soccer/Shinguards/edit")
            .header("cookie", cookie.clone())
            .body(Body::empty())
            .unwrap();
        let get_response = app.clone().oneshot(get_request).await.unwrap();
        assert_eq!(get_response.status(), StatusCode::FORBIDDEN);

        let post_request = Request::builder()
            .uri("/catalog/Soccer/Shinguards/edit")
            .method("POST")
            .header("cookie", cookie)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("item_name=Stolen&description="))
            .unwrap();
        let post_response = app.oneshot(post_request).await.unwrap();
        assert_eq!(post_response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn mutation_pages_redirect_anonymous_visitors_to_login() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app(db);

        let request = Request::builder()
            .uri("/category/new")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response
                .headers()
                .get("location")
                .and_then(|l| l.to_str().ok()),
            Some("/login")
        );
    }

    #[tokio::test]
    async fn gdisconnect_without_a_session_is_a_401() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app(db);

        let request = Request::builder()
            .uri("/gdisconnect")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_page_revisit_leaves_a_connected_session_intact() {
        let secrets = write_test_client_secrets("login_revisit");
        let config = Config::default()
            .set_client_secrets_file(secrets.to_string_lossy().into_owned());
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app_with_config(db, config);
        let cookie = session_cookie(&app, "/test-connected-login").await;

        let login_request = Request::builder()
            .uri("/login")
            .header("cookie", cookie.clone())
            .body(Body::empty())
            .unwrap();
        let login_response = app.clone().oneshot(login_request).await.unwrap();
        assert_eq!(login_response.status(), StatusCode::OK);

        // Only the state token is refreshed; the bound user id must still
        // authenticate the session, so a mutation page renders instead of
        // redirecting to /login.
        let request = Request::builder()
            .uri("/category/new")
            .header("cookie", cookie)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn full_catalog_json_is_a_flat_two_key_body() {
        let user = Id::new_v4();
        let category = test_category("Soccer", user);
        let item = test_item("Shinguards", category.id, user);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category.clone()]])
            .append_query_results(vec![vec![item.clone()]])
            .into_connection();

        let app = test_app(db);
        let request = Request::builder()
            .uri("/catalog/JSON")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["categories"][0]["category_name"], "Soccer");
        assert_eq!(json["category_items"][0]["item_name"], "Shinguards");
        // Items are a sibling list, not nested per category.
        assert!(json["categories"][0].get("category_items").is_none());
    }

    #[tokio::test]
    async fn edit_can_move_an_item_into_another_category() {
        let owner = test_session_user_id();
        let soccer = test_category("Soccer", owner);
        let snowboarding = test_category("Snowboarding", owner);
        let item = test_item("Goggles", soccer.id, owner);
        let mut moved = item.clone();
        moved.category_id = snowboarding.id;

        // Path resolution, the target category lookup, then the update
        // cycle; results are consumed in query order.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![soccer.clone()]])
            .append_query_results(vec![vec![item.clone()]])
            .append_query_results(vec![vec![snowboarding.clone()]])
            .append_query_results(vec![vec![item.clone()]])
            .append_query_results(vec![vec![moved]])
            .into_connection();

        let app = test_app(db);
        let cookie = logged_in_cookie(&app).await;

        let request = Request::builder()
            .uri("/catalog/Soccer/Goggles/edit")
            .method("POST")
            .header("cookie", cookie)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("item_name=&description=&category=Snowboarding"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn repeated_connect_replies_with_a_json_body() {
        let mut server = mockito::Server::new_async().await;
        let secrets = write_test_client_secrets("already_connected");
        let config = Config::default()
            .set_client_secrets_file(secrets.to_string_lossy().into_owned())
            .set_google_token_url(format!("{}/token", server.url()))
            .set_google_tokeninfo_url(format!("{}/tokeninfo", server.url()));

        let _exchange = server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(format!(
                r#"{{"access_token":"ya29.test","id_token":"{TEST_ID_TOKEN}","expires_in":3599,"token_type":"Bearer"}}"#
            ))
            .create_async()
            .await;
        let _introspection = server
            .mock("GET", mockito::Matcher::Regex("^/tokeninfo.*".to_string()))
            .with_status(200)
            .with_body(format!(
                r#"{{"user_id":"{TEST_SUBJECT}","issued_to":"test-client-id","expires_in":3599}}"#
            ))
            .create_async()
            .await;

        // Any database access would panic: the short-circuit never queries.
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app_with_config(db, config);
        let cookie = session_cookie(&app, "/test-connected-login").await;

        let request = Request::builder()
            .uri(format!("/gconnect?state={TEST_STATE}"))
            .method("POST")
            .header("cookie", cookie)
            .body(Body::from("auth-code"))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("content-type")
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!("Current user is already connected."));
    }

    #[tokio::test]
    async fn health_endpoint_responds() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let app = test_app(db);

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
