use super::handlers::{auth, dashboard, health};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::login::login_page,
        auth::login::login,
        auth::logout::logout,
        auth::session::session,
        dashboard::dashboard,
    ),
    components(schemas(
        health::Health,
        auth::login::LoginForm,
        auth::session::SessionResponse,
        dashboard::Dashboard,
    )),
    tags(
        (name = "tessera", description = "Protected resources"),
        (name = "auth", description = "Login, logout and session state"),
        (name = "health", description = "Liveness")
    )
)]
struct ApiDoc;

/// `OpenAPI` document for every documented route, with Cargo metadata as info.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.info.title = env!("CARGO_PKG_NAME").to_string();
    doc.info.version = env!("CARGO_PKG_VERSION").to_string();
    doc.info.description = optional_str(env!("CARGO_PKG_DESCRIPTION")).map(str::to_string);
    doc
}

fn optional_str(value: &'static str) -> Option<&'static str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
