//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{auth, file, folder, AppState};
use super::middleware::{create_cors_layer, jwt_auth, JwtState};

/// Create the main API router.
pub fn create_router(
    app_state: Arc<AppState>,
    jwt_state: Arc<JwtState>,
    cors_origins: &[String],
) -> Router {
    // Auth routes (no authentication required)
    let auth_public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/verify/:token", get(auth::verify))
        .route("/login", post(auth::login))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password/:token", post(auth::reset_password));

    // Auth routes (authentication required)
    let auth_protected_routes = Router::new().route("/me", get(auth::me));

    let auth_routes = Router::new()
        .merge(auth_public_routes)
        .merge(auth_protected_routes);

    let folder_routes = Router::new()
        .route("/", post(folder::create_folder).get(folder::list_folders))
        .route(
            "/:id",
            get(folder::get_folder).delete(folder::delete_folder),
        );

    let file_routes = Router::new()
        .route("/", post(file::upload_file).get(file::list_files))
        .route("/:id", get(file::get_file).delete(file::delete_file))
        .route("/:id/download", get(file::download_file));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/folders", folder_routes)
        .nest("/files", file_routes);

    // Clone jwt_state for the middleware closure
    let jwt_state_for_middleware = jwt_state.clone();

    // Uploads can exceed axum's 2MB default body limit
    let body_limit = app_state.max_upload_size as usize + 1024;

    // Build the main router with middleware
    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state_for_middleware.clone();
                    jwt_auth(state, req, next)
                }))
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register,
        auth::verify,
        auth::login,
        auth::forgot_password,
        auth::reset_password,
        auth::me,
        folder::create_folder,
        folder::list_folders,
        folder::get_folder,
        folder::delete_folder,
        file::upload_file,
        file::list_files,
        file::get_file,
        file::download_file,
        file::delete_file,
    ),
    components(schemas(
        crate::web::dto::RegisterRequest,
        crate::web::dto::LoginRequest,
        crate::web::dto::ForgotPasswordRequest,
        crate::web::dto::ResetPasswordRequest,
        crate::web::dto::CreateFolderRequest,
        crate::web::dto::MessageResponse,
        crate::web::dto::LoginResponse,
        crate::web::dto::UserInfo,
        crate::web::dto::FolderResponse,
        crate::web::dto::FolderDetailResponse,
        crate::web::dto::CascadeResponse,
        crate::web::dto::FileResponse,
    )),
    modifiers(&SecurityAddon),
    servers((url = "/api")),
    tags(
        (name = "auth", description = "Registration and authentication"),
        (name = "folders", description = "Folder hierarchy management"),
        (name = "files", description = "File upload, download, and deletion")
    )
)]
pub struct ApiDoc;

/// Adds the bearer token security scheme to the OpenAPI document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the Swagger UI router.
pub fn create_swagger_router() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
