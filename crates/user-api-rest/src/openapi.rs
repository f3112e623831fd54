//! OpenAPI documentation configuration.

use user_api_core::{ErrorResponse, User, UserId};
use user_api_service::{CreateUserRequest, UpdateUserRequest};
use utoipa::OpenApi;

use crate::controllers::HealthResponse;

/// OpenAPI documentation for the User API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "User API",
        version = "1.0.0",
        description = "User records with a cached lookup by id",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        crate::controllers::user_controller::get_user,
        crate::controllers::user_controller::create_user,
        crate::controllers::user_controller::update_user,
        crate::controllers::user_controller::delete_user,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            UserId,
            User,
            ErrorResponse,
            HealthResponse,
            CreateUserRequest,
            UpdateUserRequest,
        )
    ),
    tags(
        (name = "users", description = "User endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;
