use utoipa::OpenApi;
use utoipa::ToSchema;

use crate::routes::users::{RegisterUserRequest, RegisteredUser, UserView};

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::register,
        crate::routes::users::get_by_id,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterUserRequest,
            RegisteredUser,
            UserView,
        )
    ),
    tags(
        (name = "health"),
        (name = "users")
    )
)]
pub struct ApiDoc;
