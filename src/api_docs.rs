use crate::api;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::route::search_routes,
        api::carriage::available_seats,
        // Add other endpoints here as we document them
    ),
    tags(
        (name = "railbook", description = "Railbook booking API")
    )
)]
pub struct ApiDoc;
