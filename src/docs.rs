use utoipa::OpenApi;

use crate::common::response::ErrorResponse;
use crate::modules::compress::dto::{CompressRequest, CompressResponse};
use crate::modules::health::dto::HealthResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::health::handler::health,
        crate::modules::compress::handler::compress,
    ),
    components(
        schemas(
            CompressRequest,
            CompressResponse,
            HealthResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service and object store status"),
        (name = "Compression", description = "Video re-encoding jobs")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_both_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(doc.paths.paths.contains_key("/compress"));
    }
}
