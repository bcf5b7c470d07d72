use crate::api;
use crate::domain::{City, District, Province, Subdistrict};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::health::health_check,
        api::location::list_provinces,
        api::location::list_cities,
        api::location::list_districts,
        api::location::list_subdistricts,
        api::location::get_subdistrict,
    ),
    components(schemas(Province, City, District, Subdistrict)),
    tags(
        (name = "kedai", description = "Kedai marketplace API")
    )
)]
pub struct ApiDoc;
