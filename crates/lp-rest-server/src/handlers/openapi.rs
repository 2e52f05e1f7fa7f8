//! OpenAPI specification endpoint

use crate::handlers::{polls, sessions};
use crate::ServerResult;
use axum::response::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Live Poll API"),
    paths(
        sessions::list_sessions,
        sessions::create_session,
        sessions::get_session,
        sessions::end_session,
        sessions::join_session,
        sessions::lock_session,
        polls::create_poll,
        polls::close_poll,
        polls::vote,
        polls::results,
        polls::history
    )
)]
struct ApiDoc;

/// Full document: routes plus the contract schemas
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(lp_api_contract::openapi_schema());
    doc
}

/// OpenAPI specification endpoint
pub async fn openapi_spec() -> ServerResult<Json<utoipa::openapi::OpenApi>> {
    Ok(Json(api_doc()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn collect_refs(value: &Value, refs: &mut Vec<String>) {
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    match (key.as_str(), child) {
                        ("$ref", Value::String(target)) => refs.push(target.clone()),
                        _ => collect_refs(child, refs),
                    }
                }
            }
            Value::Array(items) => items.iter().for_each(|item| collect_refs(item, refs)),
            _ => {}
        }
    }

    #[test]
    fn every_schema_ref_resolves() {
        let doc = serde_json::to_value(api_doc()).unwrap();
        let schemas = doc["components"]["schemas"].as_object().unwrap();

        let mut refs = Vec::new();
        collect_refs(&doc, &mut refs);
        assert!(!refs.is_empty());

        let dangling: Vec<_> = refs
            .iter()
            .filter_map(|r| r.strip_prefix("#/components/schemas/"))
            .filter(|name| !schemas.contains_key(*name))
            .collect();
        assert!(dangling.is_empty(), "dangling refs: {:?}", dangling);
    }

    #[test]
    fn key_fields_are_plain_strings() {
        let doc = serde_json::to_value(api_doc()).unwrap();
        let schemas = &doc["components"]["schemas"];
        assert_eq!(schemas["Session"]["properties"]["key"]["type"], "string");
        assert_eq!(schemas["Participant"]["properties"]["id"]["type"], "string");
        assert_eq!(schemas["VoteRequest"]["properties"]["userId"]["type"], "string");
    }
}
