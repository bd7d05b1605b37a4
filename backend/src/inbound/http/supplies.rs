//! Supply catalogue handlers.
//!
//! ```text
//! POST   /api/v1/supplies               (auth) store a supply
//! GET    /api/v1/supplies               list supplies
//! GET    /api/v1/supplies/{id}          (auth) one supply or null
//! DELETE /api/v1/delete-supply/{id}     (auth) remove a supply
//! PATCH  /api/v1/supply/update/{id}     (auth) set editable fields
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};

use crate::domain::{Collection, Document};
use crate::inbound::http::auth::{AuthenticatedUser, VerifyJwt};
use crate::inbound::http::response::ok;
use crate::inbound::http::schemas::{
    AnyDocument, DeleteResponse, DocumentListResponse, DocumentResponse, ErrorResponse,
    InsertResponse, UpdateResponse,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{ApiResult, parse_id};

/// Fields a supply update may set. Anything else in the body is ignored.
pub const EDITABLE_FIELDS: [&str; 5] = ["title", "quantity", "category", "description", "image"];

fn editable_subset(mut body: Document) -> Document {
    EDITABLE_FIELDS
        .iter()
        .filter_map(|field| body.remove(*field).map(|value| ((*field).to_owned(), value)))
        .collect()
}

#[utoipa::path(
    post,
    path = "/api/v1/supplies",
    request_body = AnyDocument,
    responses(
        (status = 200, description = "Supply stored", body = InsertResponse),
        (status = 400, description = "Body is not a JSON object", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["supplies"],
    operation_id = "createSupply"
)]
#[post("/supplies", wrap = "VerifyJwt")]
pub async fn create_supply(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    body: web::Json<Document>,
) -> ApiResult<HttpResponse> {
    let outcome = state
        .records_command
        .insert(Collection::Supplies, body.into_inner())
        .await?;
    Ok(ok(outcome))
}

#[utoipa::path(
    get,
    path = "/api/v1/supplies",
    responses(
        (status = 200, description = "All supplies", body = DocumentListResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["supplies"],
    operation_id = "listSupplies",
    security([])
)]
#[get("/supplies")]
pub async fn list_supplies(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    Ok(ok(state.records.list(Collection::Supplies).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/supplies/{id}",
    params(("id" = String, Path, description = "Supply identifier")),
    responses(
        (status = 200, description = "The supply, or null", body = DocumentResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["supplies"],
    operation_id = "getSupply"
)]
#[get("/supplies/{id}", wrap = "VerifyJwt")]
pub async fn get_supply(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    Ok(ok(state.records.get(Collection::Supplies, &id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/delete-supply/{id}",
    params(("id" = String, Path, description = "Supply identifier")),
    responses(
        (status = 200, description = "Delete result", body = DeleteResponse),
        (status = 400, description = "Malformed identifier", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["supplies"],
    operation_id = "deleteSupply"
)]
#[delete("/delete-supply/{id}", wrap = "VerifyJwt")]
pub async fn delete_supply(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    Ok(ok(state.records_command.delete(Collection::Supplies, &id).await?))
}

/// Set the editable fields present in the body, creating the supply when
/// the id is unknown.
#[utoipa::path(
    patch,
    path = "/api/v1/supply/update/{id}",
    params(("id" = String, Path, description = "Supply identifier")),
    request_body = AnyDocument,
    responses(
        (status = 200, description = "Update result", body = UpdateResponse),
        (status = 400, description = "Malformed identifier or nothing to update", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tags = ["supplies"],
    operation_id = "updateSupply"
)]
#[patch("/supply/update/{id}", wrap = "VerifyJwt")]
pub async fn update_supply(
    state: web::Data<HttpState>,
    _user: AuthenticatedUser,
    path: web::Path<String>,
    body: web::Json<Document>,
) -> ApiResult<HttpResponse> {
    let id = parse_id(&path)?;
    let fields = editable_subset(body.into_inner());
    let outcome = state
        .records_command
        .update_fields(Collection::Supplies, &id, fields)
        .await?;
    Ok(ok(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockRecordsCommand, MockRecordsQuery};
    use crate::inbound::http::api_scope;
    use crate::inbound::http::test_utils::{bearer_for, doc, memory_state};
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    fn only_editable_fields_are_kept() {
        let fields = editable_subset(doc(json!({
            "title": "Rice",
            "quantity": 3,
            "_id": "sneaky",
            "owner": "x"
        })));
        assert_eq!(fields, doc(json!({ "title": "Rice", "quantity": 3 })));
    }

    #[rstest]
    #[actix_web::test]
    async fn create_get_update_delete_round() {
        let (state, _store) = memory_state();
        let app = actix_test::init_service(
            App::new().app_data(web::Data::new(state)).service(api_scope()),
        )
        .await;
        let auth = bearer_for("ada@example.com");

        let created: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/supplies")
                .insert_header((AUTHORIZATION, auth.clone()))
                .set_json(json!({ "title": "Rice", "quantity": 10 }))
                .to_request(),
        )
        .await;
        assert_eq!(created["success"], json!(true));
        assert_eq!(created["data"]["acknowledged"], json!(true));
        let id = created["data"]["insertedId"]
            .as_str()
            .expect("inserted id")
            .to_owned();

        let listed: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get().uri("/api/v1/supplies").to_request(),
        )
        .await;
        assert_eq!(listed["data"].as_array().map(Vec::len), Some(1));

        let updated: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::patch()
                .uri(&format!("/api/v1/supply/update/{id}"))
                .insert_header((AUTHORIZATION, auth.clone()))
                .set_json(json!({ "quantity": 4 }))
                .to_request(),
        )
        .await;
        assert_eq!(updated["data"]["matchedCount"], json!(1));
        assert_eq!(updated["data"]["modifiedCount"], json!(1));

        let fetched: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/supplies/{id}"))
                .insert_header((AUTHORIZATION, auth.clone()))
                .to_request(),
        )
        .await;
        assert_eq!(fetched["data"]["quantity"], json!(4));
        assert_eq!(fetched["data"]["title"], json!("Rice"));

        let deleted: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/delete-supply/{id}"))
                .insert_header((AUTHORIZATION, auth.clone()))
                .to_request(),
        )
        .await;
        assert_eq!(deleted["data"]["deletedCount"], json!(1));

        let missing: Value = actix_test::call_and_read_body_json(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/supplies/{id}"))
                .insert_header((AUTHORIZATION, auth))
                .to_request(),
        )
        .await;
        assert_eq!(missing, json!({ "success": true, "data": null }));
    }

    #[rstest]
    #[case(actix_test::TestRequest::post().uri("/api/v1/supplies").set_json(json!({})))]
    #[case(actix_test::TestRequest::get().uri("/api/v1/supplies/abc"))]
    #[case(actix_test::TestRequest::delete().uri("/api/v1/delete-supply/abc"))]
    #[case(actix_test::TestRequest::patch().uri("/api/v1/supply/update/abc").set_json(json!({ "title": "x" })))]
    #[actix_web::test]
    async fn protected_routes_require_token(#[case] request: actix_test::TestRequest) {
        let mut records = MockRecordsQuery::new();
        records.expect_get().times(0);
        let mut commands = MockRecordsCommand::new();
        commands.expect_insert().times(0);
        commands.expect_delete().times(0);
        commands.expect_update_fields().times(0);
        let (mut state, _store) = memory_state();
        state.records = std::sync::Arc::new(records);
        state.records_command = std::sync::Arc::new(commands);

        let app = actix_test::init_service(
            App::new().app_data(web::Data::new(state)).service(api_scope()),
        )
        .await;
        let res = actix_test::call_service(&app, request.to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn empty_patch_is_rejected() {
        let (state, _store) = memory_state();
        let app = actix_test::init_service(
            App::new().app_data(web::Data::new(state)).service(api_scope()),
        )
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::patch()
                .uri("/api/v1/supply/update/s1")
                .insert_header((AUTHORIZATION, bearer_for("ada@example.com")))
                .set_json(json!({ "unrelated": 1 }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: crate::domain::Error = actix_test::read_body_json(res).await;
        assert_eq!(body.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[actix_web::test]
    async fn non_object_body_is_bad_request() {
        let (state, _store) = memory_state();
        let app = actix_test::init_service(
            App::new().app_data(web::Data::new(state)).service(api_scope()),
        )
        .await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/supplies")
                .insert_header((AUTHORIZATION, bearer_for("ada@example.com")))
                .set_json(json!([1, 2]))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["error"], json!(true));
    }
}
