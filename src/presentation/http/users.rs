use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    routing::get,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::documents::list_user_documents::ListUserDocuments;
use crate::application::use_cases::users::find_user::FindUser;
use crate::application::use_cases::users::list_users::ListUsers;
use crate::application::use_cases::users::update_profile::UpdateProfile;
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::user::ProfilePatch;
use crate::presentation::http::auth::{Bearer, ProfileResponse, authenticate};
use crate::presentation::http::documents::Document;
use crate::presentation::http::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceProfileRequest {
    pub email: String,
    pub name: String,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route(
            "/users",
            get(list_users).put(replace_profile).patch(update_profile),
        )
        .route("/users/:id", get(find_user))
        .route("/users/:id/documents", get(user_documents))
        .with_state(ctx)
}

#[utoipa::path(get, path = "/api/users", tag = "Users",
    params(
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("offset" = Option<i64>, Query, description = "Items to skip")
    ),
    responses((status = 200, body = [ProfileResponse]), (status = 401, body = crate::presentation::http::error::MessageResponse)))]
pub async fn list_users(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<ProfileResponse>>, ApiError> {
    authenticate(&ctx.cfg, bearer)?;
    let Query(q) = query?;
    let repo = ctx.user_repo();
    let uc = ListUsers {
        repo: repo.as_ref(),
    };
    let users = uc.execute(ctx.page(q.limit, q.offset)).await?;
    Ok(Json(users.into_iter().map(ProfileResponse::from).collect()))
}

#[utoipa::path(get, path = "/api/users/{id}", tag = "Users",
    params(("id" = Uuid, Path, description = "User ID")),
    responses((status = 200, body = ProfileResponse), (status = 404, body = crate::presentation::http::error::MessageResponse)))]
pub async fn find_user(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    authenticate(&ctx.cfg, bearer)?;
    let Path(id) = path?;
    let repo = ctx.user_repo();
    let uc = FindUser {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.execute(id).await?.into()))
}

/// Partial update of the caller's own profile.
#[utoipa::path(patch, path = "/api/users", tag = "Users", request_body = UpdateProfileRequest,
    responses(
        (status = 200, body = ProfileResponse),
        (status = 400, body = crate::presentation::http::error::MessageResponse),
        (status = 409, body = crate::presentation::http::error::MessageResponse)
    ))]
pub async fn update_profile(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    body: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user_id = authenticate(&ctx.cfg, bearer)?;
    let Json(req) = body?;
    let repo = ctx.user_repo();
    let uc = UpdateProfile {
        repo: repo.as_ref(),
    };
    let patch = ProfilePatch {
        email: req.email,
        name: req.name,
    };
    Ok(Json(uc.execute(user_id, patch).await?.into()))
}

#[utoipa::path(put, path = "/api/users", tag = "Users", request_body = ReplaceProfileRequest,
    responses(
        (status = 200, body = ProfileResponse),
        (status = 400, body = crate::presentation::http::error::MessageResponse),
        (status = 409, body = crate::presentation::http::error::MessageResponse)
    ))]
pub async fn replace_profile(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    body: Result<Json<ReplaceProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user_id = authenticate(&ctx.cfg, bearer)?;
    let Json(req) = body?;
    let repo = ctx.user_repo();
    let uc = UpdateProfile {
        repo: repo.as_ref(),
    };
    Ok(Json(uc.replace(user_id, &req.email, &req.name).await?.into()))
}

#[utoipa::path(get, path = "/api/users/{id}/documents", tag = "Users",
    params(
        ("id" = Uuid, Path, description = "Owner user ID"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("offset" = Option<i64>, Query, description = "Items to skip")
    ),
    responses((status = 200, body = [Document]), (status = 404, body = crate::presentation::http::error::MessageResponse)))]
pub async fn user_documents(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    path: Result<Path<Uuid>, PathRejection>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let user_id = authenticate(&ctx.cfg, bearer)?;
    let Path(owner_id) = path?;
    let Query(q) = query?;
    let repo = ctx.document_repo();
    let users = ctx.user_repo();
    let uc = ListUserDocuments {
        repo: repo.as_ref(),
        users: users.as_ref(),
    };
    let docs = uc
        .execute(user_id, owner_id, ctx.page(q.limit, q.offset))
        .await?;
    Ok(Json(docs.into_iter().map(Document::from).collect()))
}
