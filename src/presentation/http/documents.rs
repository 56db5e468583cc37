use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::use_cases::documents::create_document::CreateDocument;
use crate::application::use_cases::documents::delete_document::DeleteDocument;
use crate::application::use_cases::documents::get_document::GetDocument;
use crate::application::use_cases::documents::grant_role::GrantRole;
use crate::application::use_cases::documents::list_documents::ListDocuments;
use crate::application::use_cases::documents::replace_document::ReplaceDocument;
use crate::application::use_cases::documents::revoke_role::RevokeRole;
use crate::application::use_cases::documents::search_documents::SearchDocuments;
use crate::application::use_cases::documents::update_document::UpdateDocument;
use crate::bootstrap::app_context::AppContext;
use crate::domain::documents::document::{self as domain, DocumentPatch, Permission};
use crate::presentation::http::auth::{Bearer, authenticate};
use crate::presentation::http::error::ApiError;

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleItem {
    pub user_id: Uuid,
    /// One of `read`, `write`, `admin`.
    pub permission: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Document {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub owner: Uuid,
    pub roles: Vec<RoleItem>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<domain::Document> for Document {
    fn from(d: domain::Document) -> Self {
        Self {
            id: d.id,
            title: d.title,
            content: d.content,
            owner: d.owner_id,
            roles: d
                .roles
                .into_iter()
                .map(|r| RoleItem {
                    user_id: r.user_id,
                    permission: r.permission.as_str().to_string(),
                })
                .collect(),
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateDocumentRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateDocumentRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceDocumentRequest {
    pub title: String,
    // Full replacement: an omitted body clears the content
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct GrantRoleRequest {
    /// One of `read`, `write`, `admin`.
    pub permission: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route(
            "/documents/:id",
            get(get_document)
                .patch(update_document)
                .put(replace_document)
                .delete(delete_document),
        )
        .route(
            "/documents/:id/roles/:user_id",
            put(grant_role).delete(revoke_role),
        )
        .with_state(ctx)
}

/// Lists readable documents; with `q` set, filters by title.
#[utoipa::path(get, path = "/api/documents", tag = "Documents",
    params(
        ("q" = Option<String>, Query, description = "Title search (case-insensitive substring)"),
        ("limit" = Option<i64>, Query, description = "Page size"),
        ("offset" = Option<i64>, Query, description = "Items to skip")
    ),
    responses((status = 200, body = [Document]), (status = 401, body = crate::presentation::http::error::MessageResponse)))]
pub async fn list_documents(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    query: Result<Query<ListDocumentsQuery>, QueryRejection>,
) -> Result<Json<Vec<Document>>, ApiError> {
    let user_id = authenticate(&ctx.cfg, bearer)?;
    let Query(q) = query?;
    let page = ctx.page(q.limit, q.offset);
    let repo = ctx.document_repo();

    let docs = match q.q {
        Some(query) => {
            let uc = SearchDocuments {
                repo: repo.as_ref(),
            };
            uc.execute(user_id, Some(query), page).await?
        }
        None => {
            let uc = ListDocuments {
                repo: repo.as_ref(),
            };
            uc.execute(user_id, page).await?
        }
    };
    Ok(Json(docs.into_iter().map(Document::from).collect()))
}

#[utoipa::path(post, path = "/api/documents", tag = "Documents", request_body = CreateDocumentRequest,
    responses((status = 201, body = Document), (status = 400, body = crate::presentation::http::error::MessageResponse)))]
pub async fn create_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    body: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let user_id = authenticate(&ctx.cfg, bearer)?;
    let Json(req) = body?;
    let repo = ctx.document_repo();
    let users = ctx.user_repo();
    let uc = CreateDocument {
        repo: repo.as_ref(),
        users: users.as_ref(),
    };
    let doc = uc.execute(user_id, &req.title, &req.content).await?;
    Ok((StatusCode::CREATED, Json(doc.into())))
}

#[utoipa::path(get, path = "/api/documents/{id}", tag = "Documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses((status = 200, body = Document), (status = 404, body = crate::presentation::http::error::MessageResponse)))]
pub async fn get_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Document>, ApiError> {
    let user_id = authenticate(&ctx.cfg, bearer)?;
    let Path(id) = path?;
    let repo = ctx.document_repo();
    let uc = GetDocument {
        repo: repo.as_ref(),
    };
    let doc = uc.execute(user_id, id).await?;
    Ok(Json(doc.into()))
}

#[utoipa::path(patch, path = "/api/documents/{id}", tag = "Documents", request_body = UpdateDocumentRequest,
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, body = SuccessResponse),
        (status = 403, body = crate::presentation::http::error::MessageResponse),
        (status = 404, body = crate::presentation::http::error::MessageResponse)
    ))]
pub async fn update_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<UpdateDocumentRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let user_id = authenticate(&ctx.cfg, bearer)?;
    let Path(id) = path?;
    let Json(req) = body?;
    let repo = ctx.document_repo();
    let uc = UpdateDocument {
        repo: repo.as_ref(),
    };
    let patch = DocumentPatch {
        title: req.title,
        content: req.content,
    };
    uc.execute(user_id, id, patch).await?;
    Ok(SuccessResponse::ok())
}

#[utoipa::path(put, path = "/api/documents/{id}", tag = "Documents", request_body = ReplaceDocumentRequest,
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, body = SuccessResponse),
        (status = 403, body = crate::presentation::http::error::MessageResponse),
        (status = 404, body = crate::presentation::http::error::MessageResponse)
    ))]
pub async fn replace_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<ReplaceDocumentRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let user_id = authenticate(&ctx.cfg, bearer)?;
    let Path(id) = path?;
    let Json(req) = body?;
    let repo = ctx.document_repo();
    let uc = ReplaceDocument {
        repo: repo.as_ref(),
    };
    uc.execute(user_id, id, &req.title, &req.content).await?;
    Ok(SuccessResponse::ok())
}

#[utoipa::path(delete, path = "/api/documents/{id}", tag = "Documents",
    params(("id" = Uuid, Path, description = "Document ID")),
    responses(
        (status = 200, body = SuccessResponse),
        (status = 403, body = crate::presentation::http::error::MessageResponse),
        (status = 404, body = crate::presentation::http::error::MessageResponse)
    ))]
pub async fn delete_document(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let user_id = authenticate(&ctx.cfg, bearer)?;
    let Path(id) = path?;
    let repo = ctx.document_repo();
    let uc = DeleteDocument {
        repo: repo.as_ref(),
    };
    uc.execute(user_id, id).await?;
    Ok(SuccessResponse::ok())
}

#[utoipa::path(put, path = "/api/documents/{id}/roles/{user_id}", tag = "Documents", request_body = GrantRoleRequest,
    params(
        ("id" = Uuid, Path, description = "Document ID"),
        ("user_id" = Uuid, Path, description = "Collaborator user ID")
    ),
    responses(
        (status = 200, body = Document),
        (status = 400, body = crate::presentation::http::error::MessageResponse),
        (status = 403, body = crate::presentation::http::error::MessageResponse),
        (status = 404, body = crate::presentation::http::error::MessageResponse)
    ))]
pub async fn grant_role(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    body: Result<Json<GrantRoleRequest>, JsonRejection>,
) -> Result<Json<Document>, ApiError> {
    let user_id = authenticate(&ctx.cfg, bearer)?;
    let Path((id, target)) = path?;
    let Json(req) = body?;
    let permission = Permission::parse(&req.permission).ok_or_else(|| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "permission must be one of read, write, admin",
        )
    })?;
    let repo = ctx.document_repo();
    let users = ctx.user_repo();
    let uc = GrantRole {
        repo: repo.as_ref(),
        users: users.as_ref(),
    };
    let doc = uc.execute(user_id, id, target, permission).await?;
    Ok(Json(doc.into()))
}

#[utoipa::path(delete, path = "/api/documents/{id}/roles/{user_id}", tag = "Documents",
    params(
        ("id" = Uuid, Path, description = "Document ID"),
        ("user_id" = Uuid, Path, description = "Collaborator user ID")
    ),
    responses(
        (status = 200, body = SuccessResponse),
        (status = 403, body = crate::presentation::http::error::MessageResponse),
        (status = 404, body = crate::presentation::http::error::MessageResponse)
    ))]
pub async fn revoke_role(
    State(ctx): State<AppContext>,
    bearer: Bearer,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let user_id = authenticate(&ctx.cfg, bearer)?;
    let Path((id, target)) = path?;
    let repo = ctx.document_repo();
    let uc = RevokeRole {
        repo: repo.as_ref(),
    };
    uc.execute(user_id, id, target).await?;
    Ok(SuccessResponse::ok())
}
