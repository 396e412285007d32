use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::database::models::{Post, PostSummary};
use crate::error::{ApiError, MSG_POST_NOT_FOUND};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;
use crate::validation::pagination::{ERR_LIMIT, ERR_PAGE};
use crate::validation::post::ERR_POST_ID;
use crate::validation::{
    validate_create_post, validate_pagination, validate_post_id, CreatePostPayload, PaginationQuery,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub posts: Vec<PostSummary>,
    pub current_page: i64,
    pub total_pages: i64,
}

/// POST /posts - create a post owned by the caller
///
/// Auth and validation both run before the store is touched.
pub async fn post_create(
    State(state): State<AppState>,
    user: AuthUser,
    payload: Result<Json<CreatePostPayload>, JsonRejection>,
) -> ApiResult<Post> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::debug!("Rejected create body: {}", rejection.body_text());
        ApiError::invalid_json("Invalid JSON body")
    })?;

    let new_post = validate_create_post(&payload).map_err(ApiError::validation_error)?;

    let post = state.store.create(user.id, new_post).await?;
    tracing::info!("User {} created post {} ({})", user.id, post.id, post.status);

    Ok(ApiResponse::created(post))
}

/// GET /posts?page=&limit= - published posts, one page at a time
pub async fn posts_list(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<PostListResponse> {
    let Query(pairs) = query.map_err(|rejection| {
        tracing::debug!("Rejected list query: {}", rejection.body_text());
        ApiError::validation_error(vec![ERR_PAGE.to_string(), ERR_LIMIT.to_string()])
    })?;
    let query = PaginationQuery::from_pairs(&pairs);

    let page = validate_pagination(query.page.as_deref(), query.limit.as_deref())
        .into_request()
        .map_err(ApiError::validation_error)?;

    let posts = state.store.list_published(page.offset(), page.limit).await?;
    let total = state.store.count_published().await?;

    Ok(ApiResponse::success(PostListResponse {
        posts,
        current_page: page.page,
        total_pages: page.total_pages(total),
    }))
}

/// GET /posts/:id - a single post, only if published
pub async fn post_get(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Post> {
    let Path(id) = id.map_err(|rejection| {
        tracing::debug!("Rejected post id: {}", rejection.body_text());
        ApiError::validation_error(vec![ERR_POST_ID.to_string()])
    })?;
    let id = validate_post_id(&id).map_err(|e| ApiError::validation_error(vec![e]))?;

    match state.store.find_by_id(id).await? {
        Some(post) if post.is_published() => Ok(ApiResponse::success(post)),
        _ => Err(ApiError::not_found(MSG_POST_NOT_FOUND)),
    }
}
