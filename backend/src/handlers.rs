use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use folio_shared::project::{all_projects, project_by_id, project_nav};

use crate::{
    models::{
        ErrorResponse, PostDetail, PostListItem, PostListResponse, PostQuery, ProjectDetail,
        ProjectsResponse, TagInfo, TagsResponse,
    },
    state::AppState,
};

type ApiError = (StatusCode, Json<ErrorResponse>);

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<PostQuery>,
) -> Result<Json<PostListResponse>, ApiError> {
    let index = state
        .index()
        .await
        .map_err(|e| internal_error("Failed to load posts", e))?;

    let posts = index
        .into_posts()
        .into_iter()
        .filter(|post| {
            let mut matches = true;

            // Tag match is case insensitive
            if let Some(ref tag) = query.tag {
                matches = matches && post.meta.tags.iter().any(|t| t.eq_ignore_ascii_case(tag));
            }
            if let Some(ref project) = query.project {
                matches = matches && post.meta.belongs_to(project);
            }

            matches
        })
        .map(PostListItem::from)
        .collect();

    Ok(Json(PostListResponse::new(posts)))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PostDetail>, ApiError> {
    let post = state
        .post(&slug)
        .await
        .map_err(|e| internal_error("Failed to load post", e))?;

    match post {
        Some(post) => {
            let back_link = post.meta.back_link();
            Ok(Json(PostDetail {
                post,
                back_link,
            }))
        },
        None => Err(not_found("Post not found")),
    }
}

pub async fn list_tags(State(state): State<AppState>) -> Result<Json<TagsResponse>, ApiError> {
    let index = state
        .index()
        .await
        .map_err(|e| internal_error("Failed to fetch tags", e))?;

    let tags = index
        .tag_counts()
        .into_iter()
        .map(|(name, count)| TagInfo {
            name,
            count,
        })
        .collect();

    Ok(Json(TagsResponse {
        tags,
    }))
}

pub async fn list_projects() -> Json<ProjectsResponse> {
    Json(ProjectsResponse {
        projects: all_projects(),
    })
}

pub async fn get_project(Path(id): Path<String>) -> Result<Json<ProjectDetail>, ApiError> {
    let project = project_by_id(&id).ok_or_else(|| not_found("Project not found"))?;
    Ok(Json(ProjectDetail {
        project,
        nav: project_nav(project.id),
    }))
}

/// Journal of one project. An id without posts yields an empty list.
pub async fn list_project_posts(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PostListResponse>, ApiError> {
    let index = state
        .index()
        .await
        .map_err(|e| internal_error("Failed to load project posts", e))?;

    let posts = index
        .by_project(&id)
        .cloned()
        .map(PostListItem::from)
        .collect();

    Ok(Json(PostListResponse::new(posts)))
}

fn not_found(message: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: message.to_string(),
            code: 404,
        }),
    )
}

fn internal_error(message: &str, err: impl std::fmt::Display) -> ApiError {
    tracing::error!("{}: {}", message, err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: message.to_string(),
            code: 500,
        }),
    )
}
