use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use bytes::Bytes;

use crate::{
    adapters::inbound::http::{
        dto::{ErrorResponseDto, ListPostsQuery, ListPostsResponseDto, PostDto, SuccessResponseDto},
        router::AppState,
    },
    domain::{
        errors::PostError,
        models::{Category, ImageChange, NewImage, PostDraft, PostEdit},
        value_objects::{OwnerId, PostId},
    },
};

type HandlerError = (StatusCode, Json<ErrorResponseDto>);

/// The external authentication collaborator supplies the owner id as a
/// header; no query may begin without it.
const OWNER_HEADER: &str = "x-owner-id";

fn status_for(err: &PostError) -> StatusCode {
    match err {
        PostError::Validation { .. } => StatusCode::BAD_REQUEST,
        PostError::NotFound { .. } => StatusCode::NOT_FOUND,
        PostError::BackendUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn post_error(err: PostError) -> HandlerError {
    (status_for(&err), Json(ErrorResponseDto::from_post_error(&err)))
}

fn owner_from_headers(headers: &HeaderMap) -> Result<OwnerId, HandlerError> {
    let value = headers
        .get(OWNER_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            (
                StatusCode::UNAUTHORIZED,
                Json(ErrorResponseDto::unauthorized("Missing x-owner-id header")),
            )
        })?;

    OwnerId::new(value.to_string()).map_err(|e| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponseDto::unauthorized(&format!(
                "Invalid owner id: {}",
                e
            ))),
        )
    })
}

fn parse_post_id(id: &str) -> Result<PostId, HandlerError> {
    PostId::parse(id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponseDto::bad_request("Invalid post id")),
        )
    })
}

/// Fields collected from a multipart post form. The form always submits
/// every text field; the image file and remove flag are optional.
#[derive(Default)]
struct PostForm {
    title: String,
    description: String,
    category: Option<Category>,
    used: bool,
    remove_image: bool,
    image: Option<NewImage>,
}

impl PostForm {
    fn image_change(self) -> ImageChange {
        if self.remove_image {
            ImageChange::Remove
        } else if let Some(image) = self.image {
            ImageChange::Replace(image)
        } else {
            ImageChange::Keep
        }
    }
}

async fn read_post_form(mut multipart: Multipart) -> Result<PostForm, HandlerError> {
    let mut form = PostForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponseDto::bad_request(&format!(
                "Malformed multipart body: {}",
                e
            ))),
        )
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = read_text(field).await?,
            "description" => form.description = read_text(field).await?,
            "category" => {
                let value = read_text(field).await?;
                // An empty selection means uncategorized
                if !value.is_empty() {
                    form.category = Some(value.parse::<Category>().map_err(|e| {
                        (
                            StatusCode::BAD_REQUEST,
                            Json(ErrorResponseDto::bad_request(&e.to_string())),
                        )
                    })?);
                }
            }
            "used" => {
                let value = read_text(field).await?;
                form.used = matches!(value.as_str(), "true" | "on" | "1");
            }
            "remove_image" => {
                let value = read_text(field).await?;
                form.remove_image = matches!(value.as_str(), "true" | "on" | "1");
            }
            "image" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let data: Bytes = field.bytes().await.map_err(|e| {
                    (
                        StatusCode::BAD_REQUEST,
                        Json(ErrorResponseDto::bad_request(&format!(
                            "Failed to read image field: {}",
                            e
                        ))),
                    )
                })?;
                // An empty file input submits a zero-length part
                if !data.is_empty() {
                    form.image = Some(NewImage::new(file_name, data));
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, HandlerError> {
    field.text().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponseDto::bad_request(&format!(
                "Failed to read form field: {}",
                e
            ))),
        )
    })
}

/// Handle listing the owner's posts with signed image URLs
pub async fn list_posts(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListPostsQuery>,
) -> Result<Json<ListPostsResponseDto>, HandlerError> {
    let owner = owner_from_headers(&headers)?;
    let filter = query.into_filter().map_err(post_error)?;

    let views = app_state
        .view_service
        .list_posts(&owner, &filter)
        .await
        .map_err(post_error)?;

    let posts: Vec<PostDto> = views.into_iter().map(PostDto::from).collect();
    let total_count = posts.len();

    Ok(Json(ListPostsResponseDto { posts, total_count }))
}

/// Handle post creation from a multipart form
pub async fn create_post(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<(StatusCode, Json<PostDto>), HandlerError> {
    let owner = owner_from_headers(&headers)?;
    let form = read_post_form(multipart).await?;

    let draft = PostDraft {
        title: form.title.clone(),
        description: form.description.clone(),
        category: form.category,
        used: form.used,
        image: form.image,
    };

    let post = app_state
        .lifecycle_service
        .add_post(&owner, draft)
        .await
        .map_err(post_error)?;

    Ok((StatusCode::CREATED, Json(PostDto::from(post))))
}

/// Handle post updates, including image replace and removal
pub async fn update_post(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<PostDto>, HandlerError> {
    let owner = owner_from_headers(&headers)?;
    let id = parse_post_id(&id)?;
    let form = read_post_form(multipart).await?;

    let edit = PostEdit {
        title: form.title.clone(),
        description: form.description.clone(),
        category: form.category,
        used: form.used,
        image: form.image_change(),
    };

    let post = app_state
        .lifecycle_service
        .edit_post(&id, &owner, edit)
        .await
        .map_err(post_error)?;

    Ok(Json(PostDto::from(post)))
}

/// Handle post deletion, including the best-effort image delete
pub async fn delete_post(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SuccessResponseDto>, HandlerError> {
    let owner = owner_from_headers(&headers)?;
    let id = parse_post_id(&id)?;

    app_state
        .lifecycle_service
        .delete_post(&id, &owner)
        .await
        .map_err(post_error)?;

    Ok(Json(SuccessResponseDto::new("Post deleted")))
}
