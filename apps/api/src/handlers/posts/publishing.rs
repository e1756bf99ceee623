use super::*;

pub async fn list_posts_handler(
    State(state): State<AppState>,
    Query(query): Query<PostListQuery>,
) -> ApiResult<Json<PostPageResponse>> {
    let page = state
        .post_service
        .list_posts(query.page.unwrap_or(1), query.per_page)
        .await?;

    Ok(Json(PostPageResponse::from(page)))
}

pub async fn get_post_handler(
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
) -> ApiResult<Json<PostResponse>> {
    let post = state.post_service.get_post(post_id).await?;
    Ok(Json(PostResponse::from(post)))
}

pub async fn get_post_by_slug_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<PostResponse>> {
    let post = state.post_service.get_post_by_slug(slug.as_str()).await?;
    Ok(Json(PostResponse::from(post)))
}

pub async fn create_post_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<(StatusCode, Json<PostResponse>)> {
    let author = state.authorization_service.current_user(&identity).await?;
    let post = state
        .post_service
        .create_post(&author, payload.title, &payload.body, &payload.tags)
        .await?;

    Ok((StatusCode::CREATED, Json(PostResponse::from(post))))
}

pub async fn update_post_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(post_id): Path<i64>,
    Json(payload): Json<UpdatePostRequest>,
) -> ApiResult<Json<PostResponse>> {
    let editor = state.authorization_service.current_user(&identity).await?;
    state
        .post_service
        .update_post(&editor, post_id, &payload.body)
        .await?;

    let post = state.post_service.get_post(post_id).await?;
    Ok(Json(PostResponse::from(post)))
}
