use super::*;

pub async fn like_status_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(post_id): Path<i64>,
) -> ApiResult<Json<LikeResponse>> {
    let user = state.authorization_service.current_user(&identity).await?;
    let liked = state.post_service.has_liked_post(&user, post_id).await?;

    Ok(Json(LikeResponse { post_id, liked }))
}

pub async fn like_post_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(post_id): Path<i64>,
) -> ApiResult<Json<LikeResponse>> {
    let user = state.authorization_service.current_user(&identity).await?;
    state.post_service.like_post(&user, post_id).await?;

    Ok(Json(LikeResponse {
        post_id,
        liked: true,
    }))
}

pub async fn unlike_post_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(post_id): Path<i64>,
) -> ApiResult<Json<LikeResponse>> {
    let user = state.authorization_service.current_user(&identity).await?;
    state.post_service.unlike_post(&user, post_id).await?;

    Ok(Json(LikeResponse {
        post_id,
        liked: false,
    }))
}

pub async fn add_comment_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(post_id): Path<i64>,
    Json(payload): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentResponse>)> {
    let author = state.authorization_service.current_user(&identity).await?;
    let comment = state
        .post_service
        .add_comment(&author, post_id, &payload.body)
        .await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::from(comment))))
}

pub async fn set_comment_disabled_handler(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(comment_id): Path<i64>,
    Json(payload): Json<SetCommentDisabledRequest>,
) -> ApiResult<Json<CommentResponse>> {
    let moderator = state.authorization_service.current_user(&identity).await?;
    let comment = state
        .post_service
        .set_comment_disabled(&moderator, comment_id, payload.disabled)
        .await?;

    Ok(Json(CommentResponse::from(comment)))
}
