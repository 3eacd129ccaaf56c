use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::users::{Avatar, AvatarRequest, UserList},
    entity::{
        Users,
        users::{ActiveModel, Column, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::UserProfile,
    response::{ApiResponse, Meta},
    services::views::profiles,
    state::AppState,
};

/// Resolve the token subject to a stored user.
///
/// A token can be validly signed for an account that no longer exists; that
/// caller is treated as unauthenticated.
pub async fn current_user<C: ConnectionTrait>(db: &C, user: &AuthUser) -> AppResult<UserModel> {
    match Users::find_by_id(user.user_id).one(db).await? {
        Some(model) => Ok(model),
        None => {
            tracing::warn!(user_id = %user.user_id, "token subject has no account");
            Err(AppError::Unauthorized("Unknown user".into()))
        }
    }
}

pub async fn list_users(
    state: &AppState,
    viewer: Option<&AuthUser>,
) -> AppResult<ApiResponse<UserList>> {
    let users = Users::find()
        .order_by_asc(Column::Username)
        .all(&state.orm)
        .await?;
    let items = profiles(&state.orm, viewer, users).await?;
    let meta = Meta::new(items.len() as i64);
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn get_user(
    state: &AppState,
    viewer: Option<&AuthUser>,
    id: Uuid,
) -> AppResult<ApiResponse<UserProfile>> {
    let user = Users::find_by_id(id).one(&state.orm).await?;
    let user = match user {
        Some(u) => u,
        None => return Err(AppError::NotFound),
    };
    let profile = profiles(&state.orm, viewer, vec![user])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("User", profile, None))
}

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserProfile>> {
    current_user(&state.orm, user).await?;
    get_user(state, Some(user), user.user_id).await
}

pub async fn update_avatar(
    state: &AppState,
    user: &AuthUser,
    payload: AvatarRequest,
) -> AppResult<ApiResponse<Avatar>> {
    let avatar = payload
        .avatar
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("avatar is required".into()))?;

    let model = current_user(&state.orm, user).await?;
    let mut active: ActiveModel = model.into();
    active.avatar = Set(Some(avatar.clone()));
    active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        user.user_id,
        "avatar_update",
        "users",
        serde_json::json!({ "avatar": avatar }),
    )
    .await;

    Ok(ApiResponse::success(
        "Avatar updated",
        Avatar { avatar },
        Some(Meta::empty()),
    ))
}

/// Clearing an avatar that was never set still succeeds.
pub async fn delete_avatar(state: &AppState, user: &AuthUser) -> AppResult<()> {
    let model = current_user(&state.orm, user).await?;
    if model.avatar.is_none() {
        return Ok(());
    }

    let mut active: ActiveModel = model.into();
    active.avatar = Set(None);
    active.update(&state.orm).await?;

    audit::record(
        &state.orm,
        user.user_id,
        "avatar_delete",
        "users",
        serde_json::json!({}),
    )
    .await;

    Ok(())
}
