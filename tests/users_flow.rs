mod common;

use axum_recipes_api::{
    dto::users::AvatarRequest, error::AppError, middleware::auth::AuthUser,
    services::user_service,
};
use common::{create_user, setup_state};
use uuid::Uuid;

#[tokio::test]
async fn avatar_can_be_set_and_cleared() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "painter").await?;

    let updated = user_service::update_avatar(
        &state,
        &user,
        AvatarRequest {
            avatar: Some("users/avatars/painter.png".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.avatar, "users/avatars/painter.png");

    let profile = user_service::me(&state, &user).await?.data.unwrap();
    assert_eq!(profile.avatar.as_deref(), Some("users/avatars/painter.png"));

    user_service::delete_avatar(&state, &user).await?;
    let profile = user_service::me(&state, &user).await?.data.unwrap();
    assert_eq!(profile.avatar, None);

    // Clearing twice is still fine.
    user_service::delete_avatar(&state, &user).await?;
    Ok(())
}

#[tokio::test]
async fn empty_avatar_is_rejected() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "painter").await?;

    for avatar in [None, Some(String::new()), Some("   ".to_string())] {
        assert!(matches!(
            user_service::update_avatar(&state, &user, AvatarRequest { avatar }).await,
            Err(AppError::BadRequest(_))
        ));
    }

    let profile = user_service::me(&state, &user).await?.data.unwrap();
    assert_eq!(profile.avatar, None);
    Ok(())
}

#[tokio::test]
async fn avatar_requires_an_existing_account() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let ghost = AuthUser {
        user_id: Uuid::new_v4(),
    };

    assert!(matches!(
        user_service::update_avatar(
            &state,
            &ghost,
            AvatarRequest {
                avatar: Some("a.png".into())
            }
        )
        .await,
        Err(AppError::Unauthorized(_))
    ));
    assert!(matches!(
        user_service::delete_avatar(&state, &ghost).await,
        Err(AppError::Unauthorized(_))
    ));
    Ok(())
}
