use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::{
    audit,
    entity::{
        Recipes, ShoppingCarts,
        shopping_carts::{ActiveModel, Column},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::RecipeShort,
    response::{ApiResponse, Meta},
    services::{user_service::current_user, views::recipe_short_from_entity},
    shopping_list::{aggregate_shopping_list, render_shopping_list},
    state::AppState,
};

pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
) -> AppResult<ApiResponse<RecipeShort>> {
    let recipe = Recipes::find_by_id(recipe_id).one(&state.orm).await?;
    let recipe = match recipe {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    current_user(&state.orm, user).await?;

    let existing = ShoppingCarts::find()
        .filter(Column::UserId.eq(user.user_id))
        .filter(Column::RecipeId.eq(recipe_id))
        .count(&state.orm)
        .await?;
    if existing > 0 {
        return Err(AppError::BadRequest(
            "Recipe is already in shopping cart".into(),
        ));
    }

    ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        recipe_id: Set(recipe_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.orm,
        user.user_id,
        "cart_add",
        "shopping_carts",
        serde_json::json!({ "recipe_id": recipe_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Added to shopping cart",
        recipe_short_from_entity(recipe),
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    recipe_id: Uuid,
) -> AppResult<()> {
    let result = ShoppingCarts::delete_many()
        .filter(Column::UserId.eq(user.user_id))
        .filter(Column::RecipeId.eq(recipe_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        user.user_id,
        "cart_remove",
        "shopping_carts",
        serde_json::json!({ "recipe_id": recipe_id }),
    )
    .await;

    Ok(())
}

/// Aggregate the user's cart and render it as a shopping list document.
pub async fn download_shopping_list(state: &AppState, user: &AuthUser) -> AppResult<Vec<u8>> {
    let items = aggregate_shopping_list(&state.orm, user.user_id).await?;
    tracing::info!(user_id = %user.user_id, items = items.len(), "shopping list exported");
    Ok(render_shopping_list(&items, Utc::now()))
}
