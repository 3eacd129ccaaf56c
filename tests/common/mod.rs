#![allow(dead_code)]

use axum_recipes_api::{
    db::{create_orm_conn, run_migrations},
    dto::recipes::{CreateRecipeRequest, IngredientAmountInput},
    entity::{ingredients::ActiveModel as IngredientActive, users::ActiveModel as UserActive},
    middleware::auth::AuthUser,
    services::recipe_service,
    state::AppState,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

pub async fn setup_state() -> anyhow::Result<AppState> {
    let orm = create_orm_conn("sqlite::memory:").await?;
    run_migrations(&orm).await?;
    Ok(AppState { orm })
}

pub async fn create_user(state: &AppState, username: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{username}@example.com")),
        username: Set(username.to_string()),
        first_name: Set(username.to_string()),
        last_name: Set("Tester".into()),
        avatar: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser { user_id: user.id })
}

pub async fn create_ingredient(state: &AppState, name: &str, unit: &str) -> anyhow::Result<Uuid> {
    let ingredient = IngredientActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        measurement_unit: Set(unit.to_string()),
    }
    .insert(&state.orm)
    .await?;

    Ok(ingredient.id)
}

pub fn recipe_request(name: &str, ingredients: &[(Uuid, i32)]) -> CreateRecipeRequest {
    CreateRecipeRequest {
        name: name.to_string(),
        text: format!("How to cook {name}"),
        image: "recipes/images/placeholder.png".into(),
        cooking_time: 30,
        ingredients: ingredients
            .iter()
            .map(|(id, amount)| IngredientAmountInput {
                id: *id,
                amount: *amount,
            })
            .collect(),
    }
}

pub async fn create_recipe(
    state: &AppState,
    author: &AuthUser,
    name: &str,
    ingredients: &[(Uuid, i32)],
) -> anyhow::Result<Uuid> {
    let resp =
        recipe_service::create_recipe(state, author, recipe_request(name, ingredients)).await?;
    let recipe = resp.data.expect("created recipe");
    Ok(recipe.id)
}
