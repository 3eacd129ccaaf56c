use sea_orm::{EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::ingredients::IngredientList,
    entity::{Ingredients, ingredients::Column},
    error::{AppError, AppResult},
    models::Ingredient,
    response::{ApiResponse, Meta},
    routes::params::IngredientQuery,
    services::{filters::starts_with_ci, views::ingredient_from_entity},
    state::AppState,
};

pub async fn list_ingredients(
    state: &AppState,
    query: IngredientQuery,
) -> AppResult<ApiResponse<IngredientList>> {
    let mut finder = Ingredients::find();

    if let Some(prefix) = query.name.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        finder = finder.filter(starts_with_ci((Ingredients, Column::Name), prefix));
    }

    let items: Vec<Ingredient> = finder
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ingredient_from_entity)
        .collect();

    let meta = Meta::new(items.len() as i64);
    Ok(ApiResponse::success(
        "Ingredients",
        IngredientList { items },
        Some(meta),
    ))
}

pub async fn get_ingredient(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Ingredient>> {
    let result = Ingredients::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(ingredient_from_entity);
    let result = match result {
        Some(i) => i,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Ingredient", result, None))
}
