use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::recipes::{
        CreateRecipeRequest, IngredientAmountInput, RecipeList, ShortLink, UpdateRecipeRequest,
    },
    entity::{
        Favorites, Ingredients, RecipeIngredients, Recipes, ShoppingCarts, Users,
        favorites::Column as FavCol,
        ingredients::Column as IngredientCol,
        recipe_ingredients::{ActiveModel as RecipeIngredientActive, Column as RecipeIngredientCol},
        recipes::{ActiveModel as RecipeActive, Column as RecipeCol},
        shopping_carts::Column as CartCol,
        users::Column as UserCol,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_owner},
    models::Recipe,
    response::{ApiResponse, Meta},
    routes::params::RecipeQuery,
    services::{
        filters::contains_ci,
        views::{load_recipe, load_recipes},
        user_service::current_user,
    },
    state::AppState,
};

pub const MAX_NAME_LEN: usize = 256;
pub const COOKING_TIME_RANGE: std::ops::RangeInclusive<i32> = 1..=1440;
pub const AMOUNT_RANGE: std::ops::RangeInclusive<i32> = 1..=10000;

pub async fn list_recipes(
    state: &AppState,
    viewer: Option<&AuthUser>,
    query: RecipeQuery,
) -> AppResult<ApiResponse<RecipeList>> {
    let mut condition = Condition::all();

    if let Some(author) = query.author {
        condition = condition.add(RecipeCol::AuthorId.eq(author));
    }

    if let Some(viewer) = viewer {
        if query.favorited_only() {
            let favorites = Favorites::find()
                .select_only()
                .column(FavCol::RecipeId)
                .filter(FavCol::UserId.eq(viewer.user_id))
                .into_query();
            condition = condition.add(RecipeCol::Id.in_subquery(favorites));
        }
        if query.in_cart_only() {
            let cart = ShoppingCarts::find()
                .select_only()
                .column(CartCol::RecipeId)
                .filter(CartCol::UserId.eq(viewer.user_id))
                .into_query();
            condition = condition.add(RecipeCol::Id.in_subquery(cart));
        }
    }

    if let Some(search) = query.search.as_ref().map(|s| s.trim()).filter(|s| !s.is_empty()) {
        let authors = Users::find()
            .select_only()
            .column(UserCol::Id)
            .filter(contains_ci((Users, UserCol::Username), search))
            .into_query();
        condition = condition.add(
            Condition::any()
                .add(contains_ci((Recipes, RecipeCol::Name), search))
                .add(RecipeCol::AuthorId.in_subquery(authors)),
        );
    }

    let models = Recipes::find()
        .filter(condition)
        .order_by_desc(RecipeCol::PubDate)
        .all(&state.orm)
        .await?;

    let items = load_recipes(&state.orm, viewer, models).await?;
    let meta = Meta::new(items.len() as i64);
    Ok(ApiResponse::success("Recipes", RecipeList { items }, Some(meta)))
}

pub async fn get_recipe(
    state: &AppState,
    viewer: Option<&AuthUser>,
    id: Uuid,
) -> AppResult<ApiResponse<Recipe>> {
    let recipe = Recipes::find_by_id(id).one(&state.orm).await?;
    let recipe = match recipe {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    let recipe = load_recipe(&state.orm, viewer, recipe).await?;
    Ok(ApiResponse::success("Recipe", recipe, None))
}

pub async fn create_recipe(
    state: &AppState,
    user: &AuthUser,
    payload: CreateRecipeRequest,
) -> AppResult<ApiResponse<Recipe>> {
    validate_name(&payload.name)?;
    validate_text(&payload.text)?;
    validate_cooking_time(payload.cooking_time)?;
    if payload.image.trim().is_empty() {
        return Err(AppError::BadRequest("image is required".into()));
    }
    validate_ingredients(&payload.ingredients)?;
    current_user(&state.orm, user).await?;

    let txn = state.orm.begin().await?;
    ensure_ingredients_exist(&txn, &payload.ingredients).await?;

    let recipe = RecipeActive {
        id: Set(Uuid::new_v4()),
        author_id: Set(user.user_id),
        name: Set(payload.name),
        text: Set(payload.text),
        cooking_time: Set(payload.cooking_time),
        image: Set(payload.image),
        pub_date: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    insert_ingredients(&txn, recipe.id, &payload.ingredients).await?;
    txn.commit().await?;

    tracing::info!(recipe_id = %recipe.id, author_id = %user.user_id, "recipe created");
    audit::record(
        &state.orm,
        user.user_id,
        "recipe_create",
        "recipes",
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    let recipe = load_recipe(&state.orm, Some(user), recipe).await?;
    Ok(ApiResponse::success(
        "Recipe created",
        recipe,
        Some(Meta::empty()),
    ))
}

pub async fn update_recipe(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateRecipeRequest,
) -> AppResult<ApiResponse<Recipe>> {
    let existing = Recipes::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    ensure_owner(user, existing.author_id)?;

    if let Some(name) = &payload.name {
        validate_name(name)?;
    }
    if let Some(text) = &payload.text {
        validate_text(text)?;
    }
    if let Some(cooking_time) = payload.cooking_time {
        validate_cooking_time(cooking_time)?;
    }
    if payload.image.as_ref().is_some_and(|i| i.trim().is_empty()) {
        return Err(AppError::BadRequest("image must not be empty".into()));
    }
    validate_ingredients(&payload.ingredients)?;

    let txn = state.orm.begin().await?;
    ensure_ingredients_exist(&txn, &payload.ingredients).await?;

    let mut active: RecipeActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(text) = payload.text {
        active.text = Set(text);
    }
    if let Some(image) = payload.image {
        active.image = Set(image);
    }
    if let Some(cooking_time) = payload.cooking_time {
        active.cooking_time = Set(cooking_time);
    }
    let recipe = active.update(&txn).await?;

    RecipeIngredients::delete_many()
        .filter(RecipeIngredientCol::RecipeId.eq(recipe.id))
        .exec(&txn)
        .await?;
    insert_ingredients(&txn, recipe.id, &payload.ingredients).await?;
    txn.commit().await?;

    audit::record(
        &state.orm,
        user.user_id,
        "recipe_update",
        "recipes",
        serde_json::json!({ "recipe_id": recipe.id }),
    )
    .await;

    let recipe = load_recipe(&state.orm, Some(user), recipe).await?;
    Ok(ApiResponse::success("Updated", recipe, Some(Meta::empty())))
}

pub async fn delete_recipe(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<()> {
    let existing = Recipes::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };
    ensure_owner(user, existing.author_id)?;

    // Ingredient rows, favorites and cart entries go with it via ON DELETE CASCADE.
    Recipes::delete_by_id(id).exec(&state.orm).await?;

    tracing::info!(recipe_id = %id, "recipe deleted");
    audit::record(
        &state.orm,
        user.user_id,
        "recipe_delete",
        "recipes",
        serde_json::json!({ "recipe_id": id }),
    )
    .await;

    Ok(())
}

pub async fn short_link(
    state: &AppState,
    id: Uuid,
    host: &str,
) -> AppResult<ApiResponse<ShortLink>> {
    let exists = Recipes::find_by_id(id).count(&state.orm).await?;
    if exists == 0 {
        return Err(AppError::NotFound);
    }
    let link = ShortLink {
        short_link: format!("http://{host}/s/{id}"),
    };
    Ok(ApiResponse::success("Short link", link, None))
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::BadRequest("text is required".into()));
    }
    Ok(())
}

fn validate_cooking_time(cooking_time: i32) -> Result<(), AppError> {
    if !COOKING_TIME_RANGE.contains(&cooking_time) {
        return Err(AppError::BadRequest(format!(
            "cooking_time must be between {} and {}",
            COOKING_TIME_RANGE.start(),
            COOKING_TIME_RANGE.end()
        )));
    }
    Ok(())
}

fn validate_ingredients(ingredients: &[IngredientAmountInput]) -> Result<(), AppError> {
    if ingredients.is_empty() {
        return Err(AppError::BadRequest("ingredients must not be empty".into()));
    }
    let mut seen = HashSet::new();
    for item in ingredients {
        if !AMOUNT_RANGE.contains(&item.amount) {
            return Err(AppError::BadRequest(format!(
                "amount must be between {} and {}",
                AMOUNT_RANGE.start(),
                AMOUNT_RANGE.end()
            )));
        }
        if !seen.insert(item.id) {
            return Err(AppError::BadRequest("ingredients must be unique".into()));
        }
    }
    Ok(())
}

async fn ensure_ingredients_exist<C: ConnectionTrait>(
    db: &C,
    ingredients: &[IngredientAmountInput],
) -> AppResult<()> {
    let found = Ingredients::find()
        .filter(IngredientCol::Id.is_in(ingredients.iter().map(|i| i.id)))
        .count(db)
        .await?;
    if found as usize != ingredients.len() {
        return Err(AppError::BadRequest("unknown ingredient".into()));
    }
    Ok(())
}

async fn insert_ingredients<C: ConnectionTrait>(
    db: &C,
    recipe_id: Uuid,
    ingredients: &[IngredientAmountInput],
) -> AppResult<()> {
    let rows = ingredients.iter().map(|item| RecipeIngredientActive {
        id: Set(Uuid::new_v4()),
        recipe_id: Set(recipe_id),
        ingredient_id: Set(item.id),
        amount: Set(item.amount),
    });
    RecipeIngredients::insert_many(rows)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: Uuid, amount: i32) -> IngredientAmountInput {
        IngredientAmountInput { id, amount }
    }

    #[test]
    fn cooking_time_bounds() {
        assert!(validate_cooking_time(1).is_ok());
        assert!(validate_cooking_time(1440).is_ok());
        assert!(validate_cooking_time(0).is_err());
        assert!(validate_cooking_time(1441).is_err());
    }

    #[test]
    fn name_must_be_present_and_short() {
        assert!(validate_name("Pancakes").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn ingredients_need_positive_amounts_and_no_duplicates() {
        let flour = Uuid::new_v4();
        let egg = Uuid::new_v4();
        assert!(validate_ingredients(&[input(flour, 200), input(egg, 2)]).is_ok());
        assert!(validate_ingredients(&[]).is_err());
        assert!(validate_ingredients(&[input(flour, 0)]).is_err());
        assert!(validate_ingredients(&[input(flour, 10001)]).is_err());
        assert!(validate_ingredients(&[input(flour, 1), input(flour, 2)]).is_err());
    }
}
