//! Conversions from entity models to API models, and the loaders that
//! attach per-viewer flags (favorited, in cart, subscribed).

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    entity::{
        Favorites, Ingredients, RecipeIngredients, ShoppingCarts, Subscriptions, Users,
        favorites::Column as FavCol,
        ingredients::{Column as IngredientCol, Model as IngredientModel},
        recipe_ingredients::Column as RecipeIngredientCol,
        recipes::Model as RecipeModel,
        shopping_carts::Column as CartCol,
        subscriptions::Column as SubCol,
        users::{Column as UserCol, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Ingredient, Recipe, RecipeIngredientAmount, RecipeShort, UserProfile},
};

pub fn ingredient_from_entity(model: IngredientModel) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

pub fn profile_from_entity(model: UserModel, is_subscribed: bool) -> UserProfile {
    UserProfile {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        avatar: model.avatar,
        is_subscribed,
    }
}

pub fn recipe_short_from_entity(model: RecipeModel) -> RecipeShort {
    RecipeShort {
        id: model.id,
        name: model.name,
        image: model.image,
        cooking_time: model.cooking_time,
    }
}

/// Authors among `author_ids` that `viewer` follows.
pub async fn subscribed_authors<C: ConnectionTrait>(
    db: &C,
    viewer: Option<&AuthUser>,
    author_ids: &[Uuid],
) -> AppResult<HashSet<Uuid>> {
    let Some(viewer) = viewer else {
        return Ok(HashSet::new());
    };
    if author_ids.is_empty() {
        return Ok(HashSet::new());
    }
    let ids = Subscriptions::find()
        .filter(SubCol::UserId.eq(viewer.user_id))
        .filter(SubCol::AuthorId.is_in(author_ids.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|sub| sub.author_id)
        .collect();
    Ok(ids)
}

pub async fn profiles<C: ConnectionTrait>(
    db: &C,
    viewer: Option<&AuthUser>,
    users: Vec<UserModel>,
) -> AppResult<Vec<UserProfile>> {
    let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
    let subscribed = subscribed_authors(db, viewer, &ids).await?;
    Ok(users
        .into_iter()
        .map(|u| {
            let is_subscribed = subscribed.contains(&u.id);
            profile_from_entity(u, is_subscribed)
        })
        .collect())
}

/// Expand recipe rows into full API recipes, preserving their order.
pub async fn load_recipes<C: ConnectionTrait>(
    db: &C,
    viewer: Option<&AuthUser>,
    recipes: Vec<RecipeModel>,
) -> AppResult<Vec<Recipe>> {
    if recipes.is_empty() {
        return Ok(Vec::new());
    }
    let recipe_ids: Vec<Uuid> = recipes.iter().map(|r| r.id).collect();
    let author_ids: Vec<Uuid> = recipes
        .iter()
        .map(|r| r.author_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let subscribed = subscribed_authors(db, viewer, &author_ids).await?;
    let authors: HashMap<Uuid, UserModel> = Users::find()
        .filter(UserCol::Id.is_in(author_ids.iter().copied()))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut ingredients: HashMap<Uuid, Vec<RecipeIngredientAmount>> = HashMap::new();
    let rows = RecipeIngredients::find()
        .filter(RecipeIngredientCol::RecipeId.is_in(recipe_ids.iter().copied()))
        .find_also_related(Ingredients)
        .order_by_asc(IngredientCol::Name)
        .all(db)
        .await?;
    for (link, ingredient) in rows {
        let Some(ingredient) = ingredient else {
            continue;
        };
        ingredients
            .entry(link.recipe_id)
            .or_default()
            .push(RecipeIngredientAmount {
                id: ingredient.id,
                name: ingredient.name,
                measurement_unit: ingredient.measurement_unit,
                amount: link.amount,
            });
    }

    let (favorited, in_cart) = match viewer {
        Some(viewer) => {
            let favorited: HashSet<Uuid> = Favorites::find()
                .filter(FavCol::UserId.eq(viewer.user_id))
                .filter(FavCol::RecipeId.is_in(recipe_ids.iter().copied()))
                .all(db)
                .await?
                .into_iter()
                .map(|f| f.recipe_id)
                .collect();
            let in_cart: HashSet<Uuid> = ShoppingCarts::find()
                .filter(CartCol::UserId.eq(viewer.user_id))
                .filter(CartCol::RecipeId.is_in(recipe_ids.iter().copied()))
                .all(db)
                .await?
                .into_iter()
                .map(|c| c.recipe_id)
                .collect();
            (favorited, in_cart)
        }
        None => (HashSet::new(), HashSet::new()),
    };

    recipes
        .into_iter()
        .map(|recipe| {
            let author = authors.get(&recipe.author_id).cloned().ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("author of recipe {} is missing", recipe.id))
            })?;
            let is_subscribed = subscribed.contains(&author.id);
            Ok(Recipe {
                id: recipe.id,
                author: profile_from_entity(author, is_subscribed),
                ingredients: ingredients.remove(&recipe.id).unwrap_or_default(),
                is_favorited: favorited.contains(&recipe.id),
                is_in_shopping_cart: in_cart.contains(&recipe.id),
                pub_date: recipe.pub_date.with_timezone(&Utc),
                name: recipe.name,
                text: recipe.text,
                image: recipe.image,
                cooking_time: recipe.cooking_time,
            })
        })
        .collect()
}

pub async fn load_recipe<C: ConnectionTrait>(
    db: &C,
    viewer: Option<&AuthUser>,
    recipe: RecipeModel,
) -> AppResult<Recipe> {
    load_recipes(db, viewer, vec![recipe])
        .await?
        .pop()
        .ok_or(AppError::NotFound)
}
