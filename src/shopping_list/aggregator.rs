use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, FromQueryResult, JoinType, Order,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait,
    sea_query::{Expr, Func, SimpleExpr},
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    ShoppingCarts, RecipeIngredients,
    ingredients::{self, Column as IngredientCol},
    recipe_ingredients::{self, Column as RecipeIngredientCol},
    shopping_carts::Column as CartCol,
};

/// One line of a shopping list: a distinct ingredient and its summed amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult, ToSchema)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Sum ingredient amounts over every recipe in `user_id`'s shopping cart.
///
/// Rows come back ordered by ingredient name, case-insensitively. An empty
/// cart yields an empty list.
pub async fn aggregate_shopping_list<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Vec<ShoppingListItem>, DbErr> {
    let cart_recipes = ShoppingCarts::find()
        .select_only()
        .column(CartCol::RecipeId)
        .filter(CartCol::UserId.eq(user_id))
        .into_query();

    let lower_name: SimpleExpr =
        Func::lower(Expr::col((ingredients::Entity, IngredientCol::Name))).into();

    let items = RecipeIngredients::find()
        .select_only()
        .column_as(IngredientCol::Name, "name")
        .column_as(IngredientCol::MeasurementUnit, "measurement_unit")
        .column_as(RecipeIngredientCol::Amount.sum(), "total_amount")
        .join(
            JoinType::InnerJoin,
            recipe_ingredients::Relation::Ingredients.def(),
        )
        .filter(RecipeIngredientCol::RecipeId.in_subquery(cart_recipes))
        .group_by(IngredientCol::Name)
        .group_by(IngredientCol::MeasurementUnit)
        .order_by(lower_name, Order::Asc)
        .order_by(IngredientCol::Name, Order::Asc)
        .into_model::<ShoppingListItem>()
        .all(db)
        .await?;

    tracing::debug!(%user_id, items = items.len(), "shopping list aggregated");
    Ok(items)
}
