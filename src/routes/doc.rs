use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        ingredients::IngredientList,
        recipes::{CreateRecipeRequest, IngredientAmountInput, RecipeList, ShortLink, UpdateRecipeRequest},
        users::{Avatar, AvatarRequest, SubscriptionList, UserList},
    },
    models::{AuthorWithRecipes, Ingredient, Recipe, RecipeIngredientAmount, RecipeShort, UserProfile},
    response::Meta,
    routes::{health, ingredients, params, recipes, short_links, users},
    shopping_list::ShoppingListItem,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        ingredients::list_ingredients,
        ingredients::get_ingredient,
        recipes::list_recipes,
        recipes::create_recipe,
        recipes::get_recipe,
        recipes::update_recipe,
        recipes::delete_recipe,
        recipes::get_link,
        recipes::add_favorite,
        recipes::remove_favorite,
        recipes::add_to_cart,
        recipes::remove_from_cart,
        recipes::download_shopping_cart,
        users::list_users,
        users::me,
        users::update_avatar,
        users::delete_avatar,
        users::get_user,
        users::list_subscriptions,
        users::subscribe,
        users::unsubscribe,
        short_links::redirect_to_recipe
    ),
    components(
        schemas(
            UserProfile,
            Ingredient,
            Recipe,
            RecipeShort,
            RecipeIngredientAmount,
            AuthorWithRecipes,
            ShoppingListItem,
            CreateRecipeRequest,
            UpdateRecipeRequest,
            IngredientAmountInput,
            IngredientList,
            RecipeList,
            ShortLink,
            UserList,
            SubscriptionList,
            AvatarRequest,
            Avatar,
            params::RecipeQuery,
            params::IngredientQuery,
            params::RecipesLimitQuery,
            Meta
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Ingredients", description = "Ingredient catalogue"),
        (name = "Recipes", description = "Recipe endpoints"),
        (name = "Favorites", description = "Favorite endpoints"),
        (name = "Cart", description = "Shopping cart endpoints"),
        (name = "Users", description = "User profiles"),
        (name = "Subscriptions", description = "Author subscriptions"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
