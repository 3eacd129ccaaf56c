use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeQuery {
    /// Only recipes by this author.
    pub author: Option<Uuid>,
    /// `1` keeps only the viewer's favorites; any other value is ignored.
    pub is_favorited: Option<String>,
    /// `1` keeps only recipes in the viewer's shopping cart; any other value is ignored.
    pub is_in_shopping_cart: Option<String>,
    /// Case-insensitive match on recipe name or author username.
    pub search: Option<String>,
}

impl RecipeQuery {
    pub fn favorited_only(&self) -> bool {
        self.is_favorited.as_deref() == Some("1")
    }

    pub fn in_cart_only(&self) -> bool {
        self.is_in_shopping_cart.as_deref() == Some("1")
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngredientQuery {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipesLimitQuery {
    /// Max recipes embedded per author.
    pub recipes_limit: Option<String>,
}

impl RecipesLimitQuery {
    pub fn limit(&self) -> Option<u64> {
        self.recipes_limit
            .as_deref()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|v| *v > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::Uri};

    fn recipe_query(uri: &'static str) -> RecipeQuery {
        let uri = Uri::from_static(uri);
        Query::<RecipeQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn recipe_flags_only_trigger_on_one() {
        let query = recipe_query("/api/recipes?is_favorited=1&is_in_shopping_cart=1");
        assert!(query.favorited_only());
        assert!(query.in_cart_only());

        let query = recipe_query("/api/recipes?is_favorited=true&is_in_shopping_cart=0");
        assert!(!query.favorited_only());
        assert!(!query.in_cart_only());

        let query = recipe_query("/api/recipes");
        assert!(!query.favorited_only());
        assert!(!query.in_cart_only());
    }

    fn limit(value: Option<&str>) -> Option<u64> {
        RecipesLimitQuery {
            recipes_limit: value.map(str::to_string),
        }
        .limit()
    }

    #[test]
    fn recipes_limit_accepts_positive_integers_only() {
        assert_eq!(limit(Some("3")), Some(3));
        assert_eq!(limit(Some("0")), None);
        assert_eq!(limit(Some("-1")), None);
        assert_eq!(limit(Some("abc")), None);
        assert_eq!(limit(None), None);
    }
}
