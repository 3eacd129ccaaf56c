use axum::{extract::Path, response::Redirect};
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/s/{id}",
    params(
        ("id" = Uuid, Path, description = "Recipe ID")
    ),
    responses(
        (status = 303, description = "Redirect to the recipe page"),
    ),
    tag = "Recipes"
)]
pub async fn redirect_to_recipe(Path(id): Path<Uuid>) -> Redirect {
    Redirect::to(&format!("/recipes/{id}/"))
}
