mod common;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::IntoResponse,
};
use axum_recipes_api::{
    error::AppError,
    routes::{
        recipes::{download_shopping_cart, get_link},
        short_links::redirect_to_recipe,
    },
    services::{cart_service, recipe_service},
};
use common::{create_ingredient, create_recipe, create_user, setup_state};
use uuid::Uuid;

#[tokio::test]
async fn short_link_points_at_the_redirect_route() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let author = create_user(&state, "chef").await?;
    let egg = create_ingredient(&state, "egg", "pcs").await?;
    let recipe_id = create_recipe(&state, &author, "Omelette", &[(egg, 3)]).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::HOST, HeaderValue::from_static("recipes.example.com"));
    let response = get_link(State(state.clone()), headers, Path(recipe_id)).await?;
    let link = response.0.data.expect("short link");
    assert_eq!(
        link.short_link,
        format!("http://recipes.example.com/s/{recipe_id}")
    );

    let json = serde_json::to_value(&link)?;
    assert_eq!(
        json["short-link"],
        format!("http://recipes.example.com/s/{recipe_id}")
    );
    Ok(())
}

#[tokio::test]
async fn short_link_for_unknown_recipe_is_not_found() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let err = recipe_service::short_link(&state, Uuid::new_v4(), "localhost")
        .await
        .err()
        .expect("unknown recipe");
    assert!(matches!(err, AppError::NotFound));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn short_link_redirects_to_recipe_page() {
    let id = Uuid::new_v4();
    let response = redirect_to_recipe(Path(id)).await.into_response();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok());
    assert_eq!(location, Some(format!("/recipes/{id}/").as_str()));
}

#[tokio::test]
async fn shopping_cart_download_is_a_text_attachment() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let author = create_user(&state, "chef").await?;
    let shopper = create_user(&state, "shopper").await?;
    let flour = create_ingredient(&state, "flour", "g").await?;
    let recipe_id = create_recipe(&state, &author, "Bread", &[(flour, 500)]).await?;
    cart_service::add_to_cart(&state, &shopper, recipe_id).await?;

    let response = download_shopping_cart(State(state.clone()), shopper)
        .await?
        .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(
        headers.get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some("text/plain; charset=utf-8".as_bytes())
    );
    assert_eq!(
        headers.get(header::CONTENT_DISPOSITION).map(|v| v.as_bytes()),
        Some("attachment; filename=\"shopping_list.txt\"".as_bytes())
    );

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let text = String::from_utf8(body.to_vec())?;
    assert!(text.starts_with("Shopping list\n"));
    assert!(text.ends_with("1. Flour - 500g\n"));
    Ok(())
}
