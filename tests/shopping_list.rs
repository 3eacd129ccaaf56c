mod common;

use axum_recipes_api::{
    services::{cart_service, recipe_service},
    shopping_list::{ShoppingListItem, aggregate_shopping_list, render_shopping_list},
};
use chrono::Utc;
use common::{create_ingredient, create_recipe, create_user, setup_state};

fn item(name: &str, unit: &str, total: i64) -> ShoppingListItem {
    ShoppingListItem {
        name: name.to_string(),
        measurement_unit: unit.to_string(),
        total_amount: total,
    }
}

#[tokio::test]
async fn empty_cart_yields_empty_list_and_header_only_document() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let user = create_user(&state, "alice").await?;

    let items = aggregate_shopping_list(&state.orm, user.user_id).await?;
    assert!(items.is_empty());

    let document = cart_service::download_shopping_list(&state, &user).await?;
    let text = String::from_utf8(document)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Shopping list");
    assert_eq!(lines[1], Utc::now().format("%d.%m.%Y").to_string());
    Ok(())
}

#[tokio::test]
async fn amounts_are_summed_across_cart_recipes() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let author = create_user(&state, "author").await?;
    let shopper = create_user(&state, "shopper").await?;

    let flour = create_ingredient(&state, "flour", "g").await?;
    let egg = create_ingredient(&state, "egg", "pcs").await?;

    let recipe_a = create_recipe(&state, &author, "Pancakes", &[(flour, 200), (egg, 2)]).await?;
    let recipe_b = create_recipe(&state, &author, "Bread", &[(flour, 100)]).await?;

    cart_service::add_to_cart(&state, &shopper, recipe_a).await?;
    cart_service::add_to_cart(&state, &shopper, recipe_b).await?;

    let items = aggregate_shopping_list(&state.orm, shopper.user_id).await?;
    assert_eq!(items, vec![item("egg", "pcs", 2), item("flour", "g", 300)]);

    let text = String::from_utf8(cart_service::download_shopping_list(&state, &shopper).await?)?;
    let lines: Vec<&str> = text.lines().skip(2).collect();
    assert_eq!(lines, vec!["1. Egg - 2pcs", "2. Flour - 300g"]);
    Ok(())
}

#[tokio::test]
async fn only_the_requesting_users_cart_counts() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let author = create_user(&state, "author").await?;
    let alice = create_user(&state, "alice").await?;
    let bob = create_user(&state, "bob").await?;

    let rice = create_ingredient(&state, "rice", "g").await?;
    let onion = create_ingredient(&state, "onion", "pcs").await?;
    let pilaf = create_recipe(&state, &author, "Pilaf", &[(rice, 300), (onion, 1)]).await?;
    let risotto = create_recipe(&state, &author, "Risotto", &[(rice, 250)]).await?;

    cart_service::add_to_cart(&state, &alice, pilaf).await?;
    cart_service::add_to_cart(&state, &bob, risotto).await?;

    let alice_items = aggregate_shopping_list(&state.orm, alice.user_id).await?;
    assert_eq!(
        alice_items,
        vec![item("onion", "pcs", 1), item("rice", "g", 300)]
    );

    let bob_items = aggregate_shopping_list(&state.orm, bob.user_id).await?;
    assert_eq!(bob_items, vec![item("rice", "g", 250)]);
    Ok(())
}

#[tokio::test]
async fn ordering_ignores_case_and_repeated_calls_agree() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let author = create_user(&state, "author").await?;
    let shopper = create_user(&state, "shopper").await?;

    let banana = create_ingredient(&state, "banana", "pcs").await?;
    let apple = create_ingredient(&state, "Apple", "pcs").await?;
    let cherry = create_ingredient(&state, "Cherry", "g").await?;
    let recipe = create_recipe(
        &state,
        &author,
        "Fruit salad",
        &[(banana, 2), (apple, 1), (cherry, 150)],
    )
    .await?;
    cart_service::add_to_cart(&state, &shopper, recipe).await?;

    let first = aggregate_shopping_list(&state.orm, shopper.user_id).await?;
    let names: Vec<&str> = first.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Apple", "banana", "Cherry"]);

    let second = aggregate_shopping_list(&state.orm, shopper.user_id).await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn cart_changes_are_reflected() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let author = create_user(&state, "author").await?;
    let shopper = create_user(&state, "shopper").await?;

    let milk = create_ingredient(&state, "milk", "ml").await?;
    let latte = create_recipe(&state, &author, "Latte", &[(milk, 200)]).await?;
    let cocoa = create_recipe(&state, &author, "Cocoa", &[(milk, 250)]).await?;
    cart_service::add_to_cart(&state, &shopper, latte).await?;
    cart_service::add_to_cart(&state, &shopper, cocoa).await?;
    assert_eq!(
        aggregate_shopping_list(&state.orm, shopper.user_id).await?,
        vec![item("milk", "ml", 450)]
    );

    cart_service::remove_from_cart(&state, &shopper, latte).await?;
    assert_eq!(
        aggregate_shopping_list(&state.orm, shopper.user_id).await?,
        vec![item("milk", "ml", 250)]
    );

    recipe_service::delete_recipe(&state, &author, cocoa).await?;
    assert!(
        aggregate_shopping_list(&state.orm, shopper.user_id)
            .await?
            .is_empty()
    );
    Ok(())
}

#[test]
fn renderer_matches_aggregated_scenario() {
    let items = vec![item("egg", "pcs", 2), item("flour", "g", 300)];
    let text = String::from_utf8(render_shopping_list(&items, Utc::now())).unwrap();
    assert!(text.ends_with("1. Egg - 2pcs\n2. Flour - 300g\n"));
}
