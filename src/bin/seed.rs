use std::path::PathBuf;

use axum_recipes_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        Ingredients, Users,
        ingredients::{ActiveModel as IngredientActive, Column as IngredientCol},
        users::{ActiveModel as UserActive, Column as UserCol},
    },
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    sea_query::OnConflict,
};
use serde::Deserialize;
use uuid::Uuid;

const DEFAULT_INGREDIENTS_PATH: &str = "data/ingredients.json";

#[derive(Debug, Deserialize)]
struct IngredientRow {
    name: String,
    measurement_unit: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_INGREDIENTS_PATH));
    let inserted = import_ingredients(&orm, &path).await?;
    println!("Imported {inserted} ingredients from {}", path.display());

    let cook = ensure_user(&orm, "cook@example.com", "cook", "Ada", "Cook").await?;
    let reader = ensure_user(&orm, "reader@example.com", "reader", "Bo", "Reader").await?;

    println!("Seed completed. Cook ID: {cook}, Reader ID: {reader}");
    Ok(())
}

async fn import_ingredients(orm: &DatabaseConnection, path: &PathBuf) -> anyhow::Result<u64> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow::anyhow!("cannot read {}: {e}", path.display()))?;
    let rows: Vec<IngredientRow> = serde_json::from_str(&raw)?;
    if rows.is_empty() {
        return Ok(0);
    }

    let models = rows.into_iter().map(|row| IngredientActive {
        id: Set(Uuid::new_v4()),
        name: Set(row.name),
        measurement_unit: Set(row.measurement_unit),
    });

    let inserted = Ingredients::insert_many(models)
        .on_conflict(OnConflict::column(IngredientCol::Name).do_nothing().to_owned())
        .exec_without_returning(orm)
        .await?;
    Ok(inserted)
}

async fn ensure_user(
    orm: &DatabaseConnection,
    email: &str,
    username: &str,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<Uuid> {
    let existing = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(orm)
        .await?;
    if let Some(user) = existing {
        return Ok(user.id);
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        username: Set(username.to_string()),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        avatar: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(orm)
    .await?;

    println!("Ensured user {email}");
    Ok(user.id)
}
