use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::users::SubscriptionList,
    entity::{
        Recipes, Subscriptions, Users,
        recipes::Column as RecipeCol,
        subscriptions::{ActiveModel as SubscriptionActive, Column as SubCol},
        users::{Column as UserCol, Model as UserModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::AuthorWithRecipes,
    response::{ApiResponse, Meta},
    services::{user_service::current_user, views::recipe_short_from_entity},
    state::AppState,
};

pub async fn subscribe(
    state: &AppState,
    user: &AuthUser,
    author_id: Uuid,
    recipes_limit: Option<u64>,
) -> AppResult<ApiResponse<AuthorWithRecipes>> {
    current_user(&state.orm, user).await?;

    let author = Users::find_by_id(author_id).one(&state.orm).await?;
    let author = match author {
        Some(a) => a,
        None => return Err(AppError::NotFound),
    };

    if author.id == user.user_id {
        return Err(AppError::BadRequest("Cannot subscribe to yourself".into()));
    }

    let existing = Subscriptions::find()
        .filter(SubCol::UserId.eq(user.user_id))
        .filter(SubCol::AuthorId.eq(author_id))
        .count(&state.orm)
        .await?;
    if existing > 0 {
        return Err(AppError::BadRequest(
            "Already subscribed to this author".into(),
        ));
    }

    SubscriptionActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        author_id: Set(author_id),
        created_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(subscriber = %user.user_id, author = %author_id, "subscribed");
    audit::record(
        &state.orm,
        user.user_id,
        "subscription_add",
        "subscriptions",
        serde_json::json!({ "author_id": author_id }),
    )
    .await;

    let data = author_with_recipes(&state.orm, author, true, recipes_limit).await?;
    Ok(ApiResponse::success("Subscribed", data, Some(Meta::empty())))
}

pub async fn unsubscribe(state: &AppState, user: &AuthUser, author_id: Uuid) -> AppResult<()> {
    let result = Subscriptions::delete_many()
        .filter(SubCol::UserId.eq(user.user_id))
        .filter(SubCol::AuthorId.eq(author_id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.orm,
        user.user_id,
        "subscription_remove",
        "subscriptions",
        serde_json::json!({ "author_id": author_id }),
    )
    .await;

    Ok(())
}

pub async fn list_subscriptions(
    state: &AppState,
    user: &AuthUser,
    recipes_limit: Option<u64>,
) -> AppResult<ApiResponse<SubscriptionList>> {
    let author_ids: Vec<Uuid> = Subscriptions::find()
        .filter(SubCol::UserId.eq(user.user_id))
        .order_by_asc(SubCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|sub| sub.author_id)
        .collect();
    if author_ids.is_empty() {
        return Ok(ApiResponse::success(
            "Subscriptions",
            SubscriptionList { items: Vec::new() },
            Some(Meta::new(0)),
        ));
    }

    let mut authors = Users::find()
        .filter(UserCol::Id.is_in(author_ids.iter().copied()))
        .all(&state.orm)
        .await?;
    authors.sort_by_key(|a| author_ids.iter().position(|id| *id == a.id));

    let mut items = Vec::with_capacity(authors.len());
    for author in authors {
        items.push(author_with_recipes(&state.orm, author, true, recipes_limit).await?);
    }

    let meta = Meta::new(items.len() as i64);
    Ok(ApiResponse::success(
        "Subscriptions",
        SubscriptionList { items },
        Some(meta),
    ))
}

async fn author_with_recipes<C: ConnectionTrait>(
    db: &C,
    author: UserModel,
    is_subscribed: bool,
    recipes_limit: Option<u64>,
) -> AppResult<AuthorWithRecipes> {
    let finder = Recipes::find()
        .filter(RecipeCol::AuthorId.eq(author.id))
        .order_by_desc(RecipeCol::PubDate);
    let recipes_count = finder.clone().count(db).await? as i64;
    let recipes = finder
        .limit(recipes_limit)
        .all(db)
        .await?
        .into_iter()
        .map(recipe_short_from_entity)
        .collect();

    Ok(AuthorWithRecipes {
        id: author.id,
        email: author.email,
        username: author.username,
        first_name: author.first_name,
        last_name: author.last_name,
        avatar: author.avatar,
        is_subscribed,
        recipes,
        recipes_count,
    })
}
