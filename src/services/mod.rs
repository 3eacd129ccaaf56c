pub mod cart_service;
pub mod favorite_service;
pub mod filters;
pub mod ingredient_service;
pub mod recipe_service;
pub mod subscription_service;
pub mod user_service;
pub mod views;
