//! Shopping list export: aggregate the ingredients of every recipe in a
//! user's cart, then render them as a downloadable text document.

pub mod aggregator;
pub mod document;

pub use aggregator::{ShoppingListItem, aggregate_shopping_list};
pub use document::{
    ITEMS_PER_PAGE, SHOPPING_LIST_CONTENT_TYPE, SHOPPING_LIST_FILENAME, ShoppingListDocument,
    render_shopping_list,
};
