use chrono::{DateTime, Utc};

use super::ShoppingListItem;

pub const SHOPPING_LIST_TITLE: &str = "Shopping list";
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";
pub const SHOPPING_LIST_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Item lines that fit on a page below the header.
pub const ITEMS_PER_PAGE: usize = 37;

const PAGE_BREAK: char = '\u{000C}';

/// A paginated plain-text shopping list.
///
/// The first page starts with the title and the generation date; every
/// following page is introduced by a form feed on its own line.
#[derive(Debug)]
pub struct ShoppingListDocument {
    buffer: String,
    lines_on_page: usize,
    next_index: usize,
}

impl ShoppingListDocument {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        let mut buffer = String::new();
        buffer.push_str(SHOPPING_LIST_TITLE);
        buffer.push('\n');
        buffer.push_str(&generated_at.format("%d.%m.%Y").to_string());
        buffer.push('\n');
        Self {
            buffer,
            lines_on_page: 0,
            next_index: 1,
        }
    }

    pub fn add_items<'a>(&mut self, items: impl IntoIterator<Item = &'a ShoppingListItem>) {
        for item in items {
            self.add_item(item);
        }
    }

    pub fn add_item(&mut self, item: &ShoppingListItem) {
        if self.lines_on_page == ITEMS_PER_PAGE {
            self.buffer.push(PAGE_BREAK);
            self.buffer.push('\n');
            self.lines_on_page = 0;
        }
        self.buffer.push_str(&format!(
            "{}. {} - {}{}\n",
            self.next_index,
            capitalize(&item.name),
            item.total_amount,
            item.measurement_unit
        ));
        self.lines_on_page += 1;
        self.next_index += 1;
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer.into_bytes()
    }
}

pub fn render_shopping_list(items: &[ShoppingListItem], generated_at: DateTime<Utc>) -> Vec<u8> {
    let mut document = ShoppingListDocument::new(generated_at);
    document.add_items(items);
    document.finish()
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
