//! The catalog of categories that transactions are filed under.

mod core;
mod list_endpoint;
mod seed;

pub use core::{
    Category, NewCategory, create_category, create_category_table, find_category,
    get_all_categories, get_category_of_type,
};
pub use list_endpoint::get_categories_endpoint;
pub use seed::seed_global_categories;
