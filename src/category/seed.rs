//! The global category catalog that is reconciled with the database at start-up.

use rusqlite::Connection;

use crate::{
    Error,
    category::{Category, NewCategory, create_category, find_category},
    transaction_type::TransactionType,
};

/// The categories every installation provides.
pub const GLOBAL_CATEGORIES: [NewCategory<'static>; 12] = [
    expense("Food", "#FF5733"),
    expense("Transport", "#33A8FF"),
    expense("Housing", "#33FF57"),
    expense("Health", "#F033FF"),
    expense("Education", "#FF3366"),
    expense("Leisure", "#FFBA33"),
    expense("Shopping", "#33FFF6"),
    expense("Other", "#B033FF"),
    income("Salary", "#33FF57"),
    income("Freelance", "#33A8FF"),
    income("Investments", "#FFBA33"),
    income("Other", "#B033FF"),
];

const fn expense(name: &'static str, color: &'static str) -> NewCategory<'static> {
    NewCategory {
        name,
        color,
        transaction_type: TransactionType::Expense,
    }
}

const fn income(name: &'static str, color: &'static str) -> NewCategory<'static> {
    NewCategory {
        name,
        color,
        transaction_type: TransactionType::Income,
    }
}

/// Ensure each category in [GLOBAL_CATEGORIES] exists.
///
/// Missing categories are created; existing ones, matched by name and type,
/// are left untouched even if their colour differs. Safe to call on every
/// start-up.
///
/// Returns the catalog categories in catalog order.
///
/// # Errors
/// Returns an [Error::SqlError] if a query fails. Categories created before the
/// failure are kept.
pub fn seed_global_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    let mut categories = Vec::with_capacity(GLOBAL_CATEGORIES.len());

    for new_category in GLOBAL_CATEGORIES {
        let existing = find_category(new_category.name, new_category.transaction_type, connection)
            .inspect_err(|error| {
                tracing::error!("could not look up category {}: {error}", new_category.name)
            })?;

        let category = match existing {
            Some(category) => category,
            None => {
                let category = create_category(new_category, connection)?;
                tracing::info!(
                    "Created {} category \"{}\"",
                    category.transaction_type,
                    category.name
                );
                category
            }
        };

        categories.push(category);
    }

    tracing::debug!("All {} global categories are present", categories.len());

    Ok(categories)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{
        category::{get_all_categories, seed::GLOBAL_CATEGORIES, seed_global_categories},
        db::initialize,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    #[test]
    fn creates_all_catalog_categories() {
        let connection = get_test_connection();

        let categories = seed_global_categories(&connection).unwrap();

        assert_eq!(categories.len(), GLOBAL_CATEGORIES.len());
        assert_eq!(
            get_all_categories(&connection).unwrap().len(),
            GLOBAL_CATEGORIES.len()
        );
    }

    #[test]
    fn seeding_twice_is_idempotent() {
        let connection = get_test_connection();

        let first = seed_global_categories(&connection).unwrap();
        let second = seed_global_categories(&connection).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            get_all_categories(&connection).unwrap().len(),
            GLOBAL_CATEGORIES.len()
        );
    }

    #[test]
    fn leaves_existing_categories_untouched() {
        let connection = get_test_connection();
        connection
            .execute(
                "INSERT INTO category (name, color, type) VALUES ('Food', '#000000', 'EXPENSE')",
                (),
            )
            .unwrap();

        let categories = seed_global_categories(&connection).unwrap();

        let food = categories
            .iter()
            .find(|category| category.name == "Food")
            .unwrap();
        assert_eq!(food.color, "#000000");
        assert_eq!(
            get_all_categories(&connection).unwrap().len(),
            GLOBAL_CATEGORIES.len()
        );
    }
}
