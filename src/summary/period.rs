//! The income and expense summary for a single month.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    database_id::CategoryId, money::Amount, transaction::Transaction,
    transaction_type::TransactionType,
};

/// The total spent on one category within a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummaryEntry {
    pub category_id: CategoryId,
    pub category_name: String,
    pub category_color: String,
    pub amount: Amount,
    /// Share of the period's total expenses, rounded half-up to two decimal
    /// places. Zero when nothing was spent.
    pub percentage: f64,
}

/// Totals for a period and the breakdown of its expenses by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodSummary {
    pub total_incomes: Amount,
    pub total_expenses: Amount,
    /// Incomes minus expenses.
    pub total_balance: Amount,
    /// Sorted by amount, largest first. Equal amounts keep the order in which
    /// their categories were first seen.
    pub expenses_by_category: Vec<CategorySummaryEntry>,
}

/// Summarise `transactions`, which are expected to all fall in one period.
///
/// The input may be in any order, but the order decides how categories with
/// equal totals are listed.
pub fn build_period_summary(transactions: &[Transaction]) -> PeriodSummary {
    let mut total_incomes = Amount::ZERO;
    let mut total_expenses = Amount::ZERO;
    let mut entries: Vec<CategorySummaryEntry> = Vec::new();
    let mut entry_index: HashMap<CategoryId, usize> = HashMap::new();

    for transaction in transactions {
        match transaction.transaction_type {
            TransactionType::Income => total_incomes += transaction.amount,
            TransactionType::Expense => {
                let index = *entry_index
                    .entry(transaction.category_id)
                    .or_insert_with(|| {
                        entries.push(CategorySummaryEntry {
                            category_id: transaction.category_id,
                            category_name: transaction.category.name.clone(),
                            category_color: transaction.category.color.clone(),
                            amount: Amount::ZERO,
                            percentage: 0.0,
                        });
                        entries.len() - 1
                    });

                entries[index].amount += transaction.amount;
                total_expenses += transaction.amount;
            }
        }
    }

    for entry in &mut entries {
        entry.percentage = entry.amount.percentage_of(total_expenses);
    }

    // `sort_by` is stable, so ties stay in first-seen order.
    entries.sort_by(|a, b| b.amount.cmp(&a.amount));

    PeriodSummary {
        total_incomes,
        total_expenses,
        total_balance: total_incomes - total_expenses,
        expenses_by_category: entries,
    }
}
