//! Income and expense totals for a run of consecutive months.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    calendar::{DateTimeRange, YearMonth, month_label_of},
    money::Amount,
    summary::transaction::DatedAmount,
    transaction_type::TransactionType,
};

/// The number of months covered by a monthly history, between 1 and 12.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryWindow(u8);

impl HistoryWindow {
    /// The window used when the client does not ask for one.
    pub const DEFAULT: HistoryWindow = HistoryWindow(6);

    /// The largest window. Month labels are unique within any window up to
    /// this size.
    pub const MAX: u8 = 12;

    /// Create a window of `months` months.
    ///
    /// # Errors
    /// Returns an [Error::InvalidHistoryWindow] if `months` is not in 1-12.
    pub fn new(months: i64) -> Result<Self, Error> {
        match u8::try_from(months) {
            Ok(months) if (1..=Self::MAX).contains(&months) => Ok(Self(months)),
            _ => Err(Error::InvalidHistoryWindow(months)),
        }
    }

    /// The number of months in the window.
    pub fn months(self) -> u8 {
        self.0
    }
}

impl Default for HistoryWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The income and expenses of one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    /// The month, e.g. "Mar/2024".
    pub label: String,
    pub income: Amount,
    pub expenses: Amount,
}

impl MonthlyBucket {
    fn empty(month: YearMonth) -> Self {
        Self {
            label: month.label(),
            income: Amount::ZERO,
            expenses: Amount::ZERO,
        }
    }
}

/// The months covered by a history of `window` months ending with `anchor`,
/// oldest first.
///
/// # Errors
/// Returns an [Error::InvalidYear] if the first month cannot be represented.
pub fn history_months(anchor: YearMonth, window: HistoryWindow) -> Result<Vec<YearMonth>, Error> {
    let first = anchor.months_before(window.months() - 1)?;

    let mut months = Vec::with_capacity(window.months().into());
    let mut month = anchor;
    months.push(month);
    while month != first {
        month = month.previous()?;
        months.push(month);
    }
    months.reverse();

    Ok(months)
}

/// Every second from the start of the first month to the end of `anchor`.
pub fn history_range(anchor: YearMonth, window: HistoryWindow) -> Result<DateTimeRange, Error> {
    let first = anchor.months_before(window.months() - 1)?;

    Ok(first.start()..=anchor.end())
}

/// Sum `amounts` into one bucket per month of the window ending at `anchor`.
///
/// Always returns exactly `window` buckets, oldest first. Months without any
/// transactions are zero. Amounts dated outside of the window are ignored.
///
/// # Errors
/// Returns an [Error::InvalidYear] if the window reaches before the earliest
/// supported year.
pub fn build_monthly_history(
    anchor: YearMonth,
    window: HistoryWindow,
    amounts: &[DatedAmount],
) -> Result<Vec<MonthlyBucket>, Error> {
    let mut buckets: Vec<MonthlyBucket> = history_months(anchor, window)?
        .into_iter()
        .map(MonthlyBucket::empty)
        .collect();

    let bucket_index: HashMap<String, usize> = buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| (bucket.label.clone(), index))
        .collect();

    for amount in amounts {
        let Some(&index) = bucket_index.get(&month_label_of(amount.date)) else {
            continue;
        };

        let bucket = &mut buckets[index];
        match amount.transaction_type {
            TransactionType::Income => bucket.income += amount.amount,
            TransactionType::Expense => bucket.expenses += amount.amount,
        }
    }

    Ok(buckets)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use time::{OffsetDateTime, macros::datetime, macros::offset};

    use crate::{
        Error,
        calendar::YearMonth,
        money::Amount,
        summary::{
            history::{HistoryWindow, MonthlyBucket, build_monthly_history, history_range},
            transaction::DatedAmount,
        },
        transaction_type::TransactionType,
    };

    fn dated(transaction_type: TransactionType, cents: i64, date: OffsetDateTime) -> DatedAmount {
        DatedAmount {
            amount: Amount::from_cents(cents),
            date,
            transaction_type,
        }
    }

    fn bucket(label: &str, income: i64, expenses: i64) -> MonthlyBucket {
        MonthlyBucket {
            label: label.to_owned(),
            income: Amount::from_cents(income),
            expenses: Amount::from_cents(expenses),
        }
    }

    fn march_2024() -> YearMonth {
        YearMonth::new(2024, 3).unwrap()
    }

    #[test]
    fn window_must_be_between_1_and_12() {
        assert_eq!(HistoryWindow::new(0), Err(Error::InvalidHistoryWindow(0)));
        assert_eq!(HistoryWindow::new(13), Err(Error::InvalidHistoryWindow(13)));
        assert_eq!(HistoryWindow::new(-1), Err(Error::InvalidHistoryWindow(-1)));
        assert_eq!(HistoryWindow::new(12).unwrap().months(), 12);
        assert_eq!(HistoryWindow::default().months(), 6);
    }

    #[test]
    fn march_example() {
        let amounts = [
            dated(TransactionType::Expense, 100_00, datetime!(2024-03-05 0:00 UTC)),
            dated(TransactionType::Expense, 50_00, datetime!(2024-03-20 0:00 UTC)),
            dated(TransactionType::Income, 500_00, datetime!(2024-03-10 0:00 UTC)),
        ];

        let history =
            build_monthly_history(march_2024(), HistoryWindow::new(3).unwrap(), &amounts).unwrap();

        assert_eq!(
            history,
            [
                bucket("Jan/2024", 0, 0),
                bucket("Feb/2024", 0, 0),
                bucket("Mar/2024", 500_00, 150_00),
            ]
        );
    }

    #[test]
    fn always_has_window_size_buckets() {
        for months in 1..=12 {
            let window = HistoryWindow::new(months).unwrap();

            let history = build_monthly_history(march_2024(), window, &[]).unwrap();

            assert_eq!(history.len(), months as usize);
            assert!(history.iter().all(|bucket| bucket.income == Amount::ZERO
                && bucket.expenses == Amount::ZERO));
            assert_eq!(history.last().unwrap().label, "Mar/2024");
        }
    }

    #[test]
    fn labels_are_unique_and_cross_the_year() {
        let history =
            build_monthly_history(march_2024(), HistoryWindow::new(12).unwrap(), &[]).unwrap();

        let labels: Vec<&str> = history.iter().map(|bucket| bucket.label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"Apr/2023"));
        assert_eq!(labels.last(), Some(&"Mar/2024"));
        assert_eq!(labels.iter().collect::<HashSet<_>>().len(), 12);
    }

    #[test]
    fn last_second_of_month_stays_in_that_month() {
        let amounts = [
            dated(TransactionType::Expense, 1_00, datetime!(2024-02-29 23:59:59 UTC)),
            dated(TransactionType::Income, 2_00, datetime!(2024-03-01 0:00 UTC)),
        ];

        let history =
            build_monthly_history(march_2024(), HistoryWindow::new(2).unwrap(), &amounts).unwrap();

        assert_eq!(
            history,
            [bucket("Feb/2024", 0, 1_00), bucket("Mar/2024", 2_00, 0)]
        );
    }

    #[test]
    fn buckets_by_utc_month_for_offset_dates() {
        // Still February 29th in New York, but already March in UTC.
        let new_york_evening = datetime!(2024-03-01 1:00 UTC).to_offset(offset!(-5));
        let amounts = [dated(TransactionType::Expense, 1_00, new_york_evening)];

        let history =
            build_monthly_history(march_2024(), HistoryWindow::new(2).unwrap(), &amounts).unwrap();

        assert_eq!(
            history,
            [bucket("Feb/2024", 0, 0), bucket("Mar/2024", 0, 1_00)]
        );
    }

    #[test]
    fn ignores_amounts_outside_window() {
        let amounts = [
            dated(TransactionType::Expense, 1_00, datetime!(2023-12-31 23:59:59 UTC)),
            dated(TransactionType::Income, 1_00, datetime!(2024-04-01 0:00 UTC)),
            dated(TransactionType::Income, 3_00, datetime!(2024-02-10 0:00 UTC)),
        ];

        let history =
            build_monthly_history(march_2024(), HistoryWindow::new(3).unwrap(), &amounts).unwrap();

        assert_eq!(
            history,
            [
                bucket("Jan/2024", 0, 0),
                bucket("Feb/2024", 3_00, 0),
                bucket("Mar/2024", 0, 0),
            ]
        );
    }

    #[test]
    fn input_order_does_not_matter() {
        let mut amounts = vec![
            dated(TransactionType::Expense, 1_00, datetime!(2024-03-05 0:00 UTC)),
            dated(TransactionType::Income, 7_00, datetime!(2024-01-05 0:00 UTC)),
            dated(TransactionType::Expense, 2_00, datetime!(2024-02-05 0:00 UTC)),
        ];
        let window = HistoryWindow::new(3).unwrap();
        let forwards = build_monthly_history(march_2024(), window, &amounts).unwrap();

        amounts.reverse();
        let backwards = build_monthly_history(march_2024(), window, &amounts).unwrap();

        assert_eq!(forwards, backwards);
    }

    #[test]
    fn range_spans_first_to_last_month() {
        let range = history_range(march_2024(), HistoryWindow::new(3).unwrap()).unwrap();

        assert_eq!(*range.start(), datetime!(2024-01-01 0:00 UTC));
        assert_eq!(*range.end(), datetime!(2024-03-31 23:59:59 UTC));
    }

    #[test]
    fn serializes_bucket_with_decimal_amounts() {
        let json = serde_json::to_value(bucket("Mar/2024", 500_00, 150_50)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "label": "Mar/2024", "income": 500.0, "expenses": 150.5 })
        );
    }
}
