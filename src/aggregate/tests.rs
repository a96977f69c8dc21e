#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::*;

fn expense(date: &str, desc: &str, amount: Decimal) -> Transaction {
    Transaction::new(date, desc, amount, Kind::Expense)
}

fn income(date: &str, desc: &str, amount: Decimal) -> Transaction {
    Transaction::new(date, desc, amount, Kind::Income)
}

fn day_total(weekly: &[(&str, Decimal)], day: &str) -> Decimal {
    weekly
        .iter()
        .find(|(d, _)| *d == day)
        .map(|(_, v)| *v)
        .unwrap()
}

// ── weekly_spending ───────────────────────────────────────────

#[test]
fn test_weekly_has_all_days_in_order() {
    let weekly = weekly_spending(&[]);
    let days: Vec<&str> = weekly.iter().map(|(d, _)| *d).collect();
    assert_eq!(days, WEEKDAYS.to_vec());
    assert!(weekly.iter().all(|(_, v)| v.is_zero()));
}

#[test]
fn test_weekly_sums_by_weekday_across_weeks() {
    // 03/06/2024 and 10/06/2024 are both Mondays; 15/06/2024 is a Saturday
    let txns = vec![
        expense("03/06/2024", "Lunch", dec!(12.50)),
        expense("10/06/2024", "Lunch", dec!(7.50)),
        expense("15/06/2024", "Coffee", dec!(4.50)),
    ];
    let weekly = weekly_spending(&txns);
    assert_eq!(day_total(&weekly, "Mon"), dec!(20.00));
    assert_eq!(day_total(&weekly, "Sat"), dec!(4.50));
    assert_eq!(day_total(&weekly, "Sun"), Decimal::ZERO);
}

#[test]
fn test_weekly_ignores_income() {
    let txns = vec![
        income("03/06/2024", "Salary", dec!(3000)),
        income("04/06/2024", "Bonus", dec!(500)),
    ];
    assert!(weekly_spending(&txns).iter().all(|(_, v)| v.is_zero()));
}

#[test]
fn test_weekly_skips_bad_dates() {
    let txns = vec![
        expense("not a date", "Mystery", dec!(99)),
        expense("2024-06-03", "Wrong format", dec!(50)),
        expense("03/06/2024", "Lunch", dec!(10)),
    ];
    let weekly = weekly_spending(&txns);
    let sum: Decimal = weekly.iter().map(|(_, v)| *v).sum();
    assert_eq!(sum, dec!(10));
    assert_eq!(day_total(&weekly, "Mon"), dec!(10));
}

// ── category_breakdown ────────────────────────────────────────

#[test]
fn test_breakdown_is_a_partition_of_expenses() {
    let txns = vec![
        expense("01/06/2024", "Rent", dec!(1200)),
        expense("02/06/2024", "Grocery store", dec!(80.25)),
        expense("03/06/2024", "Gas", dec!(40)),
        expense("04/06/2024", "Movie", dec!(15)),
        expense("05/06/2024", "Investment", dec!(200)),
        expense("06/06/2024", "Coffee", dec!(4.50)),
        income("07/06/2024", "Salary", dec!(3000)),
    ];
    let breakdown = category_breakdown(&txns);
    assert_eq!(breakdown.len(), 6);
    let sum: Decimal = breakdown.iter().map(|(_, v)| *v).sum();
    let expenses: Decimal = txns
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount())
        .sum();
    assert_eq!(sum, expenses);
}

#[test]
fn test_breakdown_table_order_and_sparse() {
    let txns = vec![
        expense("01/06/2024", "Coffee", dec!(3)),
        expense("02/06/2024", "Restaurant", dec!(20)),
        expense("03/06/2024", "Food truck", dec!(5)),
    ];
    assert_eq!(
        category_breakdown(&txns),
        vec![(Category::Food, dec!(25)), (Category::Others, dec!(3))]
    );
}

#[test]
fn test_breakdown_order_sensitive_match() {
    let txns = vec![expense("01/06/2024", "rent for food truck", dec!(300))];
    assert_eq!(category_breakdown(&txns), vec![(Category::Housing, dec!(300))]);
}

#[test]
fn test_breakdown_ignores_income() {
    let txns = vec![income("01/06/2024", "Rent received", dec!(900))];
    assert!(category_breakdown(&txns).is_empty());
}

#[test]
fn test_breakdown_does_not_need_valid_dates() {
    let txns = vec![expense("??", "Grocery", dec!(10))];
    assert_eq!(category_breakdown(&txns), vec![(Category::Food, dec!(10))]);
}

// ── totals ────────────────────────────────────────────────────

#[test]
fn test_totals_use_kind_for_sign() {
    let txns = vec![
        income("01/06/2024", "Salary", dec!(2500)),
        expense("02/06/2024", "Rent", dec!(1200)),
        expense("03/06/2024", "Food", dec!(300)),
    ];
    let t = totals(&txns);
    assert_eq!(t.income, dec!(2500));
    assert_eq!(t.expenses, dec!(1500));
    assert_eq!(t.net(), dec!(1000));
}

#[test]
fn test_totals_empty() {
    assert_eq!(totals(&[]), Totals::default());
}

// ── overflow ──────────────────────────────────────────────────

fn huge_expense() -> Transaction {
    Transaction::parse("15/06/2024", "Grocery", "50000000000000000000000000000", "Expense").unwrap()
}

#[test]
fn test_overflowing_row_is_skipped_not_fatal() {
    let big = huge_expense().amount();
    let txns = vec![
        huge_expense(),
        huge_expense(),
        expense("15/06/2024", "Grocery", dec!(10)),
    ];

    assert_eq!(day_total(&weekly_spending(&txns), "Sat"), big + dec!(10));
    assert_eq!(category_breakdown(&txns), vec![(Category::Food, big + dec!(10))]);
    let t = totals(&txns);
    assert_eq!(t.expenses, big + dec!(10));
    assert_eq!(t.net(), -(big + dec!(10)));
}

#[test]
fn test_overflowing_income_is_skipped() {
    let big = huge_expense().amount();
    let txns = vec![
        income("15/06/2024", "Lottery", big),
        income("16/06/2024", "Lottery again", big),
        income("17/06/2024", "Salary", dec!(1)),
    ];
    assert_eq!(totals(&txns).income, big + dec!(1));
}
