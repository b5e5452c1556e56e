//! Monthly summaries over a single owner's income and expense records.
//!
//! Everything here is pure: callers hand in already-fetched records and get
//! freshly built summaries back. Records whose date cannot be classified are
//! left out of every bucket rather than reported.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::{Date, Month};

use crate::dates::{month_name, parse_occurred_on};
use crate::models::{Currency, MonetaryRecord};

/// How the requested year is matched against a record's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearMatch {
    /// Compare the calendar year of the parsed date.
    #[default]
    Calendar,
    /// The raw date text must contain the year as a substring.
    Substring,
}

impl FromStr for YearMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calendar" => Ok(YearMatch::Calendar),
            "substring" => Ok(YearMatch::Substring),
            other => Err(other.to_string()),
        }
    }
}

/// Which currencies appear in `balancesByCurrency`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalancePolicy {
    /// Only currencies with some income; expense-only currencies are dropped.
    #[default]
    IncomeCurrenciesOnly,
    /// Every currency with any activity.
    AllCurrencies,
}

impl FromStr for BalancePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income-only" => Ok(BalancePolicy::IncomeCurrenciesOnly),
            "all-currencies" => Ok(BalancePolicy::AllCurrencies),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SummaryOptions {
    pub balance_policy: BalancePolicy,
    pub year_match: YearMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearFilter {
    pub year: i32,
    pub mode: YearMatch,
}

impl YearFilter {
    pub fn new(year: i32, mode: YearMatch) -> Self {
        YearFilter { year, mode }
    }

    pub fn matches(&self, raw: &str, parsed: Date) -> bool {
        match self.mode {
            YearMatch::Calendar => parsed.year() == self.year,
            YearMatch::Substring => raw.contains(&format!("{:04}", self.year)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    pub month_name: String,
    pub currency: Currency,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyIncome {
    pub month: String,
    pub currency: Currency,
    pub total_income: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyExpense {
    pub month: String,
    pub currency: Currency,
    pub total_expense: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsEntry {
    pub month: String,
    pub currency: Currency,
    pub savings: f64,
}

pub type Balances = BTreeMap<Currency, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSummary {
    pub income_summary: Vec<MonthlyTotal>,
    pub expense_summary: Vec<MonthlyTotal>,
    pub balances_by_currency: Balances,
}

/// Classifies a record's date and applies the optional year filter.
/// Returns `None` for records that must be left out of every bucket.
fn classify<R: MonetaryRecord>(record: &R, filter: Option<&YearFilter>) -> Option<Date> {
    let raw = record.occurred_on();
    let date = match parse_occurred_on(raw) {
        Ok(date) => date,
        Err(e) => {
            tracing::debug!(date = raw, error = %e, "excluding record with unclassifiable date");
            return None;
        }
    };

    match filter {
        Some(filter) if !filter.matches(raw, date) => None,
        _ => Some(date),
    }
}

/// Sums amounts per `(month, currency)`, iterating in calendar order.
fn group_by_month<R: MonetaryRecord>(
    records: &[R],
    filter: Option<&YearFilter>,
) -> BTreeMap<(u8, Currency), f64> {
    let mut totals = BTreeMap::new();

    for record in records {
        if let Some(date) = classify(record, filter) {
            let key = (u8::from(date.month()), record.currency());
            *totals.entry(key).or_insert(0.0) += record.amount();
        }
    }

    totals
}

fn month_from_number(number: u8) -> Option<Month> {
    Month::try_from(number).ok()
}

/// Monthly totals per currency, ordered by month then currency.
///
/// With `filter` set, only records dated in the requested year are counted;
/// without it, the same month of different years shares a bucket.
pub fn summarize_by_month<R: MonetaryRecord>(
    records: &[R],
    filter: Option<&YearFilter>,
) -> Vec<MonthlyTotal> {
    group_by_month(records, filter)
        .into_iter()
        .filter_map(|((month, currency), total_amount)| {
            month_from_number(month).map(|month| MonthlyTotal {
                month_name: month_name(month),
                currency,
                total_amount,
            })
        })
        .collect()
}

fn totals_by_currency(summary: &[MonthlyTotal]) -> Balances {
    let mut totals = Balances::new();
    for entry in summary {
        *totals.entry(entry.currency).or_insert(0.0) += entry.total_amount;
    }
    totals
}

/// Income minus expense per currency across all months.
pub fn summarize_balances(
    income_summary: &[MonthlyTotal],
    expense_summary: &[MonthlyTotal],
    policy: BalancePolicy,
) -> Balances {
    let income = totals_by_currency(income_summary);
    let expense = totals_by_currency(expense_summary);

    let mut balances: Balances = income
        .iter()
        .map(|(currency, total)| {
            let spent = expense.get(currency).copied().unwrap_or(0.0);
            (*currency, total - spent)
        })
        .collect();

    if policy == BalancePolicy::AllCurrencies {
        for (currency, spent) in &expense {
            balances.entry(*currency).or_insert(-spent);
        }
    }

    balances
}

/// Dashboard payload for one year: both monthly series plus balances.
pub fn summarize_home<I: MonetaryRecord, E: MonetaryRecord>(
    incomes: &[I],
    expenses: &[E],
    year: i32,
    options: SummaryOptions,
) -> HomeSummary {
    let filter = YearFilter::new(year, options.year_match);
    let income_summary = summarize_by_month(incomes, Some(&filter));
    let expense_summary = summarize_by_month(expenses, Some(&filter));
    let balances_by_currency =
        summarize_balances(&income_summary, &expense_summary, options.balance_policy);

    HomeSummary {
        income_summary,
        expense_summary,
        balances_by_currency,
    }
}

fn group_by_month_name<R: MonetaryRecord>(
    records: &[R],
    filter: &YearFilter,
) -> Vec<(String, Currency, f64)> {
    group_by_month(records, Some(filter))
        .into_iter()
        .filter_map(|((month, currency), total)| {
            month_from_number(month).map(|month| (month_name(month), currency, total))
        })
        .collect()
}

pub fn income_by_month_name<R: MonetaryRecord>(
    records: &[R],
    filter: &YearFilter,
) -> Vec<MonthlyIncome> {
    group_by_month_name(records, filter)
        .into_iter()
        .map(|(month, currency, total_income)| MonthlyIncome {
            month,
            currency,
            total_income,
        })
        .collect()
}

pub fn expense_by_month_name<R: MonetaryRecord>(
    records: &[R],
    filter: &YearFilter,
) -> Vec<MonthlyExpense> {
    group_by_month_name(records, filter)
        .into_iter()
        .map(|(month, currency, total_expense)| MonthlyExpense {
            month,
            currency,
            total_expense,
        })
        .collect()
}

/// Combines grouped income and expense totals into savings entries.
///
/// Every income pair yields one entry (expense defaults to zero). Expense
/// pairs without a matching income pair follow, negated. Pairs present on
/// both sides appear once, and the result is not re-sorted.
pub fn merge_savings(incomes: &[MonthlyIncome], expenses: &[MonthlyExpense]) -> Vec<SavingsEntry> {
    let mut savings = Vec::with_capacity(incomes.len() + expenses.len());

    for income in incomes {
        let spent = expenses
            .iter()
            .find(|e| e.month == income.month && e.currency == income.currency)
            .map(|e| e.total_expense)
            .unwrap_or(0.0);

        savings.push(SavingsEntry {
            month: income.month.clone(),
            currency: income.currency,
            savings: income.total_income - spent,
        });
    }

    for expense in expenses {
        let has_income = incomes
            .iter()
            .any(|i| i.month == expense.month && i.currency == expense.currency);
        if !has_income {
            savings.push(SavingsEntry {
                month: expense.month.clone(),
                currency: expense.currency,
                savings: 0.0 - expense.total_expense,
            });
        }
    }

    savings
}

/// Savings per month name and currency for the given year.
pub fn summarize_savings_by_month_name<I: MonetaryRecord, E: MonetaryRecord>(
    incomes: &[I],
    expenses: &[E],
    filter: &YearFilter,
) -> Vec<SavingsEntry> {
    let income_totals = income_by_month_name(incomes, filter);
    let expense_totals = expense_by_month_name(expenses, filter);
    merge_savings(&income_totals, &expense_totals)
}
