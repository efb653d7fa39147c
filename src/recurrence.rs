//! Decides which expenses fall into a given month and how much each one costs there.
//!
//! Two aggregates are produced from the same rules:
//!
//! - **Regular** expenses (daily, weekly, monthly) form a flat monthly baseline.
//! - **Planned** expenses (quarterly, yearly, custom) are booked in full in the
//!   months they are actually paid.
//!
//! Malformed records never abort a calculation: a yearly expense without a due
//! month, or a custom expense without a period, simply contributes nothing.

use crate::calendar::MONTHS_PER_YEAR;
use crate::config::EngineConfig;
use crate::schema::{Expense, ExpenseCategory, RecurrenceType};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

pub struct RecurrenceResolver<'a> {
    config: &'a EngineConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub expense_id: Uuid,
    pub title: String,
    pub category: ExpenseCategory,
    pub recurrence: RecurrenceType,
    pub amount: f64,
}

/// Everything that has to be paid in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarMonth {
    pub month_name: String,
    pub month_index: usize,
    pub entries: Vec<CalendarEntry>,
    pub total: f64,
}

impl<'a> RecurrenceResolver<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Amount the expense adds to `month`, or `None` when it is not due then.
    /// Months outside 0..12 have nothing due.
    pub fn contribution(&self, expense: &Expense, month: usize) -> Option<f64> {
        if month >= MONTHS_PER_YEAR {
            return None;
        }

        let start = self.month_index(&expense.start_month, expense);
        if month < start {
            return None;
        }

        match expense.recurrence {
            RecurrenceType::Daily | RecurrenceType::Weekly | RecurrenceType::Monthly => {
                Some(self.regular_monthly_amount(expense))
            }
            RecurrenceType::Quarterly => ((month - start) % 3 == 0).then_some(expense.amount),
            RecurrenceType::Yearly => {
                let Some(due_month) = expense.due_month.as_deref() else {
                    debug!("Skipping yearly expense '{}' without a due month", expense.title);
                    return None;
                };
                (month == self.month_index(due_month, expense)).then_some(expense.amount)
            }
            RecurrenceType::Custom => {
                let (Some(period), Some(due_month)) =
                    (expense.custom_period_months, expense.due_month.as_deref())
                else {
                    debug!(
                        "Skipping custom expense '{}' without a period or due month",
                        expense.title
                    );
                    return None;
                };
                if period == 0 {
                    debug!("Skipping custom expense '{}' with a zero period", expense.title);
                    return None;
                }
                let due = self.month_index(due_month, expense);
                ((month - start) % period as usize == 0 && month == due).then_some(expense.amount)
            }
        }
    }

    /// Monthly-equivalent cost of a regular expense; zero for planned ones.
    pub fn regular_monthly_amount(&self, expense: &Expense) -> f64 {
        match expense.recurrence {
            RecurrenceType::Daily => expense.amount * self.config.days_per_month,
            RecurrenceType::Weekly => expense.amount * self.config.weeks_per_month,
            RecurrenceType::Monthly => expense.amount,
            _ => 0.0,
        }
    }

    /// The flat monthly baseline. Start months are not consulted: the baseline
    /// is the same for every projected month.
    pub fn regular_expenses(&self, expenses: &[Expense]) -> f64 {
        expenses
            .iter()
            .filter(|e| e.recurrence.is_regular())
            .map(|e| self.regular_monthly_amount(e))
            .sum()
    }

    pub fn planned_expenses(&self, expenses: &[Expense], month: usize) -> f64 {
        expenses
            .iter()
            .filter(|e| e.recurrence.is_planned())
            .filter_map(|e| self.contribution(e, month))
            .sum()
    }

    pub fn category_totals(
        &self,
        expenses: &[Expense],
        month: usize,
    ) -> BTreeMap<ExpenseCategory, f64> {
        let mut totals = BTreeMap::new();
        for expense in expenses {
            if let Some(amount) = self.contribution(expense, month) {
                *totals.entry(expense.category).or_insert(0.0) += amount;
            }
        }
        totals
    }

    pub fn expense_calendar(&self, expenses: &[Expense]) -> Vec<CalendarMonth> {
        (0..MONTHS_PER_YEAR)
            .map(|month| {
                let entries: Vec<CalendarEntry> = expenses
                    .iter()
                    .filter_map(|expense| {
                        self.contribution(expense, month).map(|amount| CalendarEntry {
                            expense_id: expense.id,
                            title: expense.title.clone(),
                            category: expense.category,
                            recurrence: expense.recurrence,
                            amount,
                        })
                    })
                    .collect();
                let total = entries.iter().map(|e| e.amount).sum();

                CalendarMonth {
                    month_name: self
                        .config
                        .month_table
                        .name_of(month)
                        .unwrap_or_default()
                        .to_string(),
                    month_index: month,
                    entries,
                    total,
                }
            })
            .collect()
    }

    fn month_index(&self, name: &str, expense: &Expense) -> usize {
        match self.config.month_table.try_index_of(name) {
            Some(index) => index,
            None => {
                warn!(
                    "Expense '{}' refers to unknown month '{}', treating it as January",
                    expense.title, name
                );
                0
            }
        }
    }
}

pub fn resolve_contribution(expense: &Expense, month: usize) -> Option<f64> {
    let config = EngineConfig::default();
    RecurrenceResolver::new(&config).contribution(expense, month)
}

pub fn resolve_regular_expenses(expenses: &[Expense]) -> f64 {
    let config = EngineConfig::default();
    RecurrenceResolver::new(&config).regular_expenses(expenses)
}

pub fn resolve_planned_expenses(expenses: &[Expense], month: usize) -> f64 {
    let config = EngineConfig::default();
    RecurrenceResolver::new(&config).planned_expenses(expenses, month)
}

pub fn expense_calendar(expenses: &[Expense]) -> Vec<CalendarMonth> {
    let config = EngineConfig::default();
    RecurrenceResolver::new(&config).expense_calendar(expenses)
}
