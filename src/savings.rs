use crate::calendar::{months_between, months_until, MONTHS_PER_YEAR};
use crate::config::EngineConfig;
use crate::schema::{Expense, RecurrenceType, SavingsGoal};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Monthly amount to put aside for a goal.
///
/// An explicit `monthly_saving` always wins. Otherwise the outstanding amount
/// is spread over the months left until `target_date`, never fewer than one.
pub fn goal_contribution(goal: &SavingsGoal, today: NaiveDate) -> f64 {
    if let Some(monthly) = goal.monthly_saving {
        return monthly;
    }

    match (goal.target_amount, goal.target_date) {
        (Some(target), Some(date)) => {
            let months = months_remaining(today, date);
            let remaining = (target - goal.current_amount).max(0.0);
            remaining / months as f64
        }
        _ => {
            debug!(
                "Savings goal '{}' has neither a monthly figure nor a target with a date",
                goal.title
            );
            0.0
        }
    }
}

pub fn resolve_savings_contribution(goals: &[SavingsGoal], today: NaiveDate) -> f64 {
    goals.iter().map(|g| goal_contribution(g, today)).sum()
}

/// Whole months until `target`, floored at 1 so past or current-month targets
/// still yield a finite contribution.
pub fn months_remaining(today: NaiveDate, target: NaiveDate) -> u32 {
    months_between(today, target).max(1) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub goal_id: Uuid,
    pub saved: f64,
    pub remaining: Option<f64>,
    pub percent_complete: Option<f64>,
    pub months_remaining: Option<u32>,
    pub monthly_contribution: f64,
}

pub fn goal_progress(goal: &SavingsGoal, today: NaiveDate) -> GoalProgress {
    let remaining = goal
        .target_amount
        .map(|target| (target - goal.current_amount).max(0.0));
    let percent_complete = goal.target_amount.map(|target| {
        if target <= 0.0 {
            100.0
        } else {
            (goal.current_amount / target * 100.0).clamp(0.0, 100.0)
        }
    });

    GoalProgress {
        goal_id: goal.id,
        saved: goal.current_amount,
        remaining,
        percent_complete,
        months_remaining: goal.target_date.map(|d| months_remaining(today, d)),
        monthly_contribution: goal_contribution(goal, today),
    }
}

/// How much to set aside each month so a periodic expense is covered when it
/// falls due.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseReserve {
    pub expense_id: Uuid,
    pub title: String,
    pub recurrence: RecurrenceType,
    pub amount: f64,
    pub months_until_due: usize,
    pub monthly_saving: f64,
}

pub struct ReservePlanner<'a> {
    config: &'a EngineConfig,
}

impl<'a> ReservePlanner<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn reserve_for(&self, expense: &Expense, current_month: usize) -> Option<ExpenseReserve> {
        let table = &self.config.month_table;

        let (months_until_due, monthly_saving) = match expense.recurrence {
            RecurrenceType::Yearly => {
                let due = table.index_of(expense.due_month.as_deref()?);
                let months = months_until(current_month, due);
                let saving = if months > 0 {
                    expense.amount / months as f64
                } else {
                    expense.amount
                };
                (months, saving)
            }
            RecurrenceType::Quarterly => {
                let start = table.index_of(&expense.start_month) as i64;
                let since_start = (current_month as i64 - start).rem_euclid(3) as usize;
                (3 - since_start, expense.amount / 3.0)
            }
            RecurrenceType::Custom => {
                let period = expense.custom_period_months.filter(|p| *p > 0)?;
                let due = table.index_of(expense.due_month.as_deref()?);
                (
                    months_until(current_month, due),
                    expense.amount / period as f64,
                )
            }
            RecurrenceType::Daily | RecurrenceType::Weekly | RecurrenceType::Monthly => {
                return None
            }
        };

        Some(ExpenseReserve {
            expense_id: expense.id,
            title: expense.title.clone(),
            recurrence: expense.recurrence,
            amount: expense.amount,
            months_until_due,
            monthly_saving,
        })
    }

    /// Reserves for every periodic expense, soonest due first.
    pub fn reserves(&self, expenses: &[Expense], current_month: usize) -> Vec<ExpenseReserve> {
        let mut reserves: Vec<ExpenseReserve> = expenses
            .iter()
            .filter_map(|e| self.reserve_for(e, current_month))
            .collect();
        reserves.sort_by_key(|r| r.months_until_due);
        reserves
    }
}

pub fn expense_reserves(expenses: &[Expense], current_month: usize) -> Vec<ExpenseReserve> {
    let config = EngineConfig::default();
    ReservePlanner::new(&config).reserves(expenses, current_month)
}

/// A twelfth of everything paid yearly or quarterly.
pub fn recommended_monthly_reserve(expenses: &[Expense]) -> f64 {
    let total: f64 = expenses
        .iter()
        .filter(|e| {
            matches!(
                e.recurrence,
                RecurrenceType::Yearly | RecurrenceType::Quarterly
            )
        })
        .map(|e| e.amount)
        .sum();
    total / MONTHS_PER_YEAR as f64
}
