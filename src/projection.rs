use crate::calendar::{validate_month_index, MONTHS_PER_YEAR};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::recurrence::RecurrenceResolver;
use crate::savings::resolve_savings_contribution;
use crate::schema::{Expense, FamilyMember, Household, SavingsGoal};
use chrono::NaiveDate;
use log::debug;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetMonth {
    pub month_name: String,
    pub month_index: usize,
    pub total_income: f64,
    /// Flat baseline of daily, weekly and monthly expenses
    pub regular_expenses: f64,
    /// Quarterly, yearly and custom expenses due this month
    pub planned_expenses: f64,
    pub savings_goals: f64,
    pub total_expenses: f64,
    pub balance: f64,
}

pub struct BudgetProjector {
    config: EngineConfig,
}

impl BudgetProjector {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Total income of members already earning in `month`. Zero for months
    /// outside 0..12.
    pub fn monthly_income(&self, members: &[FamilyMember], month: usize) -> f64 {
        if month >= MONTHS_PER_YEAR {
            return 0.0;
        }

        members
            .iter()
            .filter(|member| match member.start_month.as_deref() {
                Some(start) => month >= self.config.month_table.index_of(start),
                None => true,
            })
            .map(|member| member.monthly_income)
            .sum()
    }

    /// Projects the twelve months of the calendar year.
    ///
    /// Savings-goal contributions are computed once against `today` and applied
    /// to every month, even for goals whose target date falls mid-year.
    pub fn project(
        &self,
        members: &[FamilyMember],
        expenses: &[Expense],
        goals: &[SavingsGoal],
        today: NaiveDate,
    ) -> Vec<BudgetMonth> {
        let resolver = RecurrenceResolver::new(&self.config);
        let regular_expenses = resolver.regular_expenses(expenses);
        let savings_goals = resolve_savings_contribution(goals, today);

        (0..MONTHS_PER_YEAR)
            .map(|month| {
                self.month_row(
                    &resolver,
                    members,
                    expenses,
                    month,
                    regular_expenses,
                    savings_goals,
                )
            })
            .collect()
    }

    /// A single row of the projection; rejects indices outside 0..12.
    pub fn project_month(
        &self,
        household: &Household,
        month: usize,
        today: NaiveDate,
    ) -> Result<BudgetMonth> {
        validate_month_index(month)?;

        let resolver = RecurrenceResolver::new(&self.config);
        Ok(self.month_row(
            &resolver,
            &household.family_members,
            &household.expenses,
            month,
            resolver.regular_expenses(&household.expenses),
            resolve_savings_contribution(&household.savings_goals, today),
        ))
    }

    fn month_row(
        &self,
        resolver: &RecurrenceResolver<'_>,
        members: &[FamilyMember],
        expenses: &[Expense],
        month: usize,
        regular_expenses: f64,
        savings_goals: f64,
    ) -> BudgetMonth {
        let total_income = self.monthly_income(members, month);
        let planned_expenses = resolver.planned_expenses(expenses, month);
        let total_expenses = regular_expenses + planned_expenses + savings_goals;
        let balance = total_income - total_expenses;

        debug!(
            "Month {}: income {:.2}, regular {:.2}, planned {:.2}, goals {:.2}, balance {:.2}",
            month, total_income, regular_expenses, planned_expenses, savings_goals, balance
        );

        BudgetMonth {
            month_name: self
                .config
                .month_table
                .name_of(month)
                .unwrap_or_default()
                .to_string(),
            month_index: month,
            total_income,
            regular_expenses,
            planned_expenses,
            savings_goals,
            total_expenses,
            balance,
        }
    }

    pub fn project_household(&self, household: &Household, today: NaiveDate) -> Vec<BudgetMonth> {
        self.project(
            &household.family_members,
            &household.expenses,
            &household.savings_goals,
            today,
        )
    }
}

impl Default for BudgetProjector {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

pub fn resolve_monthly_income(members: &[FamilyMember], month: usize) -> f64 {
    BudgetProjector::default().monthly_income(members, month)
}

pub fn project_yearly_budget(
    members: &[FamilyMember],
    expenses: &[Expense],
    goals: &[SavingsGoal],
    today: NaiveDate,
) -> Vec<BudgetMonth> {
    BudgetProjector::default().project(members, expenses, goals, today)
}

/// Year-level figures derived from a projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_balance: f64,
    pub average_balance: f64,
    /// Indices of months that end with a negative balance
    pub deficit_months: Vec<usize>,
    pub current_month: Option<BudgetMonth>,
}

impl YearSummary {
    pub fn from_months(months: &[BudgetMonth], current_month: usize) -> Self {
        let total_income: f64 = months.iter().map(|m| m.total_income).sum();
        let total_expenses: f64 = months.iter().map(|m| m.total_expenses).sum();
        let total_balance: f64 = months.iter().map(|m| m.balance).sum();
        let average_balance = if months.is_empty() {
            0.0
        } else {
            total_balance / months.len() as f64
        };

        Self {
            total_income,
            total_expenses,
            total_balance,
            average_balance,
            deficit_months: months
                .iter()
                .filter(|m| m.balance < 0.0)
                .map(|m| m.month_index)
                .collect(),
            current_month: months.iter().find(|m| m.month_index == current_month).cloned(),
        }
    }

    pub fn has_deficit(&self) -> bool {
        !self.deficit_months.is_empty()
    }
}
