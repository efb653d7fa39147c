//! # Family Budget Planner
//!
//! A library for turning a household's incomes, recurring expenses and savings
//! goals into a month-by-month budget for the calendar year.
//!
//! ## Core Concepts
//!
//! - **Regular expenses**: daily, weekly and monthly costs, folded into a flat
//!   monthly baseline (a daily cost counts 30.44 times, a weekly one 4.33 times)
//! - **Planned expenses**: quarterly, yearly and custom-period costs, booked in
//!   full in the months they fall due
//! - **Savings goals**: either a fixed monthly amount or the outstanding target
//!   spread over the months left until the target date
//! - **Projection**: twelve [`BudgetMonth`] rows where
//!   `balance = income - (regular + planned + savings goals)`
//!
//! The projection functions are pure: the current date is passed in, and
//! malformed records contribute nothing instead of failing the whole year.
//!
//! ## Example
//!
//! ```rust
//! use family_budget_planner::*;
//! use chrono::NaiveDate;
//!
//! let mut household = Household::default();
//! let table = MonthTable::default();
//!
//! household
//!     .add_member(
//!         NewMember {
//!             name: "Анна".to_string(),
//!             monthly_income: 80_000.0,
//!             start_month: None,
//!         },
//!         &table,
//!     )
//!     .unwrap();
//! household
//!     .add_expense(
//!         NewExpense {
//!             title: "Аренда".to_string(),
//!             amount: 20_000.0,
//!             category: ExpenseCategory::Other,
//!             recurrence: RecurrenceType::Monthly,
//!             start_month: "Январь".to_string(),
//!             due_month: None,
//!             custom_period_months: None,
//!             day_of_week: None,
//!         },
//!         &table,
//!     )
//!     .unwrap();
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let months = BudgetProjector::default().project_household(&household, today);
//!
//! assert_eq!(months.len(), 12);
//! assert_eq!(months[0].balance, 60_000.0);
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod export;
pub mod household;
pub mod projection;
pub mod recurrence;
pub mod repository;
pub mod savings;
pub mod schema;
pub mod validation;

pub use calendar::{current_month_index, months_between, MonthTable, MONTHS_PER_YEAR};
pub use config::{EngineConfig, AVERAGE_DAYS_PER_MONTH, AVERAGE_WEEKS_PER_MONTH};
pub use error::{BudgetError, Result};
pub use export::BudgetExport;
pub use household::*;
pub use projection::{
    project_yearly_budget, resolve_monthly_income, BudgetMonth, BudgetProjector, YearSummary,
};
pub use recurrence::{
    expense_calendar, resolve_contribution, resolve_planned_expenses, resolve_regular_expenses,
    CalendarEntry, CalendarMonth, RecurrenceResolver,
};
pub use repository::{BudgetRepository, InMemoryRepository, JsonFileRepository};
pub use savings::{
    expense_reserves, goal_contribution, goal_progress, recommended_monthly_reserve,
    resolve_savings_contribution, ExpenseReserve, GoalProgress, ReservePlanner,
};
pub use schema::*;
pub use validation::validate_household;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};

/// Ties a repository to the projection engine.
pub struct BudgetPlanner<R: BudgetRepository> {
    repository: R,
    projector: BudgetProjector,
}

impl<R: BudgetRepository> BudgetPlanner<R> {
    pub fn new(repository: R, config: EngineConfig) -> Self {
        Self {
            repository,
            projector: BudgetProjector::new(config),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        self.projector.config()
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn load(&self) -> Result<Household> {
        self.repository.load()
    }

    pub fn save(&self, household: &Household) -> Result<()> {
        validate_household(household, &self.config().month_table)?;
        self.repository.save(household)
    }

    /// Loads the household, applies `edit` and saves the result.
    pub fn modify<T, F>(&self, edit: F) -> Result<T>
    where
        F: FnOnce(&mut Household, &MonthTable) -> Result<T>,
    {
        let mut household = self.load()?;
        let out = edit(&mut household, &self.config().month_table)?;
        self.save(&household)?;
        Ok(out)
    }

    pub fn project(&self, today: NaiveDate) -> Result<Vec<BudgetMonth>> {
        let household = self.load()?;

        info!("Projecting yearly budget as of {}", today);
        debug!(
            "Household contains {} members, {} expenses and {} savings goals",
            household.family_members.len(),
            household.expenses.len(),
            household.savings_goals.len()
        );

        Ok(self.projector.project_household(&household, today))
    }

    /// One month of the projection; `month` must be in 0..12.
    pub fn project_month(&self, month: usize, today: NaiveDate) -> Result<BudgetMonth> {
        let household = self.load()?;
        self.projector.project_month(&household, month, today)
    }

    pub fn year_summary(&self, today: NaiveDate) -> Result<YearSummary> {
        let months = self.project(today)?;
        Ok(YearSummary::from_months(&months, current_month_index(today)))
    }

    pub fn expense_calendar(&self) -> Result<Vec<CalendarMonth>> {
        let household = self.load()?;
        Ok(RecurrenceResolver::new(self.config()).expense_calendar(&household.expenses))
    }

    pub fn expense_reserves(&self, today: NaiveDate) -> Result<Vec<ExpenseReserve>> {
        let household = self.load()?;
        Ok(ReservePlanner::new(self.config())
            .reserves(&household.expenses, current_month_index(today)))
    }

    pub fn export(&self, exported_at: DateTime<Utc>) -> Result<BudgetExport> {
        let household = self.load()?;
        info!("Exporting household at {}", exported_at);
        Ok(BudgetExport::new(&household, exported_at))
    }

    /// Replaces the stored household with the contents of a backup.
    pub fn import(&self, export: BudgetExport) -> Result<()> {
        info!("Importing backup taken at {}", export.export_date);
        self.save(&export.into_household())
    }
}

impl Default for BudgetPlanner<InMemoryRepository> {
    fn default() -> Self {
        Self::new(InMemoryRepository::default(), EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    #[test]
    fn test_modify_persists_changes() {
        let planner = BudgetPlanner::<InMemoryRepository>::default();

        let id = planner
            .modify(|household, table| {
                household.add_member(
                    NewMember {
                        name: "Олег".to_string(),
                        monthly_income: 50_000.0,
                        start_month: Some("Июнь".to_string()),
                    },
                    table,
                )
            })
            .unwrap();

        let household = planner.load().unwrap();
        assert!(household.member(id).is_some());

        let months = planner.project(today()).unwrap();
        assert_eq!(months[4].total_income, 0.0);
        assert_eq!(months[5].total_income, 50_000.0);
    }

    #[test]
    fn test_failed_edit_is_not_saved() {
        let planner = BudgetPlanner::<InMemoryRepository>::default();

        let result = planner.modify(|household, table| {
            household.add_member(
                NewMember {
                    name: "Олег".to_string(),
                    monthly_income: 50_000.0,
                    start_month: None,
                },
                table,
            )?;
            household.add_member(
                NewMember {
                    name: "Никто".to_string(),
                    monthly_income: -1.0,
                    start_month: None,
                },
                table,
            )
        });

        assert!(result.is_err());
        assert!(planner.load().unwrap().is_empty());
    }

    #[test]
    fn test_year_summary_uses_current_month() {
        let planner = BudgetPlanner::<InMemoryRepository>::default();
        planner
            .modify(|household, table| {
                household.add_member(
                    NewMember {
                        name: "Олег".to_string(),
                        monthly_income: 30_000.0,
                        start_month: None,
                    },
                    table,
                )
            })
            .unwrap();

        let may = planner.project_month(4, today()).unwrap();
        assert_eq!(may.balance, 30_000.0);
        assert!(matches!(
            planner.project_month(12, today()),
            Err(BudgetError::InvalidMonthIndex(12))
        ));

        let summary = planner.year_summary(today()).unwrap();
        let current = summary.current_month.unwrap();
        assert_eq!(current.month_index, 4);
        assert_eq!(current.month_name, "Май");
        assert_eq!(summary.average_balance, 30_000.0);
    }

    #[test]
    fn test_import_rejects_invalid_backup() {
        let planner = BudgetPlanner::<InMemoryRepository>::default();
        let json = r#"{
            "familyMembers": [],
            "expenses": [{
                "id": "8d3f8a40-2f0c-4b8e-9c1a-8a0c5e7b6d21",
                "title": "Налог",
                "amount": 10000,
                "category": "Прочее",
                "type": "yearly",
                "startMonth": "Январь"
            }],
            "savingsGoals": [],
            "exportDate": "2024-05-20T08:00:00Z"
        }"#;

        let export = BudgetExport::from_json(json).unwrap();
        assert!(planner.import(export).is_err());
        assert!(planner.load().unwrap().is_empty());
    }
}
