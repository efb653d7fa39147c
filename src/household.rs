//! Editing operations on a [`Household`].
//!
//! New records receive a fresh UUID; updates replace only the fields that are
//! set. Every change is validated before it lands, so a rejected edit leaves
//! the household untouched.

use crate::calendar::MonthTable;
use crate::error::{BudgetError, Result};
use crate::schema::{
    Expense, ExpenseCategory, FamilyMember, Household, RecurrenceType, SavingsGoal,
};
use crate::validation::{validate_expense, validate_goal, validate_member};
use chrono::NaiveDate;
use log::debug;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct NewMember {
    pub name: String,
    pub monthly_income: f64,
    pub start_month: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub amount: f64,
    pub category: ExpenseCategory,
    pub recurrence: RecurrenceType,
    pub start_month: String,
    pub due_month: Option<String>,
    pub custom_period_months: Option<u32>,
    pub day_of_week: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewGoal {
    pub title: String,
    pub target_amount: Option<f64>,
    pub monthly_saving: Option<f64>,
    pub target_date: Option<NaiveDate>,
    pub current_amount: f64,
}

/// Partial update; `None` leaves a field as it is. Optional fields take
/// `Some(None)` to clear them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub monthly_income: Option<f64>,
    pub start_month: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseUpdate {
    pub title: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<ExpenseCategory>,
    pub recurrence: Option<RecurrenceType>,
    pub start_month: Option<String>,
    pub due_month: Option<Option<String>>,
    pub custom_period_months: Option<Option<u32>>,
    pub day_of_week: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GoalUpdate {
    pub title: Option<String>,
    pub target_amount: Option<Option<f64>>,
    pub monthly_saving: Option<Option<f64>>,
    pub target_date: Option<Option<NaiveDate>>,
    pub current_amount: Option<f64>,
}

impl MemberUpdate {
    fn apply(self, member: &mut FamilyMember) {
        if let Some(name) = self.name {
            member.name = name;
        }
        if let Some(income) = self.monthly_income {
            member.monthly_income = income;
        }
        if let Some(start) = self.start_month {
            member.start_month = start;
        }
    }
}

impl ExpenseUpdate {
    fn apply(self, expense: &mut Expense) {
        if let Some(title) = self.title {
            expense.title = title;
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(category) = self.category {
            expense.category = category;
        }
        if let Some(recurrence) = self.recurrence {
            expense.recurrence = recurrence;
        }
        if let Some(start) = self.start_month {
            expense.start_month = start;
        }
        if let Some(due) = self.due_month {
            expense.due_month = due;
        }
        if let Some(period) = self.custom_period_months {
            expense.custom_period_months = period;
        }
        if let Some(day) = self.day_of_week {
            expense.day_of_week = day;
        }
    }
}

impl GoalUpdate {
    fn apply(self, goal: &mut SavingsGoal) {
        if let Some(title) = self.title {
            goal.title = title;
        }
        if let Some(target) = self.target_amount {
            goal.target_amount = target;
        }
        if let Some(monthly) = self.monthly_saving {
            goal.monthly_saving = monthly;
        }
        if let Some(date) = self.target_date {
            goal.target_date = date;
        }
        if let Some(current) = self.current_amount {
            goal.current_amount = current;
        }
    }
}

fn not_found(kind: &'static str, id: Uuid) -> BudgetError {
    BudgetError::NotFound {
        kind,
        id: id.to_string(),
    }
}

impl Household {
    pub fn member(&self, id: Uuid) -> Option<&FamilyMember> {
        self.family_members.iter().find(|m| m.id == id)
    }

    pub fn expense(&self, id: Uuid) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn goal(&self, id: Uuid) -> Option<&SavingsGoal> {
        self.savings_goals.iter().find(|g| g.id == id)
    }

    pub fn add_member(&mut self, new: NewMember, table: &MonthTable) -> Result<Uuid> {
        let member = FamilyMember {
            id: Uuid::new_v4(),
            name: new.name,
            monthly_income: new.monthly_income,
            start_month: new.start_month,
        };
        validate_member(&member, table)?;

        debug!("Adding family member '{}' ({})", member.name, member.id);
        let id = member.id;
        self.family_members.push(member);
        Ok(id)
    }

    pub fn update_member(
        &mut self,
        id: Uuid,
        update: MemberUpdate,
        table: &MonthTable,
    ) -> Result<()> {
        let slot = self
            .family_members
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("family member", id))?;

        let mut updated = slot.clone();
        update.apply(&mut updated);
        validate_member(&updated, table)?;
        *slot = updated;
        Ok(())
    }

    pub fn remove_member(&mut self, id: Uuid) -> Result<FamilyMember> {
        let index = self
            .family_members
            .iter()
            .position(|m| m.id == id)
            .ok_or_else(|| not_found("family member", id))?;
        Ok(self.family_members.remove(index))
    }

    pub fn add_expense(&mut self, new: NewExpense, table: &MonthTable) -> Result<Uuid> {
        let expense = Expense {
            id: Uuid::new_v4(),
            title: new.title,
            amount: new.amount,
            category: new.category,
            recurrence: new.recurrence,
            start_month: new.start_month,
            due_month: new.due_month,
            custom_period_months: new.custom_period_months,
            day_of_week: new.day_of_week,
        };
        validate_expense(&expense, table)?;

        debug!(
            "Adding {:?} expense '{}' ({})",
            expense.recurrence, expense.title, expense.id
        );
        let id = expense.id;
        self.expenses.push(expense);
        Ok(id)
    }

    pub fn update_expense(
        &mut self,
        id: Uuid,
        update: ExpenseUpdate,
        table: &MonthTable,
    ) -> Result<()> {
        let slot = self
            .expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| not_found("expense", id))?;

        let mut updated = slot.clone();
        update.apply(&mut updated);
        validate_expense(&updated, table)?;
        *slot = updated;
        Ok(())
    }

    pub fn remove_expense(&mut self, id: Uuid) -> Result<Expense> {
        let index = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| not_found("expense", id))?;
        Ok(self.expenses.remove(index))
    }

    pub fn add_goal(&mut self, new: NewGoal) -> Result<Uuid> {
        let goal = SavingsGoal {
            id: Uuid::new_v4(),
            title: new.title,
            target_amount: new.target_amount,
            monthly_saving: new.monthly_saving,
            target_date: new.target_date,
            current_amount: new.current_amount,
        };
        validate_goal(&goal)?;

        debug!("Adding savings goal '{}' ({})", goal.title, goal.id);
        let id = goal.id;
        self.savings_goals.push(goal);
        Ok(id)
    }

    pub fn update_goal(&mut self, id: Uuid, update: GoalUpdate) -> Result<()> {
        let slot = self
            .savings_goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| not_found("savings goal", id))?;

        let mut updated = slot.clone();
        update.apply(&mut updated);
        validate_goal(&updated)?;
        *slot = updated;
        Ok(())
    }

    pub fn remove_goal(&mut self, id: Uuid) -> Result<SavingsGoal> {
        let index = self
            .savings_goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| not_found("savings goal", id))?;
        Ok(self.savings_goals.remove(index))
    }
}
