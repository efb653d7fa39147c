//! Strict checks for records entering a [`Household`].
//!
//! The projection engine assumes well-formed input and never calls these; they
//! guard the editing surface instead.

use crate::calendar::MonthTable;
use crate::error::{BudgetError, Result};
use crate::schema::{Expense, FamilyMember, Household, RecurrenceType, SavingsGoal};

fn invalid(kind: &'static str, details: String) -> BudgetError {
    BudgetError::InvalidRecord { kind, details }
}

fn check_amount(kind: &'static str, field: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(
            kind,
            format!("{} must be a non-negative number, got {}", field, value),
        ));
    }
    Ok(())
}

fn check_month(table: &MonthTable, name: &str) -> Result<()> {
    table.require_index_of(name).map(|_| ())
}

pub fn validate_member(member: &FamilyMember, table: &MonthTable) -> Result<()> {
    if member.name.trim().is_empty() {
        return Err(invalid("family member", "name must not be empty".to_string()));
    }
    check_amount("family member", "monthly income", member.monthly_income)?;
    if let Some(start) = &member.start_month {
        check_month(table, start)?;
    }
    Ok(())
}

pub fn validate_expense(expense: &Expense, table: &MonthTable) -> Result<()> {
    if expense.title.trim().is_empty() {
        return Err(invalid("expense", "title must not be empty".to_string()));
    }
    check_amount("expense", "amount", expense.amount)?;
    check_month(table, &expense.start_month)?;
    if let Some(due) = &expense.due_month {
        check_month(table, due)?;
    }

    match expense.recurrence {
        RecurrenceType::Yearly if expense.due_month.is_none() => Err(invalid(
            "expense",
            format!("yearly expense '{}' needs a due month", expense.title),
        )),
        RecurrenceType::Custom => {
            match expense.custom_period_months {
                None | Some(0) => {
                    return Err(invalid(
                        "expense",
                        format!(
                            "custom expense '{}' needs a period of at least one month",
                            expense.title
                        ),
                    ))
                }
                Some(_) => {}
            }
            if expense.due_month.is_none() {
                return Err(invalid(
                    "expense",
                    format!("custom expense '{}' needs a due month", expense.title),
                ));
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

pub fn validate_goal(goal: &SavingsGoal) -> Result<()> {
    if goal.title.trim().is_empty() {
        return Err(invalid("savings goal", "title must not be empty".to_string()));
    }
    check_amount("savings goal", "current amount", goal.current_amount)?;
    if let Some(target) = goal.target_amount {
        check_amount("savings goal", "target amount", target)?;
    }
    if let Some(monthly) = goal.monthly_saving {
        check_amount("savings goal", "monthly saving", monthly)?;
    }
    Ok(())
}

pub fn validate_household(household: &Household, table: &MonthTable) -> Result<()> {
    for member in &household.family_members {
        validate_member(member, table)?;
    }
    for expense in &household.expenses {
        validate_expense(expense, table)?;
    }
    for goal in &household.savings_goals {
        validate_goal(goal)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ExpenseCategory;
    use uuid::Uuid;

    fn expense(recurrence: RecurrenceType) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            title: "Абонемент".to_string(),
            amount: 3000.0,
            category: ExpenseCategory::Entertainment,
            recurrence,
            start_month: "Январь".to_string(),
            due_month: None,
            custom_period_months: None,
            day_of_week: None,
        }
    }

    #[test]
    fn test_valid_monthly_expense() {
        assert!(validate_expense(&expense(RecurrenceType::Monthly), &MonthTable::russian()).is_ok());
    }

    #[test]
    fn test_rejects_negative_and_nan_amounts() {
        let table = MonthTable::russian();
        let mut e = expense(RecurrenceType::Monthly);
        e.amount = -1.0;
        assert!(validate_expense(&e, &table).is_err());
        e.amount = f64::NAN;
        assert!(validate_expense(&e, &table).is_err());
    }

    #[test]
    fn test_rejects_unknown_month() {
        let mut e = expense(RecurrenceType::Monthly);
        e.start_month = "January".to_string();
        let err = validate_expense(&e, &MonthTable::russian()).unwrap_err();
        assert!(matches!(err, BudgetError::UnknownMonth(ref m) if m == "January"));
        assert!(validate_expense(&e, &MonthTable::english()).is_ok());
    }

    #[test]
    fn test_yearly_needs_due_month() {
        let table = MonthTable::russian();
        let mut e = expense(RecurrenceType::Yearly);
        assert!(validate_expense(&e, &table).is_err());
        e.due_month = Some("Май".to_string());
        assert!(validate_expense(&e, &table).is_ok());
    }

    #[test]
    fn test_custom_needs_period_and_due_month() {
        let table = MonthTable::russian();
        let mut e = expense(RecurrenceType::Custom);
        e.due_month = Some("Май".to_string());
        assert!(validate_expense(&e, &table).is_err());
        e.custom_period_months = Some(0);
        assert!(validate_expense(&e, &table).is_err());
        e.custom_period_months = Some(4);
        assert!(validate_expense(&e, &table).is_ok());
        e.due_month = None;
        assert!(validate_expense(&e, &table).is_err());
    }

    #[test]
    fn test_member_and_goal_checks() {
        let table = MonthTable::russian();
        let member = FamilyMember {
            id: Uuid::new_v4(),
            name: " ".to_string(),
            monthly_income: 1000.0,
            start_month: None,
        };
        assert!(validate_member(&member, &table).is_err());

        let goal = SavingsGoal {
            id: Uuid::new_v4(),
            title: "Ремонт".to_string(),
            target_amount: Some(-5.0),
            monthly_saving: None,
            target_date: None,
            current_amount: 0.0,
        };
        assert!(validate_goal(&goal).is_err());
    }
}
