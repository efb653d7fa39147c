use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMember {
    #[schemars(description = "Opaque unique identifier of the member")]
    pub id: Uuid,

    #[schemars(description = "Display name of the family member")]
    pub name: String,

    #[schemars(description = "Net income the member brings in every month. Non-negative.")]
    pub monthly_income: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Calendar month name from which the income starts counting (e.g. 'Март'). When absent the member contributes from January."
    )]
    pub start_month: Option<String>,
}

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, JsonSchema,
)]
pub enum ExpenseCategory {
    #[serde(rename = "Еда")]
    Food,

    #[serde(rename = "Авто")]
    Auto,

    #[serde(rename = "Коммунальные")]
    Utilities,

    #[serde(rename = "Развлечения")]
    Entertainment,

    #[serde(rename = "Подарки")]
    Gifts,

    #[serde(rename = "Прочее")]
    Other,
}

impl Default for ExpenseCategory {
    fn default() -> Self {
        Self::Other
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    #[schemars(description = "Paid every day. The amount is the daily cost.")]
    Daily,

    #[schemars(description = "Paid every week. The amount is the weekly cost.")]
    Weekly,

    #[schemars(description = "Paid every month.")]
    Monthly,

    #[schemars(description = "Paid every three months, counting from the start month.")]
    Quarterly,

    #[schemars(description = "Paid once a year in the due month.")]
    Yearly,

    #[schemars(
        description = "Paid every N months (customPeriodMonths) from the start month, booked in the due month."
    )]
    Custom,
}

impl RecurrenceType {
    /// Daily, weekly and monthly expenses form the flat monthly baseline.
    pub fn is_regular(self) -> bool {
        matches!(
            self,
            RecurrenceType::Daily | RecurrenceType::Weekly | RecurrenceType::Monthly
        )
    }

    pub fn is_planned(self) -> bool {
        !self.is_regular()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,

    pub title: String,

    #[schemars(
        description = "Cost per occurrence. For daily/weekly expenses this is the per-day/per-week cost."
    )]
    pub amount: f64,

    #[serde(default)]
    pub category: ExpenseCategory,

    #[serde(rename = "type")]
    #[schemars(description = "How often the expense recurs")]
    pub recurrence: RecurrenceType,

    #[schemars(description = "First calendar month in which the expense is active")]
    pub start_month: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Month the payment falls due. Required for yearly and custom expenses.")]
    pub due_month: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Period length in months. Required for custom expenses.")]
    pub custom_period_months: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Descriptive weekday label for weekly expenses. Not used in calculations.")]
    pub day_of_week: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: Uuid,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Total amount the household wants to have saved")]
    pub target_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(
        description = "Explicit amount to put aside every month. Takes precedence over the date-derived figure."
    )]
    pub monthly_saving: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Date by which the target amount should be reached (YYYY-MM-DD)")]
    pub target_date: Option<NaiveDate>,

    #[serde(default)]
    #[schemars(description = "Amount already saved towards the goal")]
    pub current_amount: f64,
}

/// A consistent snapshot of everything a household plans with.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Household {
    #[serde(default)]
    pub family_members: Vec<FamilyMember>,

    #[serde(default)]
    pub expenses: Vec<Expense>,

    #[serde(default)]
    pub savings_goals: Vec<SavingsGoal>,
}

impl Household {
    pub fn is_empty(&self) -> bool {
        self.family_members.is_empty() && self.expenses.is_empty() && self.savings_goals.is_empty()
    }

    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Household)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_generation() {
        let schema_json = Household::schema_as_json().unwrap();
        assert!(schema_json.contains("familyMembers"));
        assert!(schema_json.contains("savingsGoals"));
        assert!(schema_json.contains("customPeriodMonths"));
    }

    #[test]
    fn test_expense_wire_format() {
        let json = r#"{
            "id": "6f1c1d1e-8a53-4d3e-9d7a-2f5a0c3b9e11",
            "title": "Страховка",
            "amount": 24000,
            "category": "Авто",
            "type": "yearly",
            "startMonth": "Январь",
            "dueMonth": "Май"
        }"#;

        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.category, ExpenseCategory::Auto);
        assert_eq!(expense.recurrence, RecurrenceType::Yearly);
        assert_eq!(expense.due_month.as_deref(), Some("Май"));
        assert_eq!(expense.custom_period_months, None);

        let out = serde_json::to_string(&expense).unwrap();
        assert!(out.contains("\"type\":\"yearly\""));
        assert!(out.contains("\"dueMonth\":\"Май\""));
        assert!(!out.contains("dayOfWeek"));
    }

    #[test]
    fn test_goal_defaults_current_amount() {
        let json = r#"{
            "id": "0b7a3c61-4c53-4f0e-8d52-5bd1a0e4f2aa",
            "title": "Отпуск",
            "targetAmount": 120000,
            "targetDate": "2025-06-01"
        }"#;

        let goal: SavingsGoal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.current_amount, 0.0);
        assert_eq!(goal.monthly_saving, None);
        assert_eq!(goal.target_date, NaiveDate::from_ymd_opt(2025, 6, 1));
    }

    #[test]
    fn test_regular_and_planned_split() {
        assert!(RecurrenceType::Daily.is_regular());
        assert!(RecurrenceType::Weekly.is_regular());
        assert!(RecurrenceType::Monthly.is_regular());
        assert!(RecurrenceType::Quarterly.is_planned());
        assert!(RecurrenceType::Yearly.is_planned());
        assert!(RecurrenceType::Custom.is_planned());
    }
}
