//! Full-backup document: the three collections plus the moment they were exported.

use crate::error::Result;
use crate::schema::{Expense, FamilyMember, Household, SavingsGoal};
use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

/// A stored collection, either as a JSON array or as a string holding one.
/// Backups written from a browser key-value store keep the raw string value,
/// and `null` for keys that were never set.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCollection<T> {
    List(Vec<T>),
    Encoded(String),
}

fn stored_collection<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<StoredCollection<T>>::deserialize(deserializer)? {
        None => Ok(Vec::new()),
        Some(StoredCollection::List(items)) => Ok(items),
        Some(StoredCollection::Encoded(raw)) if raw.trim().is_empty() || raw.trim() == "null" => {
            Ok(Vec::new())
        }
        Some(StoredCollection::Encoded(raw)) => serde_json::from_str(&raw).map_err(D::Error::custom),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetExport {
    #[serde(default, deserialize_with = "stored_collection")]
    #[schemars(with = "Vec<FamilyMember>")]
    pub family_members: Vec<FamilyMember>,

    #[serde(default, deserialize_with = "stored_collection")]
    #[schemars(with = "Vec<Expense>")]
    pub expenses: Vec<Expense>,

    #[serde(default, deserialize_with = "stored_collection")]
    #[schemars(with = "Vec<SavingsGoal>")]
    pub savings_goals: Vec<SavingsGoal>,

    pub export_date: DateTime<Utc>,
}

impl BudgetExport {
    pub fn new(household: &Household, exported_at: DateTime<Utc>) -> Self {
        Self {
            family_members: household.family_members.clone(),
            expenses: household.expenses.clone(),
            savings_goals: household.savings_goals.clone(),
            export_date: exported_at,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_household(self) -> Household {
        Household {
            family_members: self.family_members,
            expenses: self.expenses,
            savings_goals: self.savings_goals,
        }
    }

    pub fn backup_file_name(date: NaiveDate) -> String {
        format!("family-budget-backup-{}.json", date.format("%Y-%m-%d"))
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&schemars::schema_for!(BudgetExport))
    }
}
