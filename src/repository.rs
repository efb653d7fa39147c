//! Persistence behind a narrow load/save interface.
//!
//! The three collections are stored independently, each as a JSON array, so
//! the on-disk layout matches what a key-value store would hold under
//! [`MEMBERS_KEY`], [`EXPENSES_KEY`] and [`GOALS_KEY`].

use crate::error::{BudgetError, Result};
use crate::schema::Household;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const MEMBERS_KEY: &str = "budget_family_members";
pub const EXPENSES_KEY: &str = "budget_expenses";
pub const GOALS_KEY: &str = "budget_savings_goals";

pub trait BudgetRepository {
    fn load(&self) -> Result<Household>;
    fn save(&self, household: &Household) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    snapshot: RefCell<Household>,
}

impl InMemoryRepository {
    pub fn new(household: Household) -> Self {
        Self {
            snapshot: RefCell::new(household),
        }
    }
}

impl BudgetRepository for InMemoryRepository {
    fn load(&self) -> Result<Household> {
        Ok(self.snapshot.borrow().clone())
    }

    fn save(&self, household: &Household) -> Result<()> {
        *self.snapshot.borrow_mut() = household.clone();
        Ok(())
    }
}

/// Stores each collection as `<key>.json` inside a directory.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    dir: PathBuf,
}

impl JsonFileRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl BudgetRepository for JsonFileRepository {
    fn load(&self) -> Result<Household> {
        let household = Household {
            family_members: read_json_or_default(self.path_for(MEMBERS_KEY))?,
            expenses: read_json_or_default(self.path_for(EXPENSES_KEY))?,
            savings_goals: read_json_or_default(self.path_for(GOALS_KEY))?,
        };

        info!(
            "Loaded household from {}: {} members, {} expenses, {} goals",
            self.dir.display(),
            household.family_members.len(),
            household.expenses.len(),
            household.savings_goals.len()
        );
        Ok(household)
    }

    /// Every collection is written to its temp file before any of them is
    /// renamed into place, so a failed write leaves the previous snapshot
    /// untouched and no temp files behind.
    fn save(&self, household: &Household) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let targets = [
            self.path_for(MEMBERS_KEY),
            self.path_for(EXPENSES_KEY),
            self.path_for(GOALS_KEY),
        ];
        let mut staged: Vec<(PathBuf, &Path)> = Vec::with_capacity(targets.len());

        if let Err(e) = stage_household(&targets, household, &mut staged) {
            discard_temps(&staged);
            return Err(e);
        }

        for (i, (temp_path, path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(temp_path, path) {
                discard_temps(&staged[i..]);
                return Err(e.into());
            }
        }

        info!("Saved household to {}", self.dir.display());
        Ok(())
    }
}

fn read_json_or_default<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        debug!("{} does not exist, starting empty", path.display());
        return Ok(T::default());
    }

    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn temp_path_for(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

fn stage_household<'p>(
    targets: &'p [PathBuf; 3],
    household: &Household,
    staged: &mut Vec<(PathBuf, &'p Path)>,
) -> Result<()> {
    write_temp(&targets[0], &household.family_members, staged)?;
    write_temp(&targets[1], &household.expenses, staged)?;
    write_temp(&targets[2], &household.savings_goals, staged)?;
    Ok(())
}

/// Serializes `data` into the temp sibling of `path` and records the pair in
/// `staged`. A temp file that was created but could not be completed is
/// recorded too, so the caller can clean it up.
fn write_temp<'p, T>(path: &'p Path, data: &T, staged: &mut Vec<(PathBuf, &'p Path)>) -> Result<()>
where
    T: Serialize,
{
    let temp_path = temp_path_for(path);
    let file = File::create(&temp_path)?;
    staged.push((temp_path, path));

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| BudgetError::Io(e.into_error()))?
        .sync_all()?;
    Ok(())
}

fn discard_temps(staged: &[(PathBuf, &Path)]) {
    for (temp_path, _) in staged {
        if let Err(e) = fs::remove_file(temp_path) {
            warn!("Could not remove {}: {}", temp_path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Expense, ExpenseCategory, FamilyMember, RecurrenceType};
    use uuid::Uuid;

    fn household() -> Household {
        Household {
            family_members: vec![FamilyMember {
                id: Uuid::new_v4(),
                name: "Мария".to_string(),
                monthly_income: 70_000.0,
                start_month: None,
            }],
            expenses: vec![Expense {
                id: Uuid::new_v4(),
                title: "Продукты".to_string(),
                amount: 1500.0,
                category: ExpenseCategory::Food,
                recurrence: RecurrenceType::Daily,
                start_month: "Январь".to_string(),
                due_month: None,
                custom_period_months: None,
                day_of_week: None,
            }],
            savings_goals: vec![],
        }
    }

    #[test]
    fn test_in_memory_round_trip() {
        let repo = InMemoryRepository::default();
        assert!(repo.load().unwrap().is_empty());

        repo.save(&household()).unwrap();
        assert_eq!(repo.load().unwrap().family_members.len(), 1);
    }

    #[test]
    fn test_json_files_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("data"));
        let original = household();

        repo.save(&original).unwrap();
        assert!(repo.path_for(MEMBERS_KEY).exists());
        assert!(repo.path_for(GOALS_KEY).exists());
        assert!(!repo.path_for(EXPENSES_KEY).with_extension("json.tmp").exists());

        let loaded = repo.load().unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_missing_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        fs::write(repo.path_for(EXPENSES_KEY), "not json").unwrap();
        assert!(matches!(repo.load(), Err(BudgetError::Serialization(_))));
    }

    #[test]
    fn test_failed_save_keeps_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        let original = household();
        repo.save(&original).unwrap();

        // A directory squatting on the expenses temp path makes that write fail
        // after the members temp file has already been written.
        let blocked = temp_path_for(&repo.path_for(EXPENSES_KEY));
        fs::create_dir(&blocked).unwrap();

        let mut changed = original.clone();
        changed.family_members[0].monthly_income = 1.0;
        changed.expenses.clear();
        assert!(matches!(repo.save(&changed), Err(BudgetError::Io(_))));

        assert!(!temp_path_for(&repo.path_for(MEMBERS_KEY)).exists());
        assert!(!temp_path_for(&repo.path_for(GOALS_KEY)).exists());
        assert_eq!(repo.load().unwrap(), original);

        fs::remove_dir(&blocked).unwrap();
        repo.save(&changed).unwrap();
        assert_eq!(repo.load().unwrap(), changed);
    }
}
