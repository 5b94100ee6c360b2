use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use tracing::debug;

use crate::model::task::Task;
use crate::repository::traits::TaskRepository;

/// Versioned storage key; bump when the record layout changes.
pub const STORAGE_KEY: &str = "tasks_v1";

/// Stores the serialized task array in `<data_dir>/tasks_v1.json`.
#[derive(Clone, Debug)]
pub struct FileTaskRepository {
    file_path: PathBuf,
}

impl FileTaskRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match base_dir {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data directory {}", dir.display()))?;

        Ok(FileTaskRepository {
            file_path: dir.join(format!("{STORAGE_KEY}.json")),
        })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(".tasksched"))
}

impl TaskRepository for FileTaskRepository {
    fn load(&self) -> Result<Vec<Task>> {
        let file = match File::open(&self.file_path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.file_path.display(), "no task file yet");
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to open {}", self.file_path.display()))
            }
        };
        let tasks = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse {}", self.file_path.display()))?;
        Ok(tasks)
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        // write-then-rename so a crash never leaves a truncated file
        let tmp_path = self.file_path.with_extension("json.tmp");
        {
            let file = File::create(&tmp_path)
                .with_context(|| format!("failed to create {}", tmp_path.display()))?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, tasks)?;
            writer.flush()?;
        }
        fs::rename(&tmp_path, &self.file_path)
            .with_context(|| format!("failed to replace {}", self.file_path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Priority;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTaskRepository::new(Some(dir.path().join("nested"))).unwrap();
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTaskRepository::new(Some(dir.path().to_path_buf())).unwrap();
        let due = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let mut task = Task::new("Book flights".to_string(), Priority::new(2).unwrap(), due, Some("window seat".to_string()));
        task.is_completed = true;

        repo.save(&[task.clone()]).unwrap();
        assert_eq!(repo.load().unwrap(), vec![task]);
        assert!(!repo.path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_reads_records_written_by_older_clients() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTaskRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(
            repo.path(),
            r#"[{"id":"1718020800000","title":"Dentist","priority":1,"dueDate":"2024-06-10T12:00:00.000Z","note":"","isCompleted":false}]"#,
        )
        .unwrap();

        let tasks = repo.load().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "1718020800000");
        assert_eq!(tasks[0].due_date, Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileTaskRepository::new(Some(dir.path().to_path_buf())).unwrap();
        fs::write(repo.path(), "not json").unwrap();
        assert!(repo.load().is_err());
    }
}
