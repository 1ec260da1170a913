use crate::errors::AppError;
use crate::models::{SCHEMA_VERSION, TallyData};
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/tally.json"))
}

pub async fn load_data(path: &Path) -> TallyData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<TallyData>(&bytes) {
            Ok(data) if data.version <= SCHEMA_VERSION => data,
            Ok(data) => {
                error!(
                    "snapshot version {} is newer than supported version {}; starting fresh",
                    data.version, SCHEMA_VERSION
                );
                TallyData::default()
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                TallyData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => TallyData::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            TallyData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &TallyData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::persistence)?;
    fs::write(path, payload).await.map_err(AppError::persistence)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("tally_{tag}_{}_{nanos}.json", std::process::id()));
        path
    }

    #[tokio::test]
    async fn missing_file_loads_the_default_state() {
        let path = scratch_path("missing");
        let data = load_data(&path).await;
        assert_eq!(data, TallyData::default());
    }

    #[tokio::test]
    async fn corrupt_file_loads_the_default_state() {
        let path = scratch_path("corrupt");
        fs::write(&path, b"{ not json").await.unwrap();

        let data = load_data(&path).await;
        assert_eq!(data, TallyData::default());

        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn future_schema_version_loads_the_default_state() {
        let path = scratch_path("future");
        let mut snapshot = TallyData::default();
        snapshot.version = SCHEMA_VERSION + 1;
        snapshot.total_count = 99;
        let payload = serde_json::to_vec(&snapshot).unwrap();
        fs::write(&path, payload).await.unwrap();

        let data = load_data(&path).await;
        assert_eq!(data, TallyData::default());

        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn persist_then_load_round_trips() {
        let path = scratch_path("roundtrip");
        let mut snapshot = TallyData::default();
        snapshot.total_count = 42;
        snapshot.points = 42;
        snapshot.dark_mode = true;

        persist_data(&path, &snapshot).await.unwrap();
        let loaded = load_data(&path).await;
        assert_eq!(loaded, snapshot);

        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn partial_older_snapshot_fills_missing_fields() {
        let path = scratch_path("partial");
        fs::write(&path, br#"{"version":0,"total_count":7,"points":7}"#)
            .await
            .unwrap();

        let data = load_data(&path).await;
        assert_eq!(data.total_count, 7);
        assert_eq!(data.points, 7);
        assert_eq!(data.target_count, TallyData::default().target_count);
        assert!(data.days.is_empty());

        let _ = fs::remove_file(&path).await;
    }
}
