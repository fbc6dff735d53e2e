use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;
use super::DocumentStore;
use crate::{Result, StorefrontError};

/// One `<name>.json` file per document inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens the data directory, creating it if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| io_error(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path { &self.dir }

    fn path_for(&self, name: &str) -> PathBuf { self.dir.join(format!("{name}.json")) }
}

fn io_error(path: &Path, e: std::io::Error) -> StorefrontError {
    StorefrontError::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(name);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    /// Writes a temporary sibling, syncs it and renames it over the target.
    async fn write(&self, name: &str, contents: Vec<u8>) -> Result<()> {
        let path = self.path_for(name);
        let tmp = self.dir.join(format!(".{name}.{}.tmp", Uuid::new_v4().simple()));
        let written = async {
            let mut file = fs::File::create(&tmp).await?;
            file.write_all(&contents).await?;
            file.sync_all().await?;
            fs::rename(&tmp, &path).await
        }
        .await;
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp).await;
            return Err(io_error(&path, e));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Collection, Record};
    use crate::domain::aggregates::{Role, User};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).await.unwrap();
        assert!(store.read("orders").await.unwrap().is_none());

        store.write("orders", b"[]".to_vec()).await.unwrap();
        store.write("orders", b"[1]".to_vec()).await.unwrap();
        assert_eq!(store.read("orders").await.unwrap().unwrap(), b"[1]");
        assert!(store.dir().join("orders.json").exists());
        assert_eq!(temp_files(store.dir()), 0);
    }

    fn temp_files(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .count()
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).await.unwrap();
        store.write("orders", b"[1]".to_vec()).await.unwrap();

        // a non-empty directory in the target's place makes the final rename fail
        let blocked = dir.path().join("products.json");
        std::fs::create_dir(&blocked).unwrap();
        std::fs::write(blocked.join("keep"), b"previous").unwrap();

        let err = store.write("products", b"[2]".to_vec()).await.unwrap_err();
        assert!(matches!(err, StorefrontError::Storage(_)));
        assert_eq!(temp_files(dir.path()), 0);
        assert_eq!(std::fs::read(blocked.join("keep")).unwrap(), b"previous");
        assert_eq!(store.read("orders").await.unwrap().unwrap(), b"[1]");
    }

    #[tokio::test]
    async fn test_reads_existing_users_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("users.json"),
            r#"[{"id":"lq3x9k2abc","name":"Admin","email":"admin@store.in","password":"$2a$10$x","role":"admin","createdAt":"2024-05-01T08:00:00.000Z"}]"#,
        ).unwrap();
        let users: Collection<User> = Collection::new(Arc::new(FileStore::open(dir.path()).await.unwrap()));
        let admin = users.get("lq3x9k2abc").await.unwrap();
        assert_eq!(admin.role, Role::Admin);

        users.update(&admin.id, |u| { u.role = Role::User; Ok(()) }).await.unwrap();
        let raw = std::fs::read_to_string(dir.path().join(format!("{}.json", User::COLLECTION))).unwrap();
        assert!(raw.contains("\"password\": \"$2a$10$x\""));
        assert!(raw.contains("\"role\": \"user\""));
    }
}
