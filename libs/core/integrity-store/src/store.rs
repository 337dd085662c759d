// [libs/core/integrity-store/src/store.rs]
/*!
 * =================================================================
 * APARATO: ALMACÉN DE INTEGRIDAD DEL MODELO (V1.0 - ATOMIC WRITES)
 * CLASIFICACIÓN: CORE DOMAIN (ESTRATO L2)
 * RESPONSABILIDAD: INSTANTÁNEAS, RESTAURACIÓN Y BITÁCORA DE VERSIONES
 * DEL ARTEFACTO DE MODELO MANTENIDO LOCALMENTE
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * Toda mutación que toca el archivo de modelo o un respaldo se
 * escribe primero a un archivo temporal y se renombra sobre el
 * destino final, de modo que una caída a mitad de escritura jamás
 * deja un archivo a medio escribir.
 *
 * # Mathematical Proof (Model Durability):
 * Sea P el predicado "el modelo en disco es válido o está ausente".
 * `write_atomic` solo transiciona el archivo destino mediante un
 * `rename` atómico a nivel de sistema de archivos, por lo que ningún
 * estado intermedio de la escritura es jamás observable: P se
 * preserva en cada paso, incluida una terminación abrupta del proceso.
 * =================================================================
 */

use crate::error::IntegrityError;
use atous_domain_models::{ModelArtifact, VersionHistoryEntry};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

const HISTORY_FILE: &str = "version_history.json";

pub struct IntegrityStore {
    backup_dir: PathBuf,
    max_rollback_versions: usize,
    history: Vec<VersionHistoryEntry>,
}

/// A parsed `model_v<version>_<unix_seconds>.bak` backup filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub backup_id: String,
    pub version: u64,
    pub unix_seconds: u64,
    pub path: PathBuf,
}

impl IntegrityStore {
    /// Opens (creating if absent) the backup directory and loads
    /// `version_history.json` if it already exists.
    pub fn open(backup_dir: impl Into<PathBuf>, max_rollback_versions: usize) -> Result<Self, IntegrityError> {
        let backup_dir = backup_dir.into();
        fs::create_dir_all(&backup_dir)?;

        let history_path = backup_dir.join(HISTORY_FILE);
        let history = if history_path.exists() {
            let raw = fs::read_to_string(&history_path)?;
            serde_json::from_str(&raw)?
        } else {
            Vec::new()
        };

        Ok(Self {
            backup_dir,
            max_rollback_versions,
            history,
        })
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Copies `path`'s current bytes into a new backup file and returns
    /// its backup id (the filename, without directory).
    pub fn snapshot(&self, path: &Path, version: u64) -> Result<String, IntegrityError> {
        let bytes = fs::read(path)?;
        let unix_seconds = now_unix_seconds();
        let backup_id = format!("model_v{version}_{unix_seconds}.bak");
        let backup_path = self.backup_dir.join(&backup_id);

        write_atomic(&backup_path, &bytes)?;
        debug!(backup_id, version, "model snapshot written");
        Ok(backup_id)
    }

    /// Writes `bytes` to the model file at `path` via write-then-replace,
    /// for callers (the OTA engine's patch step) that produce a new model
    /// in memory and need it committed without going through a backup.
    pub fn write_model_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), IntegrityError> {
        write_atomic(path, bytes)
    }

    /// Restores `backup_id`'s bytes into `path` via write-then-replace.
    pub fn restore(&self, backup_id: &str, path: &Path) -> Result<(), IntegrityError> {
        let backup_path = self.backup_dir.join(backup_id);
        let bytes = fs::read(&backup_path)?;
        write_atomic(path, &bytes)?;
        info!(backup_id, target = %path.display(), "model restored from backup");
        Ok(())
    }

    /// SHA-256 hex digest of `bytes`.
    pub fn digest(&self, bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        hex::encode(hasher.finalize())
    }

    /// Content-only validity check (length and magic prefix). Does not
    /// check a declared digest.
    pub fn validate(&self, bytes: &[u8]) -> bool {
        ModelArtifact::is_valid_content(bytes)
    }

    /// Lists every backup in the directory, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupEntry>, IntegrityError> {
        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(&self.backup_dir)? {
            let dir_entry = dir_entry?;
            let file_name = dir_entry.file_name();
            let file_name = file_name.to_string_lossy();
            if let Some(parsed) = parse_backup_name(&file_name) {
                entries.push(BackupEntry {
                    backup_id: file_name.to_string(),
                    version: parsed.0,
                    unix_seconds: parsed.1,
                    path: dir_entry.path(),
                });
            }
        }
        entries.sort_by(|a, b| b.unix_seconds.cmp(&a.unix_seconds));
        Ok(entries)
    }

    /// The newest backup for `version`, if any.
    pub fn newest_backup_for_version(&self, version: u64) -> Result<Option<BackupEntry>, IntegrityError> {
        Ok(self
            .list_backups()?
            .into_iter()
            .find(|entry| entry.version == version))
    }

    /// Deletes backups older than `max_age`. Returns the count removed.
    pub fn prune(&self, max_age: Duration) -> Result<usize, IntegrityError> {
        let now = now_unix_seconds();
        let cutoff = now.saturating_sub(max_age.as_secs());
        let mut removed = 0;

        for entry in self.list_backups()? {
            if entry.unix_seconds < cutoff {
                fs::remove_file(&entry.path)?;
                removed += 1;
                debug!(backup_id = %entry.backup_id, "pruned stale backup");
            }
        }

        if removed > 0 {
            info!(removed, "pruned stale backups");
        }
        Ok(removed)
    }

    /// Appends `entry` to the in-memory and on-disk version history,
    /// truncated to `max_rollback_versions` most recent entries.
    pub fn history_append(&mut self, entry: VersionHistoryEntry) -> Result<(), IntegrityError> {
        self.history.push(entry);
        if self.history.len() > self.max_rollback_versions {
            let overflow = self.history.len() - self.max_rollback_versions;
            self.history.drain(0..overflow);
        }
        self.persist_history()
    }

    /// The last `n` history entries, oldest first.
    pub fn history_tail(&self, n: usize) -> Vec<VersionHistoryEntry> {
        let start = self.history.len().saturating_sub(n);
        self.history[start..].to_vec()
    }

    fn persist_history(&self) -> Result<(), IntegrityError> {
        let raw = serde_json::to_string_pretty(&self.history)?;
        write_atomic(&self.backup_dir.join(HISTORY_FILE), raw.as_bytes())?;
        Ok(())
    }
}

/// Writes `bytes` to a sibling temp file then renames it over `path`,
/// so observers never see a partially written file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), IntegrityError> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp-{}",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("write"),
        now_unix_seconds()
    ));
    fs::write(&tmp_path, bytes)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_else(|e| {
            warn!(error = %e, "system clock before unix epoch, using 0");
            0
        })
}

fn parse_backup_name(name: &str) -> Option<(u64, u64)> {
    let rest = name.strip_prefix("model_v")?.strip_suffix(".bak")?;
    let (version_str, timestamp_str) = rest.split_once('_')?;
    let version = version_str.parse().ok()?;
    let unix_seconds = timestamp_str.parse().ok()?;
    Some((version, unix_seconds))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_backup_name_roundtrips() {
        assert_eq!(parse_backup_name("model_v3_1700000000.bak"), Some((3, 1_700_000_000)));
        assert_eq!(parse_backup_name("garbage.bak"), None);
    }

    #[test]
    fn snapshot_then_restore_roundtrips_bytes() {
        let dir = tempdir().unwrap();
        let model_path = dir.path().join("model.bin");
        fs::write(&model_path, b"MODLhello").unwrap();

        let store = IntegrityStore::open(dir.path().join("backups"), 3).unwrap();
        let backup_id = store.snapshot(&model_path, 1).unwrap();

        fs::write(&model_path, b"MODLcorrupted").unwrap();
        store.restore(&backup_id, &model_path).unwrap();

        assert_eq!(fs::read(&model_path).unwrap(), b"MODLhello");
    }

    #[test]
    fn validate_checks_magic_and_length() {
        let store = IntegrityStore::open(tempdir().unwrap().path(), 3).unwrap();
        assert!(store.validate(b"MODL12345"));
        assert!(!store.validate(b"XXXX12345"));
        assert!(!store.validate(b"MODL"));
    }

    #[test]
    fn history_append_truncates_to_max_rollback_versions() {
        let dir = tempdir().unwrap();
        let mut store = IntegrityStore::open(dir.path(), 2).unwrap();

        for version in 1..=4u64 {
            store
                .history_append(VersionHistoryEntry {
                    version,
                    timestamp: version,
                    node_id: "n1".to_string(),
                })
                .unwrap();
        }

        let tail = store.history_tail(10);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].version, 3);
        assert_eq!(tail[1].version, 4);
    }

    #[test]
    fn history_persists_across_reopen() {
        let dir = tempdir().unwrap();
        {
            let mut store = IntegrityStore::open(dir.path(), 5).unwrap();
            store
                .history_append(VersionHistoryEntry {
                    version: 1,
                    timestamp: 0,
                    node_id: "n1".to_string(),
                })
                .unwrap();
        }
        let reopened = IntegrityStore::open(dir.path(), 5).unwrap();
        assert_eq!(reopened.history_tail(10).len(), 1);
    }

    #[test]
    fn list_backups_is_newest_first() {
        let dir = tempdir().unwrap();
        let store = IntegrityStore::open(dir.path(), 5).unwrap();
        let model_path = dir.path().join("model.bin");
        fs::write(&model_path, b"MODLaaaa").unwrap();

        fs::write(store.backup_dir().join("model_v1_100.bak"), b"MODLold").unwrap();
        fs::write(store.backup_dir().join("model_v2_200.bak"), b"MODLnew").unwrap();

        let backups = store.list_backups().unwrap();
        assert_eq!(backups[0].version, 2);
        assert_eq!(backups[1].version, 1);
    }

    #[test]
    fn prune_removes_entries_older_than_max_age() {
        let dir = tempdir().unwrap();
        let store = IntegrityStore::open(dir.path(), 5).unwrap();
        let stale_name = format!("model_v1_{}.bak", now_unix_seconds().saturating_sub(10_000));
        fs::write(store.backup_dir().join(&stale_name), b"MODLold").unwrap();
        fs::write(
            store.backup_dir().join(format!("model_v2_{}.bak", now_unix_seconds())),
            b"MODLnew",
        )
        .unwrap();

        let removed = store.prune(Duration::from_secs(3600)).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(store.list_backups().unwrap().len(), 1);
    }
}
