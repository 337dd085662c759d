// [libs/core/ota-engine/src/engine.rs]
/*!
 * =================================================================
 * APARATO: MOTOR DE ACTUALIZACIÓN OTA (V1.0 - BSDIFF4 CYCLE)
 * CLASIFICACIÓN: CORE DOMAIN (ESTRATO L2)
 * RESPONSABILIDAD: CICLO COMPLETO DE CHEQUEO, DESCARGA, PARCHEO Y
 * ROLLBACK DEL MODELO FEDERADO DEL NODO
 *
 * VISION HIPER-HOLÍSTICA 2026:
 * 1. SINGLE FLIGHT: Todo el ciclo corre bajo un único mutex asíncrono,
 *    de modo que a lo sumo una actualización está en vuelo por nodo.
 * 2. FAIL SOFT: Cualquier fallo de red o de parche degrada a un log
 *    de advertencia y un rollback, nunca a un pánico del proceso.
 * 3. ATOMIC COMMIT: El modelo parcheado solo reemplaza al anterior
 *    tras pasar la validación de contenido del almacén de integridad.
 *
 * # Mathematical Proof (Single-Flight Serialization):
 * Sea M el mutex que envuelve `Inner`. Toda llamada a
 * `check_for_updates` adquiere M antes de observar o mutar
 * `current_version`, y lo retiene hasta terminar el ciclo completo
 * (chequeo, descarga, parcheo, commit o rollback). Como M admite un
 * único tenedor a la vez, dos llamadas concurrentes se serializan
 * estrictamente: nunca hay dos actualizaciones en vuelo.
 * =================================================================
 */

use crate::error::OtaError;
use crate::resource::resource_check;
use crate::state::OtaState;
use atous_core_integrity::IntegrityStore;
use atous_domain_models::{NodeConfig, VersionHistoryEntry};
use atous_infra_aggregator_client::AggregatorClient;
use qbsdiff::Bspatch;
use std::io::Cursor;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

struct Inner {
    integrity: IntegrityStore,
    state: OtaState,
    current_version: u64,
}

pub struct OtaEngine {
    node_id: String,
    model_path: PathBuf,
    diff_staging_dir: PathBuf,
    aggregator: AggregatorClient,
    inner: Mutex<Inner>,
}

impl OtaEngine {
    pub fn new(config: &NodeConfig, aggregator: AggregatorClient) -> Result<Self, OtaError> {
        let integrity = IntegrityStore::open(&config.backup_dir, config.max_rollback_versions)?;
        Ok(Self {
            node_id: config.node_id.clone(),
            model_path: PathBuf::from(&config.model_path),
            diff_staging_dir: std::env::temp_dir(),
            aggregator,
            inner: Mutex::new(Inner {
                integrity,
                state: OtaState::Idle,
                current_version: config.current_version,
            }),
        })
    }

    pub async fn current_version(&self) -> u64 {
        self.inner.lock().await.current_version
    }

    pub async fn state(&self) -> OtaState {
        self.inner.lock().await.state
    }

    /// Polls the aggregator and applies an available update. Returns
    /// whether an update was committed. Network errors are swallowed
    /// to `false` with a log, per the failure semantics in §7.
    #[instrument(skip(self))]
    pub async fn check_for_updates(&self) -> bool {
        let mut inner = self.inner.lock().await;
        inner.state = OtaState::Checking;

        let version_info = match self.aggregator.model_version().await {
            Ok(info) => info,
            Err(err) => {
                warn!(error = %err, "aggregator unreachable, deferring update check");
                inner.state = OtaState::Idle;
                return false;
            }
        };

        if version_info.version <= inner.current_version {
            inner.state = OtaState::Idle;
            return false;
        }

        if let Err(err) = resource_check(version_info.size, &self.model_path) {
            warn!(error = %err, "resource check failed, deferring update");
            inner.state = OtaState::Idle;
            return false;
        }

        let from_v = inner.current_version;
        let to_v = version_info.version;

        inner.state = OtaState::Downloading;
        let diff_path = match self
            .aggregator
            .download_diff(from_v, to_v, &self.diff_staging_dir)
            .await
        {
            Ok(path) => path,
            Err(err) => {
                warn!(error = %err, "diff download failed, deferring update");
                inner.state = OtaState::Idle;
                return false;
            }
        };

        inner.state = OtaState::Patching;
        let outcome = self.apply_and_commit(&mut inner, &diff_path, to_v).await;
        let _ = std::fs::remove_file(&diff_path);

        match outcome {
            Ok(()) => {
                inner.state = OtaState::Committed;
                info!(node_id = %self.node_id, from_v, to_v, "model update committed");
                inner.state = OtaState::Idle;
                true
            }
            Err(err) => {
                error!(error = %err, from_v, to_v, "patch failed, rolling back");
                inner.state = OtaState::RollingBack;
                if let Err(rollback_err) = self.rollback_locked(&mut inner, from_v) {
                    error!(error = %rollback_err, "rollback after failed patch also failed");
                }
                inner.state = OtaState::Idle;
                false
            }
        }
    }

    async fn apply_and_commit(
        &self,
        inner: &mut Inner,
        diff_path: &std::path::Path,
        to_v: u64,
    ) -> Result<(), OtaError> {
        inner
            .integrity
            .snapshot(&self.model_path, inner.current_version)?;

        let source_bytes = std::fs::read(&self.model_path)?;
        let patch_bytes = std::fs::read(diff_path)?;

        let patched = apply_binary_patch(&source_bytes, &patch_bytes)?;

        inner.state = OtaState::Verifying;
        if !inner.integrity.validate(&patched) {
            return Err(OtaError::Patch(
                "patched content failed magic/length validation".to_string(),
            ));
        }

        inner.integrity.write_model_atomic(&self.model_path, &patched)?;
        inner.integrity.history_append(VersionHistoryEntry {
            version: to_v,
            timestamp: chrono::Utc::now().timestamp() as u64,
            node_id: self.node_id.clone(),
        })?;
        inner.current_version = to_v;

        Ok(())
    }

    /// Restores the newest backup for `target_version` and rewinds
    /// `current_version`. The only operation allowed to move
    /// `current_version` downward (invariant I1).
    pub async fn rollback(&self, target_version: u64) -> bool {
        let mut inner = self.inner.lock().await;
        self.rollback_locked(&mut inner, target_version).is_ok()
    }

    fn rollback_locked(&self, inner: &mut Inner, target_version: u64) -> Result<(), OtaError> {
        let backup = inner
            .integrity
            .newest_backup_for_version(target_version)?
            .ok_or(atous_core_integrity::IntegrityError::BackupNotFound(
                target_version,
            ))?;
        inner.integrity.restore(&backup.backup_id, &self.model_path)?;
        inner.current_version = target_version;
        Ok(())
    }
}

fn apply_binary_patch(source: &[u8], patch: &[u8]) -> Result<Vec<u8>, OtaError> {
    let patcher = Bspatch::new(patch).map_err(|e| OtaError::Patch(e.to_string()))?;
    let mut target = Vec::new();
    patcher
        .apply(Cursor::new(source), &mut target)
        .map_err(|e| OtaError::Patch(e.to_string()))?;
    Ok(target)
}

/// Treats an equal target and current version as "compatible", so it
/// is not safe to use as the sole gate for whether an update should
/// proceed. `check_for_updates` gates on strict `>` instead; this is
/// exposed for callers that need the looser check.
pub fn is_version_compatible(target_version: u64, current_version: u64) -> bool {
    target_version >= current_version
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_version_compatible_treats_equal_versions_as_compatible() {
        assert!(is_version_compatible(5, 5));
        assert!(is_version_compatible(6, 5));
        assert!(!is_version_compatible(4, 5));
    }
}
