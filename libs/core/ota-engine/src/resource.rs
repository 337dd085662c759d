// [libs/core/ota-engine/src/resource.rs]
//! =================================================================
//! APARATO: GUARDIA DE RECURSOS PRE-VUELO (V1.0)
//! RESPONSABILIDAD: VERIFICACIÓN DE ESPACIO EN DISCO Y MEMORIA ANTES
//! DE ACEPTAR UNA ACTUALIZACIÓN DE MODELO
//! =================================================================

use crate::error::OtaError;
use std::path::Path;
use sysinfo::{Disks, System};
use tracing::warn;

/// Requires free disk space of at least 3x the declared update size, and
/// available memory of at least 2x when it can be measured at all; a
/// memory reading failure is a warn-and-skip, not a hard failure.
pub fn resource_check(declared_size: u64, model_path: &Path) -> Result<(), OtaError> {
    let required_disk = declared_size.saturating_mul(3);
    let target_dir = model_path.parent().unwrap_or_else(|| Path::new("."));
    let target_dir = target_dir.canonicalize().unwrap_or_else(|_| target_dir.to_path_buf());

    let disks = Disks::new_with_refreshed_list();
    let available_disk = disks
        .list()
        .iter()
        .filter(|disk| target_dir.starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| disk.available_space());

    match available_disk {
        Some(available) if available >= required_disk => {}
        Some(available) => {
            return Err(OtaError::Resource {
                declared_size,
                reason: format!("free disk {available} bytes below required {required_disk} bytes"),
            })
        }
        None => {
            return Err(OtaError::Resource {
                declared_size,
                reason: "could not determine free disk space for update target".to_string(),
            })
        }
    }

    let required_memory = declared_size.saturating_mul(2);
    let mut sys = System::new();
    sys.refresh_memory();
    let available_memory = sys.available_memory();
    if available_memory == 0 {
        warn!("could not measure available memory, skipping memory gate");
    } else if available_memory < required_memory {
        return Err(OtaError::Resource {
            declared_size,
            reason: format!(
                "available memory {available_memory} bytes below required {required_memory} bytes"
            ),
        });
    }

    Ok(())
}
