// [libs/core/integrity-store/src/lib.rs]
//! =================================================================
//! APARATO: CRATE DE INTEGRIDAD DE MODELO (V1.0 - COMPONENTE C1)
//! RESPONSABILIDAD: BACKUP, RESTAURACIÓN Y BITÁCORA DE VERSIONES DEL
//! ARTEFACTO DE MODELO; ÚNICA DUEÑA DEL DIRECTORIO DE RESPALDOS
//! =================================================================

pub mod error;
pub mod store;

pub use error::IntegrityError;
pub use store::{BackupEntry, IntegrityStore};
