// [libs/core/ota-engine/src/state.rs]
//! =================================================================
//! APARATO: MÁQUINA DE ESTADOS OTA (V1.0)
//! RESPONSABILIDAD: ENUMERACIÓN DE LAS FASES DEL CICLO DE
//! ACTUALIZACIÓN, CON ROLLBACK COMO SALIDA DE FALLO DESDE CUALQUIERA
//! =================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtaState {
    Idle,
    Checking,
    Downloading,
    Patching,
    Verifying,
    Committed,
    RollingBack,
}

impl OtaState {
    pub fn is_idle(self) -> bool {
        matches!(self, OtaState::Idle)
    }
}
