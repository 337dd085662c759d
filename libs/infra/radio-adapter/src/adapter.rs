// [libs/infra/radio-adapter/src/adapter.rs]
//! =================================================================
//! APARATO: ADAPTADOR DE RADIO POR COMANDOS AT (V1.0)
//! RESPONSABILIDAD: ESPEJADO DE CADA MUTACIÓN DEL CONTROLADOR LORA A
//! UN COMANDO SERIAL, CON UNA IMPLEMENTACIÓN NULA CUANDO NO HAY
//! HARDWARE CONECTADO
//! =================================================================

use crate::error::RadioError;
use std::io::{BufRead, BufReader, Write};
use std::time::Duration;
use tracing::{debug, warn};

pub trait RadioAdapter: Send + Sync {
    fn set_spreading_factor(&self, spreading_factor: u8) -> Result<(), RadioError>;
    fn set_tx_power(&self, tx_power_dbm: i32) -> Result<(), RadioError>;
    fn set_bandwidth(&self, bandwidth_hz: u32) -> Result<(), RadioError>;
    fn set_coding_rate(&self, coding_rate: &str) -> Result<(), RadioError>;
}

/// No physical radio attached: logs every command and always succeeds.
pub struct NullRadioAdapter;

impl RadioAdapter for NullRadioAdapter {
    fn set_spreading_factor(&self, spreading_factor: u8) -> Result<(), RadioError> {
        debug!(spreading_factor, "no radio adapter attached, logging intent only");
        Ok(())
    }

    fn set_tx_power(&self, tx_power_dbm: i32) -> Result<(), RadioError> {
        debug!(tx_power_dbm, "no radio adapter attached, logging intent only");
        Ok(())
    }

    fn set_bandwidth(&self, bandwidth_hz: u32) -> Result<(), RadioError> {
        debug!(bandwidth_hz, "no radio adapter attached, logging intent only");
        Ok(())
    }

    fn set_coding_rate(&self, coding_rate: &str) -> Result<(), RadioError> {
        debug!(coding_rate, "no radio adapter attached, logging intent only");
        Ok(())
    }
}

/// A LoRa modem reachable over a line-based serial connection.
/// Commands are `AT+<FIELD>=<value>\r\n`; a bare `OK` line acknowledges.
pub struct SerialRadioAdapter {
    port: std::sync::Mutex<Box<dyn serialport::SerialPort>>,
}

impl SerialRadioAdapter {
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, RadioError> {
        let port = serialport::new(path, baud_rate)
            .timeout(Duration::from_secs(2))
            .open()?;
        Ok(Self {
            port: std::sync::Mutex::new(port),
        })
    }

    fn send_command(&self, command: &str) -> Result<(), RadioError> {
        let mut port = self.port.lock().expect("serial port mutex poisoned");
        let line = format!("{command}\r\n");
        port.write_all(line.as_bytes())?;

        let mut reply = String::new();
        BufReader::new(port.as_mut()).read_line(&mut reply)?;
        let reply = reply.trim();

        if reply != "OK" {
            warn!(command, reply, "radio did not acknowledge command");
            return Err(RadioError::NotAcknowledged(reply.to_string()));
        }
        Ok(())
    }
}

impl RadioAdapter for SerialRadioAdapter {
    fn set_spreading_factor(&self, spreading_factor: u8) -> Result<(), RadioError> {
        self.send_command(&format!("AT+SF={spreading_factor}"))
    }

    fn set_tx_power(&self, tx_power_dbm: i32) -> Result<(), RadioError> {
        self.send_command(&format!("AT+POWER={tx_power_dbm}"))
    }

    fn set_bandwidth(&self, bandwidth_hz: u32) -> Result<(), RadioError> {
        self.send_command(&format!("AT+BW={bandwidth_hz}"))
    }

    fn set_coding_rate(&self, coding_rate: &str) -> Result<(), RadioError> {
        self.send_command(&format!("AT+CR={coding_rate}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_adapter_never_fails() {
        let adapter = NullRadioAdapter;
        assert!(adapter.set_spreading_factor(10).is_ok());
        assert!(adapter.set_tx_power(14).is_ok());
        assert!(adapter.set_bandwidth(125_000).is_ok());
        assert!(adapter.set_coding_rate("4/5").is_ok());
    }
}
