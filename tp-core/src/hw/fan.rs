//! ThinkPad ACPI fan control
//!
//! The fan is driven through `/proc/acpi/ibm/fan`. The read side lists,
//! among other lines, a `commands:` line when the thinkpad_acpi module
//! accepts fan commands; its presence validates the handle at startup.
//! The write side takes one of the literal command strings produced by
//! [`FanState::command`].

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use tp_error::{Result, TpError};

use crate::engine::fsm::FanState;

#[cfg(test)]
use mockall::automock;

/// Marker line present when the module accepts fan commands
const COMMANDS_MARKER: &str = "commands:";

/// Applies a fan state to a physical control interface
#[cfg_attr(test, automock)]
pub trait FanActuator {
    /// Write the command for `state` to the control interface
    fn apply(&mut self, state: FanState) -> Result<()>;
}

/// Handle on the ThinkPad ACPI fan control file
#[derive(Debug)]
pub struct AcpiFan {
    path: PathBuf,
}

impl AcpiFan {
    /// Open and validate the fan control file.
    ///
    /// The read side must carry a `commands:` line; without it the module
    /// is missing or was loaded without `fan_control=1`, and writes would
    /// be rejected anyway.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|_| TpError::FanNotAvailable(path.to_path_buf()))?;

        let mut supported = false;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| TpError::file_read(path, source))?;
            if line.starts_with(COMMANDS_MARKER) {
                supported = true;
            }
        }
        if !supported {
            return Err(TpError::FanNotSupported(path.to_path_buf()));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Path of the control file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FanActuator for AcpiFan {
    fn apply(&mut self, state: FanState) -> Result<()> {
        // Open for writing without truncation, like the procfs interface
        // expects; the command is consumed by the module, not stored.
        let mut file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .map_err(|source| TpError::FanWrite {
                path: self.path.clone(),
                source,
            })?;

        file.write_all(state.command().as_bytes())
            .map_err(|source| TpError::FanWrite {
                path: self.path.clone(),
                source,
            })?;

        info!("fan: {}", state.command());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const FAN_STATUS: &str = "status:\t\tenabled\n\
                              speed:\t\t3478\n\
                              level:\t\tauto\n\
                              commands:\tlevel <level> (<level> is 0-7, auto, disengaged, full-speed)\n";

    #[test]
    fn open_accepts_file_with_commands_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fan");
        fs::write(&path, FAN_STATUS).unwrap();
        assert!(AcpiFan::open(&path).is_ok());
    }

    #[test]
    fn open_rejects_file_without_commands_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fan");
        fs::write(&path, "status:\t\tenabled\nspeed:\t\t3478\n").unwrap();
        assert!(matches!(
            AcpiFan::open(&path),
            Err(TpError::FanNotSupported(_))
        ));
    }

    #[test]
    fn open_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            AcpiFan::open(&dir.path().join("fan")),
            Err(TpError::FanNotAvailable(_))
        ));
    }

    #[test]
    fn apply_writes_the_command_string() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fan");
        fs::write(&path, FAN_STATUS).unwrap();

        let mut fan = AcpiFan::open(&path).unwrap();
        fan.apply(FanState::HighSpeed).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("level 7"));
    }
}
