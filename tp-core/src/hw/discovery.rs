//! hwmon base-path discovery
//!
//! The coretemp device does not sit at a stable hwmon index, so the probe
//! walks a handful of candidate indices and picks the first whose `name`
//! file identifies the coretemp driver.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use tp_error::{Result, TpError};

use crate::constants::limits::HWMON_PROBE_COUNT;
use crate::constants::paths::CORETEMP_DRIVER;

/// Probe `base/hwmon0..hwmon7` and return the first device directory
/// whose `name` file's first line starts with `coretemp`.
pub fn find_coretemp(base: &Path) -> Result<PathBuf> {
    for index in 0..HWMON_PROBE_COUNT {
        let dir = base.join(format!("hwmon{index}"));
        let name = match fs::read_to_string(dir.join("name")) {
            Ok(name) => name,
            Err(_) => {
                trace!(dir = %dir.display(), "no name file, skipping");
                continue;
            }
        };

        if name
            .lines()
            .next()
            .is_some_and(|line| line.starts_with(CORETEMP_DRIVER))
        {
            debug!(dir = %dir.display(), "found coretemp device");
            return Ok(dir);
        }
    }

    Err(TpError::NoCoretemp(base.to_path_buf()))
}
