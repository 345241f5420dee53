//! The vendor toolchain seen from the driver: a command line per script.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Environment variable naming the `vivado` executable.
pub const VIVADO_ENV: &str = "VIVADO";

/// Something that can run a Tcl script in batch mode.
pub trait Toolchain {
    /// Human-readable tool name for logs.
    fn name(&self) -> &str;

    /// The executable that will be started.
    fn executable(&self) -> &Path;

    /// Builds the command that runs `script` and logs to `log`.
    ///
    /// Both paths are relative to the build directory, which the driver makes
    /// the working directory.
    fn batch(&self, script: &Path, log: &Path) -> Command;
}

/// AMD/Xilinx Vivado.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vivado {
    executable: PathBuf,
}

impl Vivado {
    /// Uses the given executable.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Finds the executable: `explicit` if given, else `$VIVADO`, else
    /// `vivado` on `PATH`.
    pub fn locate(explicit: Option<&Path>) -> Self {
        Self::locate_from(explicit, std::env::var_os(VIVADO_ENV))
    }

    fn locate_from(explicit: Option<&Path>, env: Option<OsString>) -> Self {
        let executable = match (explicit, env) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(value)) if !value.is_empty() => PathBuf::from(value),
            _ => PathBuf::from("vivado"),
        };
        log::debug!("using vivado at {}", executable.display());
        Self { executable }
    }
}

impl Toolchain for Vivado {
    fn name(&self) -> &str {
        "vivado"
    }

    fn executable(&self) -> &Path {
        &self.executable
    }

    fn batch(&self, script: &Path, log: &Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("-mode")
            .arg("batch")
            .arg("-source")
            .arg(script)
            .arg("-nojournal")
            .arg("-log")
            .arg(log);
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let v = Vivado::locate_from(
            Some(Path::new("/opt/vivado/bin/vivado")),
            Some(OsString::from("/elsewhere/vivado")),
        );
        assert_eq!(v.executable(), Path::new("/opt/vivado/bin/vivado"));
    }

    #[test]
    fn env_then_path() {
        let v = Vivado::locate_from(None, Some(OsString::from("/tools/vivado")));
        assert_eq!(v.executable(), Path::new("/tools/vivado"));
        let v = Vivado::locate_from(None, Some(OsString::new()));
        assert_eq!(v.executable(), Path::new("vivado"));
        let v = Vivado::locate_from(None, None);
        assert_eq!(v.executable(), Path::new("vivado"));
    }

    #[test]
    fn batch_command_line() {
        let cmd = Vivado::new("vivado").batch(Path::new("top.tcl"), Path::new("top.log"));
        assert_eq!(cmd.get_program(), "vivado");
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            vec!["-mode", "batch", "-source", "top.tcl", "-nojournal", "-log", "top.log"]
        );
    }
}
