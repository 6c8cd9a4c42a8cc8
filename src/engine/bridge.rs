use std::path::PathBuf;
use std::process::Command;

use super::Engine;
use crate::config::EngineConfig;

// ---------------------------------------------------------------------------
// BridgeEngine – automation interface behind an external bridge program
// ---------------------------------------------------------------------------

/// Talks to the modelling engine through a bridge program, one process per
/// call:
///
/// ```text
/// <program> <args…> attach          attach to the running application
/// <program> <args…> folder          print the active project folder
/// <program> <args…> run <command>   execute one command line
/// <program> <args…> detach          release the automation session
/// ```
///
/// A non-zero exit status is a failure whose reason is the bridge's stderr.
#[derive(Debug, Clone)]
pub struct BridgeEngine {
    program: PathBuf,
    args: Vec<String>,
}

impl BridgeEngine {
    /// Attach to the engine; the error is a human-readable reason.
    pub fn attach(config: &EngineConfig) -> Result<Self, String> {
        let engine = BridgeEngine {
            program: config.bridge_program.clone(),
            args: config.bridge_args.clone(),
        };
        engine.invoke(&["attach"])?;
        log::info!("Attached to engine via {}", engine.program.display());
        Ok(engine)
    }

    fn invoke(&self, verb: &[&str]) -> Result<String, String> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .args(verb)
            .output()
            .map_err(|e| format!("cannot run {}: {e}", self.program.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let reason = if stderr.is_empty() {
                format!("{} exited with {}", self.program.display(), output.status)
            } else {
                stderr
            };
            return Err(reason);
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Engine for BridgeEngine {
    fn project_folder(&mut self) -> Result<String, String> {
        let stdout = self.invoke(&["folder"])?;
        let folder = stdout.trim();
        if folder.is_empty() {
            return Err("engine reported no active project".to_string());
        }
        Ok(folder.to_string())
    }

    fn parse_command(&mut self, command: &str) -> Result<(), String> {
        self.invoke(&["run", command]).map(|_| ())
    }

    fn release(&mut self) -> Result<(), String> {
        self.invoke(&["detach"]).map(|_| ())
    }
}
