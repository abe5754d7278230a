//! Signature solver backed by an external program.
//!
//! The program receives the scrambled token as its only argument and the
//! platform script on stdin, and prints the plaintext signature on stdout.

use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tubefetch_core::{SignatureSolver, SolverError};

#[derive(Debug, Clone)]
pub struct CommandSolver {
    program: PathBuf,
}

impl CommandSolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl SignatureSolver for CommandSolver {
    fn solve(&self, js: &str, token: &str) -> Result<String, SolverError> {
        let program = self.program.display();
        let mut child = Command::new(&self.program)
            .arg(token)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SolverError::Failed(format!("spawn {program}: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(js.as_bytes()) {
                // the solver may not need the script at all
                Err(e) if e.kind() != ErrorKind::BrokenPipe => {
                    return Err(SolverError::Failed(format!("write script to {program}: {e}")));
                }
                _ => {}
            }
        }

        let output = child
            .wait_with_output()
            .map_err(|e| SolverError::Failed(format!("wait for {program}: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SolverError::TransformNotFound(format!(
                "{program} exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let signature = String::from_utf8(output.stdout)
            .map_err(|e| SolverError::Failed(format!("{program} printed non-UTF-8 output: {e}")))?
            .trim()
            .to_string();
        if signature.is_empty() {
            return Err(SolverError::Failed(format!("{program} printed no signature")));
        }
        Ok(signature)
    }
}
