// crates/archiver/src/printer.rs
//! CUPS printing through the `lp` and `lpstat` command-line tools.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::capability::Printer;
use crate::error::ArchiveError;

const LP_TIMEOUT_SECS: u64 = 30;

/// Pull the job id out of `lp` stdout.
///
/// `lp` prints `request id is <printer>-<n> (1 file(s))`; the id is the
/// token right after `request id is`.
pub fn parse_job_id(stdout: &str) -> Option<String> {
    let rest = stdout.split("request id is").nth(1)?;
    rest.split_whitespace().next().map(str::to_string)
}

/// True when `lpstat -p` output lists `printer`.
pub fn lists_printer(lpstat: &str, printer: &str) -> bool {
    lpstat.lines().any(|line| {
        let mut words = line.split_whitespace();
        words.next() == Some("printer") && words.next() == Some(printer)
    })
}

/// Prints via the system spooler.
#[derive(Debug, Clone)]
pub struct LpPrinter {
    timeout: Duration,
}

impl Default for LpPrinter {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(LP_TIMEOUT_SECS),
        }
    }
}

impl LpPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    async fn run(&self, cmd: &mut Command) -> Result<std::process::Output, ArchiveError> {
        tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ArchiveError::Print(format!("timed out after {:?}", self.timeout)))?
            .map_err(|e| ArchiveError::Print(format!("failed to spawn: {e}")))
    }

    async fn ensure_exists(&self, printer: &str) -> Result<(), ArchiveError> {
        let output = self.run(Command::new("lpstat").arg("-p")).await?;
        let listing = String::from_utf8_lossy(&output.stdout);
        if lists_printer(&listing, printer) {
            Ok(())
        } else {
            Err(ArchiveError::PrinterNotFound(printer.to_string()))
        }
    }
}

#[async_trait]
impl Printer for LpPrinter {
    async fn print(&self, artifact: &Path, printer: &str) -> Result<String, ArchiveError> {
        self.ensure_exists(printer).await?;

        let title = artifact
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output = self
            .run(
                Command::new("lp")
                    .arg("-d")
                    .arg(printer)
                    .arg("-t")
                    .arg(&title)
                    .arg(artifact),
            )
            .await?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!(printer, stdout = %stdout.trim(), "lp finished");
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ArchiveError::Print(stderr.trim().to_string()));
        }

        let job = parse_job_id(&stdout).unwrap_or_else(|| "unknown".to_string());
        info!(printer, job = %job, file = %artifact.display(), "Print job submitted");
        Ok(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_id() {
        assert_eq!(
            parse_job_id("request id is Office_Laser-42 (1 file(s))\n").as_deref(),
            Some("Office_Laser-42")
        );
        assert_eq!(parse_job_id("lp: error - no default destination"), None);
        assert_eq!(parse_job_id("request id is"), None);
    }

    #[test]
    fn test_lists_printer_matches_whole_name() {
        let listing = "printer Office_Laser is idle.  enabled since Mon\n\
                       printer Lab is disabled since Tue\n";
        assert!(lists_printer(listing, "Office_Laser"));
        assert!(lists_printer(listing, "Lab"));
        assert!(!lists_printer(listing, "Office"));
        assert!(!lists_printer("", "Lab"));
    }
}
