//! Opening the served URL in the user's browser.

use std::io;

use tokio::process::Command;

#[cfg(target_os = "macos")]
fn command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

/// Launch the platform browser opener for `url` without waiting for it.
///
/// # Errors
///
/// Returns an error if the opener could not be spawned.
pub fn open_browser(url: &str) -> io::Result<()> {
    let mut child = command(url)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn()?;

    tokio::spawn(async move {
        match child.wait().await {
            Ok(status) if !status.success() => {
                tracing::debug!(%status, "Browser opener exited with failure");
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "Failed to wait for browser opener"),
        }
    });
    Ok(())
}
