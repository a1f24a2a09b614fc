use anyhow::{bail, Context};
use std::process::{Command, Stdio};

/// Hand `url` to the desktop's default browser.
pub fn open_url(url: &str) -> anyhow::Result<()> {
    let mut cmd = opener_command(url);
    let status = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("Failed to launch a browser for {}", url))?;

    if !status.success() {
        bail!("Browser launcher exited with {}", status);
    }
    Ok(())
}

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opener_receives_url() {
        let cmd = opener_command("https://alice.github.io/portfolio");
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().to_string())
            .collect();
        assert_eq!(args.last().map(String::as_str), Some("https://alice.github.io/portfolio"));
    }
}
