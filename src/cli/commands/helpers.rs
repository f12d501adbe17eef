//! Shared helper functions for CLI commands.

use std::path::Path;

use tokio::io::AsyncReadExt;

/// Resolve command input: `--text` wins, then a file, then stdin.
/// A file named `-` also means stdin.
pub async fn read_input(file: Option<&Path>, text: Option<String>) -> anyhow::Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }

    match file {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e)),
        _ => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            Ok(buf)
        }
    }
}

/// Truncate a string for single-line display.
pub fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
