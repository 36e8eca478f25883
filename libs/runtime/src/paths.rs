use anyhow::{Context, Result};
use std::path::PathBuf;

/// Resolve the server home directory.
///
/// `explicit` wins when given; a leading `~` is expanded against `$HOME`
/// (`%APPDATA%` on Windows). With no explicit path the platform home is
/// joined with `default_subdir`. The directory is created when `create`
/// is set.
pub fn resolve_home_dir(
    explicit: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let resolved = match explicit {
        Some(raw) => expand_tilde(&raw)?,
        None => platform_home()?.join(default_subdir),
    };

    let absolute = if resolved.is_relative() {
        std::env::current_dir()
            .context("cannot determine current directory")?
            .join(resolved)
    } else {
        resolved
    };

    if create {
        std::fs::create_dir_all(&absolute)
            .with_context(|| format!("cannot create home dir {}", absolute.display()))?;
    }

    Ok(absolute)
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if let Some(rest) = raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        return Ok(platform_home()?.join(rest));
    }
    if raw == "~" {
        return platform_home();
    }
    Ok(PathBuf::from(raw))
}

fn platform_home() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "APPDATA";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    std::env::var(var)
        .map(PathBuf::from)
        .with_context(|| format!("environment variable {var} is not set"))
}
