use crate::config::{LoggingConfig, SectionConfig};
use std::{
    collections::HashMap,
    io::Write,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::Level;
use tracing_subscriber::filter::FilterFn;
use tracing_subscriber::fmt;

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// Returns true if target == subsystem or target starts with "subsystem::"
fn matches_subsystem_prefix(target: &str, subsystem: &str) -> bool {
    target == subsystem
        || (target.starts_with(subsystem) && target[subsystem.len()..].starts_with("::"))
}

type SubsystemFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static>>;

/// Filter that accepts everything NOT claimed by an explicit subsystem
/// section, up to `max_level`.
fn default_section_filter(subsystems: &[String], max_level: Level) -> SubsystemFilter {
    let subsystems = subsystems.to_vec();
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        let t = meta.target();
        for s in &subsystems {
            if matches_subsystem_prefix(t, s) {
                return false;
            }
        }
        meta.level() <= &max_level
    }))
}

// -------- rotating file writers --------

#[derive(Clone)]
struct RotWriter(Arc<Mutex<FileRotate<AppendTimestamp>>>);

#[derive(Clone)]
struct RotWriterHandle(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().unwrap().flush()
    }
}

/// A writer handle that may be None (drops writes).
#[derive(Clone)]
struct RoutedWriterHandle(Option<RotWriterHandle>);

impl Write for RoutedWriterHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }
    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Routes log records to per-subsystem files by target prefix, falling
/// back to the "default" section's file.
struct FileRouter {
    default: Option<RotWriter>,
    by_prefix: HashMap<String, RotWriter>,
}

impl FileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotWriterHandle> {
        for (subsystem, wr) in &self.by_prefix {
            if matches_subsystem_prefix(target, subsystem) {
                return Some(RotWriterHandle(wr.0.clone()));
            }
        }
        self.default.as_ref().map(|w| RotWriterHandle(w.0.clone()))
    }

    fn is_empty(&self) -> bool {
        self.default.is_none() && self.by_prefix.is_empty()
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = RoutedWriterHandle;

    fn make_writer(&'a self) -> Self::Writer {
        RoutedWriterHandle(self.default.as_ref().map(|w| RotWriterHandle(w.0.clone())))
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        RoutedWriterHandle(self.resolve_for(meta.target()))
    }
}

/// Resolve a log file path against `base_dir` (home_dir). Absolute paths
/// are kept as-is.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating_writer(section: &SectionConfig, base_dir: &Path) -> Option<RotWriter> {
    if section.file.trim().is_empty() {
        return None;
    }

    let log_path = resolve_log_path(&section.file, base_dir);
    if let Some(parent) = log_path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            eprintln!("Failed to create log dir {}", parent.display());
            return None;
        }
    }

    let max_bytes = section.max_size_mb.unwrap_or(100) * 1024 * 1024;
    let keep = section.max_backups.unwrap_or(3);

    let rot = FileRotate::new(
        &log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(keep)),
        ContentLimit::BytesSurpassed(max_bytes as usize),
        Compression::None,
        #[cfg(unix)]
        None,
    );

    Some(RotWriter(Arc::new(Mutex::new(rot))))
}

// -------- public init --------

/// Initialize logging from a configuration.
///
/// `base_dir` resolves relative log file paths (usually server.home_dir).
/// Console output honors each section's `console_level`; file output is
/// JSON-formatted and routed per subsystem.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` → `tracing` before installing the subscriber.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let subsystem_sections: Vec<(String, &SectionConfig)> = cfg
        .iter()
        .filter(|(k, _)| k.as_str() != "default")
        .map(|(k, v)| (k.clone(), v))
        .collect();
    let subsystem_names: Vec<String> =
        subsystem_sections.iter().map(|(n, _)| n.clone()).collect();
    let default_section = cfg.get("default");

    let mut router = FileRouter {
        default: default_section.and_then(|s| open_rotating_writer(s, base_dir)),
        by_prefix: HashMap::new(),
    };
    for (name, section) in &subsystem_sections {
        if let Some(writer) = open_rotating_writer(section, base_dir) {
            router.by_prefix.insert(name.clone(), writer);
        }
    }

    build_layers(
        default_section,
        &subsystem_sections,
        &subsystem_names,
        router,
    );
}

fn init_default_logging() {
    let _ = fmt()
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

fn build_layers(
    default_section: Option<&SectionConfig>,
    subsystem_sections: &[(String, &SectionConfig)],
    subsystem_names: &[String],
    router: FileRouter,
) {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{filter::Targets, layer::SubscriberExt, prelude::*, Registry};

    let ansi = atty::is(atty::Stream::Stdout);

    // Explicit subsystem console targets.
    let mut console_targets = Targets::new().with_default(LevelFilter::OFF);
    for (name, section) in subsystem_sections {
        if let Some(level) = parse_tracing_level(&section.console_level) {
            console_targets = console_targets.with_target(name.clone(), LevelFilter::from_level(level));
        }
    }

    // Explicit subsystem file targets.
    let mut file_targets = Targets::new().with_default(LevelFilter::OFF);
    for (name, section) in subsystem_sections {
        if section.file.trim().is_empty() {
            continue;
        }
        if let Some(level) = parse_tracing_level(&section.file_level) {
            file_targets = file_targets.with_target(name.clone(), LevelFilter::from_level(level));
        }
    }

    let console_layer = fmt::layer()
        .with_ansi(ansi)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_filter(console_targets);

    if router.is_empty() {
        // Console only; still honor the default section's level.
        if let Some(level) = default_section.and_then(|s| parse_tracing_level(&s.console_level)) {
            let console_default = fmt::layer()
                .with_ansi(ansi)
                .with_target(true)
                .with_level(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_filter(default_section_filter(subsystem_names, level));
            let _ = Registry::default()
                .with(console_layer)
                .with(console_default)
                .try_init();
        } else {
            let _ = Registry::default().with(console_layer).try_init();
        }
        return;
    }

    let router_for_explicit = FileRouter {
        default: router.default.clone(),
        by_prefix: router.by_prefix.clone(),
    };

    let explicit_file_layer = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(router_for_explicit)
        .with_filter(file_targets);

    match default_section {
        Some(section) => {
            let console_default =
                parse_tracing_level(&section.console_level).map(|level| {
                    fmt::layer()
                        .with_ansi(ansi)
                        .with_target(true)
                        .with_level(true)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_filter(default_section_filter(subsystem_names, level))
                });
            let file_default = match (router.default.is_some(), parse_tracing_level(&section.file_level)) {
                (true, Some(level)) => Some(
                    fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_target(true)
                        .with_level(true)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_writer(router)
                        .with_filter(default_section_filter(subsystem_names, level)),
                ),
                _ => None,
            };

            let _ = Registry::default()
                .with(console_layer)
                .with(explicit_file_layer)
                .with(console_default)
                .with(file_default)
                .try_init();
        }
        None => {
            let _ = Registry::default()
                .with(console_layer)
                .with(explicit_file_layer)
                .try_init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    #[test]
    fn test_logging_level_parsing() {
        assert_eq!(parse_tracing_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_tracing_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("Info"), Some(Level::INFO));
        assert_eq!(parse_tracing_level("warn"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("ERROR"), Some(Level::ERROR));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(parse_tracing_level("none"), None);
        assert_eq!(parse_tracing_level("invalid"), Some(Level::INFO));
    }

    #[test]
    fn test_subsystem_prefix_matching() {
        assert!(matches_subsystem_prefix("accounts", "accounts"));
        assert!(matches_subsystem_prefix("accounts::domain::service", "accounts"));
        assert!(!matches_subsystem_prefix("accounts_extra", "accounts"));
        assert!(!matches_subsystem_prefix("microposts", "accounts"));
    }

    #[test]
    fn test_file_paths_resolved_against_home_dir() {
        let tmp = tempdir().unwrap();
        let base_dir = tmp.path();

        let resolved = resolve_log_path("logs/test.log", base_dir);
        assert!(resolved.starts_with(base_dir));
        assert!(resolved.ends_with("logs/test.log"));

        let abs = base_dir.join("absolute.log");
        let resolved = resolve_log_path(abs.to_str().unwrap(), Path::new("/elsewhere"));
        assert_eq!(resolved, abs);
    }

    #[test]
    fn test_open_rotating_writer_creates_parent() {
        let tmp = tempdir().unwrap();
        let section = SectionConfig {
            console_level: "info".into(),
            file: "nested/dir/app.log".into(),
            file_level: "debug".into(),
            max_backups: Some(2),
            max_size_mb: Some(1),
        };

        let writer = open_rotating_writer(&section, tmp.path());
        assert!(writer.is_some());
        assert!(tmp.path().join("nested/dir").exists());
    }

    #[test]
    fn test_empty_file_means_no_writer() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.get_mut("default").unwrap().file = String::new();

        let writer = open_rotating_writer(&cfg["default"], tmp.path());
        assert!(writer.is_none());
    }
}
