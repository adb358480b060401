//! Capacity limits and the host configuration file.
//!
//! The interpreter's memory ceilings are plain constants so the embedded
//! budget is visible in one place.  Host settings (where the response cache
//! lives, whether to fetch live, the battery reading to report) come from a
//! small `key = value` file:
//!
//! | Key | Meaning |
//! |-----|---------|
//! | `cache_dir = <path>` | directory holding `cache_<hash>.dat` responses |
//! | `online = <bool>` | fetch over HTTP instead of reading the cache |
//! | `record = <bool>` | store live responses into the cache |
//! | `battery = <float>` | battery reading reported by the `battery` builtin |
//! | `timeout_ms = <int>` | HTTP request timeout |
//! | Lines starting with `#` | comment, ignored |

use std::path::{Path, PathBuf};

use thiserror::Error;

// ── Limits ────────────────────────────────────────────────────────────────────

/// Maximum number of values on the interpreter stack.
pub const STACK_CAPACITY: usize = 64;
/// Maximum number of user function definitions.
pub const FUNCTION_CAPACITY: usize = 64;
/// Text rows on the panel.
pub const SCREEN_ROWS: usize = 12;
/// Half-width character cells per row.
pub const SCREEN_COLS: usize = 32;
/// Upper bound on the bytes produced by unescaping one string.
pub const UNESCAPE_CAPACITY: usize = 1024;
/// Deepest nesting of function bodies and conditional branches.  A recursive
/// loop spends two levels per iteration (the call and its `?` branch), so it
/// can run for about half this many iterations.
pub const MAX_CALL_DEPTH: usize = 256;
/// Sleep duration used when the script never calls `wakeup` (24 hours).
pub const DEFAULT_SLEEP_US: u64 = 24 * 60 * 60 * 1_000_000;

/// Default HTTP timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

// ── Public API ────────────────────────────────────────────────────────────────

/// A non-fatal error encountered while loading a config file.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line}: {message}")]
pub struct ConfigError {
    pub line: usize,
    pub message: String,
}

/// Host settings for one wake cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub cache_dir: PathBuf,
    pub online: bool,
    pub record: bool,
    pub battery: f32,
    pub timeout_ms: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("."),
            online: false,
            record: false,
            battery: 0.0,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl HostConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config string.
    ///
    /// Bad lines are reported but never abort the load; the setting keeps its
    /// default.
    pub fn load_str(s: &str) -> (Self, Vec<ConfigError>) {
        let mut config = HostConfig::new();
        let mut errors = Vec::new();

        for (i, raw) in s.lines().enumerate() {
            let lineno = i + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                errors.push(ConfigError { line: lineno, message: format!("expected key = value: {line}") });
                continue;
            };
            if let Err(message) = config.apply(key.trim(), value.trim()) {
                errors.push(ConfigError { line: lineno, message });
            }
        }

        (config, errors)
    }

    /// Read and parse a config file from disk.
    pub fn load_file(path: &Path) -> std::io::Result<(Self, Vec<ConfigError>)> {
        let s = std::fs::read_to_string(path)?;
        Ok(Self::load_str(&s))
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "cache_dir" => {
                if value.is_empty() {
                    return Err("cache_dir: empty path".to_owned());
                }
                self.cache_dir = PathBuf::from(value);
            }
            "online" => self.online = parse_bool(key, value)?,
            "record" => self.record = parse_bool(key, value)?,
            "battery" => {
                self.battery = value
                    .parse()
                    .map_err(|_| format!("battery: not a number: {value}"))?;
            }
            "timeout_ms" => {
                self.timeout_ms = value
                    .parse()
                    .map_err(|_| format!("timeout_ms: not an integer: {value}"))?;
            }
            _ => return Err(format!("unknown key: {key}")),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, String> {
    match value {
        "1" | "on" | "yes" | "true" => Ok(true),
        "0" | "off" | "no" | "false" => Ok(false),
        _ => Err(format!("{key}: expected on/off, got {value}")),
    }
}

/// Default location of the config file (`<config dir>/einfo/einfo.conf`).
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "einfo").map(|d| d.config_dir().join("einfo.conf"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let (c, errs) = HostConfig::load_str("");
        assert!(errs.is_empty());
        assert_eq!(c, HostConfig::default());
        assert_eq!(c.cache_dir, PathBuf::from("."));
    }

    #[test]
    fn all_keys() {
        let src = "# host\ncache_dir = /tmp/cache\nonline = on\nrecord = yes\nbattery = 3.7\ntimeout_ms = 2500\n";
        let (c, errs) = HostConfig::load_str(src);
        assert!(errs.is_empty(), "{errs:?}");
        assert_eq!(c.cache_dir, PathBuf::from("/tmp/cache"));
        assert!(c.online);
        assert!(c.record);
        assert!((c.battery - 3.7).abs() < 1e-6);
        assert_eq!(c.timeout_ms, 2500);
    }

    #[test]
    fn bad_lines_reported_with_line_numbers() {
        let src = "online = maybe\n\nnonsense\nbattery = 4.1\nwidth = 3\n";
        let (c, errs) = HostConfig::load_str(src);
        assert_eq!(errs.len(), 3);
        assert_eq!(errs[0].line, 1);
        assert_eq!(errs[1].line, 3);
        assert_eq!(errs[2].line, 5);
        assert!(errs[2].message.contains("unknown key"));
        assert!(!c.online);
        assert!((c.battery - 4.1).abs() < 1e-6);
    }

    #[test]
    fn error_display() {
        let e = ConfigError { line: 7, message: "oops".into() };
        assert_eq!(e.to_string(), "line 7: oops");
    }

    #[test]
    fn load_file_from_disk() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "online = off").unwrap();
        writeln!(f, "cache_dir = data").unwrap();
        let (c, errs) = HostConfig::load_file(f.path()).unwrap();
        assert!(errs.is_empty());
        assert_eq!(c.cache_dir, PathBuf::from("data"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        assert!(HostConfig::load_file(Path::new("/nonexistent/einfo.conf")).is_err());
    }
}
