//! Command-line argument parsing.
//!
//! Usage:
//!   einfo [-f[<config>]] [-C<cachedir>] [-b<battery>] [-orq] [<script>]

use std::path::PathBuf;

use thiserror::Error;

use crate::config::{default_config_path, HostConfig};

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Which config file to load.
    pub config: ConfigFile,
    /// Cache directory override (`-C<dir>`).
    pub cache_dir: Option<PathBuf>,
    /// Battery reading override in volts (`-b<volts>`).
    pub battery: Option<f32>,
    /// Fetch over the network instead of the cache (`-o`).
    pub online: bool,
    /// Store live responses in the cache (`-r`).
    pub record: bool,
    /// Skip the leftover-stack dump (`-q`).
    pub quiet: bool,
    /// Where to read the script from.
    pub script: ScriptSource,
}

/// How to choose the host config file.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum ConfigFile {
    /// The per-user default location, if it exists.
    #[default]
    Search,
    /// `-f` with no file argument: built-in defaults only.
    Skip,
    /// `-f<file>`: load this specific file.
    Explicit(PathBuf),
}

/// Script input.
#[derive(Debug, Default, PartialEq, Eq)]
pub enum ScriptSource {
    /// No positional argument, or `-`.
    #[default]
    Stdin,
    File(PathBuf),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("-{0} requires an argument")]
    MissingArgument(char),
    #[error("unknown option: -{0}")]
    UnknownOption(char),
    #[error("invalid battery reading: {0}")]
    InvalidBattery(String),
    #[error("too many arguments ({0})")]
    TooManyArguments(usize),
}

pub const USAGE: &str = "Usage: einfo [-f[<config>]] [-C<cachedir>] [-b<battery>] [-orq] [<script>]";

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()`.
pub fn parse_args() -> Result<CliArgs, CliError> {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    parse_argv(&raw)
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, CliError> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            positional.extend(argv[i + 1..].iter().cloned());
            break;
        }

        // Non-flag argument; a lone `-` means stdin.
        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'o' => args.online = true,
                'r' => args.record = true,
                'q' => args.quiet = true,

                // -f[<file>]
                'f' => {
                    if j + 1 < chars.len() {
                        let file: String = chars[j + 1..].iter().collect();
                        args.config = ConfigFile::Explicit(PathBuf::from(file));
                        j = chars.len();
                    } else if i + 1 < argv.len() && !argv[i + 1].starts_with('-') {
                        i += 1;
                        args.config = ConfigFile::Explicit(PathBuf::from(&argv[i]));
                    } else {
                        args.config = ConfigFile::Skip;
                    }
                }

                // -C<dir> / -b<volts>
                c @ ('C' | 'b') => {
                    let value = if j + 1 < chars.len() {
                        let s: String = chars[j + 1..].iter().collect();
                        j = chars.len();
                        s
                    } else if i + 1 < argv.len() {
                        i += 1;
                        argv[i].clone()
                    } else {
                        return Err(CliError::MissingArgument(c));
                    };
                    if c == 'C' {
                        args.cache_dir = Some(PathBuf::from(value));
                    } else {
                        let volts = value.trim().parse().map_err(|_| CliError::InvalidBattery(value))?;
                        args.battery = Some(volts);
                    }
                }

                c => return Err(CliError::UnknownOption(c)),
            }
            j += 1;
        }
        i += 1;
    }

    match positional.len() {
        0 => {}
        1 => {
            let p = positional.remove(0);
            if p != "-" {
                args.script = ScriptSource::File(PathBuf::from(p));
            }
        }
        n => return Err(CliError::TooManyArguments(n)),
    }

    Ok(args)
}

impl CliArgs {
    /// Config file to load, if any.
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.config {
            ConfigFile::Skip => None,
            ConfigFile::Explicit(p) => Some(p.clone()),
            ConfigFile::Search => default_config_path().filter(|p| p.exists()),
        }
    }

    /// Apply command-line overrides on top of a loaded config.
    pub fn apply(&self, cfg: &mut HostConfig) {
        if let Some(dir) = &self.cache_dir {
            cfg.cache_dir = dir.clone();
        }
        if let Some(volts) = self.battery {
            cfg.battery = volts;
        }
        cfg.online |= self.online;
        cfg.record |= self.record;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|&s| s.to_owned()).collect()
    }

    #[test]
    fn empty_args() {
        let a = parse_argv(&argv(&[])).unwrap();
        assert_eq!(a.script, ScriptSource::Stdin);
        assert_eq!(a.config, ConfigFile::Search);
        assert!(!a.online && !a.record && !a.quiet);
    }

    #[test]
    fn script_positional() {
        let a = parse_argv(&argv(&["weather.txt"])).unwrap();
        assert_eq!(a.script, ScriptSource::File(PathBuf::from("weather.txt")));
    }

    #[test]
    fn dash_means_stdin() {
        let a = parse_argv(&argv(&["-"])).unwrap();
        assert_eq!(a.script, ScriptSource::Stdin);
    }

    #[test]
    fn combined_bool_flags() {
        let a = parse_argv(&argv(&["-orq"])).unwrap();
        assert!(a.online && a.record && a.quiet);
    }

    #[test]
    fn cache_dir_embedded_and_separate() {
        let a = parse_argv(&argv(&["-C/tmp/c"])).unwrap();
        assert_eq!(a.cache_dir, Some(PathBuf::from("/tmp/c")));
        let a = parse_argv(&argv(&["-C", "/tmp/c"])).unwrap();
        assert_eq!(a.cache_dir, Some(PathBuf::from("/tmp/c")));
    }

    #[test]
    fn battery_parses() {
        let a = parse_argv(&argv(&["-b3.7"])).unwrap();
        assert_eq!(a.battery, Some(3.7));
        assert_eq!(
            parse_argv(&argv(&["-b", "full"])).unwrap_err(),
            CliError::InvalidBattery("full".to_owned())
        );
    }

    #[test]
    fn missing_argument() {
        assert_eq!(parse_argv(&argv(&["-C"])).unwrap_err(), CliError::MissingArgument('C'));
    }

    #[test]
    fn config_variants() {
        assert_eq!(parse_argv(&argv(&["-f"])).unwrap().config, ConfigFile::Skip);
        assert_eq!(
            parse_argv(&argv(&["-fmy.conf"])).unwrap().config,
            ConfigFile::Explicit(PathBuf::from("my.conf"))
        );
        assert_eq!(
            parse_argv(&argv(&["-f", "my.conf", "s.txt"])).unwrap().config,
            ConfigFile::Explicit(PathBuf::from("my.conf"))
        );
        assert_eq!(parse_argv(&argv(&["-f"])).unwrap().config_path(), None);
    }

    #[test]
    fn double_dash_ends_flags() {
        let a = parse_argv(&argv(&["--", "-odd-name"])).unwrap();
        assert_eq!(a.script, ScriptSource::File(PathBuf::from("-odd-name")));
        assert!(!a.online);
    }

    #[test]
    fn too_many_positional() {
        assert_eq!(parse_argv(&argv(&["a", "b"])).unwrap_err(), CliError::TooManyArguments(2));
    }

    #[test]
    fn unknown_flag() {
        assert_eq!(parse_argv(&argv(&["-z"])).unwrap_err(), CliError::UnknownOption('z'));
    }

    #[test]
    fn overrides_apply_on_top_of_config() {
        let mut cfg = HostConfig { online: true, ..HostConfig::default() };
        let a = parse_argv(&argv(&["-C", "c", "-b", "4.1", "-r"])).unwrap();
        a.apply(&mut cfg);
        assert_eq!(cfg.cache_dir, PathBuf::from("c"));
        assert_eq!(cfg.battery, 4.1);
        assert!(cfg.online && cfg.record);
    }
}
