/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Shell preferences.
//!
//! The app identity (entry URL, domain markers, brand color) is fixed. The
//! ambient knobs (log filter, engine profile directory, devtools, user agent
//! override, window size) come from defaults, then an optional TOML file,
//! then the command line, each layer overriding the previous one.

use std::fs;
use std::path::{Path, PathBuf};

use bpaf::Bpaf;
use serde::Deserialize;
use url::Url;

use crate::shell::chrome::BRAND_ACCENT_COLOR;
use crate::shell::navigation::{APP_DOMAIN_MARKER, IDENTITY_PROVIDER_MARKER};
use crate::shell::surface_settings::EMBEDDED_USER_AGENT_MARKERS;

pub const ENTRY_URL: &str = "https://revolib.fr/accueil-app/";
pub const DEFAULT_TRACING_FILTER: &str = "revoshell=info";
const APP_DIR_NAME: &str = "revoshell";

#[derive(Clone, Debug, PartialEq)]
pub struct ShellPreferences {
    pub entry_url: Url,
    pub internal_markers: Vec<String>,
    pub accent_color: String,
    pub user_agent_markers: Vec<String>,
    pub window_title: String,
    pub tracing_filter: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub devtools: bool,
    pub user_agent: Option<String>,
    pub window_width: f64,
    pub window_height: f64,
}

impl Default for ShellPreferences {
    fn default() -> Self {
        Self {
            entry_url: Url::parse(ENTRY_URL).expect("ENTRY_URL is a valid URL"),
            internal_markers: vec![
                APP_DOMAIN_MARKER.to_string(),
                IDENTITY_PROVIDER_MARKER.to_string(),
            ],
            accent_color: BRAND_ACCENT_COLOR.to_string(),
            user_agent_markers: EMBEDDED_USER_AGENT_MARKERS
                .iter()
                .map(|marker| marker.to_string())
                .collect(),
            window_title: "Revolib".to_string(),
            tracing_filter: None,
            data_dir: default_data_dir(),
            devtools: cfg!(debug_assertions),
            user_agent: None,
            window_width: 430.0,
            window_height: 900.0,
        }
    }
}

impl ShellPreferences {
    fn apply_config_file(&mut self, file: ConfigFile) {
        if file.tracing_filter.is_some() {
            self.tracing_filter = file.tracing_filter;
        }
        if file.data_dir.is_some() {
            self.data_dir = file.data_dir;
        }
        if let Some(devtools) = file.devtools {
            self.devtools = devtools;
        }
        if file.user_agent.is_some() {
            self.user_agent = file.user_agent;
        }
        if let Some(width) = file.window_width {
            self.window_width = width;
        }
        if let Some(height) = file.window_height {
            self.window_height = height;
        }
    }

    fn apply_command_line(&mut self, options: CommandLineOptions) {
        if options.tracing_filter.is_some() {
            self.tracing_filter = options.tracing_filter;
        }
        if options.data_dir.is_some() {
            self.data_dir = options.data_dir;
        }
        if options.devtools {
            self.devtools = true;
        }
        if options.user_agent.is_some() {
            self.user_agent = options.user_agent;
        }
    }

    pub fn tracing_filter_or_default(&self) -> &str {
        self.tracing_filter
            .as_deref()
            .unwrap_or(DEFAULT_TRACING_FILTER)
    }
}

pub fn default_data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME).join("profile"))
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
}

/// `config.toml` contents. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub tracing_filter: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub devtools: Option<bool>,
    pub user_agent: Option<String>,
    pub window_width: Option<f64>,
    pub window_height: Option<f64>,
}

#[derive(Debug)]
pub enum PrefsError {
    Read { path: PathBuf, error: String },
    Parse { path: PathBuf, error: String },
}

impl std::fmt::Display for PrefsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Read { path, error } => {
                write!(f, "could not read {}: {error}", path.display())
            },
            Self::Parse { path, error } => {
                write!(f, "invalid config in {}: {error}", path.display())
            },
        }
    }
}

impl std::error::Error for PrefsError {}

/// Load a config file. A missing file is not an error.
pub fn load_config_file(path: &Path) -> Result<Option<ConfigFile>, PrefsError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(PrefsError::Read {
                path: path.to_path_buf(),
                error: e.to_string(),
            });
        },
    };
    toml::from_str(&contents)
        .map(Some)
        .map_err(|e| PrefsError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
}

/// Revolib app shell
#[derive(Clone, Debug, Bpaf)]
#[bpaf(options, version)]
struct CommandLineOptions {
    /// Log filter in RUST_LOG syntax, e.g. "revoshell=debug"
    #[bpaf(long("tracing-filter"), argument("FILTER"))]
    tracing_filter: Option<String>,
    /// Engine profile directory for cookies and local storage
    #[bpaf(long("data-dir"), argument("PATH"))]
    data_dir: Option<PathBuf>,
    /// Config file to read instead of the per-user default
    #[bpaf(long("config"), argument("PATH"))]
    config: Option<PathBuf>,
    /// Enable the engine's developer tools
    #[bpaf(long("devtools"), switch)]
    devtools: bool,
    /// Report this user agent (embedded-view markers are still stripped)
    #[bpaf(long("user-agent"), argument("AGENT"))]
    user_agent: Option<String>,
}

pub enum ArgumentParsingResult {
    Run(ShellPreferences),
    Exit,
    ErrorParsing,
}

/// Parse arguments (without the binary name) into preferences.
pub fn parse_command_line_arguments(args: &[String]) -> ArgumentParsingResult {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    let options = match command_line_options().run_inner(&args[..]) {
        Ok(options) => options,
        Err(failure) => {
            failure.print_mesage(100);
            return match failure.exit_code() {
                0 => ArgumentParsingResult::Exit,
                _ => ArgumentParsingResult::ErrorParsing,
            };
        },
    };

    let config_path = options.config.clone().or_else(default_config_path);
    match resolve_preferences(config_path.as_deref(), options) {
        Ok(preferences) => ArgumentParsingResult::Run(preferences),
        Err(e) => {
            eprintln!("{e}");
            ArgumentParsingResult::ErrorParsing
        },
    }
}

fn resolve_preferences(
    config_path: Option<&Path>,
    options: CommandLineOptions,
) -> Result<ShellPreferences, PrefsError> {
    let mut preferences = ShellPreferences::default();
    if let Some(path) = config_path
        && let Some(file) = load_config_file(path)?
    {
        preferences.apply_config_file(file);
    }
    preferences.apply_command_line(options);
    Ok(preferences)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn parse(args: &[&str]) -> CommandLineOptions {
        command_line_options()
            .run_inner(args)
            .expect("arguments should parse")
    }

    #[test]
    fn defaults_carry_app_identity() {
        let preferences = ShellPreferences::default();
        assert_eq!(preferences.entry_url.as_str(), "https://revolib.fr/accueil-app/");
        assert_eq!(preferences.internal_markers, vec!["revolib", "accounts.google.com"]);
        assert_eq!(preferences.accent_color, "#fff5eb");
        assert_eq!(preferences.tracing_filter_or_default(), DEFAULT_TRACING_FILTER);
    }

    #[test]
    fn command_line_overrides_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "tracing_filter = \"revoshell=warn\"\ndevtools = false\nwindow_width = 600.0"
        )
        .unwrap();

        let options = parse(&["--tracing-filter", "revoshell=trace", "--devtools"]);
        let preferences = resolve_preferences(Some(file.path()), options).unwrap();

        assert_eq!(preferences.tracing_filter.as_deref(), Some("revoshell=trace"));
        assert!(preferences.devtools);
        assert_eq!(preferences.window_width, 600.0);
    }

    #[test]
    fn missing_config_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, None);
    }

    #[test]
    fn unknown_config_key_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "entry_url = \"https://example.com\"").unwrap();
        let error = load_config_file(file.path()).unwrap_err();
        assert!(matches!(error, PrefsError::Parse { .. }));
    }

    #[test]
    fn data_dir_from_command_line() {
        let options = parse(&["--data-dir", "/tmp/revoshell-profile"]);
        let preferences = resolve_preferences(None, options).unwrap();
        assert_eq!(preferences.data_dir, Some(PathBuf::from("/tmp/revoshell-profile")));
    }

    #[test]
    fn unknown_flag_is_a_parse_error() {
        assert!(command_line_options().run_inner(&["--bogus"][..]).is_err());
    }
}
