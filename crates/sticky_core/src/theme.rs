//! Color theme store.
//!
//! # Responsibility
//! - Provide the named color palettes the application shell paints with.
//! - Persist the chosen palette to a small JSON file.
//!
//! # Invariants
//! - Constructed and owned by the shell, never a process global.
//! - A missing or unreadable theme file yields the `Dark` palette.
//! - Theme state never enters the document model.

use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DEFAULT_THEME: &str = "Dark";
/// Color returned for keys missing from the active palette.
pub const FALLBACK_COLOR: &str = "#000000";

const DARK_PALETTE: &[(&str, &str)] = &[
    ("bg", "#000000"),
    ("fg", "#ffffff"),
    ("panel_bg", "#0B0B0B"),
    ("toolbar_bg", "#101010"),
    ("accent", "#007acc"),
    ("entry_bg", "#292929"),
    ("entry_fg", "#ffffff"),
    ("list_bg", "#000000"),
    ("list_fg", "#ffffff"),
    ("list_select", "#333333"),
];

const LIGHT_PALETTE: &[(&str, &str)] = &[
    ("bg", "#fdfdfd"),
    ("fg", "#202124"),
    ("panel_bg", "#f0f0f0"),
    ("toolbar_bg", "#f0f0f0"),
    ("accent", "#0078d4"),
    ("entry_bg", "#ffffff"),
    ("entry_fg", "#202124"),
    ("list_bg", "#f0f0f0"),
    ("list_fg", "#202124"),
    ("list_select", "#e0e0e0"),
];

/// Built-in theme names, in menu order.
pub fn theme_names() -> &'static [&'static str] {
    &["Dark", "Light"]
}

fn builtin_palette(name: &str) -> Option<BTreeMap<String, String>> {
    let palette = match name {
        "Dark" => DARK_PALETTE,
        "Light" => LIGHT_PALETTE,
        _ => return None,
    };
    Some(
        palette
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
    )
}

/// Theme persistence errors.
#[derive(Debug)]
pub enum ThemeError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
}

impl Display for ThemeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write theme file `{}`: {source}", path.display())
            }
            Self::Json(err) => write!(f, "failed to encode theme: {err}"),
        }
    }
}

impl Error for ThemeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ThemeFile {
    #[serde(default = "default_theme_name")]
    name: String,
    #[serde(default)]
    colors: BTreeMap<String, String>,
}

fn default_theme_name() -> String {
    DEFAULT_THEME.to_string()
}

/// Active palette plus the file it is persisted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeStore {
    path: PathBuf,
    name: String,
    colors: BTreeMap<String, String>,
}

impl ThemeStore {
    /// Loads the theme file at `path`, falling back to `Dark`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut store = Self {
            path,
            name: DEFAULT_THEME.to_string(),
            colors: builtin_palette(DEFAULT_THEME).unwrap_or_default(),
        };

        let raw = match std::fs::read_to_string(&store.path) {
            Ok(raw) => raw,
            Err(_) => return store,
        };
        match serde_json::from_str::<ThemeFile>(&raw) {
            Ok(file) => {
                if !file.colors.is_empty() {
                    store.colors = file.colors;
                }
                store.name = file.name;
                info!("event=theme_load module=theme status=ok");
            }
            Err(_) => {
                warn!("event=theme_load module=theme status=skip reason=invalid_theme_file");
            }
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Color for a palette key, or `FALLBACK_COLOR`.
    pub fn color(&self, key: &str) -> &str {
        self.colors
            .get(key)
            .map(String::as_str)
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Switches to a built-in palette and persists the choice.
    ///
    /// Returns `Ok(false)` without changes for unknown names.
    pub fn set_theme(&mut self, name: &str) -> Result<bool, ThemeError> {
        let Some(colors) = builtin_palette(name) else {
            return Ok(false);
        };
        self.name = name.to_string();
        self.colors = colors;
        self.save()?;
        Ok(true)
    }

    /// Writes `{name, colors}` to the theme file.
    pub fn save(&self) -> Result<(), ThemeError> {
        let file = ThemeFile {
            name: self.name.clone(),
            colors: self.colors.clone(),
        };
        let text = serde_json::to_string(&file).map_err(ThemeError::Json)?;
        std::fs::write(&self.path, text).map_err(|source| {
            error!("event=theme_save module=theme status=error error_code=write_failed");
            ThemeError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}
