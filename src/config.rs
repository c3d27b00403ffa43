use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::grid::WeekStart;

pub fn key_match(key: &KeyEvent, bindings: &[String]) -> bool {
    bindings.iter().any(|binding| is_match(key, binding))
}

fn is_match(key: &KeyEvent, binding: &str) -> bool {
    let binding = binding.to_lowercase();
    let parts: Vec<&str> = binding.split('+').collect();

    let mut target_modifiers = KeyModifiers::NONE;
    let mut target_code = KeyCode::Null;

    for part in parts {
        match part {
            "ctrl" => target_modifiers.insert(KeyModifiers::CONTROL),
            "opt" | "alt" => target_modifiers.insert(KeyModifiers::ALT),
            "shift" => target_modifiers.insert(KeyModifiers::SHIFT),
            "enter" => target_code = KeyCode::Enter,
            "esc" => target_code = KeyCode::Esc,
            "backspace" => target_code = KeyCode::Backspace,
            "tab" => target_code = KeyCode::Tab,
            "backtab" => target_code = KeyCode::BackTab,
            "space" => target_code = KeyCode::Char(' '),
            "up" => target_code = KeyCode::Up,
            "down" => target_code = KeyCode::Down,
            "left" => target_code = KeyCode::Left,
            "right" => target_code = KeyCode::Right,
            "home" => target_code = KeyCode::Home,
            "end" => target_code = KeyCode::End,
            "pageup" => target_code = KeyCode::PageUp,
            "pagedown" => target_code = KeyCode::PageDown,
            "delete" => target_code = KeyCode::Delete,
            c if c.chars().count() == 1 => {
                if let Some(ch) = c.chars().next() {
                    target_code = KeyCode::Char(ch);
                }
            }
            _ => {}
        }
    }

    // KeyCode match (case-insensitive for Char).
    let code_matches = if key.code == target_code {
        true
    } else if let (KeyCode::Char(c), KeyCode::Char(tc)) = (key.code, target_code) {
        c.to_lowercase().next() == Some(tc)
    } else {
        false
    };
    if !code_matches {
        return false;
    }

    // Enter matches modifiers exactly; elsewhere Shift is ignored unless requested
    // (BackTab and '?' arrive with Shift set).
    if target_code == KeyCode::Enter {
        return key.modifiers == target_modifiers;
    }

    let mut key_mods = key.modifiers;
    if !target_modifiers.contains(KeyModifiers::SHIFT) {
        key_mods.remove(KeyModifiers::SHIFT);
    }

    key_mods == target_modifiers
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "monthcal", "monthcal")
}

pub fn default_data_dir() -> PathBuf {
    if let Some(path) = std::env::var_os("MONTHCAL_DATA_DIR") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.data_dir().to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".monthcal")
}

fn default_storage_dir() -> PathBuf {
    default_data_dir().join("store")
}

pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("MONTHCAL_CONFIG") {
        return PathBuf::from(path);
    }
    if let Some(dirs) = project_dirs() {
        return dirs.config_dir().join("config.toml");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".monthcal-config.toml")
}

pub fn log_file_path() -> PathBuf {
    default_data_dir().join("monthcal.log")
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub keybindings: KeyBindings,
    pub theme: Theme,
    pub data: DataConfig,
    pub calendar: CalendarConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DataConfig {
    pub storage_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            storage_dir: default_storage_dir(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CalendarConfig {
    pub week_start: WeekStart,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct KeyBindings {
    pub global: GlobalBindings,
    pub grid: GridBindings,
    pub day: DayBindings,
    pub form: FormBindings,
    pub popup: PopupBindings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GlobalBindings {
    pub quit: Vec<String>,
    pub help: Vec<String>,
    pub add_event: Vec<String>,
    pub today: Vec<String>,
    pub prev_month: Vec<String>,
    pub next_month: Vec<String>,
}

impl Default for GlobalBindings {
    fn default() -> Self {
        Self {
            quit: vec!["ctrl+q".to_string(), "q".to_string()],
            help: vec!["?".to_string()],
            add_event: vec!["a".to_string(), "i".to_string()],
            today: vec!["t".to_string()],
            prev_month: vec!["[".to_string(), "pageup".to_string()],
            next_month: vec!["]".to_string(), "pagedown".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GridBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub open_day: Vec<String>,
}

impl Default for GridBindings {
    fn default() -> Self {
        Self {
            left: vec!["h".to_string(), "left".to_string()],
            right: vec!["l".to_string(), "right".to_string()],
            up: vec!["k".to_string(), "up".to_string()],
            down: vec!["j".to_string(), "down".to_string()],
            open_day: vec!["enter".to_string(), "tab".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DayBindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub edit: Vec<String>,
    pub delete: Vec<String>,
    pub back: Vec<String>,
}

impl Default for DayBindings {
    fn default() -> Self {
        Self {
            up: vec!["k".to_string(), "up".to_string()],
            down: vec!["j".to_string(), "down".to_string()],
            edit: vec!["e".to_string(), "enter".to_string()],
            delete: vec!["d".to_string(), "delete".to_string()],
            back: vec!["esc".to_string(), "tab".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FormBindings {
    pub submit: Vec<String>,
    pub cancel: Vec<String>,
    pub next_field: Vec<String>,
    pub prev_field: Vec<String>,
    pub clear: Vec<String>,
}

impl Default for FormBindings {
    fn default() -> Self {
        Self {
            submit: vec!["enter".to_string()],
            cancel: vec!["esc".to_string()],
            next_field: vec!["tab".to_string(), "down".to_string()],
            prev_field: vec!["backtab".to_string(), "up".to_string()],
            clear: vec!["ctrl+l".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PopupBindings {
    pub confirm: Vec<String>,
    pub cancel: Vec<String>,
}

impl Default for PopupBindings {
    fn default() -> Self {
        Self {
            confirm: vec!["enter".to_string(), "y".to_string()],
            cancel: vec!["esc".to_string(), "n".to_string()],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Theme {
    pub border: String,
    pub border_focus: String,
    pub accent: String,
    pub muted: String,
    pub today: String,
    pub selection_bg: String,
    pub dimmed: String,
    pub event: String,
    pub alert: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: "Reset".to_string(),
            border_focus: "Green".to_string(),
            accent: "Cyan".to_string(),
            muted: "DarkGray".to_string(),
            today: "Yellow".to_string(),
            selection_bg: "50,50,50".to_string(),
            dimmed: "DarkGray".to_string(),
            event: "LightBlue".to_string(),
            alert: "LightRed".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let config_path = config_path();

        let mut config = if let Ok(content) = fs::read_to_string(&config_path) {
            match toml::from_str::<Config>(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(path = ?config_path, error = %e, "failed to parse config, using defaults");
                    Config::default()
                }
            }
        } else {
            Config::default()
        };

        let changed = config.normalize_paths();

        if (changed || !config_path.exists())
            && let Err(e) = config.save_to_path(&config_path)
        {
            tracing::warn!(path = ?config_path, error = %e, "could not write config");
        }

        config
    }

    pub fn save_to_path(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self).unwrap_or_default();
        fs::write(path, content)
    }

    fn normalize_paths(&mut self) -> bool {
        let mut changed = false;

        if self.data.storage_dir.as_os_str().is_empty() {
            self.data.storage_dir = default_storage_dir();
            changed = true;
        }

        if self.data.storage_dir.is_relative() {
            self.data.storage_dir = default_data_dir().join(&self.data.storage_dir);
            changed = true;
        }

        changed
    }
}
