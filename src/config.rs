use std::collections::BTreeMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AppError, AppResult};

pub const LOCAL_CONFIG_FILE: &str = ".jira-config";
const APP_DIR_NAME: &str = "workon";
const GLOBAL_CONFIG_FILE: &str = "config.toml";
const DEFAULT_SECTION: &str = "DEFAULT";
const DEFAULT_PROFILE_KEY: &str = "default_profile";

pub const URL_VAR: &str = "JIRA_URL";
pub const EMAIL_VAR: &str = "JIRA_EMAIL";
pub const TOKEN_VAR: &str = "JIRA_API_TOKEN";
pub const PROJECT_VAR: &str = "JIRA_PROJECT";

/// One named section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

/// On-disk syntax of a config file, chosen by its file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `.jira-config`: unquoted `key = value` lines under `[profile]` headers,
    /// with the default pointer kept in `[DEFAULT]`.
    Ini,
    /// `config.toml`: a top-level `default_profile` and one table per profile.
    Toml,
}

impl ConfigFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::Toml,
            _ => Self::Ini,
        }
    }
}

/// Profile-sectioned config file:
///
/// ```ini
/// [DEFAULT]
/// default_profile = work
///
/// [work]
/// url = https://company.atlassian.net
/// email = me@company.com
/// token = ...
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,
    #[serde(flatten)]
    pub profiles: BTreeMap<String, Profile>,
}

impl ConfigFile {
    pub fn parse(contents: &str, format: ConfigFormat) -> AppResult<Self> {
        match format {
            ConfigFormat::Ini => Self::from_ini(contents),
            ConfigFormat::Toml => {
                let mut file: Self = toml::from_str(contents).map_err(|err| {
                    AppError::Configuration(format!("invalid config file: {err}"))
                })?;
                file.profiles.remove(DEFAULT_SECTION);
                Ok(file)
            }
        }
    }

    fn from_ini(contents: &str) -> AppResult<Self> {
        let ini = Ini::load_from_str(contents)
            .map_err(|err| AppError::Configuration(format!("invalid config file: {err}")))?;

        let mut file = Self::default();
        for (section, properties) in ini.iter() {
            match section {
                None | Some(DEFAULT_SECTION) => {
                    if let Some(name) = properties.get(DEFAULT_PROFILE_KEY) {
                        file.default_profile = Some(name.to_string());
                    }
                }
                Some(name) => {
                    let field = |key: &str| properties.get(key).map(str::to_string);
                    file.profiles.insert(
                        name.to_string(),
                        Profile {
                            url: field("url"),
                            email: field("email"),
                            token: field("token"),
                            project: field("project"),
                        },
                    );
                }
            }
        }
        Ok(file)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        if let Some(name) = &self.default_profile {
            ini.set_to(
                Some(DEFAULT_SECTION),
                DEFAULT_PROFILE_KEY.to_string(),
                name.clone(),
            );
        }
        for (name, profile) in &self.profiles {
            let fields = [
                ("url", &profile.url),
                ("email", &profile.email),
                ("token", &profile.token),
                ("project", &profile.project),
            ];
            for (key, value) in fields {
                if let Some(value) = value {
                    ini.set_to(Some(name.as_str()), key.to_string(), value.clone());
                }
            }
        }
        ini
    }

    pub fn load(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents, ConfigFormat::for_path(path))
    }

    pub fn save(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        match ConfigFormat::for_path(path) {
            ConfigFormat::Ini => self.to_ini().write_to_file(path)?,
            ConfigFormat::Toml => {
                let data = toml::to_string_pretty(self).map_err(|err| {
                    AppError::Configuration(format!("failed to write config: {err}"))
                })?;
                fs::write(path, data)?;
            }
        }
        Ok(())
    }

    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles
            .keys()
            .map(String::as_str)
            .filter(|name| *name != DEFAULT_SECTION)
            .collect()
    }

    /// The explicitly requested profile, else the file's default pointer.
    pub fn selected_profile_name<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        requested.or(self.default_profile.as_deref())
    }
}

#[derive(Debug, Clone)]
pub struct LocatedConfig {
    pub path: PathBuf,
    pub file: ConfigFile,
}

pub fn config_directory() -> AppResult<PathBuf> {
    let home = env::var("HOME")
        .map_err(|_| AppError::Configuration("HOME environment variable not set".to_string()))?;
    Ok(PathBuf::from(home).join(".config").join(APP_DIR_NAME))
}

/// Candidate config files, most specific first.
pub fn config_candidates(workspace_root: &Path) -> Vec<PathBuf> {
    let mut candidates = vec![workspace_root.join(LOCAL_CONFIG_FILE)];
    if let Ok(dir) = config_directory() {
        candidates.push(dir.join(GLOBAL_CONFIG_FILE));
    }
    candidates
}

/// The config file that would be read, or the local file when none exists yet.
pub fn config_file_path(workspace_root: &Path) -> PathBuf {
    config_candidates(workspace_root)
        .into_iter()
        .find(|path| path.is_file())
        .unwrap_or_else(|| workspace_root.join(LOCAL_CONFIG_FILE))
}

pub fn discover(workspace_root: &Path) -> AppResult<Option<LocatedConfig>> {
    for path in config_candidates(workspace_root) {
        if path.is_file() {
            debug!(path = %path.display(), "loading config file");
            let file = ConfigFile::load(&path)?;
            return Ok(Some(LocatedConfig { path, file }));
        }
    }
    debug!("no config file found, using environment only");
    Ok(None)
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub url: String,
    pub email: String,
    pub token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("email", &self.email)
            .field("token", &"***")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub profile: Option<String>,
    pub default_project: Option<String>,
    pub source: Option<PathBuf>,
    pub workspace_root: PathBuf,
}

impl AppConfig {
    pub fn load(workspace_root: &Path, profile: Option<&str>) -> AppResult<Self> {
        let located = discover(workspace_root)?;
        Self::resolve(workspace_root, located, profile, |name| env::var(name).ok())
    }

    /// Where the Jira email and token were expected to come from, for auth errors.
    pub fn credentials_hint(&self) -> String {
        match (&self.profile, &self.source) {
            (Some(name), Some(path)) => format!(
                "the email and token of profile '{name}' in {}, or {EMAIL_VAR} and {TOKEN_VAR}",
                path.display()
            ),
            _ => format!("{EMAIL_VAR} and {TOKEN_VAR}"),
        }
    }

    fn resolve(
        workspace_root: &Path,
        located: Option<LocatedConfig>,
        requested: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> AppResult<Self> {
        let mut selected = Profile::default();
        let mut profile_name = None;

        match &located {
            Some(located) => {
                if let Some(name) = located.file.selected_profile_name(requested) {
                    match located.file.profiles.get(name) {
                        Some(profile) => {
                            selected = profile.clone();
                            profile_name = Some(name.to_string());
                        }
                        None => eprintln!(
                            "Warning: profile '{name}' not found in {}; using environment variables.",
                            located.path.display()
                        ),
                    }
                }
            }
            None => {
                if let Some(name) = requested {
                    eprintln!(
                        "Warning: no config file found for profile '{name}'; using environment variables."
                    );
                }
            }
        }

        let pick = |value: Option<String>, var: &str| {
            non_empty(value).or_else(|| non_empty(lookup(var)))
        };
        let url = pick(selected.url, URL_VAR);
        let email = pick(selected.email, EMAIL_VAR);
        let token = pick(selected.token, TOKEN_VAR);
        let default_project = pick(selected.project, PROJECT_VAR);

        match (url, email, token) {
            (Some(url), Some(email), Some(token)) => Ok(Self {
                credentials: Credentials { url, email, token },
                profile: profile_name,
                default_project,
                source: located.map(|located| located.path),
                workspace_root: workspace_root.to_path_buf(),
            }),
            (url, email, token) => {
                let missing = [
                    ("url", url.is_none()),
                    ("email", email.is_none()),
                    ("token", token.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, is_missing)| is_missing.then_some(field))
                .collect::<Vec<_>>();
                Err(AppError::Configuration(format!(
                    "missing {} in configuration; set it in {LOCAL_CONFIG_FILE} or via {URL_VAR}, {EMAIL_VAR}, {TOKEN_VAR}",
                    missing.join(", ")
                )))
            }
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
