use std::env;
use std::io::{self, Write};
use std::path::Path;

use clap::{Args, Subcommand};

use crate::config::{
    ConfigFile, EMAIL_VAR, PROJECT_VAR, Profile, TOKEN_VAR, URL_VAR, config_file_path,
};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Create or update a profile interactively.
    Init {
        /// Profile section to edit.
        #[arg(short, long, default_value = "default")]
        profile: String,
    },
    /// Show a stored profile (token masked) and the environment fallbacks.
    Show {
        /// Profile to show; defaults to the file's default profile.
        #[arg(short, long)]
        profile: Option<String>,
    },
    /// List the profiles in the config file.
    Profiles,
}

pub fn run(command: ConfigCommand, workspace_root: &Path) -> AppResult<()> {
    match command {
        ConfigCommand::Init { profile } => run_init(workspace_root, &profile),
        ConfigCommand::Show { profile } => run_show(workspace_root, profile.as_deref()),
        ConfigCommand::Profiles => run_profiles(workspace_root),
    }
}

fn load_or_default(path: &Path) -> AppResult<ConfigFile> {
    if path.is_file() {
        ConfigFile::load(path)
    } else {
        Ok(ConfigFile::default())
    }
}

fn run_init(workspace_root: &Path, profile_name: &str) -> AppResult<()> {
    let path = config_file_path(workspace_root);
    let mut file = load_or_default(&path)?;
    let mut profile = file.profiles.get(profile_name).cloned().unwrap_or_default();

    println!("Configuring profile '{profile_name}' in {}.", path.display());
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("Secrets are stored in the config file; keep it out of version control.");
    println!();

    apply_prompt(
        "Jira base URL (e.g., https://company.atlassian.net)",
        &mut profile.url,
        false,
    )?;
    apply_prompt("Jira email", &mut profile.email, false)?;
    apply_prompt("Jira API token", &mut profile.token, true)?;
    apply_prompt("Default Jira project key", &mut profile.project, false)?;

    file.profiles.insert(profile_name.to_string(), profile);
    if file.default_profile.is_none() {
        file.default_profile = Some(profile_name.to_string());
    }
    file.save(&path)?;

    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show(workspace_root: &Path, requested: Option<&str>) -> AppResult<()> {
    let path = config_file_path(workspace_root);
    let file = load_or_default(&path)?;

    println!("Configuration file: {}", path.display());
    println!("Default profile: {}", display_value(&file.default_profile));

    match file.selected_profile_name(requested) {
        Some(name) => {
            let profile = file.profiles.get(name).cloned().unwrap_or_default();
            println!("\n[{name}]");
            print_profile(&profile);
        }
        None => println!("\nNo profile selected."),
    }

    println!("\nEnvironment fallbacks:");
    println!("{URL_VAR}: {}", display_value(&env::var(URL_VAR).ok()));
    println!("{EMAIL_VAR}: {}", display_value(&env::var(EMAIL_VAR).ok()));
    println!("{TOKEN_VAR}: {}", mask_secret(&env::var(TOKEN_VAR).ok()));
    println!("{PROJECT_VAR}: {}", display_value(&env::var(PROJECT_VAR).ok()));

    Ok(())
}

fn run_profiles(workspace_root: &Path) -> AppResult<()> {
    let path = config_file_path(workspace_root);
    let file = load_or_default(&path)?;
    let names = file.profile_names();

    if names.is_empty() {
        println!("No profiles configured.");
        println!("Create one with `workon config init` (writes {}).", path.display());
        return Ok(());
    }

    println!("Available Jira profiles:");
    for name in names {
        let marker = if file.default_profile.as_deref() == Some(name) {
            " (default)"
        } else {
            ""
        };
        println!("  {name}{marker}");
    }
    Ok(())
}

fn print_profile(profile: &Profile) {
    println!("  URL: {}", display_value(&profile.url));
    println!("  Email: {}", display_value(&profile.email));
    println!("  Token: {}", mask_secret(&profile.token));
    println!("  Project: {}", display_value(&profile.project));
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::parse(&input))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars = token.chars().collect::<Vec<_>>();
            let prefix = chars[..3].iter().collect::<String>();
            let suffix = chars[chars.len() - 3..].iter().collect::<String>();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}
