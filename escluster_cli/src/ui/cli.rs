use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use escluster_core::{
    load, save, ConfigurationRegistry, CredentialFailure, CredentialStore, Credentials,
    MemoryCredentialStore, Profile, RefreshMode, RestoreReport, SettingsStore, ViewMode,
};
use escluster_storage::{JsonSettingsStore, KeyringCredentialStore};
use log::{info, warn};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "escluster", version, subcommand_required = true)]
pub struct Args {
    /// Settings file to use instead of the per-user default
    #[arg(long, env = "ESCLUSTER_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Keep credentials in memory only; the OS keyring is never touched
    #[arg(long, global = true)]
    pub ephemeral_credentials: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a cluster profile, replacing any profile with the same label
    Add {
        label: String,
        url: String,
        /// Username for cluster authentication
        #[arg(long, requires = "password")]
        username: Option<String>,
        /// Password for cluster authentication
        #[arg(long, requires = "username")]
        password: Option<String>,
    },
    /// Remove a cluster profile (no error if it does not exist)
    Remove { label: String },
    /// List all profiles, sorted by label
    List,
    /// Show one profile
    Show { label: String },
    /// Show or change global preferences
    Prefs {
        /// DISABLED, EVERY_5_SECONDS, EVERY_10_SECONDS, EVERY_30_SECONDS, EVERY_60_SECONDS
        #[arg(long)]
        refresh: Option<RefreshMode>,
        /// TEXT or TABLE
        #[arg(long)]
        view: Option<ViewMode>,
    },
}

pub async fn run_cli(args: Args) -> anyhow::Result<()> {
    let settings: Arc<dyn SettingsStore> = match args.settings {
        Some(path) => Arc::new(JsonSettingsStore::at(path)),
        None => Arc::new(JsonSettingsStore::new()?),
    };
    let credentials: Arc<dyn CredentialStore> = if args.ephemeral_credentials {
        Arc::new(MemoryCredentialStore::new())
    } else {
        Arc::new(KeyringCredentialStore::new())
    };

    // Keyring and file access block, keep them off the async workers.
    let (registry, report) = {
        let settings = Arc::clone(&settings);
        let credentials = Arc::clone(&credentials);
        tokio::task::spawn_blocking(move || load(settings.as_ref(), credentials.as_ref()))
            .await?
            .context("loading settings")?
    };
    log_restore_report(&report);

    if !apply(&registry, args.command)? {
        return Ok(());
    }

    let failures = {
        let registry = registry.clone();
        tokio::task::spawn_blocking(move || {
            save(&registry, settings.as_ref(), credentials.as_ref())
        })
        .await?
        .context("saving settings")?
    };
    log_credential_failures(&failures);
    info!("Saved {} profiles", registry.len());
    Ok(())
}

/// Apply one command. Returns whether the registry needs saving.
fn apply(registry: &ConfigurationRegistry, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Add {
            label,
            url,
            username,
            password,
        } => {
            let mut profile = Profile::new(label, url);
            if let (Some(username), Some(password)) = (username, password) {
                profile = profile.with_credentials(Credentials::new(username, password));
            }
            info!("Storing profile '{}'", profile.label);
            registry.put(profile);
            Ok(true)
        }
        Command::Remove { label } => {
            if registry.remove(&label).is_none() {
                info!("No profile named '{}'", label);
            }
            Ok(true)
        }
        Command::List => {
            print_profiles(&registry.list(), registry.view_mode());
            Ok(false)
        }
        Command::Show { label } => {
            let Some(profile) = registry.get(&label) else {
                bail!("no profile named '{label}'");
            };
            println!("label:    {}", profile.label);
            println!("url:      {}", profile.url);
            println!("username: {}", username_of(&profile));
            Ok(false)
        }
        Command::Prefs { refresh, view } => {
            if let Some(mode) = refresh {
                registry.set_refresh_mode(mode);
            }
            if let Some(mode) = view {
                registry.set_view_mode(mode);
            }
            println!("refresh: {}", registry.refresh_mode());
            println!("view:    {}", registry.view_mode());
            Ok(refresh.is_some() || view.is_some())
        }
    }
}

fn username_of(profile: &Profile) -> &str {
    profile
        .credentials
        .as_ref()
        .map_or("-", |c| c.username.as_str())
}

fn print_profiles(profiles: &[Profile], view: ViewMode) {
    match view {
        ViewMode::Text => {
            for p in profiles {
                match &p.credentials {
                    Some(c) => println!("{} {} (as {})", p.label, p.url, c.username),
                    None => println!("{} {}", p.label, p.url),
                }
            }
        }
        ViewMode::Table => {
            let label_w = profiles.iter().map(|p| p.label.len()).max().unwrap_or(0).max(5);
            let url_w = profiles.iter().map(|p| p.url.len()).max().unwrap_or(0).max(3);
            println!("{:<label_w$}  {:<url_w$}  USER", "LABEL", "URL");
            for p in profiles {
                println!(
                    "{:<label_w$}  {:<url_w$}  {}",
                    p.label,
                    p.url,
                    username_of(p)
                );
            }
        }
    }
}

fn log_restore_report(report: &RestoreReport) {
    for entry in &report.malformed {
        warn!("Skipped saved profile '{}': {}", entry.label, entry.reason);
    }
    log_credential_failures(&report.unavailable);
}

fn log_credential_failures(failures: &[CredentialFailure]) {
    for failure in failures {
        warn!(
            "Credential {:?} failed for '{}': {}",
            failure.operation, failure.label, failure.error
        );
    }
}
