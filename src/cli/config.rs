//! `chatlog config` command
//!
//! Get or set configuration values.
//!
//! # Usage
//! ```bash
//! chatlog config                              # Show config file
//! chatlog config service.url                  # Get value
//! chatlog config service.url http://host:8000 # Set value
//! chatlog config --list                       # Effective config
//! chatlog config --path
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use toml_edit::{value, DocumentMut};

use crate::config::{Config, CONFIG_DIR};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Config key (e.g., history.dir, service.url)
    pub key: Option<String>,

    /// Value to set
    pub value: Option<String>,

    /// Print the effective configuration (file values over defaults)
    #[arg(long)]
    pub list: bool,

    /// Show config file paths
    #[arg(long)]
    pub path: bool,

    /// Use global config (~/.chatlog/config.toml) instead of local
    #[arg(short, long)]
    pub global: bool,
}

fn config_path(global: bool) -> Result<PathBuf> {
    if global {
        Config::global_config_path().context("Cannot determine home directory")
    } else {
        Ok(Config::find_local_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("config.toml")))
    }
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let path = config_path(args.global)?;

    if args.path {
        if let Some(global) = Config::global_config_path() {
            println!("Global: {}", global.display());
        }
        println!("Local:  {}", config_path(false)?.display());
        if path.exists() {
            println!("✓ Active: {}", path.display());
        }
        return Ok(());
    }

    if args.list {
        let config = Config::load()?;
        print!("{}", toml::to_string_pretty(&config)?);
        println!("# history directory: {}", config.history_dir().display());
        return Ok(());
    }

    match (args.key, args.value) {
        (Some(key), Some(val)) => {
            set_value(&path, &key, &val)?;
            println!("✅ Set {} = {} (in {})", key, val, path.display());
        }
        (Some(key), None) => match get_value(&path, &key)? {
            Some(v) => println!("{}", v),
            None => println!("(not set)"),
        },
        _ => {
            if path.exists() {
                println!("{}", fs::read_to_string(&path)?);
            } else {
                println!("📋 No config file at {}", path.display());
                println!("Create one with: chatlog init");
            }
        }
    }
    Ok(())
}

/// Set `section.key`, keeping comments and layout of the file
fn set_value(path: &Path, key: &str, raw: &str) -> Result<()> {
    let (section, field) = split_key(key)?;

    let content = if path.exists() {
        fs::read_to_string(path)?
    } else {
        String::new()
    };
    let mut doc: DocumentMut = content.parse().context("Failed to parse config.toml")?;

    if doc.get(section).is_none() {
        doc[section] = toml_edit::table();
    }
    doc[section][field] = value(typed_value(raw));

    // reject values the loader would choke on
    toml::from_str::<Config>(&doc.to_string())
        .with_context(|| format!("Invalid value for {}: {}", key, raw))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, doc.to_string())?;
    Ok(())
}

fn get_value(path: &Path, key: &str) -> Result<Option<String>> {
    let (section, field) = split_key(key)?;
    if !path.exists() {
        return Ok(None);
    }

    let doc: toml::Value = fs::read_to_string(path)?
        .parse()
        .context("Failed to parse config.toml")?;

    Ok(doc.get(section).and_then(|t| t.get(field)).map(|v| match v {
        toml::Value::String(s) => s.clone(),
        other => other.to_string(),
    }))
}

fn split_key(key: &str) -> Result<(&str, &str)> {
    match key.split_once('.') {
        Some((section, field)) if !section.is_empty() && !field.is_empty() && !field.contains('.') => {
            Ok((section, field))
        }
        _ => bail!("Config keys look like section.key (e.g. service.url), got: {}", key),
    }
}

fn typed_value(s: &str) -> toml_edit::Value {
    if let Ok(b) = s.parse::<bool>() {
        return b.into();
    }
    if let Ok(i) = s.parse::<i64>() {
        return i.into();
    }
    s.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_then_get() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("config.toml");

        set_value(&path, "service.url", "http://localhost:8000")?;
        set_value(&path, "service.timeout_secs", "60")?;

        assert_eq!(
            get_value(&path, "service.url")?.as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(get_value(&path, "service.timeout_secs")?.as_deref(), Some("60"));
        assert_eq!(get_value(&path, "history.dir")?, None);

        let config = Config::load_from(&path)?;
        assert_eq!(config.service.timeout_secs, 60);
        Ok(())
    }

    #[test]
    fn test_set_preserves_comments() -> Result<()> {
        let tmp = tempdir()?;
        let path = tmp.path().join("config.toml");
        fs::write(&path, "# mine\n[history]\nquestion_marker = \"Q\"\n")?;

        set_value(&path, "history.answer_marker", "A")?;
        let content = fs::read_to_string(&path)?;
        assert!(content.contains("# mine"));
        assert_eq!(Config::load_from(&path)?.markers().answer, "A");
        Ok(())
    }

    #[test]
    fn test_rejects_bad_keys_and_types() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("config.toml");

        assert!(set_value(&path, "url", "x").is_err());
        assert!(set_value(&path, "service.url.extra", "x").is_err());
        assert!(set_value(&path, "service.timeout_secs", "soon").is_err());
        assert!(!path.exists());
    }
}
