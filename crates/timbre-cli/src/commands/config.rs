use anyhow::{Context, Result};
use timbre_etl::{config, Config};

/// Top-level keys that `config set` can change.
const SETTABLE_KEYS: &[&str] = &["database_path", "top_n", "log_level"];

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!("  database_path: {}", config.database_path.display());
    println!("  top_n: {}", config.top_n);
    println!("  log_level: {}", config.log_level);
    println!("  columns.id: {}", config.columns.id);
    println!("  columns.title: {}", config.columns.title);
    println!("  columns.genres: {}", config.columns.genres);
    println!("  columns.artist: {}", config.columns.artist);
    println!("  columns.cluster_id: {}", config.columns.cluster_id);
    println!("  columns.cluster_name: {}", config.columns.cluster_name);
    println!("  columns.ignore: {:?}", config.columns.ignore);

    println!("\nPriority: CLI args > ENV vars (TIMBRE_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        // No key provided, show entire config file contents
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'timbre config init' to create it.");
        }
        return Ok(());
    };

    let value = match key.as_str() {
        "database_path" => config.database_path.display().to_string(),
        "top_n" => config.top_n.to_string(),
        "log_level" => config.log_level.clone(),
        "columns.id" => config.columns.id.clone(),
        "columns.title" => config.columns.title.clone(),
        "columns.genres" => config.columns.genres.clone(),
        "columns.artist" => config.columns.artist.clone(),
        "columns.cluster_id" => config.columns.cluster_id.clone(),
        "columns.cluster_name" => config.columns.cluster_name.clone(),
        "columns.ignore" => config.columns.ignore.join(","),
        _ => {
            anyhow::bail!(
                "Unknown config key: {}\n\nValid keys: {}, columns.*",
                key,
                SETTABLE_KEYS.join(", ")
            );
        }
    };
    println!("{}", value);

    Ok(())
}

/// Set a config value.
pub fn set_config(key: String, value: String) -> Result<()> {
    let literal = value_literal(&key, value)?;

    let config_path = config::config_file_path();

    // Ensure config file exists
    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = set_top_level_key(&contents, &key, &literal);

    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, literal);
    println!("  in {}", config_path.display());

    Ok(())
}

/// The TOML literal to write for `key`.
fn value_literal(key: &str, value: String) -> Result<String> {
    match key {
        "top_n" => {
            let n: usize = value
                .parse()
                .with_context(|| format!("top_n must be a non-negative integer, got {value:?}"))?;
            Ok(n.to_string())
        }
        "database_path" | "log_level" => Ok(toml::Value::String(value).to_string()),
        _ => {
            anyhow::bail!(
                "Unknown config key: {}\n\nValid keys: {}\nEdit the [columns] table in the config file directly.",
                key,
                SETTABLE_KEYS.join(", ")
            );
        }
    }
}

/// Replace the uncommented `key = ...` line before the first table header,
/// or insert one there if the key is not set.
fn set_top_level_key(contents: &str, key: &str, literal: &str) -> String {
    let new_line = format!("{} = {}", key, literal);
    let mut lines: Vec<String> = Vec::new();
    let mut done = false;
    let mut in_table = false;

    for line in contents.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') && !in_table {
            in_table = true;
            if !done {
                lines.push(new_line.clone());
                lines.push(String::new());
                done = true;
            }
        }

        let is_key_line = !in_table
            && trimmed
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='));
        if is_key_line && !done {
            lines.push(new_line.clone());
            done = true;
        } else if !is_key_line {
            lines.push(line.to_string());
        }
    }

    if !done {
        lines.push(new_line);
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    let config_path = config::config_file_path();
    println!("{}", config_path.display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure timbre.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_values_are_valid_toml() {
        let value = "C:\\music\t\"db\" \u{1}é.db";
        let literal = value_literal("database_path", value.to_string()).unwrap();
        let table: toml::Table = toml::from_str(&format!("database_path = {literal}")).unwrap();
        assert_eq!(table["database_path"].as_str(), Some(value));
    }

    #[test]
    fn test_top_n_literal() {
        assert_eq!(value_literal("top_n", "8".into()).unwrap(), "8");
        assert!(value_literal("top_n", "-1".into()).is_err());
        assert!(value_literal("columns.title", "x".into()).is_err());
    }

    #[test]
    fn test_set_replaces_existing_key() {
        let contents = "top_n = 5\nlog_level = \"info\"\n";
        let updated = set_top_level_key(contents, "top_n", "8");
        assert_eq!(updated, "top_n = 8\nlog_level = \"info\"\n");
    }

    #[test]
    fn test_set_ignores_commented_and_similar_keys() {
        let contents = "#top_n = 3\ntop_nn = 1\n";
        let updated = set_top_level_key(contents, "top_n", "8");
        assert_eq!(updated, "#top_n = 3\ntop_nn = 1\ntop_n = 8\n");
    }

    #[test]
    fn test_set_inserts_before_first_table() {
        let contents = "top_n = 5\n\n[columns]\ntitle = \"track\"\n";
        let updated = set_top_level_key(contents, "log_level", "\"debug\"");
        assert_eq!(
            updated,
            "top_n = 5\n\nlog_level = \"debug\"\n\n[columns]\ntitle = \"track\"\n"
        );
    }

    #[test]
    fn test_set_does_not_touch_table_keys() {
        let contents = "[columns]\ntop_n = \"not this one\"\n";
        let updated = set_top_level_key(contents, "top_n", "3");
        assert_eq!(updated, "top_n = 3\n\n[columns]\ntop_n = \"not this one\"\n");
    }

    #[test]
    fn test_set_on_example_config_round_trips() {
        let updated = set_top_level_key(config::example_config(), "top_n", "9");
        assert!(updated.contains("\ntop_n = 9\n"));
        assert!(!updated.contains("top_n = 5"));
    }
}
