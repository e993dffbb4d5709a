//! Source-annotated display for `config show`.

use std::fmt::{self, Write as _};

use crate::merge::FieldSources;
use crate::types::Config;

/// A resolved configuration together with where each value came from.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The final merged configuration.
    pub config: Config,
    /// Dotted field path to the layer that set it.
    pub field_sources: FieldSources,
    /// Config files that were loaded, in precedence order.
    pub loaded_files: Vec<String>,
}

/// Output format for `config show`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowFormat {
    /// TOML with inline comments naming the source layer.
    Toml,
    /// JSON.
    Json,
}

impl ResolvedConfig {
    /// Wrap a configuration that was not loaded through layering.
    #[must_use]
    pub fn unlayered(config: Config) -> Self {
        Self {
            config,
            field_sources: FieldSources::new(),
            loaded_files: Vec::new(),
        }
    }

    /// Render the configuration, optionally limited to one section.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the section does not exist.
    pub fn show(&self, format: ShowFormat, section: Option<&str>) -> Result<String, fmt::Error> {
        match format {
            ShowFormat::Toml => self.show_toml(section),
            ShowFormat::Json => self.show_json(section),
        }
    }

    fn section_value(&self, section: &str) -> Result<toml::Value, fmt::Error> {
        let val = toml::Value::try_from(&self.config).map_err(|_| fmt::Error)?;
        val.as_table()
            .and_then(|t| t.get(section))
            .cloned()
            .ok_or(fmt::Error)
    }

    fn show_toml(&self, section: Option<&str>) -> Result<String, fmt::Error> {
        let toml_str = match section {
            Some(name) => toml::to_string_pretty(&self.section_value(name)?).map_err(|_| fmt::Error)?,
            None => toml::to_string_pretty(&self.config).map_err(|_| fmt::Error)?,
        };

        let mut output = String::new();
        output.push_str("# Resolved Easel Configuration\n");
        output.push_str("# Source annotations: [defaults] [user] [project] [env]\n");

        if !self.loaded_files.is_empty() {
            output.push_str("#\n# Loaded files (in precedence order):\n");
            for (i, path) in self.loaded_files.iter().enumerate() {
                writeln!(output, "#   {}. {path}", i.saturating_add(1))?;
            }
        }
        output.push('\n');

        let mut table = section.unwrap_or("").to_owned();
        for line in toml_str.lines() {
            let trimmed = line.trim();
            if let Some(header) = trimmed.strip_prefix('[').and_then(|h| h.strip_suffix(']')) {
                table = header.to_owned();
            }
            if let Some(annotation) = self.annotate_line(trimmed, &table) {
                writeln!(output, "{line}  # {annotation}")?;
            } else {
                output.push_str(line);
                output.push('\n');
            }
        }

        Ok(output)
    }

    fn show_json(&self, section: Option<&str>) -> Result<String, fmt::Error> {
        match section {
            Some(name) => serde_json::to_string_pretty(&self.section_value(name)?),
            None => serde_json::to_string_pretty(&self.config),
        }
        .map_err(|_| fmt::Error)
    }

    fn annotate_line(&self, trimmed: &str, table: &str) -> Option<String> {
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            return None;
        }
        let key = trimmed.split('=').next()?.trim();
        let path = if table.is_empty() {
            key.to_owned()
        } else {
            format!("{table}.{key}")
        };
        self.field_sources.get(&path).map(|layer| format!("[{layer}]"))
    }

    /// Config file paths checked during loading.
    #[must_use]
    pub fn config_paths(home_dir: Option<&str>, project_root: Option<&str>) -> Vec<String> {
        vec![
            home_dir.map_or_else(
                || "~/.easel/config.toml".to_owned(),
                |home| format!("{home}/.easel/config.toml"),
            ),
            project_root.map_or_else(
                || "{project}/.easel/config.toml".to_owned(),
                |root| format!("{root}/.easel/config.toml"),
            ),
        ]
    }
}
