//! papyrus_options: project configuration.
//!
//! Parses the project file that names a program's output, compiler flags,
//! import folders and scripts. Missing fields take the values an empty
//! project has.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What to do with the intermediate assembly the compiler produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssemblyMode {
    #[default]
    None,
    Keep,
    Only,
    Discard,
}

/// The folder scripts are collected from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderConfig {
    #[serde(default = "default_folder_path")]
    pub path: String,
    #[serde(default)]
    pub no_recurse: bool,
}

impl Default for FolderConfig {
    fn default() -> Self {
        Self {
            path: default_folder_path(),
            no_recurse: false,
        }
    }
}

fn default_folder_path() -> String {
    ".".to_string()
}

/// A project file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    /// Where the project was read from, when it came from a file.
    #[serde(skip)]
    pub file_path: Option<String>,
    pub output: Option<String>,
    /// The flags file passed to the compiler.
    pub flags: Option<String>,
    pub asm: AssemblyMode,
    pub optimize: bool,
    pub release: bool,
    #[serde(rename = "final")]
    pub final_: bool,
    /// Import folders, lowest precedence first.
    pub imports: Vec<String>,
    pub folder: FolderConfig,
    pub scripts: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read project file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse a project file from a string.
pub fn parse_project_config(content: &str) -> Result<ProjectConfig, ConfigError> {
    Ok(serde_json::from_str(content)?)
}

/// Parse a project file from a path.
pub fn parse_project_config_file(path: &str) -> Result<ProjectConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_string(),
        source,
    })?;
    let mut config = parse_project_config(&content)?;
    config.file_path = Some(path.to_string());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_project() {
        let config = parse_project_config("{}").unwrap();
        assert_eq!(config, ProjectConfig::default());
        assert_eq!(config.asm, AssemblyMode::None);
        assert_eq!(config.folder.path, ".");
        assert!(!config.folder.no_recurse);
        assert!(config.imports.is_empty());
    }

    #[test]
    fn test_full_project() {
        let config = parse_project_config(
            r#"{
                "output": "Scripts",
                "flags": "Institute_Papyrus_Flags.flg",
                "asm": "discard",
                "optimize": true,
                "release": true,
                "final": true,
                "imports": ["Base", "Mods/Shared"],
                "folder": { "path": "Source/User", "noRecurse": true },
                "scripts": ["Quests:Main"]
            }"#,
        )
        .unwrap();

        assert_eq!(config.output.as_deref(), Some("Scripts"));
        assert_eq!(config.flags.as_deref(), Some("Institute_Papyrus_Flags.flg"));
        assert_eq!(config.asm, AssemblyMode::Discard);
        assert!(config.optimize && config.release && config.final_);
        assert_eq!(config.imports, vec!["Base", "Mods/Shared"]);
        assert_eq!(config.folder.path, "Source/User");
        assert!(config.folder.no_recurse);
        assert_eq!(config.scripts, vec!["Quests:Main"]);
    }

    #[test]
    fn test_folder_path_defaults() {
        let config = parse_project_config(r#"{ "folder": { "noRecurse": true } }"#).unwrap();
        assert_eq!(config.folder.path, ".");
        assert!(config.folder.no_recurse);
    }

    #[test]
    fn test_invalid_assembly_mode() {
        let error = parse_project_config(r#"{ "asm": "sometimes" }"#).unwrap_err();
        assert!(matches!(error, ConfigError::Json(_)));
    }

    #[test]
    fn test_missing_file() {
        let error = parse_project_config_file("does/not/exist.json").unwrap_err();
        assert!(matches!(error, ConfigError::Io { .. }));
        assert!(error.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn test_serialize_uses_project_names() {
        let config = ProjectConfig {
            final_: true,
            ..ProjectConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""final":true"#));
        assert!(json.contains(r#""noRecurse":false"#));
        assert!(!json.contains("filePath"));
    }
}
