// SPDX-License-Identifier: MIT OR Apache-2.0
//! Patch Editor - standalone window for the patch editing canvas
//!
//! Opens a single window showing a demo patch that can be panned, zoomed and
//! edited. An optional RON config file is read from the first command-line
//! argument or the `PATCH_EDITOR_CONFIG` environment variable.

mod app;
mod demo;

use app::PatchEditorApp;
use patch_editor_graph::EditorConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable naming the config file
const CONFIG_ENV: &str = "PATCH_EDITOR_CONFIG";

const DEFAULT_LOG_FILTER: &str = "patch_editor_app=debug,patch_editor_graph=debug,wgpu=warn,naga=warn";

fn config_path(arg: Option<String>, env: Option<String>) -> Option<PathBuf> {
    arg.or(env).filter(|p| !p.is_empty()).map(PathBuf::from)
}

fn load_config(path: Option<&Path>) -> EditorConfig {
    let Some(path) = path else {
        tracing::debug!("No config file given, using defaults");
        return EditorConfig::default();
    };

    match EditorConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config {}: {e}", path.display());
            EditorConfig::default()
        }
    }
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Patch Editor v{}", env!("CARGO_PKG_VERSION"));

    let path = config_path(std::env::args().nth(1), std::env::var(CONFIG_ENV).ok());
    let config = load_config(path.as_deref());

    if let Err(e) = PatchEditorApp::run(config) {
        tracing::error!("Patch editor crashed: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_prefers_argument() {
        assert_eq!(
            config_path(Some("a.ron".into()), Some("b.ron".into())),
            Some(PathBuf::from("a.ron"))
        );
        assert_eq!(config_path(None, Some("b.ron".into())), Some(PathBuf::from("b.ron")));
        assert_eq!(config_path(None, Some(String::new())), None);
        assert_eq!(config_path(None, None), None);
    }

    #[test]
    fn test_missing_config_falls_back() {
        let config = load_config(Some(Path::new("/nonexistent/patch_editor.ron")));
        assert_eq!(config, EditorConfig::default());
        assert_eq!(load_config(None), EditorConfig::default());
    }

    #[test]
    fn test_default_log_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }
}
