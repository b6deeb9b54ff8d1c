use std::path::PathBuf;

use crate::cli::OutputFormat;
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::Result;
use crate::import::Dissector;
use crate::session::Session;

pub struct AppContext {
    pub config_path: PathBuf,
    pub config: Config,
    pub output_format: OutputFormat,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let project_root = std::env::current_dir()?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| default_config_path(&project_root));
        let config = Config::load(cli.config.as_deref(), &project_root)?;

        let output_format = cli
            .format_override()
            .unwrap_or_else(|| config.robot.output_format());

        Ok(Self {
            config_path,
            config,
            output_format,
        })
    }

    /// A dissector tuned by the `[segmenter]` section.
    #[must_use]
    pub fn dissector(&self) -> Dissector {
        Dissector::with_config(self.config.segmenter.clone())
    }

    /// A fresh session tuned by the `[session]` section.
    #[must_use]
    pub fn session(&self, original_text: impl Into<String>) -> Session {
        Session::with_config(original_text, &self.config.session)
    }

    #[must_use]
    pub fn is_robot(&self) -> bool {
        self.output_format != OutputFormat::Human
    }
}

fn default_config_path(project_root: &std::path::Path) -> PathBuf {
    let project = project_root.join(PROJECT_CONFIG_FILE);
    if project.exists() {
        project
    } else {
        Config::global_path().unwrap_or(project)
    }
}
