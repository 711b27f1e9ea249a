use std::io::{self, Write};

use snafu::prelude::*;
use tracing::{debug, info, warn};

use crate::application::RuntimeConfig;
use crate::cli::{Cli, CliCommand};
use crate::config::{Config, ConfigError};
use crate::ext::WorkspacePathExt;
use crate::provider::{BranchDiffProvider, ProviderError};
use crate::render::{RenderOptions, render_children, render_reference_choices, render_tree};
use crate::source::GitSource;
use crate::watch::{WatchError, WorkspaceWatcher, watch_tree};

pub struct Application;

impl Application {
    pub async fn run(cli: Cli) -> Result<(), ApplicationError> {
        let source = match GitSource::discover(&cli.root).await {
            Ok(source) => source,
            Err(err) => {
                warn!(
                    "Could not locate the repository of {}: {}",
                    cli.root.best_effort_display(),
                    err
                );
                GitSource::new(&cli.root)
            }
        };
        let workspace_root = source.workspace_root().to_path_buf();

        let config = Config::read(&workspace_root).await.context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", config);

        let runtime_config = RuntimeConfig::new(cli, config);
        let provider = BranchDiffProvider::connect(
            source,
            &workspace_root,
            runtime_config.settings.clone(),
            runtime_config.reference.clone(),
        )
        .await;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        let options = RenderOptions {
            color: runtime_config.color,
            absolute: false,
        };

        match &runtime_config.command {
            CliCommand::Tree { absolute } => {
                let options = RenderOptions {
                    absolute: *absolute,
                    ..options
                };
                let files = render_tree(&provider, &mut out, options)
                    .await
                    .context(OutputSnafu)?;
                info!("Rendered {} changed files", files);
            }
            CliCommand::Children { path } => {
                render_children(&provider, path, &mut out, options)
                    .await
                    .context(OutputSnafu)?;
            }
            CliCommand::Branches { select: None } => {
                let choices = provider
                    .reference_choices()
                    .await
                    .context(BranchListingSnafu)?;
                render_reference_choices(&choices, &mut out, options).context(OutputSnafu)?;
            }
            CliCommand::Branches { select: Some(name) } => {
                let choices = provider
                    .reference_choices()
                    .await
                    .context(BranchListingSnafu)?;
                let selected = choices
                    .iter()
                    .find(|choice| choice.branch_name() == name.as_str())
                    .is_some_and(|choice| provider.select_reference_point(&choice.label));
                ensure!(selected, ReferenceSelectionSnafu { name: name.clone() });

                render_tree(&provider, &mut out, options)
                    .await
                    .context(OutputSnafu)?;
            }
            CliCommand::Watch => {
                let mut watcher =
                    WorkspaceWatcher::new(provider.workspace_root()).context(WatchSnafu)?;
                let follow_head = runtime_config.reference.is_none();
                watch_tree(&provider, watcher.changes(), follow_head, &mut out, options)
                    .await
                    .context(OutputSnafu)?;
            }
        }

        out.flush().context(OutputSnafu)?;
        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: ConfigError },
    #[snafu(display("Failed to list reference points"))]
    BranchListingError { source: ProviderError },
    #[snafu(display(
        "'{}' is not a branch that can be compared against; see `branch-diff branches`",
        name
    ))]
    ReferenceSelectionError { name: String },
    #[snafu(display("Failed to watch the workspace"))]
    WatchError { source: WatchError },
    #[snafu(display("Failed to write output"))]
    OutputError { source: io::Error },
}
