use crate::cli::{Cli, CliCommand};
use crate::config::Config;
use crate::provider::ProviderSettings;
use crate::source::ReferencePoint;

/// Command line options merged over the workspace config file.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command: CliCommand,
    pub reference: Option<ReferencePoint>,
    pub color: bool,
    pub settings: ProviderSettings,
}

impl RuntimeConfig {
    pub fn new(cli: Cli, config: Config) -> Self {
        let reference = cli
            .reference
            .map(ReferencePoint::new)
            .filter(|reference| !reference.is_empty())
            .or(config.reference);

        Self {
            command: cli.command.unwrap_or_default(),
            reference,
            color: supports_color::on(supports_color::Stream::Stdout).is_some(),
            settings: ProviderSettings {
                fallback_reference: config.fallback_reference,
                sort: cli.sort || config.sort,
                overlap: config.overlapping_paths,
                refresh_policy: config.refresh_policy,
            },
        }
    }
}
