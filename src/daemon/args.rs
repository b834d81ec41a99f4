use std::path::PathBuf;

use clap::Args;
use tracing::level_filters::LevelFilter;

use crate::key_source::SourceKind;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(
        long,
        help = "Application directory for logs and settings. By default $XDG_STATE_HOME/keyrace or $HOME/.local/state/keyrace"
    )]
    pub dir: Option<PathBuf>,
    #[arg(long = "counts-dir", help = "Directory for the count files. By default $HOME")]
    pub counts_dir: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = SourceKind::Stdin, help = "Where key presses come from")]
    pub source: SourceKind,
    /// This option is for debugging purposes only.
    #[arg(long = "log-console")]
    pub log_console: bool,
    #[arg(long = "log-filter")]
    pub log: Option<LevelFilter>,
}

impl ServeArgs {
    /// Arguments that recreate these options for a `serve` started in another process.
    pub fn to_command_args(&self) -> Vec<String> {
        let mut args = vec!["serve".to_owned()];
        if let Some(dir) = &self.dir {
            args.extend(["--dir".into(), dir.display().to_string()]);
        }
        if let Some(counts_dir) = &self.counts_dir {
            args.extend(["--counts-dir".into(), counts_dir.display().to_string()]);
        }
        args.extend(["--source".into(), self.source.as_arg().into()]);
        if let Some(log) = self.log {
            args.extend(["--log-filter".into(), log.to_string()]);
        }
        args
    }
}
