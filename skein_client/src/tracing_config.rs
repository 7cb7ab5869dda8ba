//! Builds the tracing subscriber described by a [`LoggingConfig`]

use crate::config::*;
use tracing::Subscriber;
use tracing_core::LevelFilter;
use tracing_subscriber::{filter::filter_fn, prelude::*, registry::LookupSpan, Layer};

use std::{io::Error as IoError, path::Path};

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Whether a module path is selected by a target's module list. An empty
/// list selects everything.
fn module_selected(modules: &[String], module_path: Option<&str>) -> bool {
    if modules.is_empty() {
        return true;
    }
    match module_path {
        Some(module) => modules.iter().any(|m| module.starts_with(m.as_str())),
        None => true,
    }
}

fn build_target<S>(conf: LogEntry, dir: impl AsRef<Path>) -> Result<BoxedLayer<S>, IoError>
where
    S: Subscriber + Send + Sync,
    for<'span> S: LookupSpan<'span>,
{
    let layer = match &conf.target {
        LogTarget::File { filename } => {
            std::fs::create_dir_all(dir.as_ref())?;
            tracing_subscriber::fmt::layer()
                .with_writer(tracing_appender::rolling::daily(dir, filename))
                .with_ansi(false)
                .boxed()
        }
        // Refused by ClientConfig::validate, since records are written there
        LogTarget::Builtin(BuiltinLogTarget::Stdout) => tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed(),
        LogTarget::Builtin(BuiltinLogTarget::Stderr) => tracing_subscriber::fmt::layer().with_writer(std::io::stderr).boxed(),
    };

    let level: LevelFilter = conf.level.map(Into::into).unwrap_or(LevelFilter::TRACE);
    let modules = conf.modules;
    let filter = filter_fn(move |metadata| {
        metadata.level() <= &level && module_selected(&modules, metadata.module_path())
    });

    Ok(layer.with_filter(filter).boxed())
}

pub fn build_subscriber(conf: LoggingConfig) -> Result<impl Subscriber + Send + Sync + 'static, IoError> {
    let mut layers = Vec::new();

    for target in conf.targets {
        layers.push(build_target(target, &conf.dir)?);
    }

    // The global filter is for excluding overly verbose messages from external modules - its default
    // needs to be permissive so that individual log targets can filter as they need to
    let filter = tracing_subscriber::filter::Targets::new()
        .with_default(conf.default_level.unwrap_or(LogLevel::Trace))
        .with_targets(conf.module_levels);

    Ok(tracing_subscriber::registry().with(filter).with(layers))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn module_lists() {
        let modules = vec!["skein_network".to_string()];
        assert!(module_selected(&[], Some("anything::at_all")));
        assert!(module_selected(&modules, Some("skein_network::protocol::framer")));
        assert!(!module_selected(&modules, Some("skein_client::session")));
        assert!(module_selected(&modules, None));
    }

    #[test]
    fn file_target_creates_log_dir() {
        let dir = std::env::temp_dir().join(format!("skein-log-test-{}", std::process::id()));
        if dir.exists() {
            std::fs::remove_dir_all(&dir).unwrap();
        }

        let conf = LoggingConfig {
            dir: dir.clone(),
            default_level: Some(LogLevel::Debug),
            module_levels: HashMap::from([("noisy".to_string(), LogLevel::Off)]),
            targets: vec![
                LogEntry {
                    target: LogTarget::File {
                        filename: "client.log".into(),
                    },
                    modules: vec!["skein_client".to_string()],
                    level: Some(LogLevel::Info),
                },
                LogEntry {
                    target: LogTarget::Builtin(BuiltinLogTarget::Stderr),
                    modules: Vec::new(),
                    level: None,
                },
            ],
        };

        let subscriber = build_subscriber(conf).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("written through both targets");
        });

        assert!(dir.is_dir());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn default_config_builds() {
        let subscriber = build_subscriber(LoggingConfig::default()).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("filtered out at info");
        });
    }
}
