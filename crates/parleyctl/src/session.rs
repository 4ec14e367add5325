//! Session setup - merges CLI flags over the config file and builds the
//! responder the front end talks to.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use parley_shared::clock::SystemClock;
use parley_shared::picker::SeededPicker;
use parley_shared::rules::BUILTIN;
use parley_shared::{Mode, Responder, RuleBook};
use tracing::info;

use crate::cli::Cli;
use crate::config::ParleyConfig;

/// Effective settings after CLI overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mode: Mode,
    pub seed: Option<u64>,
    pub rules_file: Option<PathBuf>,
    pub log_level: String,
}

impl Settings {
    pub fn resolve(cli: &Cli, config: ParleyConfig) -> Self {
        Self {
            mode: cli.mode.unwrap_or(config.chat.mode),
            seed: cli.seed.or(config.chat.seed),
            rules_file: cli.rules.clone().or(config.chat.rules_file),
            log_level: config.log.level,
        }
    }
}

/// Rule book from `path`, or the built-in one.
pub fn load_rules(path: Option<&Path>) -> Result<Arc<RuleBook>> {
    match path {
        Some(path) => {
            let book = RuleBook::load(path)
                .with_context(|| format!("Failed to load rules from {}", path.display()))?;
            info!(path = %path.display(), "loaded rule file");
            Ok(Arc::new(book))
        }
        None => Ok(Arc::clone(&*BUILTIN)),
    }
}

pub fn build_responder(settings: &Settings) -> Result<Responder<SeededPicker, SystemClock>> {
    let rules = load_rules(settings.rules_file.as_deref())?;
    let picker = match settings.seed {
        Some(seed) => SeededPicker::seeded(seed),
        None => SeededPicker::from_entropy(),
    };
    Ok(Responder::with_parts(rules, picker, SystemClock))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let config = ParleyConfig::from_toml_str(
            "[chat]\nmode = \"joke\"\nseed = 1\n[log]\nlevel = \"info\"",
        )
        .unwrap();
        let cli = Cli::parse_from(["parleyctl", "--mode", "faq"]);
        let settings = Settings::resolve(&cli, config);
        assert_eq!(settings.mode, Mode::Faq);
        assert_eq!(settings.seed, Some(1));
        assert_eq!(settings.rules_file, None);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_builtin_rules_shared() {
        let a = load_rules(None).unwrap();
        let b = load_rules(None).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_responder_carries_selected_rules() {
        let cli = Cli::parse_from(["parleyctl"]);
        let settings = Settings::resolve(&cli, ParleyConfig::default());
        let responder = build_responder(&settings).unwrap();
        assert_eq!(responder.rules(), &**BUILTIN);
    }

    #[test]
    fn test_seeded_responder_is_reproducible() {
        let cli = Cli::parse_from(["parleyctl", "--seed", "11"]);
        let settings = Settings::resolve(&cli, ParleyConfig::default());
        let mut a = build_responder(&settings).unwrap();
        let mut b = build_responder(&settings).unwrap();
        for _ in 0..5 {
            assert_eq!(
                a.respond("hello", Mode::Normal),
                b.respond("hello", Mode::Normal)
            );
        }
    }
}
