mod app;
mod document;
mod renderer;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use folio_core::theme::{ColorSchemeSource, JsonFileStore, MemoryStore};
use folio_core::{CapabilityError, ConfigError, PreferenceStore, SiteConfig};

const USAGE: &str = "Usage: folio [--check] [site.json]";

/// OS appearance setting, read through `dark-light`.
pub struct DesktopScheme;

impl ColorSchemeSource for DesktopScheme {
    fn prefers_dark(&self) -> Result<bool, CapabilityError> {
        match dark_light::detect() {
            Ok(dark_light::Mode::Dark) => Ok(true),
            Ok(dark_light::Mode::Light) => Ok(false),
            Ok(dark_light::Mode::Unspecified) => {
                Err(CapabilityError::Unavailable("desktop color scheme"))
            }
            Err(e) => Err(CapabilityError::failed("dark-light", e.to_string())),
        }
    }
}

struct Args {
    check: bool,
    site: Option<PathBuf>,
}

#[allow(clippy::print_stdout)]
fn parse_args() -> Result<Args> {
    let mut args = Args {
        check: false,
        site: None,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--check" => args.check = true,
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            flag if flag.starts_with('-') => bail!("unknown option {flag}\n{USAGE}"),
            path if args.site.is_none() => args.site = Some(PathBuf::from(path)),
            _ => bail!("{USAGE}"),
        }
    }
    Ok(args)
}

/// Logs go to `FOLIO_LOG_FILE` when set; the alternate screen owns stderr
/// otherwise.
fn init_logging() -> Result<()> {
    let Some(path) = std::env::var_os("FOLIO_LOG_FILE") else {
        return Ok(());
    };
    let file = File::create(&path)
        .with_context(|| format!("opening log file {}", PathBuf::from(&path).display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn preference_store() -> Box<dyn PreferenceStore> {
    match dirs::config_dir() {
        Some(dir) => Box::new(JsonFileStore::in_config_dir(&dir)),
        None => {
            log::warn!("no config directory, theme preference will not persist");
            Box::new(MemoryStore::new())
        }
    }
}

fn load_config(site: Option<&PathBuf>) -> Result<SiteConfig, ConfigError> {
    let config = match site {
        Some(path) => SiteConfig::from_path(path)?,
        None => SiteConfig::builtin()?,
    };
    Ok(config.with_contact_env(|key| std::env::var(key).ok()))
}

#[allow(clippy::print_stdout)]
fn main() -> Result<()> {
    let args = parse_args()?;
    init_logging()?;

    let source = args
        .site
        .as_ref()
        .map_or_else(|| "built-in content".to_string(), |p| p.display().to_string());
    let config = match load_config(args.site.as_ref()) {
        Ok(config) => config,
        Err(ConfigError::Invalid(violations)) => {
            eprintln!("{source}: {} problem(s)", violations.len());
            for violation in &violations {
                eprintln!("  {violation}");
            }
            std::process::exit(1);
        }
        Err(e) => return Err(e).with_context(|| format!("loading {source}")),
    };

    if args.check {
        println!(
            "{source}: ok ({} sections, {} projects, {} journey entries)",
            config.nav_items.len(),
            config.projects.len(),
            config.experience.len() + config.education.len(),
        );
        return Ok(());
    }

    let app = app::App::new(config, preference_store(), Box::new(DesktopScheme));
    renderer::run(app)
}
