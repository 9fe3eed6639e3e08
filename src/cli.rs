// this_file: fontpick/src/cli.rs
//
// Command-line interface for fontpick

use crate::{
    catalog::{Catalog, FontEntry},
    config::Config,
    fontinfo,
    installer::{InstallResult, Installer},
    Result,
};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;
use std::{path::PathBuf, sync::Arc};

/// Command-line arguments for fontpick
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Browse, search and install programming fonts",
    long_about = "fontpick lists the fonts published in the ProgrammingFonts repository, lets you search them, and installs a font by downloading its files into your user font directory. Run it without a command to browse interactively."
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(
        short,
        long,
        global = true,
        help = "Enable verbose output",
        long_help = "Enable verbose output mode that logs each step of the \
                    installation, every downloaded file and skipped files."
    )]
    pub verbose: bool,

    /// Output as JSON
    #[arg(
        short,
        long,
        global = true,
        help = "Output as JSON",
        long_help = "Output results in JSON format for machine processing. \
                    If not specified, results are output as human-readable text."
    )]
    pub json: bool,

    #[command(flatten)]
    pub settings: SettingsArgs,
}

/// Settings that override the defaults in [`Config`]
#[derive(ClapArgs, Debug, Default)]
pub struct SettingsArgs {
    /// Repository to install from, as OWNER/NAME
    #[arg(long, global = true, value_name = "OWNER/NAME")]
    pub repo: Option<String>,

    /// Branch to install from
    #[arg(long, global = true, env = "FONTPICK_BRANCH")]
    pub branch: Option<String>,

    /// Base URL of the GitHub API
    #[arg(long, global = true, value_name = "URL")]
    pub api_base: Option<String>,

    /// API token, raises the anonymous rate limit
    #[arg(long, global = true, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Install fonts here instead of the user font directory
    #[arg(long, global = true, env = "FONTPICK_FONT_DIR", value_name = "DIR")]
    pub font_dir: Option<PathBuf>,

    /// Number of parallel downloads
    #[arg(long, global = true)]
    pub jobs: Option<usize>,

    /// Download timeout in seconds
    #[arg(long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Program used to refresh the font cache on Linux
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub cache_command: Option<String>,
}

impl SettingsArgs {
    /// Apply the flags on top of the default configuration
    pub fn to_config(&self) -> Result<Config> {
        let mut config = Config::default();

        if let Some(repo) = &self.repo {
            config.set_repository(repo)?;
        }
        if let Some(branch) = &self.branch {
            config.branch = branch.clone();
        }
        if let Some(api_base) = &self.api_base {
            config.api_base = api_base.clone();
        }
        if let Some(token) = self.token.as_ref().filter(|token| !token.is_empty()) {
            config.token = Some(token.clone());
        }
        if let Some(font_dir) = &self.font_dir {
            config.font_dir = Some(font_dir.clone());
        }
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(timeout) = self.timeout {
            config.download_timeout_secs = timeout;
        }
        if let Some(command) = &self.cache_command {
            config.cache_command = command.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

/// Subcommands for fontpick
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List every font in the catalog
    List,

    /// Search the catalog by name
    Search(SearchArgs),

    /// Show where a font comes from and where it would be installed
    Info(FontArgs),

    /// Download and install a font
    Install(InstallArgs),

    /// List font files already in the install directory
    Installed,

    /// Browse and install fonts interactively
    #[cfg(feature = "tui")]
    Browse,
}

/// Arguments for the search command
#[derive(ClapArgs, Debug)]
pub struct SearchArgs {
    /// Text to look for in font names, case-insensitive
    pub query: Option<String>,
}

/// Arguments naming one font
#[derive(ClapArgs, Debug)]
pub struct FontArgs {
    /// Font name as shown by `fontpick list`
    pub font: String,
}

/// Arguments for the install command
#[derive(ClapArgs, Debug)]
pub struct InstallArgs {
    /// Font to install, as shown by `fontpick list`
    pub font: String,
}

/// Information shown for a single font
#[derive(Debug, Serialize)]
struct FontDetails<'a> {
    name: &'a str,
    repository: String,
    source: String,
    install_location: Option<PathBuf>,
}

/// Execute the command
pub fn execute(cli: Cli) -> Result<()> {
    let config = cli.settings.to_config()?;
    let catalog = Arc::new(Catalog::programming_fonts());

    match &cli.command {
        None => run_default(catalog, &config, cli.json),
        Some(Commands::List) => {
            let entries: Vec<&FontEntry> = catalog.list().iter().collect();
            output_entries(&entries, cli.json)
        }
        Some(Commands::Search(args)) => {
            let query = args.query.as_deref().unwrap_or_default();
            output_entries(&catalog.filter(query), cli.json)
        }
        Some(Commands::Info(args)) => {
            let installer = Installer::from_config(catalog.clone(), &config)?;
            let entry = catalog.get(&args.font)?;
            let details = FontDetails {
                name: entry.display_name(),
                repository: config.repository(),
                source: config.font_url(&entry.id),
                install_location: installer.target().ok().map(|target| target.directory),
            };
            output_details(&details, cli.json)
        }
        Some(Commands::Install(args)) => {
            let installer = Installer::from_config(catalog, &config)?;
            let result = installer.install(&args.font)?;
            output_install_result(&result, cli.json)
        }
        Some(Commands::Installed) => {
            let installer = Installer::from_config(catalog, &config)?;
            let target = installer.target()?;
            let fonts = fontinfo::scan(&target.directory, &config.extensions)?;
            output_installed(&fonts, cli.json)
        }
        #[cfg(feature = "tui")]
        Some(Commands::Browse) => crate::tui::run(catalog, &config),
    }
}

#[cfg(feature = "tui")]
fn run_default(catalog: Arc<Catalog>, config: &Config, _json: bool) -> Result<()> {
    crate::tui::run(catalog, config)
}

#[cfg(not(feature = "tui"))]
fn run_default(catalog: Arc<Catalog>, _config: &Config, json: bool) -> Result<()> {
    let entries: Vec<&FontEntry> = catalog.list().iter().collect();
    output_entries(&entries, json)
}

/// Output the result of one install
fn output_install_result(result: &InstallResult, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        print_install_result(result);
    }

    Ok(())
}

/// Human-readable summary of one install
fn print_install_result(result: &InstallResult) {
    println!(
        "✓ {}: installed {} of {} file(s) into {}",
        result.font,
        result.installed_paths.len(),
        result.expected_files,
        result.directory.display()
    );
    for path in &result.installed_paths {
        println!("  {}", path.display());
    }
    for failure in &result.failures {
        println!("  skipped {}", failure);
    }
    for warning in &result.warnings {
        println!("  warning: {}", warning);
    }
}

/// Output catalog entries
fn output_entries(entries: &[&FontEntry], json_output: bool) -> Result<()> {
    if json_output {
        let names: Vec<&str> = entries.iter().map(|entry| entry.id.as_str()).collect();
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        for entry in entries {
            println!("{}", entry.display_name());
        }
    }

    Ok(())
}

/// Output font details
fn output_details(details: &FontDetails, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(details)?);
    } else {
        println!("Font Name: {}", details.name);
        println!("Repository: {}", details.repository);
        println!("Source: {}", details.source);
        match &details.install_location {
            Some(dir) => println!("Installation Location: {}", dir.display()),
            None => println!("Installation Location: unavailable on this system"),
        }
    }

    Ok(())
}

/// Output installed fonts
fn output_installed(fonts: &[fontinfo::InstalledFont], json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(fonts)?);
    } else {
        for font in fonts {
            let family = font.family.as_deref().unwrap_or("-");
            let variable = if font.is_variable { " (variable)" } else { "" };
            println!("{}\t{}{}", font.path.display(), family, variable);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FontpickError;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_install() {
        let cli = Cli::parse_from(["fontpick", "install", "Fira Code", "--jobs", "2"]);
        match cli.command {
            Some(Commands::Install(args)) => assert_eq!(args.font, "Fira Code"),
            other => panic!("Expected install command, got {:?}", other),
        }
        assert_eq!(cli.settings.jobs, Some(2));
    }

    #[test]
    fn test_install_takes_a_single_font() {
        let result = Cli::try_parse_from(["fontpick", "install", "Hack", "Fira Code"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["fontpick", "install"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_search_defaults_to_empty_query() {
        let cli = Cli::parse_from(["fontpick", "--json", "search"]);
        assert!(cli.json);
        match cli.command {
            Some(Commands::Search(args)) => assert_eq!(args.query, None),
            other => panic!("Expected search command, got {:?}", other),
        }
    }

    #[test]
    fn test_settings_to_config() {
        let settings = SettingsArgs {
            repo: Some("someone/fonts".to_string()),
            branch: Some("main".to_string()),
            font_dir: Some(PathBuf::from("/tmp/fonts")),
            jobs: Some(3),
            timeout: Some(5),
            token: Some(String::new()),
            ..Default::default()
        };
        let config = settings.to_config().unwrap();
        assert_eq!(config.repository(), "someone/fonts");
        assert_eq!(config.branch, "main");
        assert_eq!(config.font_dir, Some(PathBuf::from("/tmp/fonts")));
        assert_eq!(config.jobs, 3);
        assert_eq!(config.download_timeout_secs, 5);
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_settings_reject_invalid_values() {
        let settings = SettingsArgs {
            jobs: Some(0),
            ..Default::default()
        };
        assert!(matches!(settings.to_config(), Err(FontpickError::Config(_))));

        let settings = SettingsArgs {
            repo: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(matches!(settings.to_config(), Err(FontpickError::Config(_))));
    }
}
