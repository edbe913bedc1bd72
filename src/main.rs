// SPDX-License-Identifier: PMPL-1.0-or-later

//! umbrella-site: terminal front end for the Foundlab/Umbrella site core.
//!
//! Resolves translation keys and renders pages and detail dialogs as text.
//! Also manages the stored language and theme, and plays back the Veritas
//! protocol demo against a virtual viewport.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use umbrella_site::config::{ConfigSource, SiteConfig};
use umbrella_site::content::render_plain;
use umbrella_site::context::SiteContext;
use umbrella_site::demo::{player, render, tui::DemoTui};
use umbrella_site::diagnostics::run_diagnostics;
use umbrella_site::i18n::{
    environment_locale, Args, BundleSet, FilePreferenceStore, LocaleValue, Resolved,
};
use umbrella_site::lifecycle::ResourceTracker;
use umbrella_site::site::contact::ContactForm;
use umbrella_site::site::case_studies::{CaseStudyDetail, CaseStudyId};
use umbrella_site::site::engines::{EngineDetail, EngineId};
use umbrella_site::site::header;
use umbrella_site::site::{self, Route};
use umbrella_site::types::Language;
use umbrella_site::view::SiteView;

/// Virtual time between playback frames.
const PLAYBACK_TICK: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(name = "umbrella-site")]
#[command(version)]
#[command(about = "Foundlab/Umbrella site core: translations, pages and the Veritas protocol demo")]
#[command(long_about = None)]
struct Cli {
    /// Config file (YAML or JSON); defaults to ./umbrella.yaml or ./umbrella.json
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a translation key
    T {
        /// Dotted key, e.g. footer.copyright
        #[arg(value_name = "KEY")]
        key: String,

        /// Placeholder value (repeatable)
        #[arg(long = "arg", value_name = "NAME=VALUE")]
        args: Vec<String>,

        /// Language for this lookup only
        #[arg(long, value_enum)]
        lang: Option<LangArg>,
    },

    /// Show or change the stored language
    Lang {
        #[command(subcommand)]
        action: Option<LangAction>,
    },

    /// Show or toggle the stored theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Render a page as text
    Page {
        /// Route path: /, /terms or /privacy
        #[arg(value_name = "PATH", default_value = "/")]
        path: String,

        #[arg(long, value_enum)]
        lang: Option<LangArg>,
    },

    /// Show an AI engine's detail dialog
    Engine {
        /// Engine id, e.g. orchestrator or chiefStrategist
        #[arg(value_name = "ID")]
        id: String,

        #[arg(long, value_enum)]
        lang: Option<LangArg>,

        /// Print sanitized HTML instead of text
        #[arg(long)]
        html: bool,
    },

    /// Show a case study's detail dialog
    CaseStudy {
        /// Study id, e.g. assetManagement or regulatoryReporting
        #[arg(value_name = "ID")]
        id: String,

        #[arg(long, value_enum)]
        lang: Option<LangArg>,

        /// Print sanitized HTML instead of text
        #[arg(long)]
        html: bool,
    },

    /// Play back the Veritas protocol demo
    Demo {
        /// Scroll interactively (j/k, arrows, q to quit)
        #[arg(short, long)]
        interactive: bool,

        /// Pause between printed stages, in milliseconds
        #[arg(long, default_value = "0")]
        delay_ms: u64,

        #[arg(long, value_enum)]
        lang: Option<LangArg>,
    },

    /// Validate a contact form submission
    Contact {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        message: String,

        #[arg(long, value_enum)]
        lang: Option<LangArg>,
    },

    /// Check config, locale bundles and stored preferences
    Diagnostics,
}

#[derive(Subcommand)]
enum LangAction {
    /// Store a new language
    Set {
        #[arg(value_enum)]
        code: LangArg,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Switch between dark and light
    Toggle,
}

// CLI argument types
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum LangArg {
    En,
    Pt,
}

impl From<LangArg> for Language {
    fn from(arg: LangArg) -> Self {
        match arg {
            LangArg::En => Language::En,
            LangArg::Pt => Language::Pt,
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "warn,umbrella_site=debug"
        } else {
            "warn"
        })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(explicit: Option<&std::path::Path>) -> Result<(SiteConfig, ConfigSource)> {
    let cwd = std::env::current_dir()?;
    let (mut config, source) = SiteConfig::discover(explicit, &cwd)?;
    config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    debug!(source = %source, public_dir = %config.public_dir.display(), "config loaded");
    Ok((config, source))
}

/// Site context backed by the preference file, with bundles loaded.
fn open_context(config: &SiteConfig, lang: Option<LangArg>) -> SiteContext {
    let preferences = FilePreferenceStore::open(&config.preference_file);
    let locale = environment_locale();
    let mut context = SiteContext::new(
        Box::new(preferences),
        locale.as_deref(),
        config.default_language,
        ResourceTracker::new(),
    );
    context.install_bundles(BundleSet::load(&config.public_dir));
    if let Some(lang) = lang {
        context.use_language(lang.into());
    }
    context
}

fn parse_args(raw: &[String]) -> Result<Args> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .ok_or_else(|| anyhow!("--arg expects NAME=VALUE, got '{}'", pair))
        })
        .collect::<Result<Vec<_>>>()
        .map(|pairs| pairs.into_iter().collect())
}

fn print_resolved(key: &str, resolved: Resolved<'_>) {
    match resolved {
        Resolved::Text(text) => println!("{}", text),
        Resolved::Fallback(key) => {
            println!("{}", key);
            eprintln!("{}", "(key not found, showing the key)".dimmed());
        }
        Resolved::Structured(LocaleValue::Lines(lines)) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Resolved::Structured(LocaleValue::Blocks(blocks)) => {
            for line in render_plain(blocks) {
                println!("{}", line);
            }
        }
        Resolved::Structured(LocaleValue::Table(table)) => {
            for child in table.keys() {
                println!("{}.{}", key, child);
            }
        }
        Resolved::Structured(value) => match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(_) => println!("{}", key),
        },
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let (config, source) = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::T { key, args, lang } => {
            let context = open_context(&config, lang);
            let args = parse_args(&args)?;
            let resolved = if args.is_empty() {
                context.translator().resolve(&key, None)
            } else {
                context.translator().resolve(&key, Some(&args))
            };
            print_resolved(&key, resolved);
        }

        Commands::Lang { action } => {
            let mut context = open_context(&config, None);
            if let Some(LangAction::Set { code }) = action {
                context.set_language(code.into())?;
            }
            let language = context.language();
            println!(
                "{} ({}, lang=\"{}\")",
                language.code().bold(),
                language.native_name(),
                context.document_lang()
            );
        }

        Commands::Theme { action } => {
            let mut context = open_context(&config, None);
            if let Some(ThemeAction::Toggle) = action {
                context.toggle_theme()?;
            }
            println!("{}", context.theme().as_str().bold());
        }

        Commands::Page { path, lang } => {
            let route = Route::from_path(&path)?;
            let context = open_context(&config, lang);
            println!("{}\n", header::nav_lines(context.translator()).join("  ").dimmed());
            for line in site::page_lines(route, context.translator(), site::current_year()) {
                if line.starts_with('#') {
                    println!("{}", line.dimmed());
                } else {
                    println!("{}", line);
                }
            }
        }

        Commands::Engine { id, lang, html } => {
            let engine: EngineId = id.parse()?;
            let context = open_context(&config, lang);
            let detail = EngineDetail::compose(engine, context.translator());
            println!("{}", detail.title.bold().cyan());
            println!("{}\n", detail.summary.dimmed());
            match (&detail.blocks, html) {
                (Some(blocks), true) => println!("{}", umbrella_site::content::render_html(blocks)),
                _ => {
                    for line in detail.plain_lines() {
                        println!("{}", line);
                    }
                }
            }
        }

        Commands::CaseStudy { id, lang, html } => {
            let study: CaseStudyId = id.parse()?;
            let context = open_context(&config, lang);
            let detail = CaseStudyDetail::compose(study, context.translator());
            println!("{}\n", detail.title.bold().cyan());
            if html {
                println!("{}", umbrella_site::content::render_html(&detail.blocks));
            } else {
                for line in detail.plain_lines() {
                    println!("{}", line);
                }
            }
        }

        Commands::Demo {
            interactive,
            delay_ms,
            lang,
        } => {
            let context = open_context(&config, lang);
            let tracker = context.tracker().clone();
            let mut view = SiteView::mount(context, &config, Instant::now())?;
            if interactive {
                DemoTui::run(&mut view, config.scroll_step)?;
            } else {
                let playback =
                    player::play(&mut view, config.scroll_step, PLAYBACK_TICK, Instant::now())?;
                for (idx, event) in playback.events.iter().enumerate() {
                    if idx > 0 && delay_ms > 0 {
                        std::thread::sleep(Duration::from_millis(delay_ms));
                    }
                    render::print_frame(&event.frame);
                }
            }
            view.teardown();
            debug!(remaining = tracker.total_live(), "demo finished");
        }

        Commands::Contact {
            name,
            email,
            message,
            lang,
        } => {
            let context = open_context(&config, lang);
            match ContactForm::new(&name, &email, &message).submit() {
                Ok(submission) => {
                    println!(
                        "[{}] {} <{}>: {} characters",
                        "OK".green(),
                        submission.name,
                        submission.email,
                        submission.message.chars().count()
                    );
                }
                Err(errors) => {
                    for error in &errors {
                        println!(
                            "[{}] {:8} {}",
                            "ERR".red(),
                            error.field().as_str(),
                            error.localized(context.translator())
                        );
                    }
                    return Err(anyhow!("{} invalid field(s)", errors.len()));
                }
            }
        }

        Commands::Diagnostics => {
            run_diagnostics(&config, &source)?;
        }
    }

    Ok(())
}
