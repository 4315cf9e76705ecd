//! # rackplan CLI
//!
//! Runs the layout, BOM and compliance engines on JSON requests read from a
//! file or stdin (`-`) and prints pretty JSON, or a text summary with
//! `--text`.

mod logging;

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;

use rack_core::bom::{compute_bom, BomRequest, BomResult, QuickBomInput};
use rack_core::compliance::{assess, ComplianceRequest};
use rack_core::config::LayoutConfig;
use rack_core::estimate::{run_estimate_with, Estimate, EstimateRequest};
use rack_core::file_io::{load_project, save_project, FileLock};
use rack_core::layout::report::render_text;
use rack_core::layout::{design_layout_with, BuildingEnvelope, LayoutRequest};
use rack_core::project::Project;
use rack_core::site::{resolve_site, CachedSiteSource, SiteData, StaticSiteSource};
use rack_core::units::group_thousands;

#[derive(Parser)]
#[command(name = "rackplan")]
#[command(about = "Pallet-rack layout, bill of materials and code-compliance estimates")]
struct Cli {
    /// Layout constants as TOML (defaults are used when absent)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Design a rack layout from a building + requirements request
    Layout {
        /// Request JSON, or - for stdin
        input: String,

        /// Print a text summary instead of JSON
        #[arg(long)]
        text: bool,
    },

    /// Compute a bill of materials from bay types
    Bom {
        /// Request JSON, or - for stdin
        input: String,

        /// Input is a quick estimate (bay and row counts)
        #[arg(long)]
        quick: bool,

        #[arg(long)]
        text: bool,
    },

    /// Assess high-pile, seismic, permit and used-rack requirements
    Compliance {
        /// Request JSON, or - for stdin
        input: String,
    },

    /// Layout, BOM and compliance in one pass
    Estimate {
        /// Request JSON, or - for stdin
        input: String,

        /// JSON object mapping site queries to site data
        #[arg(long, requires = "site")]
        site_file: Option<PathBuf>,

        /// Site query (usually an address) to look up in --site-file
        #[arg(long, requires = "site_file")]
        site: Option<String>,

        /// Add the estimate to a project file (created if missing)
        #[arg(long)]
        save: Option<PathBuf>,

        /// Label for the saved estimate
        #[arg(long, default_value = "Estimate")]
        label: String,

        /// Who is saving; recorded in the lock file
        #[arg(long, default_value = "rackplan")]
        user: String,

        #[arg(long)]
        text: bool,
    },

    /// Print the default layout constants as TOML
    Config,

    /// Run the 600' x 300' x 32' sample building
    Demo,
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).context("reading stdin")?;
        Ok(buf)
    } else {
        fs::read_to_string(input).with_context(|| format!("reading {}", input))
    }
}

fn parse_request<T: DeserializeOwned>(input: &str) -> Result<T> {
    let text = read_input(input)?;
    serde_json::from_str(&text).with_context(|| format!("parsing request from {}", input))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<LayoutConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            Ok(LayoutConfig::from_toml_str(&text)?)
        }
        None => Ok(LayoutConfig::default()),
    }
}

fn bom_text(bom: &BomResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<22} {:<46} {:>10}\n", "Category", "Item", "Qty"));
    out.push_str(&format!("{}\n", "-".repeat(80)));
    for line in &bom.bom_items {
        out.push_str(&format!(
            "{:<22} {:<46} {:>10}\n",
            line.category.name(),
            line.item,
            group_thousands(u64::from(line.qty))
        ));
        if let Some(note) = &line.note {
            out.push_str(&format!("{:<22}   ({})\n", "", note));
        }
    }
    out
}

fn estimate_text(estimate: &Estimate) -> String {
    let mut out = render_text(&estimate.layout);
    out.push('\n');
    out.push_str(&bom_text(&estimate.bom));
    if let Some(compliance) = &estimate.compliance {
        out.push('\n');
        out.push_str(&format!(
            "High pile: {} | Permits: ~{} weeks\n",
            if compliance.high_pile.is_high_pile { "yes" } else { "no" },
            compliance.permits.typical_timeline_weeks
        ));
        for note in &compliance.notes {
            out.push_str(&format!("  - {}\n", note));
        }
    }
    for note in &estimate.notes {
        out.push_str(&format!("Note: {}\n", note));
    }
    out
}

fn load_site_file(path: &Path, query: &str) -> Result<SiteData> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let entries: HashMap<String, SiteData> =
        serde_json::from_str(&text).with_context(|| format!("parsing site data in {}", path.display()))?;

    let mut source = StaticSiteSource::new(path.display().to_string());
    for (key, data) in entries {
        source.insert(&key, data);
    }
    Ok(resolve_site(&CachedSiteSource::new(source), query))
}

/// Add the request to a project file under an exclusive lock.
fn save_estimate(path: &Path, config: Option<&Path>, user: &str, label: &str, request: EstimateRequest) -> Result<Estimate> {
    let _lock = FileLock::acquire(path, user)?;

    let mut project = if path.exists() {
        if config.is_some() {
            tracing::warn!("--config ignored; the project's own layout settings apply");
        }
        load_project(path)?
    } else {
        let mut project = Project::new(user, request.project_name.clone(), request.client.clone());
        project.settings.layout = load_config(config)?;
        project
    };

    let id = project.run_and_add(label, request)?;
    save_project(&project, path)?;
    eprintln!("Saved '{}' to {} ({})", label, path.display(), id);

    match project.get_estimate(&id) {
        Some(saved) => Ok(saved.estimate.clone()),
        None => bail!("saved estimate {} missing from project", id),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Layout { input, text } => {
            let config = load_config(config_path)?;
            let request: LayoutRequest = parse_request(&input)?;
            let layout = design_layout_with(&config, &request.building, &request.requirements)?;
            if text {
                print!("{}", render_text(&layout));
            } else {
                print_json(&layout)?;
            }
        }

        Commands::Bom { input, quick, text } => {
            let request = if quick {
                parse_request::<QuickBomInput>(&input)?.to_request()?
            } else {
                parse_request::<BomRequest>(&input)?
            };
            let bom = compute_bom(&request)?;
            if text {
                print!("{}", bom_text(&bom));
            } else {
                print_json(&bom)?;
            }
        }

        Commands::Compliance { input } => {
            let request: ComplianceRequest = parse_request(&input)?;
            print_json(&assess(&request)?)?;
        }

        Commands::Estimate {
            input,
            site_file,
            site,
            save,
            label,
            user,
            text,
        } => {
            let mut request: EstimateRequest = parse_request(&input)?;
            if let (Some(path), Some(query)) = (site_file.as_deref(), site.as_deref()) {
                request.site = Some(load_site_file(path, query)?);
            }

            let estimate = match save.as_deref() {
                Some(path) => save_estimate(path, config_path, &user, &label, request)?,
                None => run_estimate_with(&load_config(config_path)?, &request)?,
            };

            if text {
                print!("{}", estimate_text(&estimate));
            } else {
                print_json(&estimate)?;
            }
        }

        Commands::Config => {
            print!("{}", load_config(config_path)?.to_toml_string()?);
        }

        Commands::Demo => {
            let config = load_config(config_path)?;
            let mut request = EstimateRequest::new(BuildingEnvelope::new(600.0, 300.0, 32.0));
            request.project_name = "Demo DC".to_string();
            let estimate = run_estimate_with(&config, &request)?;
            print!("{}", estimate_text(&estimate));
        }
    }

    Ok(())
}
