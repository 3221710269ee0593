use std::{io, time::Duration};

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use crate::{
    shades::{ShadeKey, Shades, generate_color_shades, hex_to_hsl},
    store::{DEFAULT_SWITCH_DELAY, OrgStore, load_store, save_store},
    theme::{ThemeVariable, apply_theme, palette_variables},
};

mod render;
mod shades;
mod store;
mod theme;
mod tui;

#[derive(Parser)]
#[command(author, version, about, arg_required_else_help = true)]
struct Args {
    #[arg(long, short, help = "Enable verbose output")]
    verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the 50-900 shade ramp for a #RRGGBB color.
    Shades {
        hex: String,
        #[arg(long, help = "Print only this shade (50, 100, ... 900)")]
        key: Option<u16>,
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
    /// Print a color as an "H S% L%" triple.
    Hsl { hex: String },
    /// Show the theme variables for the active (or given) organization.
    Theme {
        #[arg(long)]
        org: Option<String>,
        #[arg(long, conflicts_with = "json", help = "Emit a :root stylesheet block")]
        css: bool,
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
    /// Manage organizations and their branding.
    Org {
        #[command(subcommand)]
        command: OrgCommands,
    },
    /// Interactively preview organization palettes.
    Preview,
    /// Generate a shell completion script.
    Completions { shell: clap_complete::Shell },
}

#[derive(Subcommand)]
enum OrgCommands {
    /// List organizations.
    List {
        #[arg(long, help = "Emit JSON")]
        json: bool,
    },
    /// Switch the active organization.
    Switch {
        id: String,
        #[arg(long, help = "Simulated backend latency in milliseconds; 0 switches directly")]
        delay_ms: Option<u64>,
    },
    /// Save brand colors for an organization.
    Brand {
        #[arg(long)]
        org: Option<String>,
        #[arg(long)]
        primary: Option<String>,
        #[arg(long)]
        secondary: Option<String>,
    },
    /// Remove an organization's branding, restoring the system palette.
    ClearBrand {
        #[arg(long)]
        org: Option<String>,
    },
}

fn main() {
    if let Err(e) = inner_main() {
        tracing::error!(error = ?e);
        std::process::exit(1);
    }
    std::process::exit(0);
}

fn inner_main() -> Result<()> {
    let args = Args::parse();
    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Commands::Shades { hex, key, json } => print_shades(&hex, key, json),
        Commands::Hsl { hex } => {
            println!("{}", hex_to_hsl(&hex));
            Ok(())
        }
        Commands::Theme { org, css, json } => {
            let store = load_store().context("loading organizations")?;
            print_theme(&store, org.as_deref(), css, json)
        }
        Commands::Org { command } => run_org_command(command),
        Commands::Preview => preview(),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Args::command(), env!("CARGO_PKG_NAME"), &mut io::stdout());
            Ok(())
        }
    }
}

fn print_shades(hex: &str, key: Option<u16>, json: bool) -> Result<()> {
    let shades = generate_color_shades(hex);
    if let Some(key) = key {
        let key = ShadeKey::from_value(key).ok_or_else(|| anyhow!("{} is not a shade key", key))?;
        if let Some(shade) = shades.get(key) {
            println!("{shade}");
        }
        return Ok(());
    }
    if json {
        let value = match &shades {
            Shades::Ramp(ramp) => serde_json::json!({ "base": hex, "shades": ramp }),
            Shades::Malformed => serde_json::json!({ "base": hex, "malformed": true, "shades": {} }),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        render::render_shades(hex, &shades);
    }
    Ok(())
}

fn print_theme(store: &OrgStore, org_id: Option<&str>, css: bool, json: bool) -> Result<()> {
    let org = store.resolve(org_id)?;
    let set = apply_theme(org.branding.as_ref());
    tracing::debug!(
        org = %org.id,
        outcome = ?set.outcome,
        primary = ?set.value(ThemeVariable::Primary),
        "Computed theme"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&set)?);
    } else if css {
        println!("{}", set.to_css());
        if let Some(branding) = &org.branding {
            let palette = palette_variables(&branding.primary_color, branding.secondary_color.as_deref());
            if !palette.is_empty() {
                println!(":root {{");
                for (name, value) in palette {
                    println!("  {name}: {value};");
                }
                println!("}}");
            }
        }
    } else {
        render::render_theme(&org.name, &set);
    }
    Ok(())
}

fn run_org_command(command: OrgCommands) -> Result<()> {
    let mut store = load_store().context("loading organizations")?;

    match command {
        OrgCommands::List { json } => {
            if json {
                let value = serde_json::json!({
                    "current": store.current().map(|org| org.id.as_str()),
                    "organizations": store.organizations(),
                });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                render::render_organizations(&store);
            }
            Ok(())
        }
        OrgCommands::Switch { id, delay_ms } => {
            let delay = delay_ms.map(Duration::from_millis).unwrap_or(DEFAULT_SWITCH_DELAY);
            if !delay.is_zero() {
                return switch_with_spinner(&mut store, &id, delay);
            }
            // No latency requested: switch directly, rejecting unknown ids.
            store.set_current_organization(&id)?;
            save_store(&store)?;
            render::render_organizations(&store);
            Ok(())
        }
        OrgCommands::Brand {
            org,
            primary,
            secondary,
        } => {
            let org_id = store.resolve(org.as_deref())?.id.clone();
            store.update_branding(&org_id, primary.as_deref(), secondary.as_deref())?;
            save_store(&store)?;
            let org = store.resolve(Some(&org_id))?;
            render::render_theme(&org.name, &apply_theme(org.branding.as_ref()));
            Ok(())
        }
        OrgCommands::ClearBrand { org } => {
            let org_id = store.resolve(org.as_deref())?.id.clone();
            store.clear_branding(&org_id)?;
            save_store(&store)?;
            let org = store.resolve(Some(&org_id))?;
            render::render_theme(&org.name, &apply_theme(None));
            Ok(())
        }
    }
}

fn switch_with_spinner(store: &mut OrgStore, org_id: &str, delay: Duration) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Switching to {org_id}..."));
    spinner.enable_steady_tick(Duration::from_millis(80));

    let switched = store.switch_organization(org_id, delay);
    spinner.finish_and_clear();
    tracing::debug!(switched, loading = store.is_loading(), "Switch finished");

    if switched {
        save_store(store)?;
    }
    render::render_organizations(store);
    Ok(())
}

fn preview() -> Result<()> {
    let mut store = load_store().context("loading organizations")?;
    if let Some(org_id) = tui::run_tui(&store)? {
        switch_with_spinner(&mut store, &org_id, DEFAULT_SWITCH_DELAY)?;
    }
    Ok(())
}
