//! CLI text rendering for palettes, theme variables and organizations.

use colored::Colorize;

use super::colors::{ThemeColor, string_to_color, theme};
use crate::{
    shades::{ShadeKey, Shades},
    store::OrgStore,
    theme::{CssVariableSet, ThemeOutcome, VariableChange},
};

/// Dimming factor for inactive organizations.
const DIM_FACTOR: f32 = 0.75;

fn selection_marker() -> &'static str {
    if cfg!(target_os = "windows") {
        ">"
    } else {
        "→"
    }
}

/// Apply color to a string using the colored crate.
fn apply_color(s: &str, color: ThemeColor) -> colored::ColoredString {
    let (r, g, b) = color.rgb();
    s.truecolor(r, g, b)
}

/// A block of background color with legible text on top.
fn swatch(label: &str, color: ThemeColor) -> colored::ColoredString {
    let (r, g, b) = color.rgb();
    let (fr, fg, fb) = color.contrasting_text().rgb();
    format!(" {label:^9} ").on_truecolor(r, g, b).truecolor(fr, fg, fb)
}

/// Render a shade ramp, one key per line.
pub fn render_shades(base: &str, shades: &Shades) {
    if shades.is_empty() {
        println!(
            "{} {}",
            apply_color("no shades:", theme::YELLOW),
            apply_color(&format!("'{base}' is not a #RRGGBB color"), theme::GRAY)
        );
        return;
    }

    for (key, hex) in shades.iter() {
        let color = ThemeColor::from_hex(hex).unwrap_or(theme::GRAY);
        let key_label = format!("{:>4}", key.value());
        let key_label = if key == ShadeKey::S500 {
            apply_color(&key_label, theme::GOLD).bold()
        } else {
            apply_color(&key_label, theme::MUTED)
        };
        println!("{} {} {}", key_label, swatch(hex, color), apply_color(hex, theme::GRAY));
    }
}

/// Render theme variable changes.
pub fn render_theme(org_name: &str, set: &CssVariableSet) {
    let outcome = match set.outcome {
        ThemeOutcome::Branded => apply_color("branded", theme::GREEN),
        ThemeOutcome::SystemDefault => apply_color("system default", theme::GRAY),
        ThemeOutcome::Degraded => apply_color("degraded (malformed primary color)", theme::RED),
    };
    println!("{} {}", org_name.bold(), outcome);

    for change in &set.changes {
        match change {
            VariableChange::Set { variable, value } => println!(
                "  {} {}",
                apply_color(&format!("{variable:<22}"), theme::GOLD),
                value
            ),
            VariableChange::Remove { variable } => println!(
                "  {} {}",
                apply_color(&format!("{variable:<22}"), theme::MUTED),
                apply_color("(removed)", theme::GRAY)
            ),
        }
    }
}

/// Render the organization list with the active one marked.
pub fn render_organizations(store: &OrgStore) {
    let current_id = store.current().map(|org| org.id.as_str());

    for org in store.organizations() {
        let is_current = current_id == Some(org.id.as_str());
        let dim = if is_current { 1.0 } else { DIM_FACTOR };

        if is_current {
            print!("{} ", selection_marker().bright_purple().bold());
        } else {
            print!("  ");
        }

        let badge = string_to_color(&org.name).apply_dim(dim);
        let name = apply_color(&org.name, badge);
        let name = if is_current { name.bold() } else { name };

        let brand = match &org.branding {
            Some(branding) => match ThemeColor::from_hex(&branding.primary_color) {
                Some(color) => format!(
                    "{} {}",
                    apply_color("■", color),
                    apply_color(&branding.primary_color, theme::GRAY.apply_dim(dim))
                ),
                None => apply_color(&branding.primary_color, theme::RED.apply_dim(dim)).to_string(),
            },
            None => apply_color("unbranded", theme::MUTED).to_string(),
        };

        println!(
            "{} {} {} {}",
            name,
            apply_color(&format!("({})", org.id), theme::FRAME.apply_dim(dim)),
            apply_color(&org.role.to_string(), theme::GOLD.apply_dim(dim)),
            brand
        );
    }
}
