//! Theme variables derived from an organization's branding.
//!
//! The dashboard reads a few HSL custom properties to recolor interactive
//! elements. This module computes what those properties should be; writing
//! them somewhere is the caller's job.

use std::fmt::{self, Write};

use serde::Serialize;

use crate::{
    shades::{Shades, generate_color_shades, hex_to_hsl},
    store::Branding,
};

/// Foreground paired with a branded primary. Brand colors are assumed dark
/// enough for near-white text.
pub const PRIMARY_FOREGROUND: &str = "210 40% 98%";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ThemeVariable {
    #[serde(rename = "--primary")]
    Primary,
    #[serde(rename = "--primary-foreground")]
    PrimaryForeground,
    #[serde(rename = "--ring")]
    Ring,
}

impl ThemeVariable {
    pub const ALL: [ThemeVariable; 3] = [
        ThemeVariable::Primary,
        ThemeVariable::PrimaryForeground,
        ThemeVariable::Ring,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ThemeVariable::Primary => "--primary",
            ThemeVariable::PrimaryForeground => "--primary-foreground",
            ThemeVariable::Ring => "--ring",
        }
    }
}

impl fmt::Display for ThemeVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum VariableChange {
    Set { variable: ThemeVariable, value: String },
    /// Drop the override so the stylesheet default shows through.
    Remove { variable: ThemeVariable },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeOutcome {
    /// No branding color configured.
    SystemDefault,
    Branded,
    /// A primary color is configured but did not decode; variables render black.
    Degraded,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CssVariableSet {
    pub outcome: ThemeOutcome,
    pub changes: Vec<VariableChange>,
}

impl CssVariableSet {
    pub fn value(&self, variable: ThemeVariable) -> Option<&str> {
        self.changes.iter().find_map(|change| match change {
            VariableChange::Set { variable: v, value } if *v == variable => Some(value.as_str()),
            _ => None,
        })
    }

    /// Render as a `:root` block. Removed variables appear as comments.
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for change in &self.changes {
            match change {
                VariableChange::Set { variable, value } => {
                    let _ = writeln!(css, "  {variable}: {value};");
                }
                VariableChange::Remove { variable } => {
                    let _ = writeln!(css, "  /* {variable}: system default */");
                }
            }
        }
        css.push('}');
        css
    }
}

/// Compute theme variable changes for `branding`.
pub fn apply_theme(branding: Option<&Branding>) -> CssVariableSet {
    let Some(primary) = branding.map(|b| b.primary_color.as_str()).filter(|c| !c.is_empty()) else {
        return CssVariableSet {
            outcome: ThemeOutcome::SystemDefault,
            changes: ThemeVariable::ALL
                .into_iter()
                .map(|variable| VariableChange::Remove { variable })
                .collect(),
        };
    };

    let hsl = hex_to_hsl(primary);
    let outcome = if hsl.is_degraded() {
        tracing::warn!(primary, "Primary color is malformed, theme falls back to black");
        ThemeOutcome::Degraded
    } else {
        ThemeOutcome::Branded
    };
    let value = hsl.to_string();

    CssVariableSet {
        outcome,
        changes: vec![
            VariableChange::Set {
                variable: ThemeVariable::Primary,
                value: value.clone(),
            },
            VariableChange::Set {
                variable: ThemeVariable::Ring,
                value,
            },
            VariableChange::Set {
                variable: ThemeVariable::PrimaryForeground,
                value: PRIMARY_FOREGROUND.to_string(),
            },
        ],
    }
}

/// Shade-ramp custom properties for an organization's palette.
///
/// Emits `--brand-primary-<key>` and, when a secondary color is given,
/// `--brand-secondary-<key>`. Malformed colors contribute nothing.
pub fn palette_variables(primary: &str, secondary: Option<&str>) -> Vec<(String, String)> {
    let mut vars = Vec::new();
    let mut push_ramp = |role: &str, shades: Shades| {
        for (key, hex) in shades.iter() {
            vars.push((format!("--brand-{role}-{key}"), hex.to_string()));
        }
    };
    push_ramp("primary", generate_color_shades(primary));
    if let Some(secondary) = secondary {
        push_ramp("secondary", generate_color_shades(secondary));
    }
    vars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn branding(primary: &str) -> Branding {
        Branding {
            primary_color: primary.to_string(),
            secondary_color: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_branded_theme() {
        let set = apply_theme(Some(&branding("#ff0000")));
        assert_eq!(set.outcome, ThemeOutcome::Branded);
        assert_eq!(set.value(ThemeVariable::Primary), Some("0 100% 50%"));
        assert_eq!(set.value(ThemeVariable::Ring), Some("0 100% 50%"));
        assert_eq!(set.value(ThemeVariable::PrimaryForeground), Some(PRIMARY_FOREGROUND));
    }

    #[test]
    fn test_unbranded_removes_all_variables() {
        let set = apply_theme(None);
        assert_eq!(set.outcome, ThemeOutcome::SystemDefault);
        assert_eq!(set.changes.len(), 3);
        assert!(set.changes.iter().all(|c| matches!(c, VariableChange::Remove { .. })));
        assert_eq!(set.value(ThemeVariable::Primary), None);

        let empty = apply_theme(Some(&branding("")));
        assert_eq!(empty.outcome, ThemeOutcome::SystemDefault);
    }

    #[test]
    fn test_malformed_primary_is_degraded_black() {
        let set = apply_theme(Some(&branding("blue")));
        assert_eq!(set.outcome, ThemeOutcome::Degraded);
        assert_eq!(set.value(ThemeVariable::Primary), Some("0 0% 0%"));
    }

    #[test]
    fn test_shorthand_primary_is_branded() {
        let set = apply_theme(Some(&branding("#f00")));
        assert_eq!(set.outcome, ThemeOutcome::Branded);
        assert_eq!(set.value(ThemeVariable::Ring), Some("0 100% 50%"));
    }

    #[test]
    fn test_to_css() {
        let css = apply_theme(Some(&branding("#03a9f4"))).to_css();
        assert_eq!(
            css,
            ":root {\n  --primary: 199 97.6% 48.4%;\n  --ring: 199 97.6% 48.4%;\n  --primary-foreground: 210 40% 98%;\n}"
        );
        let css = apply_theme(None).to_css();
        assert!(css.contains("/* --primary: system default */"));
        assert!(css.contains("/* --ring: system default */"));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(apply_theme(None)).unwrap();
        assert_eq!(json["outcome"], "system_default");
        assert_eq!(json["changes"][0]["op"], "remove");
        assert_eq!(json["changes"][0]["variable"], "--primary");
    }

    #[test]
    fn test_palette_variables() {
        let vars = palette_variables("#03a9f4", Some("#1976d2"));
        assert_eq!(vars.len(), 20);
        assert_eq!(vars[0], ("--brand-primary-50".to_string(), "#737b7f".to_string()));
        assert!(vars.contains(&("--brand-secondary-500".to_string(), "#1976d2".to_string())));

        assert_eq!(palette_variables("#03a9f4", Some("nope")).len(), 10);
        assert!(palette_variables("#f00", None).is_empty());
    }
}
