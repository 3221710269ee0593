use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

/// Primary color used when an organization saves branding without one.
pub const DEFAULT_PRIMARY_COLOR: &str = "#03a9f4";
/// Secondary color used when an organization saves branding without one.
pub const DEFAULT_SECONDARY_COLOR: &str = "#1976d2";
/// Artificial wait before a tenant switch lands.
pub const DEFAULT_SWITCH_DELAY: Duration = Duration::from_millis(500);

const STATE_FILE: &str = "organizations.yaml";
const STATE_ENV: &str = "BRANDKIT_STATE";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Staff,
    Viewer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Manager => write!(f, "manager"),
            Self::Staff => write!(f, "staff"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

/// Per-tenant brand colors, as hex strings. Not validated on the way in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Branding {
    pub primary_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_color: Option<String>,
    /// Unix timestamp of the last save from the settings path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrgStore {
    #[serde(default)]
    organizations: Vec<Organization>,
    /// Id of the active organization.
    #[serde(default)]
    current_organization: Option<String>,
    #[serde(skip)]
    is_loading: bool,
}

impl Default for OrgStore {
    fn default() -> Self {
        let organizations = seed_organizations();
        let current_organization = organizations.first().map(|org| org.id.clone());
        Self {
            organizations,
            current_organization,
            is_loading: false,
        }
    }
}

fn seed_organizations() -> Vec<Organization> {
    vec![
        Organization {
            id: "org-fo".to_string(),
            name: "Future Optics".to_string(),
            slug: "future-optics".to_string(),
            logo: None,
            role: Role::Admin,
            permissions: vec!["all".to_string()],
            branding: Some(Branding {
                primary_color: "#03a9f4".to_string(),
                secondary_color: None,
                updated_at: None,
            }),
        },
        Organization {
            id: "org-demo".to_string(),
            name: "Demo Corp".to_string(),
            slug: "demo-corp".to_string(),
            logo: None,
            role: Role::Manager,
            permissions: vec!["read".to_string()],
            branding: Some(Branding {
                primary_color: "#ff9800".to_string(),
                secondary_color: None,
                updated_at: None,
            }),
        },
    ]
}

impl OrgStore {
    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn current(&self) -> Option<&Organization> {
        let id = self.current_organization.as_deref()?;
        self.find(id)
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn find(&self, org_id: &str) -> Option<&Organization> {
        self.organizations.iter().find(|org| org.id == org_id)
    }

    /// Resolve `org_id`, or the active organization when `None`.
    pub fn resolve(&self, org_id: Option<&str>) -> Result<&Organization> {
        match org_id {
            Some(id) => self
                .find(id)
                .ok_or_else(|| anyhow!("No organization with id '{}'", id)),
            None => self
                .current()
                .ok_or_else(|| anyhow!("No organization is selected")),
        }
    }

    pub fn set_organizations(&mut self, organizations: Vec<Organization>) {
        self.organizations = organizations;
        if self.current_organization.is_some() && self.current().is_none() {
            tracing::info!("Active organization was removed, clearing selection");
            self.current_organization = None;
        }
    }

    pub fn set_current_organization(&mut self, org_id: &str) -> Result<()> {
        if self.find(org_id).is_none() {
            bail!("No organization with id '{}'", org_id);
        }
        self.current_organization = Some(org_id.to_string());
        Ok(())
    }

    /// Switch tenants after an artificial `delay`, as if waiting on a backend.
    ///
    /// Unknown ids leave the selection alone. Returns whether the switch
    /// happened. Overlapping switches are not sequenced; the last one to
    /// finish wins.
    pub fn switch_organization(&mut self, org_id: &str, delay: Duration) -> bool {
        self.is_loading = true;
        tracing::debug!(org_id, ?delay, "Switching organization");
        thread::sleep(delay);

        let switched = self.find(org_id).is_some();
        if switched {
            self.current_organization = Some(org_id.to_string());
        } else {
            tracing::warn!("No organization with id '{}', keeping current selection", org_id);
        }
        self.is_loading = false;
        switched
    }

    /// Save brand colors from the settings path.
    ///
    /// Unset colors keep their existing value, then fall back to the defaults.
    pub fn update_branding(
        &mut self,
        org_id: &str,
        primary_color: Option<&str>,
        secondary_color: Option<&str>,
    ) -> Result<&Branding> {
        let org = self
            .organizations
            .iter_mut()
            .find(|org| org.id == org_id)
            .ok_or_else(|| anyhow!("No organization with id '{}'", org_id))?;

        let existing = org.branding.take();
        let primary_color = primary_color
            .map(str::to_string)
            .or_else(|| existing.as_ref().map(|b| b.primary_color.clone()))
            .unwrap_or_else(|| DEFAULT_PRIMARY_COLOR.to_string());
        let secondary_color = secondary_color
            .map(str::to_string)
            .or_else(|| existing.and_then(|b| b.secondary_color))
            .unwrap_or_else(|| DEFAULT_SECONDARY_COLOR.to_string());

        tracing::info!(org_id, %primary_color, %secondary_color, "Updating branding");
        let branding = org.branding.insert(Branding {
            primary_color,
            secondary_color: Some(secondary_color),
            updated_at: Some(chrono::Utc::now().timestamp()),
        });
        Ok(&*branding)
    }

    pub fn clear_branding(&mut self, org_id: &str) -> Result<()> {
        let org = self
            .organizations
            .iter_mut()
            .find(|org| org.id == org_id)
            .ok_or_else(|| anyhow!("No organization with id '{}'", org_id))?;
        tracing::info!(org_id, "Clearing branding");
        org.branding = None;
        Ok(())
    }

    /// Read a store from `path`. A missing file yields the seed store.
    pub fn load_from(path: &Path) -> Result<OrgStore> {
        let data = match fs::read_to_string(path) {
            Ok(data) => data,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No existing state file at {}, using seed organizations", path.display());
                return Ok(OrgStore::default());
            }
            Err(error) => {
                return Err(error).with_context(|| format!("reading {}", path.display()));
            }
        };
        let mut store: OrgStore =
            serde_yaml::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
        // A hand-edited file may point at an organization it no longer lists.
        let organizations = std::mem::take(&mut store.organizations);
        store.set_organizations(organizations);
        Ok(store)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        tracing::debug!(?path, "Saving organization store");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .inspect_err(|error| tracing::warn!("Failed to create state directory: {}", error))?;
        }
        fs::write(path, serde_yaml::to_string(self)?)
            .with_context(|| format!("writing {}", path.display()))
    }
}

pub fn load_store() -> Result<OrgStore> {
    let path = state_path()?;
    let existed = path.exists();
    let store = OrgStore::load_from(&path)?;
    if !existed {
        store
            .save_to(&path)
            .inspect_err(|error| tracing::warn!("Failed to save state file: {}", error))?;
    }
    Ok(store)
}

pub fn save_store(store: &OrgStore) -> Result<()> {
    store.save_to(&state_path()?)
}

fn state_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(STATE_ENV)
        && !path.is_empty()
    {
        return Ok(PathBuf::from(path));
    }
    let base_dirs = xdg::BaseDirectories::with_prefix(env!("CARGO_PKG_NAME"));
    base_dirs
        .get_state_file(STATE_FILE)
        .ok_or_else(|| anyhow!("Failed to find state file"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_store() {
        let store = OrgStore::default();
        assert_eq!(store.organizations().len(), 2);
        let current = store.current().unwrap();
        assert_eq!(current.id, "org-fo");
        assert_eq!(current.branding.as_ref().unwrap().primary_color, "#03a9f4");
        assert!(!store.is_loading());
    }

    #[test]
    fn test_switch_organization() {
        let mut store = OrgStore::default();
        assert!(store.switch_organization("org-demo", Duration::ZERO));
        assert_eq!(store.current().unwrap().name, "Demo Corp");
        assert!(!store.is_loading());
    }

    #[test]
    fn test_switch_to_unknown_keeps_current() {
        let mut store = OrgStore::default();
        assert!(!store.switch_organization("org-missing", Duration::ZERO));
        assert_eq!(store.current().unwrap().id, "org-fo");
        assert!(!store.is_loading());
    }

    #[test]
    fn test_last_switch_wins() {
        let mut store = OrgStore::default();
        store.switch_organization("org-demo", Duration::ZERO);
        store.switch_organization("org-fo", Duration::from_millis(1));
        assert_eq!(store.current().unwrap().id, "org-fo");
    }

    #[test]
    fn test_set_current_organization_rejects_unknown() {
        let mut store = OrgStore::default();
        assert!(store.set_current_organization("nope").is_err());
        store.set_current_organization("org-demo").unwrap();
        assert_eq!(store.current().unwrap().id, "org-demo");
    }

    #[test]
    fn test_set_organizations_clears_stale_selection() {
        let mut store = OrgStore::default();
        let demo = store.find("org-demo").unwrap().clone();
        store.set_organizations(vec![demo]);
        assert!(store.current().is_none());
        assert!(store.resolve(None).is_err());
        assert_eq!(store.resolve(Some("org-demo")).unwrap().name, "Demo Corp");
    }

    #[test]
    fn test_update_branding_keeps_and_defaults() {
        let mut store = OrgStore::default();
        let branding = store.update_branding("org-demo", None, None).unwrap();
        assert_eq!(branding.primary_color, "#ff9800");
        assert_eq!(branding.secondary_color.as_deref(), Some(DEFAULT_SECONDARY_COLOR));
        assert!(branding.updated_at.is_some());

        let branding = store
            .update_branding("org-demo", Some("#336699"), Some("#abcdef"))
            .unwrap();
        assert_eq!(branding.primary_color, "#336699");
        assert_eq!(branding.secondary_color.as_deref(), Some("#abcdef"));
    }

    #[test]
    fn test_update_branding_without_existing_uses_defaults() {
        let mut store = OrgStore::default();
        store.clear_branding("org-fo").unwrap();
        assert!(store.current().unwrap().branding.is_none());
        let branding = store.update_branding("org-fo", None, None).unwrap();
        assert_eq!(branding.primary_color, DEFAULT_PRIMARY_COLOR);
        assert!(store.update_branding("org-x", None, None).is_err());
    }

    #[test]
    fn test_load_missing_file_gives_seed() {
        let dir = tempfile::tempdir().unwrap();
        let store = OrgStore::load_from(&dir.path().join("absent.yaml")).unwrap();
        assert_eq!(store.organizations().len(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(STATE_FILE);

        let mut store = OrgStore::default();
        store.set_current_organization("org-demo").unwrap();
        store.update_branding("org-demo", Some("#123456"), None).unwrap();
        store.save_to(&path).unwrap();

        let loaded = OrgStore::load_from(&path).unwrap();
        assert_eq!(loaded.current().unwrap().id, "org-demo");
        assert_eq!(loaded.organizations(), store.organizations());
        assert!(!loaded.is_loading());
    }

    #[test]
    fn test_load_drops_dangling_selection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        let mut store = OrgStore::default();
        store.current_organization = Some("org-gone".to_string());
        store.save_to(&path).unwrap();

        let loaded = OrgStore::load_from(&path).unwrap();
        assert_eq!(loaded.organizations().len(), 2);
        assert!(loaded.current().is_none());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        fs::write(&path, "organizations: [this is: not valid").unwrap();
        assert!(OrgStore::load_from(&path).is_err());
    }
}
