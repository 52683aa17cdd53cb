/// Focus mode data model: stored config, site lists and the mode registry
use crate::domain::validate_site;
use crate::error::{FocusError, FocusResult};
use crate::storage::{ACTIVE_MODE_KEY, CUSTOM_MODES_KEY};
use serde::{Deserialize, Serialize};

/// The mode that always exists, whether or not the stored registry lists it
pub const BUILT_IN_MODE: &str = "Do Not Disturb";

/// Stored configuration of a single focus mode
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ModeConfig {
    pub sites: Vec<String>,
    /// true: block everything except `sites`; false: block only `sites`
    #[serde(rename = "allowMode", default)]
    pub allow_mode: bool,
}

impl ModeConfig {
    /// A config that blocks only the listed sites
    pub fn deny_list(sites: Vec<String>) -> ModeConfig {
        ModeConfig {
            sites,
            allow_mode: false,
        }
    }
}

/// Ordered, duplicate-free list of normalized sites being edited
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteList {
    sites: Vec<String>,
}

impl SiteList {
    pub fn new(sites: Vec<String>) -> Self {
        let mut list = SiteList::default();
        for site in sites {
            if !site.is_empty() && !list.sites.contains(&site) {
                list.sites.push(site);
            }
        }
        list
    }

    /// Add user input to the list.
    ///
    /// Returns `Ok(true)` when a new entry was appended, `Ok(false)` when the
    /// normalized value was already listed, and `InvalidDomain` when the input
    /// is not shaped like a domain.
    pub fn add(&mut self, raw: &str) -> FocusResult<bool> {
        let site = validate_site(raw)?;
        if self.sites.contains(&site) {
            return Ok(false);
        }
        self.sites.push(site);
        Ok(true)
    }

    pub fn remove(&mut self, index: usize) -> Option<String> {
        (index < self.sites.len()).then(|| self.sites.remove(index))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.sites
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.sites
    }
}

/// All mode names: the built-in mode first, then the stored custom modes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ModeRegistry {
    custom: Vec<String>,
}

impl From<Vec<String>> for ModeRegistry {
    fn from(stored: Vec<String>) -> Self {
        let mut registry = ModeRegistry::default();
        for name in stored {
            registry.register(&name);
        }
        registry
    }
}

impl From<ModeRegistry> for Vec<String> {
    fn from(registry: ModeRegistry) -> Self {
        registry.custom
    }
}

impl ModeRegistry {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(BUILT_IN_MODE).chain(self.custom.iter().map(String::as_str))
    }

    /// Custom modes only, in the order they are stored
    pub fn custom(&self) -> &[String] {
        &self.custom
    }

    pub fn contains(&self, name: &str) -> bool {
        is_built_in(name) || is_storage_key(name) || self.custom.iter().any(|m| m == name)
    }

    /// Append a custom mode. Returns false if the name already exists.
    pub fn register(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.custom.push(name.to_string());
        true
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        let original_len = self.custom.len();
        self.custom.retain(|m| m != name);
        self.custom.len() < original_len
    }

    /// Rewrite a custom mode's entry in place, keeping its position
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        self.custom
            .iter_mut()
            .find(|m| m.as_str() == old)
            .map(|entry| {
                *entry = new.to_string();
            })
            .is_some()
    }
}

pub fn is_built_in(name: &str) -> bool {
    name == BUILT_IN_MODE
}

/// Mode configs share the storage namespace with these keys
pub fn is_storage_key(name: &str) -> bool {
    name == CUSTOM_MODES_KEY || name == ACTIVE_MODE_KEY
}

/// Reject names that would overwrite the registry or the active pointer
pub fn check_mode_name(name: &str) -> FocusResult<()> {
    if is_storage_key(name) {
        Err(FocusError::ReservedName(name.to_string()))
    } else {
        Ok(())
    }
}

fn accept_mode_name(name: String) -> FocusResult<String> {
    if name.is_empty() {
        return Err(FocusError::EmptyName);
    }
    check_mode_name(&name)?;
    Ok(name)
}

/// Name typed when creating a mode: trimmed, inner whitespace kept as typed
pub fn trim_mode_name(raw: &str) -> FocusResult<String> {
    accept_mode_name(raw.trim().to_string())
}

/// Name typed when renaming a mode: trimmed, internal whitespace runs
/// collapsed to one space
pub fn normalize_mode_name(raw: &str) -> FocusResult<String> {
    accept_mode_name(raw.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Font Awesome icon for a mode entry, chosen by keyword in its name
pub fn mode_icon(name: &str) -> &'static str {
    let name = name.to_lowercase();
    if name.contains("work") {
        "fa-briefcase"
    } else if name.contains("study") {
        "fa-book"
    } else if name.contains("sport") {
        "fa-dumbbell"
    } else if name.contains("disturb") {
        "fa-ban"
    } else {
        "fa-circle"
    }
}
