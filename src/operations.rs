/// Mode operations: create, save, remove, rename, turn on and off.
///
/// Each operation reads a storage snapshot and returns the patch to write,
/// plus the message the background needs when the active mode is affected.

use crate::error::{FocusError, FocusResult};
use crate::message::FocusMessage;
use crate::mode::{check_mode_name, is_built_in, normalize_mode_name, trim_mode_name, ModeConfig, SiteList};
use crate::storage::{StoragePatch, StorageSnapshot};
use serde_json::{Map, Value};

/// Storage writes plus an optional notification for the background
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModeChange {
    pub patch: StoragePatch,
    pub notify: Option<FocusMessage>,
}

impl ModeChange {
    fn quiet(patch: StoragePatch) -> Self {
        ModeChange {
            patch,
            notify: None,
        }
    }
}

/// Register a new mode name. An existing name produces an empty patch; the
/// caller opens the settings page either way.
pub fn create_mode(snapshot: &StorageSnapshot, raw_name: &str) -> FocusResult<(String, StoragePatch)> {
    let name = trim_mode_name(raw_name)?;
    let mut registry = snapshot.registry();

    if registry.register(&name) {
        Ok((name, StoragePatch::new().set_registry(&registry)))
    } else {
        Ok((name, StoragePatch::new()))
    }
}

/// Persist a mode's site list and make sure it is registered
pub fn save_mode(snapshot: &StorageSnapshot, name: &str, sites: &SiteList) -> FocusResult<StoragePatch> {
    check_mode_name(name)?;
    let mut registry = snapshot.registry();
    registry.register(name);

    StoragePatch::new()
        .set_mode(name, &ModeConfig::deny_list(sites.as_slice().to_vec()))
        .map(|patch| patch.set_registry(&registry))
}

/// Delete a mode's config and registry entry. Removing the active mode also
/// clears the pointer and turns blocking off.
pub fn remove_mode(snapshot: &StorageSnapshot, name: &str) -> FocusResult<ModeChange> {
    check_mode_name(name)?;
    let mut registry = snapshot.registry();
    registry.unregister(name);

    let patch = StoragePatch::new().set_registry(&registry).remove_key(name);

    if snapshot.active_mode().as_deref() == Some(name) {
        Ok(ModeChange {
            patch: patch.clear_active(),
            notify: Some(FocusMessage::Disable),
        })
    } else {
        Ok(ModeChange::quiet(patch))
    }
}

/// Move a mode to a new name, carrying its stored config with the sites
/// currently being edited.
///
/// Returns `Ok(None)` when the normalized name equals the current one.
pub fn rename_mode(
    snapshot: &StorageSnapshot,
    old: &str,
    raw_new: &str,
    sites: &SiteList,
) -> FocusResult<Option<(String, ModeChange)>> {
    let new = normalize_mode_name(raw_new)?;
    if new == old {
        return Ok(None);
    }
    if is_built_in(old) {
        return Err(FocusError::BuiltInMode(old.to_string()));
    }

    let mut registry = snapshot.registry();
    if registry.contains(&new) {
        return Err(FocusError::DuplicateName(new));
    }
    if !registry.rename(old, &new) {
        registry.register(&new);
    }

    let mut config = match snapshot.get(old) {
        Some(Value::Object(existing)) => existing.clone(),
        _ => Map::new(),
    };
    config.insert("sites".to_string(), Value::from(sites.as_slice().to_vec()));

    let mut patch = StoragePatch::new().set_registry(&registry).remove_key(old);
    patch.set.insert(new.clone(), Value::Object(config));

    let change = if snapshot.active_mode().as_deref() == Some(old) {
        ModeChange {
            patch: patch.set_active(&new),
            notify: Some(FocusMessage::Enable { mode: new.clone() }),
        }
    } else {
        ModeChange::quiet(patch)
    };

    Ok(Some((new, change)))
}

/// Turn a mode on: persist the pointer and ask the background to enable it
pub fn activate_mode(name: &str) -> ModeChange {
    ModeChange {
        patch: StoragePatch::new().set_active(name),
        notify: Some(FocusMessage::Enable {
            mode: name.to_string(),
        }),
    }
}

/// Turn blocking off and forget the pointer
pub fn deactivate() -> ModeChange {
    ModeChange {
        patch: StoragePatch::new().clear_active(),
        notify: Some(FocusMessage::Disable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::BUILT_IN_MODE;
    use crate::storage::{ACTIVE_MODE_KEY, CUSTOM_MODES_KEY};
    use serde_json::json;

    fn store(value: Value) -> StorageSnapshot {
        StorageSnapshot::from_value(value)
    }

    fn sites(list: &[&str]) -> SiteList {
        SiteList::new(list.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn test_create_mode_pre_registers() {
        let mut snapshot = store(json!({ "customModes": ["Work"] }));

        let (name, patch) = create_mode(&snapshot, "  Study  ").unwrap();
        snapshot.apply(&patch);

        assert_eq!(name, "Study");
        assert_eq!(snapshot.registry().custom(), &["Work".to_string(), "Study".to_string()]);
        // Registered before any sites exist
        assert!(!snapshot.contains_key("Study"));
    }

    #[test]
    fn test_create_existing_mode_is_noop() {
        let snapshot = store(json!({ "customModes": ["Work"] }));

        let (_, patch) = create_mode(&snapshot, "Work").unwrap();
        assert!(patch.is_empty());

        let (_, patch) = create_mode(&snapshot, BUILT_IN_MODE).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_create_keeps_inner_whitespace() {
        let (name, _) = create_mode(&StorageSnapshot::new(), "  Deep   Work ").unwrap();
        assert_eq!(name, "Deep   Work");
    }

    #[test]
    fn test_storage_key_names_are_rejected() {
        let snapshot = store(json!({
            "customModes": ["Work"],
            "Work": { "sites": ["a.com"] },
            "activeFocusMode": "Work",
        }));

        for key in [CUSTOM_MODES_KEY, ACTIVE_MODE_KEY] {
            let reserved = Err(FocusError::ReservedName(key.to_string()));

            assert_eq!(create_mode(&snapshot, key).map(|_| ()), reserved);
            assert_eq!(save_mode(&snapshot, key, &sites(&["b.com"])).map(|_| ()), reserved);
            assert_eq!(rename_mode(&snapshot, "Work", key, &sites(&["a.com"])).map(|_| ()), reserved);
            assert_eq!(remove_mode(&snapshot, key).map(|_| ()), reserved);
        }

        // Schema keys untouched
        assert_eq!(snapshot.registry().custom(), &["Work".to_string()]);
        assert_eq!(snapshot.active_mode(), Some("Work".to_string()));
    }

    #[test]
    fn test_create_empty_name_fails() {
        assert_eq!(create_mode(&StorageSnapshot::new(), "   "), Err(FocusError::EmptyName));
    }

    #[test]
    fn test_save_forces_deny_mode_and_registers() {
        let mut snapshot = store(json!({
            "Work": { "sites": ["old.com"], "allowMode": true }
        }));

        let patch = save_mode(&snapshot, "Work", &sites(&["youtube.com"])).unwrap();
        snapshot.apply(&patch);

        assert_eq!(
            snapshot.get("Work"),
            Some(&json!({ "sites": ["youtube.com"], "allowMode": false }))
        );
        assert_eq!(snapshot.registry().custom(), &["Work".to_string()]);
    }

    #[test]
    fn test_save_built_in_does_not_list_it() {
        let mut snapshot = StorageSnapshot::new();

        let patch = save_mode(&snapshot, BUILT_IN_MODE, &sites(&["a.com"])).unwrap();
        snapshot.apply(&patch);

        assert!(snapshot.registry().custom().is_empty());
        assert_eq!(snapshot.get(CUSTOM_MODES_KEY), Some(&json!([])));
        assert!(snapshot.contains_key(BUILT_IN_MODE));
    }

    #[test]
    fn test_remove_mode() {
        let mut snapshot = store(json!({
            "customModes": ["Work", "Study"],
            "Work": { "sites": ["a.com"], "allowMode": false },
            "activeFocusMode": "Study",
        }));
        let before = snapshot.registry().custom().len();

        let change = remove_mode(&snapshot, "Work").unwrap();
        snapshot.apply(&change.patch);

        assert_eq!(snapshot.registry().custom().len(), before - 1);
        assert!(!snapshot.contains_key("Work"));
        assert_eq!(snapshot.active_mode(), Some("Study".to_string()));
        assert_eq!(change.notify, None);
    }

    #[test]
    fn test_remove_active_mode_turns_blocking_off() {
        let mut snapshot = store(json!({
            "customModes": ["Work"],
            "Work": { "sites": ["a.com"] },
            "activeFocusMode": "Work",
        }));

        let change = remove_mode(&snapshot, "Work").unwrap();
        snapshot.apply(&change.patch);

        assert!(!snapshot.contains_key(ACTIVE_MODE_KEY));
        assert_eq!(change.notify, Some(FocusMessage::Disable));
    }

    #[test]
    fn test_rename_to_existing_name_fails_untouched() {
        let snapshot = store(json!({
            "customModes": ["Work", "Study"],
            "Work": { "sites": ["a.com"], "allowMode": false },
        }));

        let result = rename_mode(&snapshot, "Work", "Study", &sites(&["a.com"]));

        assert_eq!(result, Err(FocusError::DuplicateName("Study".to_string())));
        assert!(snapshot.contains_key("Work"));
        assert_eq!(snapshot.registry().custom(), &["Work".to_string(), "Study".to_string()]);
    }

    #[test]
    fn test_rename_to_built_in_name_fails() {
        let snapshot = store(json!({ "customModes": ["Work"] }));

        let result = rename_mode(&snapshot, "Work", BUILT_IN_MODE, &SiteList::default());

        assert!(matches!(result, Err(FocusError::DuplicateName(_))));
    }

    #[test]
    fn test_rename_built_in_fails() {
        let result = rename_mode(&StorageSnapshot::new(), BUILT_IN_MODE, "Quiet", &SiteList::default());
        assert!(matches!(result, Err(FocusError::BuiltInMode(_))));
    }

    #[test]
    fn test_rename_moves_config_in_place() {
        let mut snapshot = store(json!({
            "customModes": ["A", "Work", "C"],
            "Work": { "sites": ["a.com"], "allowMode": true },
        }));

        let (name, change) = rename_mode(&snapshot, "Work", "  Deep   Work ", &sites(&["b.com"]))
            .unwrap()
            .unwrap();
        snapshot.apply(&change.patch);

        assert_eq!(name, "Deep Work");
        assert!(!snapshot.contains_key("Work"));
        assert_eq!(
            snapshot.get("Deep Work"),
            Some(&json!({ "sites": ["b.com"], "allowMode": true }))
        );
        assert_eq!(
            snapshot.registry().custom(),
            &["A".to_string(), "Deep Work".to_string(), "C".to_string()]
        );
        assert_eq!(change.notify, None);
    }

    #[test]
    fn test_rename_active_mode_follows_pointer() {
        let mut snapshot = store(json!({
            "customModes": ["Work"],
            "Work": { "sites": ["a.com"] },
            "activeFocusMode": "Work",
        }));

        let (_, change) = rename_mode(&snapshot, "Work", "Focus", &sites(&["a.com"]))
            .unwrap()
            .unwrap();
        snapshot.apply(&change.patch);

        assert_eq!(snapshot.active_mode(), Some("Focus".to_string()));
        assert_eq!(
            change.notify,
            Some(FocusMessage::Enable {
                mode: "Focus".to_string()
            })
        );
    }

    #[test]
    fn test_rename_same_or_empty_name() {
        let snapshot = store(json!({ "customModes": ["Work"] }));

        assert_eq!(rename_mode(&snapshot, "Work", " Work ", &SiteList::default()), Ok(None));
        assert_eq!(
            rename_mode(&snapshot, "Work", "  ", &SiteList::default()),
            Err(FocusError::EmptyName)
        );
    }

    #[test]
    fn test_activate_and_deactivate() {
        let mut snapshot = StorageSnapshot::new();

        let on = activate_mode("Work");
        snapshot.apply(&on.patch);
        assert_eq!(snapshot.active_mode(), Some("Work".to_string()));
        assert_eq!(
            on.notify,
            Some(FocusMessage::Enable {
                mode: "Work".to_string()
            })
        );

        let off = deactivate();
        snapshot.apply(&off.patch);
        assert_eq!(snapshot.active_mode(), None);
        assert_eq!(off.notify, Some(FocusMessage::Disable));
    }
}
