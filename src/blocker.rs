/// Background blocking state: which sites are blocked, and which tabs were
/// redirected so they can be restored when focus mode is turned off.

use crate::domain::{blocklist_from_sites, matches_any, navigation_domain};
use crate::error::{FocusError, FocusResult};
use crate::mode::ModeConfig;
use serde::Deserialize;
use std::collections::HashMap;

pub type TabId = i32;

/// Runtime blocking state. Only `enable` and `disable` change it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum BlockState {
    #[default]
    Disabled,
    Enabled(ActiveBlocklist),
}

/// A mode's sites with `www.` stripped, plus its polarity
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveBlocklist {
    pub mode: String,
    pub sites: Vec<String>,
    pub allow_mode: bool,
}

impl ActiveBlocklist {
    /// Deny mode blocks matches; allow mode blocks everything else
    pub fn should_block(&self, domain: &str) -> bool {
        matches_any(domain, &self.sites) != self.allow_mode
    }
}

/// A tab to send back to the page it was on before being redirected
#[derive(Debug, Clone, PartialEq)]
pub struct Restore {
    pub tab_id: TabId,
    pub url: String,
}

/// Fields of a `webNavigation.onBeforeNavigate` event the blocker reads
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDetails {
    pub tab_id: TabId,
    pub url: String,
    #[serde(default)]
    pub frame_id: i32,
}

/// Whether a tab's URL points at the placeholder page
pub fn is_placeholder(url: &str, placeholder: &str) -> bool {
    url.starts_with(placeholder)
}

/// A redirected tab goes back only while it still shows the placeholder.
/// Tabs without a readable URL are left alone.
pub fn should_restore(tab_url: Option<&str>, placeholder: &str) -> bool {
    tab_url.is_some_and(|url| is_placeholder(url, placeholder))
}

#[derive(Debug, Clone)]
pub struct Blocker {
    state: BlockState,
    redirects: HashMap<TabId, String>,
    placeholder: String,
}

impl Blocker {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Blocker {
            state: BlockState::Disabled,
            redirects: HashMap::new(),
            placeholder: placeholder.into(),
        }
    }

    pub fn state(&self) -> &BlockState {
        &self.state
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.state, BlockState::Enabled(_))
    }

    /// Switch to the config loaded for `mode`. A failed load, a missing
    /// config or an empty site list leaves blocking off and is reported back
    /// for logging.
    pub fn enable(&mut self, mode: &str, loaded: FocusResult<Option<ModeConfig>>) -> FocusResult<()> {
        self.state = BlockState::Disabled;
        let config = loaded?.ok_or_else(|| FocusError::MissingConfig(mode.to_string()))?;
        if config.sites.is_empty() {
            return Err(FocusError::EmptySiteList(mode.to_string()));
        }

        self.state = BlockState::Enabled(ActiveBlocklist {
            mode: mode.to_string(),
            sites: blocklist_from_sites(&config.sites),
            allow_mode: config.allow_mode,
        });
        Ok(())
    }

    /// Turn blocking off and hand back every remembered redirect, clearing
    /// the redirect memory.
    pub fn disable(&mut self) -> Vec<Restore> {
        self.state = BlockState::Disabled;
        let mut restores: Vec<Restore> = self
            .redirects
            .drain()
            .map(|(tab_id, url)| Restore { tab_id, url })
            .collect();
        restores.sort_by_key(|r| r.tab_id);
        restores
    }

    /// Decide a top-level navigation. Returns the placeholder URL when the
    /// tab must be redirected, remembering where it was headed.
    pub fn on_navigation(&mut self, tab_id: TabId, url: &str) -> FocusResult<Option<String>> {
        let BlockState::Enabled(active) = &self.state else {
            return Ok(None);
        };
        if self.is_placeholder(url) {
            return Ok(None);
        }

        let domain = navigation_domain(url)?;
        let should_block = active.should_block(&domain);

        log::debug!(
            "[Focusly] domain={} mode={} allow_mode={} should_block={}",
            domain,
            active.mode,
            active.allow_mode,
            should_block
        );

        if !should_block {
            return Ok(None);
        }

        self.redirects.insert(tab_id, url.to_string());
        Ok(Some(self.placeholder.clone()))
    }

    /// Decide a navigation event. Subframe loads never redirect the tab.
    pub fn on_navigation_details(&mut self, details: &NavigationDetails) -> FocusResult<Option<String>> {
        if details.frame_id != 0 {
            return Ok(None);
        }
        self.on_navigation(details.tab_id, &details.url)
    }

    pub fn is_placeholder(&self, url: &str) -> bool {
        is_placeholder(url, &self.placeholder)
    }

    pub fn remembered(&self, tab_id: TabId) -> Option<&str> {
        self.redirects.get(&tab_id).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: &str = "chrome-extension://abc/blocked.html";

    fn config(sites: &[&str], allow_mode: bool) -> ModeConfig {
        ModeConfig {
            sites: sites.iter().map(|s| s.to_string()).collect(),
            allow_mode,
        }
    }

    fn enabled(sites: &[&str], allow_mode: bool) -> Blocker {
        let mut blocker = Blocker::new(PLACEHOLDER);
        blocker.enable("Work", Ok(Some(config(sites, allow_mode)))).unwrap();
        blocker
    }

    fn details(tab_id: TabId, url: &str, frame_id: i32) -> NavigationDetails {
        NavigationDetails {
            tab_id,
            url: url.to_string(),
            frame_id,
        }
    }

    #[test]
    fn test_subframe_navigation_is_ignored() {
        let mut blocker = enabled(&["youtube.com"], false);

        let embed = details(7, "https://www.youtube.com/embed/abc", 3);
        assert_eq!(blocker.on_navigation_details(&embed), Ok(None));
        assert_eq!(blocker.remembered(7), None);

        let top = details(7, "https://www.youtube.com/watch", 0);
        assert_eq!(blocker.on_navigation_details(&top), Ok(Some(PLACEHOLDER.to_string())));
        assert_eq!(blocker.remembered(7), Some("https://www.youtube.com/watch"));
    }

    #[test]
    fn test_navigation_details_from_event() {
        let event = serde_json::json!({
            "tabId": 12,
            "url": "https://reddit.com/r/rust",
            "frameId": 0,
            "parentFrameId": -1,
            "timeStamp": 1.5,
        });
        let parsed: NavigationDetails = serde_json::from_value(event).unwrap();
        assert_eq!(parsed, details(12, "https://reddit.com/r/rust", 0));

        // Missing frameId counts as the top frame
        let parsed: NavigationDetails =
            serde_json::from_value(serde_json::json!({ "tabId": 1, "url": "https://a.com" })).unwrap();
        assert_eq!(parsed.frame_id, 0);
    }

    #[test]
    fn test_should_restore_only_tabs_on_placeholder() {
        let still_blocked = format!("{}?from=youtube", PLACEHOLDER);
        assert!(should_restore(Some(PLACEHOLDER), PLACEHOLDER));
        assert!(should_restore(Some(&still_blocked), PLACEHOLDER));

        // Navigated away since the redirect
        assert!(!should_restore(Some("https://example.com/"), PLACEHOLDER));
        // No URL visible for the tab
        assert!(!should_restore(None, PLACEHOLDER));
    }

    #[test]
    fn test_disabled_never_blocks() {
        let mut blocker = Blocker::new(PLACEHOLDER);
        assert_eq!(blocker.on_navigation(1, "https://www.youtube.com/watch"), Ok(None));
    }

    #[test]
    fn test_deny_mode() {
        let mut blocker = enabled(&["youtube.com"], false);

        assert_eq!(
            blocker.on_navigation(1, "https://www.youtube.com/watch"),
            Ok(Some(PLACEHOLDER.to_string()))
        );
        assert_eq!(
            blocker.on_navigation(2, "https://m.youtube.com"),
            Ok(Some(PLACEHOLDER.to_string()))
        );
        assert_eq!(blocker.on_navigation(3, "https://example.com"), Ok(None));

        assert_eq!(blocker.remembered(1), Some("https://www.youtube.com/watch"));
        assert_eq!(blocker.remembered(3), None);
    }

    #[test]
    fn test_allow_mode_inverts() {
        let mut blocker = enabled(&["docs.google.com"], true);

        assert_eq!(
            blocker.on_navigation(1, "https://twitter.com"),
            Ok(Some(PLACEHOLDER.to_string()))
        );
        assert_eq!(blocker.on_navigation(2, "https://docs.google.com/x"), Ok(None));
    }

    #[test]
    fn test_stored_www_prefix_is_stripped() {
        let mut blocker = enabled(&["www.reddit.com"], false);

        assert!(blocker.on_navigation(1, "https://reddit.com/r/rust").unwrap().is_some());
    }

    #[test]
    fn test_placeholder_is_exempt() {
        let mut blocker = enabled(&["example.com"], true);

        assert_eq!(blocker.on_navigation(1, PLACEHOLDER), Ok(None));
        assert_eq!(blocker.remembered(1), None);
    }

    #[test]
    fn test_enable_with_missing_or_empty_config_stays_disabled() {
        let mut blocker = Blocker::new(PLACEHOLDER);

        assert_eq!(
            blocker.enable("Work", Ok(None)),
            Err(FocusError::MissingConfig("Work".to_string()))
        );
        assert_eq!(
            blocker.enable("Work", Ok(Some(config(&[], false)))),
            Err(FocusError::EmptySiteList("Work".to_string()))
        );

        assert!(!blocker.is_enabled());
        assert_eq!(blocker.on_navigation(1, "https://youtube.com"), Ok(None));
    }

    #[test]
    fn test_enable_with_empty_config_turns_off_previous_mode() {
        let mut blocker = enabled(&["youtube.com"], false);

        assert!(blocker.enable("Empty", Ok(Some(config(&[], false)))).is_err());

        assert_eq!(blocker.on_navigation(1, "https://youtube.com"), Ok(None));
    }

    #[test]
    fn test_enable_with_malformed_config_stays_disabled() {
        let mut blocker = enabled(&["youtube.com"], false);
        let malformed = Err(FocusError::MalformedConfig {
            mode: "Work".to_string(),
            reason: "sites is not a list".to_string(),
        });

        assert!(blocker.enable("Work", malformed).is_err());

        assert!(!blocker.is_enabled());
    }

    #[test]
    fn test_disable_returns_redirects_and_clears_memory() {
        let mut blocker = enabled(&["youtube.com", "reddit.com"], false);
        blocker.on_navigation(7, "https://youtube.com/a").unwrap();
        blocker.on_navigation(3, "https://reddit.com/b").unwrap();
        blocker.on_navigation(7, "https://youtube.com/c").unwrap();

        let restores = blocker.disable();

        assert_eq!(
            restores,
            vec![
                Restore {
                    tab_id: 3,
                    url: "https://reddit.com/b".to_string()
                },
                Restore {
                    tab_id: 7,
                    url: "https://youtube.com/c".to_string()
                },
            ]
        );
        assert_eq!(blocker.state(), &BlockState::Disabled);
        assert!(blocker.disable().is_empty());
    }

    #[test]
    fn test_bad_url_is_an_error_not_a_block() {
        let mut blocker = enabled(&["youtube.com"], true);

        assert!(matches!(
            blocker.on_navigation(1, "::not a url::"),
            Err(FocusError::InvalidUrl { .. })
        ));
        assert_eq!(blocker.remembered(1), None);
    }
}
