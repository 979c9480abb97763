//! Rule and focus-group management
//!
//! [`RuleStore`] owns a storage port and exposes the mutations the UI layer
//! performs: adding and removing block rules (permanent, scheduled, or
//! incognito-only) and maintaining focus groups. URLs are validated for
//! scheme eligibility and duplicates are rejected before anything is written.

use serde::de::DeserializeOwned;
use serde::Serialize;

use sf_core::schedule::TimeWindow;
use sf_core::types::{BlockRule, FocusGroup};
use sf_core::url::is_eligible_scheme;

use crate::store::{StoragePort, StoreError};

// Stored key layout. Shared by every backend.
pub const KEY_BLOCK_SITES: &str = "block_sites";
pub const KEY_INCOGNITO_BLOCK_SITES: &str = "incognito_block_sites";
pub const KEY_FOCUS_GROUPS: &str = "focus_groups";

/// Rule management over an injected storage port.
pub struct RuleStore<P: StoragePort> {
    port: P,
}

impl<P: StoragePort> RuleStore<P> {
    pub fn new(port: P) -> Self {
        Self { port }
    }

    pub fn into_port(self) -> P {
        self.port
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StoreError> {
        match self.port.read(key)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    fn save<T: Serialize>(&mut self, key: &str, items: &[T]) -> Result<(), StoreError> {
        self.port.write(key, serde_json::to_value(items)?)
    }

    // =========================================================================
    // Block Rules
    // =========================================================================

    /// All block rules, scheduled and permanent.
    pub fn block_rules(&self) -> Result<Vec<BlockRule>, StoreError> {
        self.load(KEY_BLOCK_SITES)
    }

    /// Rules that only apply inside incognito windows.
    pub fn incognito_rules(&self) -> Result<Vec<BlockRule>, StoreError> {
        self.load(KEY_INCOGNITO_BLOCK_SITES)
    }

    pub fn scheduled_rules(&self) -> Result<Vec<BlockRule>, StoreError> {
        Ok(self
            .block_rules()?
            .into_iter()
            .filter(|rule| rule.schedule.is_some())
            .collect())
    }

    pub fn permanent_rules(&self) -> Result<Vec<BlockRule>, StoreError> {
        Ok(self
            .block_rules()?
            .into_iter()
            .filter(|rule| rule.schedule.is_none())
            .collect())
    }

    /// Block a site at all times.
    pub fn add_permanent(&mut self, pattern: &str) -> Result<(), StoreError> {
        self.add_rule(KEY_BLOCK_SITES, BlockRule::permanent(pattern))
    }

    /// Block a site outside the given daily window.
    pub fn add_scheduled(&mut self, pattern: &str, window: TimeWindow) -> Result<(), StoreError> {
        self.add_rule(KEY_BLOCK_SITES, BlockRule::scheduled(pattern, window))
    }

    /// Block a site inside incognito windows only.
    pub fn add_incognito(&mut self, pattern: &str) -> Result<(), StoreError> {
        self.add_rule(KEY_INCOGNITO_BLOCK_SITES, BlockRule::permanent(pattern))
    }

    fn add_rule(&mut self, key: &str, rule: BlockRule) -> Result<(), StoreError> {
        if !is_eligible_scheme(&rule.pattern) {
            return Err(StoreError::IneligibleUrl(rule.pattern));
        }
        let mut rules: Vec<BlockRule> = self.load(key)?;
        if rules.iter().any(|existing| existing.pattern == rule.pattern) {
            return Err(StoreError::DuplicateRule(rule.pattern));
        }
        log::info!("adding rule {:?} under {}", rule.pattern, key);
        rules.push(rule);
        self.save(key, &rules)
    }

    pub fn remove_rule(&mut self, pattern: &str) -> Result<(), StoreError> {
        let mut rules = self.block_rules()?;
        rules.retain(|rule| rule.pattern != pattern);
        self.save(KEY_BLOCK_SITES, &rules)
    }

    pub fn remove_incognito(&mut self, pattern: &str) -> Result<(), StoreError> {
        let mut rules = self.incognito_rules()?;
        rules.retain(|rule| rule.pattern != pattern);
        self.save(KEY_INCOGNITO_BLOCK_SITES, &rules)
    }

    // =========================================================================
    // Focus Groups
    // =========================================================================

    pub fn groups(&self) -> Result<Vec<FocusGroup>, StoreError> {
        self.load(KEY_FOCUS_GROUPS)
    }

    pub fn group_by_name(&self, name: &str) -> Result<Option<FocusGroup>, StoreError> {
        Ok(self.groups()?.into_iter().find(|group| group.name == name))
    }

    /// Create an empty group; the name must be unused.
    pub fn add_group(&mut self, name: &str) -> Result<FocusGroup, StoreError> {
        let mut groups = self.groups()?;
        if groups.iter().any(|group| group.name == name) {
            return Err(StoreError::DuplicateGroup(name.to_string()));
        }
        let group = FocusGroup::new(name, Vec::new());
        groups.push(group.clone());
        self.save(KEY_FOCUS_GROUPS, &groups)?;
        Ok(group)
    }

    /// Create a group with links, or merge the links into an existing group
    /// of the same name (duplicates dropped, existing order kept).
    pub fn add_group_with_links(
        &mut self,
        name: &str,
        links: Vec<String>,
    ) -> Result<(), StoreError> {
        let mut groups = self.groups()?;
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => {
                for link in links {
                    if !group.links.contains(&link) {
                        group.links.push(link);
                    }
                }
            }
            None => groups.push(FocusGroup::new(name, links)),
        }
        self.save(KEY_FOCUS_GROUPS, &groups)
    }

    /// Add one pattern to a group, creating the group when absent.
    pub fn add_link(&mut self, name: &str, pattern: &str) -> Result<(), StoreError> {
        let mut groups = self.groups()?;
        match groups.iter_mut().find(|group| group.name == name) {
            Some(group) => group.links.push(pattern.to_string()),
            None => groups.push(FocusGroup::new(name, vec![pattern.to_string()])),
        }
        self.save(KEY_FOCUS_GROUPS, &groups)
    }

    pub fn remove_link(&mut self, name: &str, pattern: &str) -> Result<(), StoreError> {
        let mut groups = self.groups()?;
        let group = groups
            .iter_mut()
            .find(|group| group.name == name)
            .ok_or_else(|| StoreError::GroupNotFound(name.to_string()))?;
        group.links.retain(|link| link != pattern);
        self.save(KEY_FOCUS_GROUPS, &groups)
    }

    pub fn remove_group(&mut self, name: &str) -> Result<(), StoreError> {
        let mut groups = self.groups()?;
        groups.retain(|group| group.name != name);
        self.save(KEY_FOCUS_GROUPS, &groups)
    }

    /// Start or stop focusing a group. Focusing is exclusive: activating one
    /// group deactivates every other.
    pub fn set_focus(&mut self, name: &str, focusing: bool) -> Result<(), StoreError> {
        let mut groups = self.groups()?;
        if !groups.iter().any(|group| group.name == name) {
            return Err(StoreError::GroupNotFound(name.to_string()));
        }
        for group in &mut groups {
            group.is_focusing = focusing && group.name == name;
        }
        log::info!("focus {} for group {:?}", if focusing { "on" } else { "off" }, name);
        self.save(KEY_FOCUS_GROUPS, &groups)
    }

    /// Deactivate every focus session. Runs on host upgrade so a stale
    /// session cannot survive a restart.
    pub fn reset_all_focus(&mut self) -> Result<(), StoreError> {
        let mut groups = self.groups()?;
        for group in &mut groups {
            group.is_focusing = false;
        }
        self.save(KEY_FOCUS_GROUPS, &groups)
    }
}
