//! Blocking decision pipeline
//!
//! Reproduces, as a pure function over loaded rule data, the decision the
//! browser background script made on every navigation:
//!
//! 1. scheme pre-filter: non-https URLs are never blocked
//! 2. block rules: first matching rule wins; a scheduled rule blocks only
//!    outside its allowed window
//! 3. focus mode: while a group is focusing, the URL must match one of the
//!    group's patterns
//! 4. incognito rules: consulted only inside incognito windows

use sf_core::pattern::is_match;
use sf_core::schedule::TimeOfDay;
use sf_core::types::{BlockDecision, BlockReason, BlockRule, FocusGroup};
use sf_core::url::is_eligible_scheme;

use crate::handler::RuleStore;
use crate::store::{StoragePort, StoreError};

/// One navigation to be judged.
#[derive(Debug, Clone, Copy)]
pub struct Evaluation<'a> {
    pub url: &'a str,
    pub now: TimeOfDay,
    pub incognito: bool,
}

/// Decide whether a navigation should be blocked.
pub fn evaluate(
    block_rules: &[BlockRule],
    groups: &[FocusGroup],
    incognito_rules: &[BlockRule],
    eval: Evaluation<'_>,
) -> BlockDecision {
    if !is_eligible_scheme(eval.url) {
        log::debug!("{} is not an eligible scheme, allowing", eval.url);
        return BlockDecision::Allow;
    }

    if let Some(rule) = block_rules
        .iter()
        .find(|rule| is_match(eval.url, &rule.pattern))
    {
        match rule.schedule {
            Some(window) => {
                if window.should_block(eval.now) {
                    log::debug!("{} blocked by schedule {} (rule {})", eval.url, window, rule.pattern);
                    return BlockDecision::Block(BlockReason::Schedule);
                }
            }
            None => {
                log::debug!("{} blocked permanently (rule {})", eval.url, rule.pattern);
                return BlockDecision::Block(BlockReason::Permanent);
            }
        }
    }

    for group in groups.iter().filter(|group| group.is_focusing) {
        let allowed = group.links.iter().any(|link| is_match(eval.url, link));
        if !allowed {
            log::debug!("{} outside focus group {:?}, blocking", eval.url, group.name);
            return BlockDecision::Block(BlockReason::FocusMode);
        }
    }

    if eval.incognito {
        if let Some(rule) = incognito_rules
            .iter()
            .find(|rule| is_match(eval.url, &rule.pattern))
        {
            log::debug!("{} blocked in incognito (rule {})", eval.url, rule.pattern);
            return BlockDecision::Block(BlockReason::Incognito);
        }
    }

    BlockDecision::Allow
}

impl<P: StoragePort> RuleStore<P> {
    /// Load the stored rules and judge one navigation against them.
    pub fn evaluate(&self, eval: Evaluation<'_>) -> Result<BlockDecision, StoreError> {
        let block_rules = self.block_rules()?;
        let groups = self.groups()?;
        let incognito_rules = if eval.incognito {
            self.incognito_rules()?
        } else {
            Vec::new()
        };
        Ok(evaluate(&block_rules, &groups, &incognito_rules, eval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sf_core::schedule::TimeWindow;

    fn t(hour: u8, minute: u8) -> TimeOfDay {
        TimeOfDay::new(hour, minute).unwrap()
    }

    fn eval(url: &str, now: TimeOfDay) -> Evaluation<'_> {
        Evaluation {
            url,
            now,
            incognito: false,
        }
    }

    #[test]
    fn test_ineligible_scheme_is_never_blocked() {
        let rules = vec![BlockRule::permanent("http://a.com/*")];
        let decision = evaluate(&rules, &[], &[], eval("http://a.com/x", t(12, 0)));
        assert_eq!(decision, BlockDecision::Allow);

        let decision = evaluate(&rules, &[], &[], eval("chrome://extensions", t(12, 0)));
        assert_eq!(decision, BlockDecision::Allow);
    }

    #[test]
    fn test_permanent_rule_blocks() {
        let rules = vec![BlockRule::permanent("https://a.com/*")];
        let decision = evaluate(&rules, &[], &[], eval("https://a.com/feed", t(12, 0)));
        assert_eq!(decision, BlockDecision::Block(BlockReason::Permanent));

        let decision = evaluate(&rules, &[], &[], eval("https://b.com/feed", t(12, 0)));
        assert_eq!(decision, BlockDecision::Allow);
    }

    #[test]
    fn test_scheduled_rule_respects_window() {
        let window = TimeWindow::new(t(9, 0), t(17, 0));
        let rules = vec![BlockRule::scheduled("https://a.com/*", window)];

        // Inside the allowed window: reachable
        let decision = evaluate(&rules, &[], &[], eval("https://a.com/", t(12, 0)));
        assert_eq!(decision, BlockDecision::Allow);

        // Outside: blocked with the schedule reason
        let decision = evaluate(&rules, &[], &[], eval("https://a.com/", t(18, 0)));
        assert_eq!(decision, BlockDecision::Block(BlockReason::Schedule));
    }

    #[test]
    fn test_overnight_schedule_blocks_daytime() {
        let window = TimeWindow::new(t(22, 0), t(6, 0));
        let rules = vec![BlockRule::scheduled("https://a.com/*", window)];

        let decision = evaluate(&rules, &[], &[], eval("https://a.com/", t(23, 30)));
        assert_eq!(decision, BlockDecision::Allow);

        let decision = evaluate(&rules, &[], &[], eval("https://a.com/", t(12, 0)));
        assert_eq!(decision, BlockDecision::Block(BlockReason::Schedule));
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let window = TimeWindow::new(t(0, 0), t(23, 59));
        let rules = vec![
            BlockRule::scheduled("https://a.com/*", window),
            BlockRule::permanent("https://a.com/feed*"),
        ];
        // The scheduled rule matches first and its window allows the URL;
        // the later permanent rule is not consulted
        let decision = evaluate(&rules, &[], &[], eval("https://a.com/feed", t(12, 0)));
        assert_eq!(decision, BlockDecision::Allow);
    }

    #[test]
    fn test_focus_group_acts_as_allow_list() {
        let mut group = FocusGroup::new("work", vec!["https://docs.com/*".into()]);
        group.is_focusing = true;
        let groups = vec![group];

        let decision = evaluate(&[], &groups, &[], eval("https://docs.com/page", t(12, 0)));
        assert_eq!(decision, BlockDecision::Allow);

        let decision = evaluate(&[], &groups, &[], eval("https://social.com/", t(12, 0)));
        assert_eq!(decision, BlockDecision::Block(BlockReason::FocusMode));
    }

    #[test]
    fn test_inactive_focus_group_is_ignored() {
        let group = FocusGroup::new("work", vec!["https://docs.com/*".into()]);
        let decision = evaluate(&[], &[group], &[], eval("https://social.com/", t(12, 0)));
        assert_eq!(decision, BlockDecision::Allow);
    }

    #[test]
    fn test_incognito_rules_apply_only_in_incognito() {
        let incognito_rules = vec![BlockRule::permanent("https://a.com/*")];

        let decision = evaluate(
            &[],
            &[],
            &incognito_rules,
            Evaluation {
                url: "https://a.com/",
                now: t(12, 0),
                incognito: true,
            },
        );
        assert_eq!(decision, BlockDecision::Block(BlockReason::Incognito));

        let decision = evaluate(
            &[],
            &[],
            &incognito_rules,
            eval("https://a.com/", t(12, 0)),
        );
        assert_eq!(decision, BlockDecision::Allow);
    }

    #[test]
    fn test_block_rules_run_before_focus_groups() {
        let rules = vec![BlockRule::permanent("https://docs.com/*")];
        let mut group = FocusGroup::new("work", vec!["https://docs.com/*".into()]);
        group.is_focusing = true;

        // Even though the focus group allows it, the block rule fires first
        let decision = evaluate(&rules, &[group], &[], eval("https://docs.com/", t(12, 0)));
        assert_eq!(decision, BlockDecision::Block(BlockReason::Permanent));
    }

    #[test]
    fn test_store_evaluation_end_to_end() {
        use crate::store::MemoryStore;

        let mut store = RuleStore::new(MemoryStore::new());
        store.add_permanent("https://a.com/*").unwrap();
        store
            .add_group_with_links("work", vec!["https://docs.com/*".into()])
            .unwrap();
        store.set_focus("work", true).unwrap();

        let decision = store.evaluate(eval("https://a.com/", t(12, 0))).unwrap();
        assert_eq!(decision, BlockDecision::Block(BlockReason::Permanent));

        let decision = store
            .evaluate(eval("https://docs.com/page", t(12, 0)))
            .unwrap();
        assert_eq!(decision, BlockDecision::Allow);

        let decision = store.evaluate(eval("https://other.com/", t(12, 0))).unwrap();
        assert_eq!(decision, BlockDecision::Block(BlockReason::FocusMode));
    }
}
