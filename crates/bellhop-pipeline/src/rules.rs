// SPDX-FileCopyrightText: 2026 Bellhop Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule evaluation: resolves the matched push rule's tweaks into a
//! [`MatchedRule`] the synthesizer can dispatch on.

use serde_json::Value;

use bellhop_core::traits::SyncService;
use bellhop_core::types::{Event, MatchedRule, PushRule, PushRuleAction, RoomState};

/// Canonical default sound asset name; the `"default"` tweak value is
/// remapped to this.
pub const DEFAULT_SOUND_NAME: &str = "message.caf";

/// Evaluates which rule matches the event and resolves its tweaks.
///
/// Returns `None` when no rule matched, which downstream treats as
/// not-highlighted and soundless.
pub async fn evaluate(
    sync: &dyn SyncService,
    event: &Event,
    room_state: &RoomState,
) -> Option<MatchedRule> {
    let rule = sync.push_rule_matching(event, room_state).await?;
    Some(resolve_actions(&rule))
}

/// Resolves a rule's action list into the policy the pipeline cares about.
///
/// A `highlight` tweak with no explicit value counts as highlighted. A
/// `sound` tweak value of `"default"` is remapped to the canonical default
/// sound asset name.
pub fn resolve_actions(rule: &PushRule) -> MatchedRule {
    let mut highlight = false;
    let mut sound = None;

    for action in &rule.actions {
        let PushRuleAction::SetTweak { tweak, value } = action else {
            continue;
        };
        match tweak.as_str() {
            "highlight" => {
                if value.is_none() || value.as_ref().and_then(Value::as_bool) == Some(true) {
                    highlight = true;
                }
            }
            "sound" => {
                sound = value.as_ref().and_then(Value::as_str).map(|name| {
                    if name == "default" {
                        DEFAULT_SOUND_NAME.to_string()
                    } else {
                        name.to_string()
                    }
                });
            }
            _ => {}
        }
    }

    MatchedRule { highlight, sound }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rule(actions: Vec<PushRuleAction>) -> PushRule {
        PushRule {
            rule_id: ".m.rule.test".into(),
            actions,
        }
    }

    fn tweak(name: &str, value: Option<Value>) -> PushRuleAction {
        PushRuleAction::SetTweak {
            tweak: name.into(),
            value,
        }
    }

    #[test]
    fn absent_highlight_value_counts_as_highlighted() {
        let matched = resolve_actions(&rule(vec![tweak("highlight", None)]));
        assert!(matched.highlight);
    }

    #[test]
    fn explicit_false_highlight_is_not_highlighted() {
        let matched = resolve_actions(&rule(vec![tweak("highlight", Some(json!(false)))]));
        assert!(!matched.highlight);
    }

    #[test]
    fn explicit_true_highlight_is_highlighted() {
        let matched = resolve_actions(&rule(vec![tweak("highlight", Some(json!(true)))]));
        assert!(matched.highlight);
    }

    #[test]
    fn default_sound_is_remapped() {
        let matched = resolve_actions(&rule(vec![tweak("sound", Some(json!("default")))]));
        assert_eq!(matched.sound.as_deref(), Some(DEFAULT_SOUND_NAME));
    }

    #[test]
    fn custom_sound_passes_through() {
        let matched = resolve_actions(&rule(vec![tweak("sound", Some(json!("bell.wav")))]));
        assert_eq!(matched.sound.as_deref(), Some("bell.wav"));
    }

    #[test]
    fn no_tweaks_means_no_highlight_no_sound() {
        let matched = resolve_actions(&rule(vec![PushRuleAction::Notify]));
        assert!(!matched.highlight);
        assert!(matched.sound.is_none());
    }
}
