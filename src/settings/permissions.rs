//! Adding rewritten-form twins to permission rule lists.

use std::fmt;

use serde_json::{Map, Value};

use super::pattern::BashPattern;
use super::SettingsError;
use crate::rewrite::Rewriter;

/// Permission lists that are migrated, in the order they are visited.
pub const LISTS: [&str; 3] = ["allow", "ask", "deny"];

/// One rule added by the migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addition {
    pub list: &'static str,
    pub rule: String,
    pub from: String,
}

impl fmt::Display for Addition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+ {}  [{}, from {}]", self.rule, self.list, self.from)
    }
}

/// Insert the rewritten form of every `Bash(...)` rule right after it.
///
/// Rules already present in the same list are not added again, so running
/// the migration twice changes nothing the second time. Returns what was
/// added; `root` is modified in place.
pub fn migrate(
    root: &mut Map<String, Value>,
    rewriter: &Rewriter<'_>,
) -> Result<Vec<Addition>, SettingsError> {
    let permissions = match root.get_mut("permissions") {
        None => return Ok(Vec::new()),
        Some(Value::Object(permissions)) => permissions,
        Some(_) => {
            return Err(SettingsError::WrongType {
                key: "permissions".to_string(),
                expected: "an object",
            })
        }
    };

    let mut additions = Vec::new();
    for list in LISTS {
        let rules = match permissions.get_mut(list) {
            None => continue,
            Some(Value::Array(rules)) => rules,
            Some(_) => {
                return Err(SettingsError::WrongType {
                    key: format!("permissions.{list}"),
                    expected: "an array",
                })
            }
        };
        let added = migrate_list(list, rules, rewriter);
        tracing::debug!(list, added = added.len(), "migrated permission list");
        additions.extend(added);
    }
    Ok(additions)
}

fn migrate_list(
    list: &'static str,
    rules: &mut Vec<Value>,
    rewriter: &Rewriter<'_>,
) -> Vec<Addition> {
    let mut present: Vec<String> = rules
        .iter()
        .filter_map(|r| r.as_str().map(String::from))
        .collect();
    let mut additions = Vec::new();
    let mut migrated = Vec::with_capacity(rules.len());

    for value in rules.drain(..) {
        let forms = value
            .as_str()
            .and_then(BashPattern::parse)
            .map(|pattern| twins(&pattern, rewriter))
            .unwrap_or_default();
        let from = value.as_str().map(String::from);
        migrated.push(value);

        let Some(from) = from else { continue };
        for twin in forms {
            if present.contains(&twin) {
                continue;
            }
            present.push(twin.clone());
            migrated.push(Value::String(twin.clone()));
            additions.push(Addition {
                list,
                rule: twin,
                from: from.clone(),
            });
        }
    }

    *rules = migrated;
    additions
}

/// Rewritten rules for one pattern, in the pattern's own form.
fn twins(pattern: &BashPattern, rewriter: &Rewriter<'_>) -> Vec<String> {
    rewriter
        .rewrite_prefix(&pattern.command)
        .into_iter()
        .map(|command| pattern.with_command(&command).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    fn run(settings: Value) -> (Value, Vec<Addition>) {
        run_with(settings, &Config::default())
    }

    fn run_with(settings: Value, config: &Config) -> (Value, Vec<Addition>) {
        let Value::Object(mut root) = settings else {
            panic!("settings must be an object");
        };
        let rewriter = Rewriter::new(config);
        let additions = migrate(&mut root, &rewriter).unwrap();
        (Value::Object(root), additions)
    }

    #[test]
    fn twin_inserted_after_original() {
        let (settings, additions) = run(json!({
            "permissions": {"allow": ["Bash(git status:*)", "Read(./src/**)", "Bash(cargo test *)"]}
        }));
        assert_eq!(
            settings["permissions"]["allow"],
            json!([
                "Bash(git status:*)",
                "Bash(rtk git status:*)",
                "Read(./src/**)",
                "Bash(cargo test *)",
                "Bash(rtk cargo test *)"
            ])
        );
        assert_eq!(additions.len(), 2);
        assert_eq!(
            additions[0].to_string(),
            "+ Bash(rtk git status:*)  [allow, from Bash(git status:*)]"
        );
    }

    #[test]
    fn every_list_migrated() {
        let (settings, additions) = run(json!({
            "permissions": {
                "allow": ["Bash(ls:*)"],
                "ask": ["Bash(git push:*)"],
                "deny": ["Bash(curl:*)"]
            }
        }));
        assert_eq!(settings["permissions"]["ask"][1], "Bash(rtk git push:*)");
        assert_eq!(settings["permissions"]["deny"][1], "Bash(rtk curl:*)");
        let lists: Vec<&str> = additions.iter().map(|a| a.list).collect();
        assert_eq!(lists, vec!["allow", "ask", "deny"]);
    }

    #[test]
    fn bare_program_maps_to_heads() {
        let (settings, _) = run(json!({"permissions": {"allow": ["Bash(cat:*)", "Bash(pnpm:*)"]}}));
        assert_eq!(
            settings["permissions"]["allow"],
            json!([
                "Bash(cat:*)",
                "Bash(rtk read:*)",
                "Bash(pnpm:*)",
                "Bash(rtk vitest run:*)",
                "Bash(rtk lint:*)",
                "Bash(rtk pnpm:*)"
            ])
        );
    }

    #[test]
    fn exact_rule_rewritten_with_transform() {
        let (settings, _) = run(json!({"permissions": {"allow": ["Bash(head -20 README.md)"]}}));
        assert_eq!(
            settings["permissions"]["allow"][1],
            "Bash(rtk read README.md --max-lines 20)"
        );
    }

    #[test]
    fn migration_is_idempotent() {
        let (once, first) = run(json!({"permissions": {"allow": ["Bash(git log:*)", "Bash(git:*)"]}}));
        assert_eq!(first.len(), 2);
        let (twice, second) = run(once.clone());
        assert!(second.is_empty());
        assert_eq!(once, twice);
    }

    #[test]
    fn existing_twin_not_duplicated() {
        let (settings, additions) = run(json!({
            "permissions": {"allow": ["Bash(rtk git diff:*)", "Bash(git diff:*)"]}
        }));
        assert!(additions.is_empty());
        assert_eq!(settings["permissions"]["allow"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn unrewritable_rules_untouched() {
        let (settings, additions) = run(json!({
            "permissions": {"allow": ["Bash(make:*)", "Bash(rtk:*)", "WebSearch", 42]}
        }));
        assert!(additions.is_empty());
        assert_eq!(
            settings["permissions"]["allow"],
            json!(["Bash(make:*)", "Bash(rtk:*)", "WebSearch", 42])
        );
    }

    #[test]
    fn excluded_programs_not_migrated() {
        let config = Config::parse(r#"exclude "curl""#).unwrap();
        let (_, additions) = run_with(json!({"permissions": {"allow": ["Bash(curl:*)"]}}), &config);
        assert!(additions.is_empty());
    }

    #[test]
    fn missing_permissions_is_no_op() {
        let (settings, additions) = run(json!({"model": "opus"}));
        assert!(additions.is_empty());
        assert_eq!(settings, json!({"model": "opus"}));
    }

    #[test]
    fn wrong_types_are_errors() {
        let config = Config::default();
        let rewriter = Rewriter::new(&config);

        let mut root = Map::new();
        root.insert("permissions".into(), json!([]));
        assert!(matches!(
            migrate(&mut root, &rewriter).unwrap_err(),
            SettingsError::WrongType { .. }
        ));

        let mut root = Map::new();
        root.insert("permissions".into(), json!({"allow": "Bash(ls)"}));
        match migrate(&mut root, &rewriter).unwrap_err() {
            SettingsError::WrongType { key, .. } => assert_eq!(key, "permissions.allow"),
            other => panic!("expected WrongType, got {other:?}"),
        }
    }
}
