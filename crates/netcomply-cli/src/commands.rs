//! Subcommand implementations

use anyhow::{bail, Result};
use netcomply_client::{ClientConfig, HttpRuleGateway};
use netcomply_core::{Rule, RuleId};
use netcomply_rules::{InMemoryRuleGateway, RuleBundle, RuleDraft, RulePersistenceGateway};
use std::collections::HashMap;
use std::path::Path;
use tracing::{error, info};

use crate::cli::Commands;

/// Run a subcommand against the configured rules API
pub async fn run(command: Commands, config: &ClientConfig) -> Result<()> {
    match command {
        Commands::Validate { bundle } => validate(&bundle),
        Commands::List => {
            let gateway = connect(config)?;
            print_rules(&gateway.list().await?);
            Ok(())
        }
        Commands::Apply { bundle, dry_run } => {
            let gateway = connect(config)?;
            apply(&bundle, &gateway, dry_run).await
        }
        Commands::Toggle { id } => {
            let gateway = connect(config)?;
            let rule = gateway.toggle(id).await?;
            println!(
                "Rule {} ({}) is now {}",
                rule.id,
                rule.name,
                if rule.enabled { "enabled" } else { "disabled" }
            );
            Ok(())
        }
        Commands::Delete { id } => {
            let gateway = connect(config)?;
            gateway.delete(id).await?;
            println!("Deleted rule {}", id);
            Ok(())
        }
    }
}

fn connect(config: &ClientConfig) -> Result<HttpRuleGateway> {
    let gateway = HttpRuleGateway::new(config)?;
    info!("Rules API: {}", gateway.base_url());
    Ok(gateway)
}

/// Build every draft in a bundle and report the result
pub fn validate(bundle: &Path) -> Result<()> {
    let drafts = load_drafts(bundle)?;
    let checks: usize = drafts.iter().map(|d| d.checks().len()).sum();

    println!(
        "{}: {} rules, {} checks, all valid",
        bundle.display(),
        drafts.len(),
        checks
    );
    Ok(())
}

/// Save every draft in a bundle, updating rules whose name already exists.
///
/// Failures are reported per rule; the remaining rules are still applied.
pub async fn apply(
    bundle: &Path,
    gateway: &dyn RulePersistenceGateway,
    dry_run: bool,
) -> Result<()> {
    let drafts = load_drafts(bundle)?;
    let existing = gateway.list().await?;

    let staging;
    let target: &dyn RulePersistenceGateway = if dry_run {
        info!("Dry run: applying to a local copy of {} rules", existing.len());
        staging = InMemoryRuleGateway::with_rules(existing.clone());
        &staging
    } else {
        gateway
    };

    let ids: HashMap<&str, RuleId> = existing.iter().map(|r| (r.name.as_str(), r.id)).collect();
    let mut failures = 0usize;

    for mut draft in drafts {
        draft.set_id(ids.get(draft.name.trim()).copied());
        let action = if draft.is_new() { "create" } else { "update" };

        match draft.save(target).await {
            Ok(rule) => println!(
                "{}{} rule {} ({}, {} checks)",
                if dry_run { "[dry-run] " } else { "" },
                past_tense(action),
                rule.id,
                rule.name,
                rule.checks.len()
            ),
            Err(e) => {
                failures += 1;
                error!(rule = %draft.name, action, error = %e, "Failed to apply rule");
            }
        }
    }

    if failures > 0 {
        bail!("{} rule(s) failed to apply", failures);
    }
    Ok(())
}

fn load_drafts(bundle: &Path) -> Result<Vec<RuleDraft>> {
    let drafts = RuleBundle::from_file(bundle)?.into_drafts()?;
    info!("Loaded {} rules from {}", drafts.len(), bundle.display());
    Ok(drafts)
}

fn past_tense(action: &str) -> &'static str {
    match action {
        "create" => "Created",
        _ => "Updated",
    }
}

fn print_rules(rules: &[Rule]) {
    if rules.is_empty() {
        println!("No rules");
        return;
    }

    println!(
        "{:<6} {:<8} {:<9} {:<22} {:>6}  NAME",
        "ID", "STATE", "SEVERITY", "VENDORS", "CHECKS"
    );
    for rule in rules {
        println!("{}", format_rule_row(rule));
    }
}

fn format_rule_row(rule: &Rule) -> String {
    let vendors = if rule.vendors.is_empty() {
        "-".to_string()
    } else {
        rule.vendors
            .iter()
            .map(|v| v.as_str())
            .collect::<Vec<_>>()
            .join(",")
    };

    format!(
        "{:<6} {:<8} {:<9} {:<22} {:>6}  {}",
        rule.id,
        if rule.enabled { "enabled" } else { "disabled" },
        rule.severity.as_str(),
        vendors,
        rule.checks.len(),
        rule.name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use netcomply_core::{RulePayload, Severity, VendorTag};
    use std::collections::BTreeSet;

    const BUNDLE: &str = r#"
rules:
  - name: ntp
    vendors: [cisco_xr]
    checks:
      - name: ntp-server
        filter_xml: <ntp/>
  - name: port-admin
    vendors: [nokia_sros]
    checks:
      - name: admin-state
        xpath: /configure/port
        filter: '{"admin-state": {}}'
"#;

    fn write_bundle(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("rules.yaml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn existing(name: &str) -> RulePayload {
        RulePayload {
            name: name.into(),
            description: None,
            severity: Severity::Low,
            category: None,
            enabled: true,
            vendors: BTreeSet::new(),
            checks: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_apply_creates_and_updates_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(&dir, BUNDLE);
        let gateway = InMemoryRuleGateway::new();
        let ntp = gateway.create(existing("ntp")).await.unwrap();

        apply(&bundle, &gateway, false).await.unwrap();

        let rules = gateway.list().await.unwrap();
        assert_eq!(rules.len(), 2);
        let updated = gateway.get(ntp.id).unwrap();
        assert_eq!(updated.checks.len(), 1);
        assert_eq!(updated.vendors, BTreeSet::from([VendorTag::CiscoXr]));
    }

    #[tokio::test]
    async fn test_dry_run_leaves_server_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(&dir, BUNDLE);
        let gateway = InMemoryRuleGateway::new();

        apply(&bundle, &gateway, true).await.unwrap();

        assert!(gateway.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = write_bundle(
            &dir,
            "rules:\n  - name: x\n    vendors: [nokia_sros]\n    checks:\n      - name: c\n        filter: '{bad'\n",
        );

        let err = validate(&bundle).unwrap_err();
        assert!(err.to_string().contains("rule `x`, check `c`"));
    }

    #[test]
    fn test_rule_row_formatting() {
        let rule = Rule::from_payload(3, existing("aaa"));
        let row = format_rule_row(&rule);

        assert!(row.starts_with("3 "));
        assert!(row.contains("enabled"));
        assert!(row.contains("low"));
        assert!(row.ends_with("aaa"));
    }
}
