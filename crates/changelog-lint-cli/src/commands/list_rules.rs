//! List rules command implementation.

use changelog_lint_rules::{Preset, RULES};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<32} {:<10} Description", "Code", "Name", "Scope");
    println!("{}", "-".repeat(96));

    for rule in RULES {
        println!(
            "{:<8} {:<32} {:<10} {}",
            rule.code,
            rule.name,
            rule.scope.to_string(),
            rule.description
        );
        if !rule.required_options.is_empty() {
            println!(
                "{:<52} requires: {}",
                "",
                rule.required_options.join(", ")
            );
        }
    }

    println!("\nPresets:");
    for (label, preset) in [
        ("recommended", Preset::Recommended),
        ("strict", Preset::Strict),
        ("minimal", Preset::Minimal),
    ] {
        let default = if preset == Preset::default() {
            " (default)"
        } else {
            ""
        };
        println!("  {label:<12} - {}{default}", preset.rule_names().join(", "));
    }

    println!("\nUse --rules to select specific rules, e.g.:");
    println!("  changelog-lint check --rules no-tabs,index-name-unique-suffix");
    println!("  changelog-lint check --rules CL003,CL020");
}
