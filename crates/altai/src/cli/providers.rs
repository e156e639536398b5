//! The `altai providers` command.

use altai_core::Provider;

/// Print each provider with its default model and key variable.
pub fn execute() -> anyhow::Result<()> {
    for line in provider_lines() {
        println!("{line}");
    }
    Ok(())
}

fn provider_lines() -> Vec<String> {
    let mut lines = vec![format!("{:<10} {:<50} {}", "PROVIDER", "DEFAULT MODEL", "API KEY ENV")];
    lines.extend(Provider::ALL.iter().map(|p| {
        format!(
            "{:<10} {:<50} {}",
            p.as_str(),
            p.defaults().model,
            p.api_key_env()
        )
    }));
    lines
}
