//! `quill config` — Configuration management commands.

use quill_config::AppConfig;

pub fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating {}", AppConfig::config_path().display());

    match AppConfig::load() {
        Ok(config) => {
            println!("   ✅ Config parsed successfully");

            let mut warnings = Vec::new();
            if !config.has_api_key() && config.default_provider != "ollama" {
                warnings.push("No API key set (set QUILL_API_KEY or OPENAI_API_KEY)");
            }
            if !config.editor.streaming && config.editor.pacing_delay_ms > 0 {
                warnings.push("editor.pacing_delay_ms has no effect while streaming is off");
            }

            if warnings.is_empty() {
                println!("   ✅ All checks passed");
            } else {
                println!();
                for w in &warnings {
                    println!("   ⚠️  {w}");
                }
            }

            println!();
            println!("   Provider:        {}", config.default_provider);
            println!("   Model:           {}", config.default_model);
            println!("   Tool rounds:     {}", config.agent.max_tool_iterations);
            println!(
                "   Streaming:       {} ({} ms per word)",
                config.editor.streaming, config.editor.pacing_delay_ms
            );
        }
        Err(e) => {
            println!("   ❌ Config error: {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

pub fn show() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", toml::to_string_pretty(&redacted(config))?);
    Ok(())
}

pub fn path() -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", AppConfig::config_path().display());
    Ok(())
}

/// Replace every API key with a placeholder.
fn redacted(mut config: AppConfig) -> AppConfig {
    let mask = |key: &mut Option<String>| {
        if key.is_some() {
            *key = Some("***".into());
        }
    };
    mask(&mut config.api_key);
    for provider in config.providers.values_mut() {
        mask(&mut provider.api_key);
    }
    config
}
