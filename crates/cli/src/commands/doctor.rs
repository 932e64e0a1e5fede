//! `kicai doctor` — Diagnose system health.

use kicai_config::AssistantConfig;
use kicai_core::inference::InferenceProvider;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("KICAI Doctor — System Diagnostics");
    println!("=================================\n");

    let mut issues = 0;

    // Check config
    let config_path = AssistantConfig::config_path();
    let config = if config_path.exists() {
        match AssistantConfig::resolve() {
            Ok(config) => {
                println!("  [ok] Config file valid: {}", config_path.display());
                Some(config)
            }
            Err(e) => {
                println!("  [!!] Config file invalid: {e}");
                issues += 1;
                None
            }
        }
    } else {
        println!("  [--] No config file — run `kicai onboard` (defaults in effect)");
        Some(AssistantConfig::default())
    };

    if let Some(config) = config {
        // Pricing credential
        if config.is_demo() {
            println!("  [--] Demo pricing mode (no credential, or demo_mode forced)");
        } else {
            println!("  [ok] Pricing credential configured");
        }

        // Model server reachability
        match kicai_providers::from_config(&config) {
            Ok(provider) => match provider.health_check().await {
                Ok(true) => println!("  [ok] Ollama reachable at {}", config.ollama_url),
                Ok(false) => {
                    println!("  [!!] Ollama responded with an error at {}", config.ollama_url);
                    issues += 1;
                }
                Err(e) => {
                    println!("  [!!] Cannot reach Ollama: {e}");
                    println!("       Start it with `ollama serve` and pull {}", config.model);
                    issues += 1;
                }
            },
            Err(e) => {
                println!("  [!!] Cannot initialize the model client: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  All checks passed.");
    } else {
        println!("  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
