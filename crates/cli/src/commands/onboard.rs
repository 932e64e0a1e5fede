//! `kicai onboard` — First-time setup.

use kicai_config::AssistantConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AssistantConfig::config_dir();
    let config_path = AssistantConfig::config_path();

    println!("KICAI — First-Time Setup");
    println!("========================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("  Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("\n  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or delete and re-run onboard.\n");
    } else {
        std::fs::write(&config_path, AssistantConfig::default_toml())?;
        println!("  Created config.toml at: {}", config_path.display());
        println!("\n  Next steps:");
        println!("    1. Make sure Ollama is running: ollama serve");
        println!("    2. Pull the model: ollama pull llama3.2:3b");
        println!("    3. Optional: add a Nexar token for live pricing");
        println!("       (api_key in config.toml, or the NEXAR_TOKEN env var)");
        println!("    4. Run: kicai chat\n");
    }

    println!("  Setup complete. The assistant starts in demo pricing mode");
    println!("  until a credential is configured.\n");

    Ok(())
}
