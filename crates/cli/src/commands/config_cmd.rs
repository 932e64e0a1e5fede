//! `kicai config` — Show or edit settings.

use clap::Subcommand;
use kicai_config::AssistantConfig;
use kicai_core::mode::{InteractionMode, Language};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the resolved configuration (credential redacted)
    Show,

    /// Set the pricing credential (pass an empty string to clear it)
    SetKey { key: String },

    /// Force or release demo pricing mode
    SetDemo { enabled: bool },

    /// Set the default interaction mode
    SetMode { mode: String },

    /// Set the reply language
    SetLanguage { language: String },
}

pub async fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Show => {
            let config = AssistantConfig::resolve()?;
            println!("  Config file: {}", AssistantConfig::config_path().display());
            println!("{config:#?}");
            println!(
                "\n  Effective pricing mode: {}",
                if config.is_demo() { "demo" } else { "live" }
            );
        }
        ConfigAction::SetKey { key } => {
            let mut config = AssistantConfig::load_from(&AssistantConfig::config_path())?;
            config.set_api_key(key);
            config.save()?;
            if config.api_key.is_some() {
                println!("  Credential stored; live pricing enabled.");
            } else {
                println!("  Credential cleared; back to demo pricing.");
            }
        }
        ConfigAction::SetDemo { enabled } => {
            let mut config = AssistantConfig::load_from(&AssistantConfig::config_path())?;
            config.demo_mode = enabled;
            config.save()?;
            println!("  demo_mode = {enabled}");
        }
        ConfigAction::SetMode { mode } => {
            let parsed = InteractionMode::parse(&mode)
                .ok_or_else(|| format!("Unknown mode '{mode}' (analysis, advisory, assistant)"))?;
            let mut config = AssistantConfig::load_from(&AssistantConfig::config_path())?;
            config.ai_mode = parsed;
            config.save()?;
            println!("  Default mode set to {parsed}.");
        }
        ConfigAction::SetLanguage { language } => {
            let parsed = Language::parse(&language)
                .ok_or_else(|| format!("Unknown language '{language}' (en, nl, de, fr, es, it)"))?;
            let mut config = AssistantConfig::load_from(&AssistantConfig::config_path())?;
            config.language = parsed;
            config.save()?;
            println!("  Reply language set to {}.", parsed.native_name());
        }
    }

    Ok(())
}
