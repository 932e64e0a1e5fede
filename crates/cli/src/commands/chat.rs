//! `kicai chat` — Interactive or single-message chat mode.

use kicai_config::AssistantConfig;
use kicai_core::design::DesignSnapshot;
use kicai_core::mode::{AnalysisContext, InteractionMode, Language};
use kicai_core::pricing::{PricingResult, PricingSource};
use kicai_pricing::PricingClient;
use kicai_session::{AssistantReply, Session, TurnOrchestrator};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

pub async fn run(
    message: Option<String>,
    snapshot_path: Option<PathBuf>,
    mode: Option<String>,
    language: Option<String>,
    context: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AssistantConfig::resolve().map_err(|e| format!("Failed to load config: {e}"))?;

    let provider = kicai_providers::from_config(&config)
        .map_err(|e| format!("Model client error: {e}"))?;
    let pricing = Arc::new(
        PricingClient::from_config(&config).map_err(|e| format!("Pricing client error: {e}"))?,
    );
    let orchestrator = TurnOrchestrator::new(provider, pricing);

    let mut session = Session::new(config);

    if let Some(mode) = mode {
        let parsed = InteractionMode::parse(&mode)
            .ok_or_else(|| format!("Unknown mode '{mode}' (analysis, advisory, assistant)"))?;
        session.set_mode(parsed);
    }
    if let Some(language) = language {
        let parsed = Language::parse(&language)
            .ok_or_else(|| format!("Unknown language '{language}' (en, nl, de, fr, es, it)"))?;
        session.set_language(parsed);
    }
    if let Some(context) = context {
        let parsed = match context.trim().to_lowercase().as_str() {
            "schematic" => AnalysisContext::Schematic,
            "pcb" | "pcb_layout" | "layout" => AnalysisContext::PcbLayout,
            other => return Err(format!("Unknown context '{other}' (schematic, pcb)").into()),
        };
        session.set_analysis_context(parsed);
    }

    // The snapshot is the host-supplied design view; without one the
    // assistant still chats, just without design-specific grounding.
    let snapshot = match snapshot_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .map_err(|e| format!("Failed to read snapshot {}: {e}", path.display()))?;
            let snapshot: DesignSnapshot = serde_json::from_str(&content)
                .map_err(|e| format!("Failed to parse snapshot {}: {e}", path.display()))?;
            println!(
                "  Loaded design: {} ({} components, {} nets)",
                snapshot.title.as_deref().unwrap_or("untitled"),
                snapshot.components.len(),
                snapshot.nets.len()
            );
            snapshot
        }
        None => DesignSnapshot::default(),
    };

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = orchestrator
            .handle_user_message(&mut session, &msg, &snapshot)
            .await?;
        eprint!("\r              \r");
        print_reply(&reply);
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  KICAI — Interactive Mode");
    println!("  ------------------------");
    println!("  Mode:     {}", session.mode().mode);
    println!("  Language: {}", session.mode().language.native_name());
    println!(
        "  Pricing:  {}",
        if session.config.is_demo() { "demo data" } else { "live" }
    );
    println!("  Model:    {}", session.config.model);
    println!();
    println!("  Commands: /mode <m>, /reset, /quit");
    println!();

    let stdin = std::io::stdin();
    loop {
        print!("  You > ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => break,
            "/reset" => {
                session.reset();
                println!("  Conversation cleared.");
                continue;
            }
            _ if input.starts_with("/mode") => {
                let arg = input.trim_start_matches("/mode").trim();
                match InteractionMode::parse(arg) {
                    Some(mode) => {
                        session.set_mode(mode);
                        println!("  Mode set to {mode}.");
                    }
                    None => println!("  Unknown mode '{arg}' (analysis, advisory, assistant)"),
                }
                continue;
            }
            _ => {}
        }

        eprint!("  ...");
        match orchestrator
            .handle_user_message(&mut session, input, &snapshot)
            .await
        {
            Ok(reply) => {
                eprint!("\r     \r");
                println!();
                print_reply(&reply);
                println!();
            }
            Err(e) => {
                eprint!("\r     \r");
                eprintln!("  [Error] {e}");
                println!();
            }
        }
    }

    println!();
    println!("  Goodbye!");
    Ok(())
}

fn print_reply(reply: &AssistantReply) {
    for line in reply.content.lines() {
        println!("  Assistant > {line}");
    }
    if let Some(pricing) = &reply.pricing {
        println!();
        print_pricing(pricing);
    }
}

fn print_pricing(results: &[PricingResult]) {
    let demo = results.iter().any(|r| r.source == PricingSource::Demo);
    if demo {
        println!("  Pricing (demo data, not live):");
    } else {
        println!("  Pricing (live distributor data):");
    }
    for result in results {
        match &result.best_offer {
            Some(best) => println!(
                "    {:<8} {} {:.4} at {} ({} in stock)",
                result.component_ref,
                best.currency,
                best.unit_price,
                best.distributor,
                best.stock_quantity
            ),
            None => println!("    {:<8} no offers", result.component_ref),
        }
    }
}
