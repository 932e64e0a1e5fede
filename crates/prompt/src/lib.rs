//! System prompt compilation — the behavioral contract for a turn.
//!
//! `PromptCompiler` assembles a structured system prompt from five sections:
//!
//! 1. **Role preamble** — schematic reviewer vs PCB engineer
//! 2. **Mode contract** — what the assistant may and may not propose
//! 3. **Language declaration** — the reply language tag
//! 4. **Design digest** — a size-bounded summary of the loaded project
//! 5. **Pricing section** — provenance-labeled distributor data, if any
//!
//! # Determinism
//!
//! Compilation is pure: identical inputs always produce byte-identical
//! output. No random or time-dependent content is emitted (offer timestamps
//! are deliberately omitted from the rendered pricing lines).

use kicai_core::design::DesignSnapshot;
use kicai_core::mode::{AnalysisContext, InteractionMode, ModeConfig};
use kicai_core::pricing::{PricingResult, PricingSource};
use kicai_core::turn::Turn;

/// Most component lines rendered into the design digest.
const MAX_COMPONENT_LINES: usize = 20;
/// Most net names rendered into the design digest.
const MAX_NET_LINES: usize = 10;
/// Most trailing turns recapped into the prompt.
const MAX_RECAP_TURNS: usize = 6;
/// Per-turn truncation for the conversation recap.
const MAX_RECAP_CHARS: usize = 200;

/// The prompt compiler. Stateless — create one and reuse it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptCompiler;

impl PromptCompiler {
    pub fn new() -> Self {
        Self
    }

    /// Compile the system prompt for one turn.
    ///
    /// Never fails: an empty snapshot produces a prompt with a "no project
    /// data" note so chat works before any design is loaded.
    pub fn compile(
        &self,
        mode: &ModeConfig,
        window: &[Turn],
        snapshot: &DesignSnapshot,
        pricing: Option<&[PricingResult]>,
    ) -> String {
        let mut out = String::with_capacity(2048);

        out.push_str(role_preamble(mode.context));
        out.push_str("\n\n");
        out.push_str(mode_contract(mode.mode));
        out.push_str("\n\n");

        out.push_str(&format!(
            "Reply in {} (language tag: {}). Every response must be written in {}.",
            mode.language.native_name(),
            mode.language.tag(),
            mode.language.native_name(),
        ));
        out.push_str("\n\n");

        out.push_str(&design_digest(snapshot, mode.context));

        if let Some(results) = pricing {
            if !results.is_empty() {
                out.push_str("\n\n");
                out.push_str(&pricing_section(results));
            }
        }

        if !window.is_empty() {
            out.push_str("\n\n");
            out.push_str(&conversation_recap(window));
        }

        out
    }
}

fn role_preamble(context: AnalysisContext) -> &'static str {
    match context {
        AnalysisContext::Schematic => {
            "You are an expert electronic circuit designer and schematic review \
             specialist assisting a user inside their design tool. When the user asks \
             about components, circuits, or connections, reference the actual schematic \
             data provided below. Focus on circuit functionality, component selection, \
             and electrical design principles."
        }
        AnalysisContext::PcbLayout => {
            "You are an expert PCB design engineer assisting a user inside their design \
             tool. When the user asks about specific components (like resistors, \
             capacitors, ICs), look up the actual component details from the board data \
             provided below and reference real values and designators. Focus on \
             placement, routing, and manufacturing considerations."
        }
    }
}

fn mode_contract(mode: InteractionMode) -> &'static str {
    match mode {
        InteractionMode::Analysis => {
            "ANALYSIS MODE: provide analysis and recommendations only. Never propose a \
             direct modification to the design; phrase every suggestion as information \
             or options the user may consider. Do not present modification \
             instructions as numbered steps."
        }
        InteractionMode::Advisory => {
            "ADVISORY MODE: when suggesting a change, lay it out as a numbered step \
             sequence (1, 2, 3, ...). End every modification-related answer with an \
             explicit confirmation question, such as 'Would you like me to guide you \
             through this?', before the user acts on it."
        }
        InteractionMode::Assistant => {
            "ASSISTANT MODE: you may give directive step-by-step guidance and name the \
             exact menu, button, or panel to interact with. Always close \
             modification-related answers by disclosing that this assistant never \
             modifies the design itself; the user performs every change by hand."
        }
    }
}

/// Bounded textual digest of the design snapshot.
///
/// Caps component and net lines at fixed counts so the digest cannot grow
/// without bound with design size.
fn design_digest(snapshot: &DesignSnapshot, context: AnalysisContext) -> String {
    if snapshot.is_empty() {
        return "## Current design\n\
                No project data available. Answer general design questions, and note \
                that loading a project enables design-specific analysis."
            .to_string();
    }

    let heading = match context {
        AnalysisContext::Schematic => "## Current schematic",
        AnalysisContext::PcbLayout => "## Current board",
    };

    let mut out = String::new();
    out.push_str(heading);
    out.push('\n');

    if let Some(title) = &snapshot.title {
        out.push_str(&format!("Project: {title}\n"));
    }
    out.push_str(&format!("Components: {}\n", snapshot.components.len()));
    out.push_str(&format!("Nets: {}\n", snapshot.nets.len()));

    if let Some(stats) = &snapshot.stats {
        out.push_str(&format!(
            "Board: {:.1} x {:.1} mm, {} copper layers, {} tracks\n",
            stats.width_mm, stats.height_mm, stats.copper_layers, stats.track_count
        ));
    }

    if !snapshot.components.is_empty() {
        let shown = snapshot.components.len().min(MAX_COMPONENT_LINES);
        out.push_str("Component list:\n");
        for entry in &snapshot.components[..shown] {
            out.push_str(&format!(
                "  {}: {} ({})\n",
                entry.reference, entry.value, entry.footprint
            ));
        }
        let hidden = snapshot.components.len() - shown;
        if hidden > 0 {
            out.push_str(&format!("  (+{hidden} more components)\n"));
        }
    }

    if !snapshot.nets.is_empty() {
        let shown = snapshot.nets.len().min(MAX_NET_LINES);
        out.push_str(&format!("Key nets: {}", snapshot.nets[..shown].join(", ")));
        let hidden = snapshot.nets.len() - shown;
        if hidden > 0 {
            out.push_str(&format!(" (+{hidden} more)"));
        }
        out.push('\n');
    }

    // Drop the trailing newline for stable concatenation
    while out.ends_with('\n') {
        out.pop();
    }
    out
}

/// Pricing data as a distinct, provenance-labeled section.
///
/// The header reflects the source so the model can (and must) disclose to the
/// user whether prices are live or synthetic. Demo data presented as live
/// pricing would be a trust violation, so the demo label is unambiguous.
fn pricing_section(results: &[PricingResult]) -> String {
    let all_demo = results.iter().all(|r| r.source == PricingSource::Demo);

    let mut out = String::new();
    if all_demo {
        out.push_str(
            "## Component pricing (DEMO data)\n\
             The prices below are synthetic demonstration data, NOT live distributor \
             pricing. When you mention any of these prices, state clearly that they \
             are demo values.\n",
        );
    } else {
        out.push_str(
            "## Component pricing (live distributor data)\n\
             The prices below were fetched from distributors. Treat them as \
             authoritative facts and cite them as live data, in preference to any \
             price you might infer yourself.\n",
        );
    }

    for result in results {
        let tag = match result.source {
            PricingSource::Live => "live",
            PricingSource::Demo => "demo",
        };
        match &result.best_offer {
            Some(best) => {
                out.push_str(&format!(
                    "  {} [{}]: best {} {:.4} {} (stock {})",
                    result.component_ref,
                    tag,
                    best.distributor,
                    best.unit_price,
                    best.currency,
                    best.stock_quantity
                ));
                let others: Vec<String> = result
                    .offers
                    .iter()
                    .filter(|o| o.distributor != best.distributor)
                    .map(|o| format!("{} {:.4}", o.distributor, o.unit_price))
                    .collect();
                if !others.is_empty() {
                    out.push_str(&format!("; also {}", others.join(", ")));
                }
                out.push('\n');
            }
            None => {
                out.push_str(&format!("  {} [{}]: no offers found\n", result.component_ref, tag));
            }
        }
    }

    while out.ends_with('\n') {
        out.pop();
    }
    out
}

/// Trailing conversation recap, bounded in turns and characters.
fn conversation_recap(window: &[Turn]) -> String {
    let start = window.len().saturating_sub(MAX_RECAP_TURNS);
    let mut out = String::from("## Recent conversation\n");
    for turn in &window[start..] {
        let mut content = turn.content.clone();
        if content.chars().count() > MAX_RECAP_CHARS {
            content = content.chars().take(MAX_RECAP_CHARS).collect::<String>() + "...";
        }
        out.push_str(&format!("{}: {}\n", turn.role.label(), content));
    }
    out.push_str("Build on this conversation where relevant.");
    out
}
