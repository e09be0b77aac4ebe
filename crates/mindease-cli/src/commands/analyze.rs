//! `mindease analyze`: show the routing decision without sending anything

use super::build_router;
use crate::console::CliConsole;
use anyhow::Result;
use mindease_core::AppConfig;
use mindease_core::router::classify;

pub fn run(console: &CliConsole, config: &AppConfig, message: &str) -> Result<()> {
    let router = build_router(config)?;
    let classification = classify(message);
    let decision = router.analyze(message);

    console.print_header("Message analysis");
    console.print_field("Category", &classification.category.to_string());
    console.print_field(
        "Scores",
        &format!(
            "complex {:.1}, practical {:.1}",
            classification.complex_score, classification.practical_score
        ),
    );
    console.print_field("Selection", &router.routing().selection.to_string());

    let configured: Vec<&str> = router.registry().ids().iter().map(|id| id.as_str()).collect();
    console.print_field(
        "Configured",
        &if configured.is_empty() {
            "none".to_string()
        } else {
            configured.join(", ")
        },
    );

    console.print_header("Decision");
    console.print_field("Provider", decision.chosen_provider.display_name());
    console.print_field("Confidence", &format!("{}%", decision.confidence_percent()));
    console.print_field("Reason", &decision.reason);
    Ok(())
}
