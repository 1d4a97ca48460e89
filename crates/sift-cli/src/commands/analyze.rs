//! Full pipeline command implementation

use std::path::Path;

use anyhow::Result;
use sift_core::ai::CompletionClient;
use sift_core::models::{AnalysisReport, FileManifest};
use sift_core::pipeline::StatementPipeline;

use super::ensure_supported_input;

/// Run the full analysis pipeline on one statement and print a summary
pub async fn cmd_analyze(
    ai: CompletionClient,
    file: &Path,
    prefix: Option<&str>,
    output_dir: Option<&Path>,
    no_save: bool,
) -> Result<()> {
    ensure_supported_input(file)?;

    println!("📄 Analyzing bank statement: {}", file.display());

    let mut pipeline = StatementPipeline::new(ai);
    if let Some(dir) = output_dir {
        pipeline = pipeline.with_output_dir(dir);
    }

    let result = pipeline.process(file).await;
    if !no_save {
        let files = pipeline.save_artifacts(&result, prefix);
        print_manifest(&files);
    }

    println!();
    println!("✅ Processing complete");
    print_summary(&result.financial_analysis);

    Ok(())
}

fn print_manifest(files: &FileManifest) {
    println!();
    println!("Generated files:");
    print_artifact("ocr", files.ocr_file.as_deref());
    print_artifact("structured", files.json_file.as_deref());
    print_artifact("analysis", files.analysis_file.as_deref());
    print_artifact("categorized", files.categorized_file.as_deref());
    print_artifact("complete", files.complete_file.as_deref());
}

fn print_artifact(label: &str, path: Option<&Path>) {
    match path {
        Some(p) => println!("  ✓ {}: {}", label, p.display()),
        None => println!("  ⚠️  {}: not written", label),
    }
}

fn print_summary(analysis: &AnalysisReport) {
    let spending = &analysis.spending_insights;

    println!();
    println!("Financial summary:");
    println!("  Total transactions: {}", analysis.total_transactions);
    println!("  Total spent:  ${:.2}", spending.total_spent);
    println!("  Total earned: ${:.2}", spending.total_earned);
    println!("  Net flow:     ${:.2}", spending.net_flow);

    if !analysis.top_categories.is_empty() {
        println!();
        println!("Spending by category:");
        for (category, amount) in &analysis.top_categories {
            println!("  - {}: ${:.2}", category, amount);
        }
    }
}
