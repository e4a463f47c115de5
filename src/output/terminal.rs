// Colored terminal output for vocabulary tables and selection results.
//
// Only the CLI calls into this module; the library itself never prints.

use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::corpus::ratio::RatioTable;
use crate::corpus::vocab::WordStat;
use crate::selection::jaded::ResultMapping;

/// Display the top of a vocabulary table.
pub fn display_vocabulary(table: &[WordStat], limit: usize) {
    let tokens: u64 = table.iter().map(|s| s.count).sum();
    println!(
        "\n{}",
        format!("=== Vocabulary ({} words, {} tokens) ===", table.len(), tokens).bold()
    );
    println!(
        "  {:>4}  {:<24} {:>10}  {:>8}",
        "Rank".dimmed(),
        "Word".dimmed(),
        "Prob".dimmed(),
        "Count".dimmed(),
    );
    println!("  {}", "-".repeat(52).dimmed());

    for (i, stat) in table.iter().take(limit).enumerate() {
        println!(
            "  {:>4}. {:<24} {:>10.6}  {:>8}",
            i + 1,
            super::truncate_chars(&stat.word, 24),
            stat.probability,
            stat.count,
        );
    }
    print_remainder(table.len(), limit);
}

/// Display the most representative-leaning and most available-leaning words.
pub fn display_ratios(ratios: &RatioTable, limit: usize) {
    let rows = ratios.sorted();
    println!(
        "\n{}",
        format!("=== Vocabulary Ratios ({} words) ===", rows.len()).bold()
    );

    println!("\n  {}", "Most representative".green());
    for (word, info) in rows.iter().take(limit) {
        println!("    {:<24} {:>12.4}", super::truncate_chars(word, 24), info.ratio());
    }

    println!("\n  {}", "Least representative".yellow());
    for (word, info) in rows.iter().rev().take(limit) {
        println!("    {:<24} {:>12.4}", super::truncate_chars(word, 24), info.ratio());
    }
}

/// Display selected lines in selection order.
pub fn display_selection(mapping: &ResultMapping, limit: usize) {
    if mapping.is_empty() {
        println!("No lines were selected.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Selection ({} lines) ===", mapping.len()).bold()
    );
    println!(
        "  {:>5}  {:>6}  {:>9}  {:<16} {}",
        "Rank".dimmed(),
        "Line".dimmed(),
        "Total".dimmed(),
        "Root word".dimmed(),
        "Text".dimmed(),
    );
    println!("  {}", "-".repeat(78).dimmed());

    for (line, record) in mapping.iter().take(limit) {
        println!(
            "  {:>5}  {:>6}  {:>9.4}  {:<16} {}",
            record.output_rank,
            record.input_line_id,
            record.total_score,
            super::truncate_chars(&record.root_word, 16).cyan(),
            super::truncate_chars(line, 60).dimmed(),
        );
    }
    print_remainder(mapping.len(), limit);
}

/// Spinner shown while the selection tool runs.
pub fn tool_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("  {spinner} {msg} ({elapsed})") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

fn print_remainder(total: usize, shown: usize) {
    if total > shown {
        println!("  {}", format!("... {} more", total - shown).dimmed());
    }
    println!();
}
