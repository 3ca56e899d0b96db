use repair_rs::Repair;
use std::env;
use std::path::Path;

/// Compresses a phrase, prints the rule table, and exports the rule
/// hierarchy as Graphviz DOT (plus a PNG when `dot` is installed).
///
/// Usage: cargo run --example hierarchy [phrase]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let phrase = env::args().nth(1).unwrap_or_else(|| {
        "how much wood would a woodchuck chuck if a woodchuck could chuck wood".to_string()
    });

    let mut repair = Repair::new();
    repair.extend(phrase.chars());
    repair.compress().expect("compression failed");

    let reconstructed: String = repair.iter().collect();
    assert_eq!(reconstructed, phrase, "grammar failed to reproduce the input");

    let table = repair.table();
    let expanded = repair.expanded_phrases().expect("expansion failed");

    println!("Input ({} symbols): {phrase:?}", repair.len());
    println!();
    println!("{:<6} {:<12} {:>11}  {}", "Rule", "Pair", "Occurrences", "Expansion");
    for (rule, (_, expansion)) in repair.rules().iter().zip(&expanded) {
        println!(
            "{:<6} {:<12} {:>11}  {}",
            format!("R{}", rule.id),
            format!("{} {}", table.name(rule.left), table.name(rule.right)),
            rule.occurrences,
            expansion
        );
    }
    println!();
    println!("Final sequence: {}", table.phrase(&repair.final_sequence()));

    let stats = repair.stats();
    println!(
        "{} -> {} symbols, {} rules, ratio {:.2}%",
        stats.input_length,
        stats.final_length,
        stats.num_rules,
        stats.compression_ratio()
    );

    let hierarchy = repair.hierarchy().expect("hierarchy failed");
    let dot_path = Path::new("hierarchy.dot");
    let png_path = Path::new("hierarchy.png");
    let rendered = hierarchy
        .export(dot_path, png_path)
        .expect("writing hierarchy failed");

    println!();
    println!("Wrote {}", dot_path.display());
    if rendered {
        println!("Wrote {}", png_path.display());
    }
}
