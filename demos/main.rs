use repair_rs::Repair;
use std::env;
use std::fs::File;
use std::io::{BufReader, Read};

/// Compresses a file and verifies the grammar reproduces it byte for byte.
///
/// Usage: cargo run --example main <filename>
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <filename>", args[0]);
        std::process::exit(1);
    }

    let filename = &args[1];

    let file = File::open(filename).unwrap_or_else(|_| {
        eprintln!("File \"{}\" not found.", filename);
        std::process::exit(1);
    });

    // Read file byte by byte into the compressor
    let mut repair = Repair::new();
    let mut count = 0usize;

    let reader = BufReader::new(file);
    for byte_result in reader.bytes() {
        let byte = byte_result.expect("Error reading file");
        repair.push(byte);
        count += 1;

        // Print progress every 100,000 bytes
        if count % 100_000 == 0 {
            println!("{}", count);
        }
    }

    repair.compress().expect("Compression failed");

    // Verify by reconstructing
    let file = File::open(filename).expect("Cannot reopen file");
    let reader = BufReader::new(file);
    let mut repair_iter = repair.iter();
    let mut verify_count = 0;

    for byte_result in reader.bytes() {
        let file_byte = byte_result.expect("Error reading file");
        let repair_byte = repair_iter.next().expect("Grammar ended early");

        if file_byte != *repair_byte {
            eprintln!(
                "Mismatch at position {}: file={}, grammar={}",
                verify_count, file_byte, repair_byte
            );
        }

        verify_count += 1;
    }

    let stats = repair.stats();

    println!("\n=== Statistics ===");
    println!("Total bytes inserted: {}", stats.input_length);
    println!("Final sequence length: {}", stats.final_length);
    println!("Symbols in grammar: {}", stats.grammar_symbols);
    println!("Rules created: {}", stats.num_rules);
    println!("Compression ratio: {:.2}%", stats.compression_ratio());

    // The most productive rules, by raw occurrence count at selection time
    let mut rules: Vec<_> = repair.rules().iter().collect();
    rules.sort_by(|a, b| b.occurrences.cmp(&a.occurrences));

    println!("\n=== Top rules ===");
    for rule in rules.iter().take(10) {
        println!(
            "R{}: ({}, {})  occurrences {}  snapshot length {}",
            rule.id,
            repair.table().name(rule.left),
            repair.table().name(rule.right),
            rule.occurrences,
            rule.snapshot.len()
        );
    }
}
