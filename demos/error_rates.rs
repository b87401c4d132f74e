#![allow(clippy::uninlined_format_args)]
//! Measures stable filter false negative / false positive rates for a few
//! `(vector_size, num_hashes, p)` combinations.
//!
//! Run with `RUST_LOG=debug` to see filter construction details.
use comfy_table::{
    Cell, CellAlignment, ContentArrangement, Table,
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};
use stable_bloom_rs::{
    FilterStats, MembershipFilter, StableFilter, StableFilterConfigBuilder,
};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

const NUM_VALUES: usize = 1_000_000;
const SEED: u64 = 2024;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    println!("╔═══════════════════════════════════════════════════╗");
    println!("║     Stable Bloom Filter - Error Rate Tester       ║");
    println!("╚═══════════════════════════════════════════════════╝\n");
    println!("  • Values inserted: {}", NUM_VALUES);
    println!("  • Seed: {}\n", SEED);

    let vector_sizes = [1 << 22, 1 << 24, 1 << 26];
    let hash_counts = [2, 4];
    let decrements: [Option<usize>; 2] = [None, Some(16)];

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Vector Size").set_alignment(CellAlignment::Center),
            Cell::new("k").set_alignment(CellAlignment::Center),
            Cell::new("p").set_alignment(CellAlignment::Center),
            Cell::new("Occupancy").set_alignment(CellAlignment::Center),
            Cell::new("False Negatives").set_alignment(CellAlignment::Center),
            Cell::new("False Positives").set_alignment(CellAlignment::Center),
            Cell::new("Insert Time").set_alignment(CellAlignment::Center),
        ]);

    for &vector_size in &vector_sizes {
        for &num_hashes in &hash_counts {
            for &p in &decrements {
                let mut builder = StableFilterConfigBuilder::default()
                    .vector_size(vector_size)
                    .num_hashes(num_hashes)
                    .seed(SEED);
                if let Some(p) = p {
                    builder = builder.decrements_per_insert(p);
                }
                let config = builder.build()?;
                let mut filter = StableFilter::new(config)?;

                let start = Instant::now();
                for i in 1..=NUM_VALUES {
                    filter.add(i.to_string().as_bytes())?;
                }
                let insert_time = start.elapsed();

                let mut false_negatives = 0;
                for i in 1..=NUM_VALUES {
                    if !filter.membership_test(i.to_string().as_bytes())? {
                        false_negatives += 1;
                    }
                }
                let mut false_positives = 0;
                for i in NUM_VALUES + 1..=2 * NUM_VALUES {
                    if filter.membership_test(i.to_string().as_bytes())? {
                        false_positives += 1;
                    }
                }

                info!(
                    vector_size,
                    num_hashes, false_negatives, false_positives, "measured"
                );

                table.add_row(vec![
                    Cell::new(format!("{}", vector_size)),
                    Cell::new(format!("{}", num_hashes)),
                    Cell::new(format!("{}", filter.decrements_per_insert())),
                    Cell::new(format!("{:.2}%", filter.occupancy() * 100.0)),
                    Cell::new(format!(
                        "{:.5}%",
                        100.0 * false_negatives as f64 / NUM_VALUES as f64
                    )),
                    Cell::new(format!(
                        "{:.5}%",
                        100.0 * false_positives as f64 / NUM_VALUES as f64
                    )),
                    Cell::new(format!("{:.1?}", insert_time)),
                ]);
            }
        }
    }

    println!("{}", table);
    Ok(())
}
