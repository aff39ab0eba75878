//! clinic: a working day at a small outpatient clinic.
//!
//! Two arrival streams (walk-ins all day, urgent cases peaking mid-morning)
//! flow through reception, triage, consultation, diagnostics, and pharmacy.
//! Writes per-tick CSV output plus a JSON report, then prints area metrics
//! and the bottleneck ranking.
//!
//! Pass a path to a JSON `SimConfig` to override the built-in configuration.
//! Set `RUST_LOG=info` (or `debug`) for engine logging.

mod facility;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use pf_core::{
    ArrivalDistribution, GenerationPattern, Retention, SimConfig, TimeWindow, MS_PER_MINUTE,
};
use pf_engine::EngineBuilder;
use pf_metrics::MetricsHistory;
use pf_output::{export_layout_json, export_report_json, CsvWriter, EngineOutputObserver};

use facility::{build_catalog, build_layout};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                    u64 = 42;
const TICK_MS:                 u64 = 10_000;  // 1 tick = 10 simulated seconds
const SNAPSHOT_INTERVAL_TICKS: u64 = 30;      // roster snapshot every 5 minutes
const HISTORY_EVERY_MIN:       u64 = 30;
const OUTPUT_DIR:              &str = "output/clinic";

fn default_config() -> SimConfig {
    let mut config = SimConfig { seed: SEED, ..SimConfig::default() };
    config.retention = Retention::LastCompleted(500);
    config.patient_generation.patterns = vec![
        GenerationPattern {
            patient_type: "walk-in".into(),
            rate:         10.0,
            distribution: ArrivalDistribution::Poisson,
            time_windows: vec![],
        },
        GenerationPattern {
            patient_type: "urgent".into(),
            rate:         2.0,
            distribution: ArrivalDistribution::Normal,
            time_windows: vec![TimeWindow { start: 90.0, end: 210.0, rate_multiplier: 2.5 }],
        },
    ];
    config
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let file = File::open(&path).with_context(|| format!("opening {path}"))?;
            SimConfig::from_json_reader(file).with_context(|| format!("parsing {path}"))?
        }
        None => default_config(),
    };
    let total_ticks = (config.duration * MS_PER_MINUTE / TICK_MS as f64).ceil() as u64;

    println!("=== clinic — patient-flow simulation ===");
    println!(
        "Duration: {} min  |  Tick: {} s  |  Seed: {}",
        config.duration,
        TICK_MS / 1_000,
        config.seed
    );
    println!();

    // 1. Facility and catalog.
    let layout = build_layout();
    let catalog = build_catalog()?;
    println!("Facility: {} areas, {} patient types", layout.areas.len(), catalog.len());

    // 2. Engine.
    let mut engine = EngineBuilder::new(config, layout.graph())
        .catalog(catalog)
        .strict(true)
        .build()?;
    for d in engine.diagnostics() {
        println!("  note: {d}");
    }

    // 3. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = EngineOutputObserver::new(writer, SNAPSHOT_INTERVAL_TICKS);
    let mut history = MetricsHistory::default();
    let history_every = HISTORY_EVERY_MIN * MS_PER_MINUTE as u64 / TICK_MS;

    // 4. Run.
    let t0 = Instant::now();
    let mut arrived = 0usize;
    for tick in 0..total_ticks {
        arrived += engine.generate_arrivals(TICK_MS).len();
        engine.update_with(TICK_MS, &mut obs);

        if (tick + 1) % history_every == 0 {
            let snapshot = history.record(engine.get_metrics());
            info!(
                "{}: {} active, {} processed, utilization {:.0}%",
                snapshot.metrics.timestamp,
                snapshot.metrics.global.active_patients,
                snapshot.metrics.global.total_processed,
                snapshot.metrics.global.utilization_rate * 100.0,
            );
        }
    }
    let elapsed = t0.elapsed();

    obs.finish();
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    let metrics = engine.get_metrics();
    let bottlenecks = engine.get_bottlenecks();

    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!(
        "  arrivals: {arrived}  |  processed: {}  |  still inside: {}",
        metrics.global.total_processed, metrics.global.active_patients
    );
    println!(
        "  avg wait {:.1} min  |  avg stay {:.1} min  |  throughput {:.2}/min",
        metrics.global.avg_wait_time, metrics.global.avg_system_time, metrics.global.throughput
    );
    println!();

    println!(
        "{:<12} {:>5} {:>5} {:>7} {:>6} {:>9} {:>9}",
        "Area", "Occ", "Cap", "Util", "Queue", "Wait min", "Served"
    );
    println!("{}", "-".repeat(60));
    for area in engine.graph().areas() {
        let Some(m) = metrics.by_area.get(area.id.as_str()) else { continue };
        println!(
            "{:<12} {:>5} {:>5} {:>6.0}% {:>6} {:>9.1} {:>9}",
            area.name,
            m.current_occupancy,
            m.capacity,
            m.utilization_rate * 100.0,
            m.queue_length,
            m.avg_wait_time,
            m.throughput,
        );
    }
    println!();

    if bottlenecks.is_empty() {
        println!("No bottlenecks at end of day.");
    } else {
        println!("Bottlenecks:");
        for b in &bottlenecks {
            println!("  [{}] {}", b.severity.as_str(), b.area_id);
            for r in &b.recommendations {
                println!("      - {r}");
            }
        }
    }
    println!();

    // 6. JSON documents.
    let report_path = Path::new(OUTPUT_DIR).join("report.json");
    export_report_json(BufWriter::new(File::create(&report_path)?), &metrics, &bottlenecks)?;
    export_layout_json(BufWriter::new(File::create(Path::new(OUTPUT_DIR).join("layout.json"))?), &layout)?;
    println!("Wrote {} ({} history snapshots kept)", report_path.display(), history.len());

    Ok(())
}
