use clap::Parser;
use pickupkit::analysis::{analyze, AnalysisInput, AnalysisMessage};
use pickupkit::calibration::Calibration;
use pickupkit::coil::{
    compute_coil_results, CoilComputedResults, CoilGeometry, WindingStyle, WireParams,
};
use pickupkit::magnet::{MagnetComputedResults, PositioningParams};
use pickupkit::network::{
    compute_loaded_results, compute_loaded_results_with_transformer, LoadComputedResults,
    LoadParams,
};
use pickupkit::transformer::{
    compute_transformer_results, TransformerComputedResults, TransformerParams,
};
use pickupkit::unit::parse_value;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Electrical report for a magnetic pickup design
#[derive(Parser)]
#[command(name = "pickup-report", version)]
struct Cli {
    /// Design file (JSON) with geometry, wire and optional load/transformer
    design: String,

    /// Calibration overrides (JSON)
    #[arg(long)]
    calibration: Option<String>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Amplifier input impedance, e.g. 1M or 470k
    #[arg(long, value_parser = parse_value)]
    amp_impedance: Option<f64>,

    /// Cable length in meters
    #[arg(long, value_parser = parse_value)]
    cable_length: Option<f64>,

    /// Winding style: scatter, random or layered
    #[arg(long, value_parser = WindingStyle::from_str)]
    winding_style: Option<WindingStyle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Design {
    #[serde(default)]
    geometry: CoilGeometry,
    #[serde(default)]
    wire: WireParams,
    load: Option<LoadParams>,
    transformer: Option<TransformerParams>,
    magnet: Option<MagnetComputedResults>,
    positioning: Option<PositioningParams>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    coil: CoilComputedResults,
    #[serde(skip_serializing_if = "Option::is_none")]
    load: Option<LoadComputedResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transformer: Option<TransformerComputedResults>,
    messages: Vec<AnalysisMessage>,
}

fn print_text(report: &Report) {
    let c = &report.coil;
    println!("Coil");
    println!("  DC resistance      {:>10.1} Ω", c.dc_resistance);
    println!("  Inductance         {:>10.3} H", c.inductance);
    println!("  Capacitance        {:>10.1} pF", c.capacitance * 1e12);
    println!("  Resonance          {:>10.0} Hz", c.resonant_frequency);
    println!("  Q                  {:>10.2}", c.quality_factor);
    println!("  Wire length        {:>10.1} m", c.total_wire_length);
    println!("  Winding depth      {:>10.2} mm", c.winding_depth * 1e3);
    println!("  Bobbin fill        {:>10.1} % of {} turns", c.fill_ratio * 100.0, c.max_turns);

    if let Some(l) = &report.load {
        println!("Loaded");
        println!("  Resonance          {:>10.0} Hz", l.loaded_resonance);
        println!("  Q                  {:>10.2}", l.loaded_q);
        println!("  Peak gain          {:>10.1} dB", l.peak_gain_db);
        println!("  Cable capacitance  {:>10.0} pF", l.total_cable_capacitance * 1e12);
    }

    if let Some(t) = &report.transformer {
        println!("Transformer");
        println!("  Turns ratio        {:>10.2}", t.turns_ratio);
        println!("  Primary inductance {:>10.3} H", t.primary_inductance);
        println!("  Bandwidth          {:>10.0} Hz .. {:.0} Hz", t.lower_bandwidth, t.bandwidth);
        println!("  Saturation margin  {:>10.2}", t.saturation_margin);
        println!("  Core loss          {:>10}", t.core_loss_estimate.to_str());
    }

    println!("Analysis");
    for msg in &report.messages {
        println!("  [{}] {}: {}", msg.level, msg.title, msg.description);
        if let Some(s) = &msg.suggestion {
            println!("      -> {}", s);
        }
    }
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cal = match &cli.calibration {
        Some(path) => Calibration::from_file(path).unwrap_or_else(|e| {
            eprintln!("Calibration error: {}", e);
            std::process::exit(1);
        }),
        None => Calibration::shared().clone(),
    };

    let input = std::fs::read_to_string(&cli.design).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {}", cli.design, e);
        std::process::exit(1);
    });
    let mut design: Design = serde_json::from_str(&input).unwrap_or_else(|e| {
        eprintln!("Design error: {}", e);
        std::process::exit(1);
    });

    if let Some(style) = cli.winding_style {
        design.wire.winding_style = style;
    }
    if cli.amp_impedance.is_some() || cli.cable_length.is_some() {
        let load = design.load.get_or_insert_with(LoadParams::default);
        if let Some(z) = cli.amp_impedance {
            load.amp_input_impedance = z;
        }
        if let Some(len) = cli.cable_length {
            load.cable_length = len;
        }
    }

    let coil = compute_coil_results(&design.geometry, &design.wire, &cal).unwrap_or_else(|e| {
        eprintln!("Coil error: {}", e);
        std::process::exit(1);
    });

    let transformer = design.transformer.as_ref().filter(|t| t.enabled);
    let load = design.load.as_ref().map(|l| match transformer {
        Some(t) => compute_loaded_results_with_transformer(&coil, l, t, &cal),
        None => compute_loaded_results(&coil, l, &cal),
    });
    let transformer_results =
        transformer.map(|t| compute_transformer_results(t, design.load.as_ref(), &cal));

    let analysis_input = AnalysisInput {
        magnet: design.magnet.as_ref(),
        positioning: design.positioning.as_ref(),
        load: design.load.as_ref(),
        load_results: if transformer.is_none() { load.as_ref() } else { None },
        transformer: design.transformer.as_ref(),
        ..AnalysisInput::new(&design.wire, &coil)
    };
    let messages = analyze(&analysis_input, &cal);

    let report = Report {
        coil,
        load,
        transformer: transformer_results,
        messages,
    };

    if cli.json {
        match serde_json::to_string_pretty(&report) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Output error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        print_text(&report);
    }
}
