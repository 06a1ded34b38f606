use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tl_core::units::convert;
use tl_fluids::{LinearWater, LiquidModel, SimpleWater};
use tl_sim::{PlantSim, PumpId};

#[derive(Parser)]
#[command(name = "tl-cli")]
#[command(about = "Tanklab CLI - three-tank transfer network simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    /// Metered process configuration (35 L/s pumps, trip-and-hold interlocks)
    Metered,
    /// Operator-trainer configuration (20 L/s pumps, hysteresis interlocks)
    Trainer,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a headless scenario and print the final state
    Run {
        /// Engine preset
        #[arg(long, value_enum, default_value = "metered")]
        preset: Preset,
        /// Time step in seconds
        #[arg(long, default_value_t = 1.0)]
        dt: f64,
        /// End time in seconds
        #[arg(long)]
        t_end: f64,
        /// Pump 1 command in [-1, 1]
        #[arg(long, default_value_t = 0.0)]
        p1: f64,
        /// Pump 2 command in [-1, 1]
        #[arg(long, default_value_t = 0.0)]
        p2: f64,
        /// Tank 3 drain rate in L/s
        #[arg(long, default_value_t = 0.0)]
        drain: f64,
        /// Export the tick history as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the final snapshot as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print water property tables for both fluid models
    Props,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            preset,
            dt,
            t_end,
            p1,
            p2,
            drain,
            output,
            json,
        } => cmd_run(preset, dt, t_end, p1, p2, drain, output.as_deref(), json),
        Commands::Props => cmd_props(),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    preset: Preset,
    dt: f64,
    t_end: f64,
    p1: f64,
    p2: f64,
    drain: f64,
    output: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if dt <= 0.0 {
        return Err("dt must be positive".into());
    }

    let mut sim = match preset {
        Preset::Metered => PlantSim::metered()?,
        Preset::Trainer => PlantSim::trainer()?,
    };
    sim.set_pump_command(PumpId::P1, p1);
    sim.set_pump_command(PumpId::P2, p2);
    sim.set_drain_rate(drain);
    tracing::debug!(?preset, dt, t_end, p1, p2, drain, "run configured");

    println!("Running {preset:?} scenario: dt = {dt:.3} s, t_end = {t_end:.3} s");
    while sim.time_s() < t_end {
        sim.advance(dt)?;
    }
    println!("✓ Simulation completed: {} ticks recorded", sim.history().len());

    if json {
        println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
    } else {
        print_summary(&sim);
    }

    if let Some(path) = output {
        let rows = export_history_csv(&sim);
        std::fs::write(path, rows)?;
        println!(
            "✓ Exported {} samples to {}",
            sim.history().len(),
            path.display()
        );
    }

    Ok(())
}

fn print_summary(sim: &PlantSim) {
    let levels = sim.levels();
    let temps = sim.temperatures();
    let rhos = sim.densities();
    let alarms = sim.alarms();

    println!("\nTanks:");
    for i in 0..3 {
        let mut flags = String::new();
        if alarms[i].low {
            flags.push_str("  LL");
        }
        if alarms[i].high {
            flags.push_str("  HH");
        }
        println!(
            "  T{}: {:7.1} L  {:5.1} °C  {:6.1} kg/m³{}",
            i + 1,
            levels[i],
            temps[i],
            rhos[i],
            flags
        );
    }

    let flows = sim.flows();
    let totals = sim.totals();
    let pumps = sim.pump_status();
    println!("\nPaths:");
    for (i, pump) in PumpId::ALL.into_iter().enumerate() {
        println!(
            "  P{}: {:7.2} L/s ({:6.2} m³/h)  {:6.3} kg/s  total {:9.1} L  {}  {:.3} h",
            i + 1,
            flows[i].volumetric_lps,
            convert::lps_to_m3h(flows[i].volumetric_lps),
            flows[i].mass_kgps,
            totals[i],
            if pumps[i].running { "RUN " } else { "STOP" },
            pumps[i].run_hours,
        );
        let meter = sim.meter(pump);
        if let (Some(lo), Some(hi)) = (meter.min_flow_lps(), meter.max_flow_lps()) {
            println!("      metered min/max: {lo:.2} / {hi:.2} L/s");
        }
    }
    println!("\nDrain: {:.2} L/s   t = {:.1} s", sim.drain_lps(), sim.time_s());
}

fn export_history_csv(sim: &PlantSim) -> String {
    let mut csv = String::from(
        "time_s,level1_l,level2_l,level3_l,flow12_lps,flow23_lps,\
         temp1_c,temp2_c,temp3_c,rho1_kg_m3,rho2_kg_m3,rho3_kg_m3\n",
    );
    for s in sim.history().iter() {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}\n",
            s.time_s,
            s.levels_l[0],
            s.levels_l[1],
            s.levels_l[2],
            s.flows_lps[0],
            s.flows_lps[1],
            s.temperatures_c[0],
            s.temperatures_c[1],
            s.temperatures_c[2],
            s.densities_kg_m3[0],
            s.densities_kg_m3[1],
            s.densities_kg_m3[2],
        ));
    }
    csv
}

fn cmd_props() -> Result<(), Box<dyn std::error::Error>> {
    for model in [&SimpleWater as &dyn LiquidModel, &LinearWater] {
        println!("\n{} (0–100 °C):", model.name());
        println!("  T [°C]   ρ [kg/m³]   cp [kJ/kg·K]   μ [Pa·s]     k [W/m·K]   β [1/K]");
        for t in (0..=100).step_by(10) {
            let pack = model.property_pack(t as f64);
            println!(
                "  {:5}   {:9.2}   {:10.2}   {:.3e}   {:9.4}   {:.3e}",
                t,
                pack.rho_kg_m3,
                pack.cp_kj_kg_k,
                pack.mu_pa_s,
                pack.k_w_m_k,
                pack.beta_per_k
            );
        }
    }
    Ok(())
}
