//! Run the femoral planning pipeline from the command line.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use plan_kernel::Point3d;
use plan_types::{LandmarkName, PlaneId};
use planning_engine::{Engine, PlanningConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Femoral planning from anatomical landmarks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the planning axes and planes and print them as JSON
    Run(RunArgs),
    /// Print the default configuration as TOML
    Config,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON object mapping landmark names to [x, y, z]
    landmarks: PathBuf,
    /// TOML planning configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Rotate a plane after planning, e.g. `varusValgus=10`. Repeatable.
    #[arg(long = "rotate", value_parser = parse_rotation)]
    rotations: Vec<(PlaneId, f64)>,
    /// Pretty-print the output
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => {
            let output = run(&args)?;
            println!("{output}");
        }
        Command::Config => {
            print!("{}", toml::to_string_pretty(&PlanningConfig::default())?);
        }
    }
    Ok(())
}

fn run(args: &RunArgs) -> Result<String> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => PlanningConfig::default(),
    };
    let mut engine = Engine::new(config)?;

    let text = fs::read_to_string(&args.landmarks)
        .with_context(|| format!("failed to read landmarks from {}", args.landmarks.display()))?;
    for (name, position) in parse_landmarks(&text)? {
        engine.place_or_update_landmark(name, position)?;
    }
    info!(landmarks = engine.landmarks().len(), "landmarks loaded");

    engine.run_planning_pipeline()?;
    for (plane, degrees) in &args.rotations {
        let angle = engine
            .rotate_plane(*plane, *degrees)
            .with_context(|| format!("failed to rotate {plane}"))?;
        info!(%plane, angle, "plane rotated");
    }

    let run = engine
        .current_run()
        .context("planning run missing after pipeline")?;
    let json = if args.pretty {
        serde_json::to_string_pretty(run)?
    } else {
        serde_json::to_string(run)?
    };
    Ok(json)
}

fn load_config(path: &Path) -> Result<PlanningConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    let config: PlanningConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}

fn parse_landmarks(json: &str) -> Result<Vec<(LandmarkName, Point3d)>> {
    let raw: BTreeMap<LandmarkName, [f64; 3]> =
        serde_json::from_str(json).context("landmark file must map landmark names to [x, y, z]")?;
    Ok(raw
        .into_iter()
        .map(|(name, xyz)| (name, Point3d::from_array(xyz)))
        .collect())
}

fn parse_rotation(s: &str) -> Result<(PlaneId, f64), String> {
    let (plane, degrees) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <plane>=<degrees>, got `{s}`"))?;
    let plane = plane.trim().parse::<PlaneId>().map_err(|e| e.to_string())?;
    let degrees = degrees
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid angle `{degrees}`: {e}"))?;
    if !degrees.is_finite() {
        return Err(format!("angle must be finite, got `{degrees}`"));
    }
    Ok((plane, degrees))
}

#[cfg(test)]
mod tests {
    use super::*;
    use planning_engine::RotationStep;

    #[test]
    fn parse_rotation_accepts_plane_and_angle() {
        assert_eq!(
            parse_rotation("varusValgus=-10").unwrap(),
            (PlaneId::VarusValgus, -10.0)
        );
        assert!(parse_rotation("varusValgus").is_err());
        assert!(parse_rotation("sagittal=1").is_err());
        assert!(parse_rotation("coronal=abc").is_err());
        assert!(parse_rotation("varusValgus=NaN").is_err());
        assert!(parse_rotation("varusValgus=inf").is_err());
    }

    #[test]
    fn parse_landmarks_reads_named_points() {
        let landmarks =
            parse_landmarks(r#"{"femurCenter": [0, 0, 0], "hipCenter": [0, 100, 0]}"#).unwrap();
        assert_eq!(
            landmarks,
            vec![
                (LandmarkName::FemurCenter, Point3d::ORIGIN),
                (LandmarkName::HipCenter, Point3d::new(0.0, 100.0, 0.0)),
            ]
        );
        assert!(parse_landmarks(r#"{"kneeCenter": [0, 0, 0]}"#).is_err());
    }

    #[test]
    fn config_toml_fills_defaults() {
        let config: PlanningConfig =
            toml::from_str("rotationStep = \"fine\"\ndistalResectionOffset = 8.0\n").unwrap();
        assert_eq!(config.rotation_step, RotationStep::Fine);
        assert_eq!(config.distal_resection_offset, 8.0);
        assert_eq!(config.seed_rotation_deg, 3.0);
    }

    #[test]
    fn cli_parses_repeated_rotations() {
        let cli = Cli::try_parse_from([
            "plan",
            "run",
            "landmarks.json",
            "--rotate",
            "varusValgus=10",
            "--rotate",
            "flexionExtension=-1",
            "--pretty",
        ])
        .unwrap();
        match cli.command {
            Command::Run(args) => {
                assert_eq!(args.rotations.len(), 2);
                assert!(args.pretty);
                assert!(args.config.is_none());
            }
            Command::Config => panic!("expected run"),
        }
    }
}
