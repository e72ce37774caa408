// src/bin/pulse_sim.rs
//! Drive the pipeline worker from a synthetic face and print its reports

use clap::Parser;
use rppg_core::acquisition::FrameFeeder;
use rppg_core::config::{ConfigLoader, PulseConfig};
use rppg_core::session::MeasurementSession;
use rppg_core::simulation::{SyntheticFaceConfig, SyntheticFaceSource};
use rppg_core::worker::{ProcessTicker, PulseReport, PulseWorker};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pulse-sim")]
#[command(about = "Simulated rPPG capture feeding the heart-rate pipeline")]
#[command(version)]
struct CliArgs {
    /// Heart rate of the simulated subject
    #[arg(long, default_value_t = 72.0)]
    bpm: f64,

    /// Length of the capture in seconds
    #[arg(long, default_value_t = 20.0)]
    seconds: f64,

    /// Camera frame rate
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Random seed for sensor noise and ROI jitter
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Standard deviation of per-channel sensor noise
    #[arg(long, default_value_t = 0.1)]
    noise: f64,

    /// Probability that a frame has no detected face
    #[arg(long, default_value_t = 0.0)]
    dropout: f64,

    /// TOML configuration file (environment overrides still apply)
    #[arg(long, env = "RPPG_CONFIG")]
    config: Option<PathBuf>,

    /// Print reports as JSON lines
    #[arg(long)]
    json: bool,

    /// Run as fast as possible on simulated time instead of wall-clock pacing
    #[arg(long)]
    fast: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::new().with_file(path).load()?,
        None => ConfigLoader::new().load()?,
    };

    if args.dump_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let source = SyntheticFaceSource::new(SyntheticFaceConfig {
        heart_rate_bpm: args.bpm,
        frame_rate_hz: args.fps,
        noise_std: args.noise,
        dropout_probability: args.dropout,
        seed: args.seed,
        ..Default::default()
    })?;

    info!(
        bpm = args.bpm,
        fps = args.fps,
        seconds = args.seconds,
        fast = args.fast,
        "starting simulated capture"
    );

    let worker = PulseWorker::spawn(config.clone())?;
    let reports = worker.reports().clone();
    let json = args.json;
    let calibration_samples = config.worker.calibration_samples;

    let printer = tokio::task::spawn_blocking(move || {
        let mut session = MeasurementSession::new(calibration_samples);
        session.start();
        for report in reports.iter() {
            session.apply(&report);
            print_report(&report, &session, json);
        }
        session
    });

    let frame_count = (args.seconds * args.fps).round() as usize;
    if args.fast {
        run_fast(&worker, source, &config, frame_count)?;
    } else {
        run_realtime(&worker, source, &config, frame_count).await?;
    }

    if let Some(orchestrator) = worker.shutdown() {
        let metrics = orchestrator.metrics();
        info!(
            passes = metrics.passes,
            accepted = metrics.accepted_readings,
            avg_pass_us = metrics.average_pass_time_us,
            max_pass_us = metrics.max_pass_time_us,
            "pipeline finished"
        );
    }

    let session = printer.await?;
    match session.bpm() {
        Some(bpm) => info!(bpm, expected = args.bpm, "final reading"),
        None => info!("no reading produced"),
    }

    Ok(())
}

/// Frames paced by the wall clock, `Process` from the ticker
async fn run_realtime(
    worker: &PulseWorker,
    mut source: SyntheticFaceSource,
    config: &PulseConfig,
    frame_count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = worker.handle();
    let ticker = ProcessTicker::spawn(
        worker.handle(),
        Duration::from_millis(config.worker.process_interval_ms),
    );
    let mut feeder = FrameFeeder::new(config.worker.frame_rate_window_ms);
    let mut frame_clock =
        tokio::time::interval(Duration::from_secs_f64(source.frame_interval_ms() / 1000.0));

    for _ in 0..frame_count {
        frame_clock.tick().await;
        for message in feeder.ingest(&source.next_frame()) {
            handle.send(message)?;
        }
    }

    let ticks = ticker.stop().await;
    info!(ticks, samples = feeder.samples_sent(), "capture finished");
    Ok(())
}

/// Frames as fast as possible; `Process` every interval of simulated time
fn run_fast(
    worker: &PulseWorker,
    mut source: SyntheticFaceSource,
    config: &PulseConfig,
    frame_count: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = worker.handle();
    let mut feeder = FrameFeeder::new(config.worker.frame_rate_window_ms);
    let interval_ms = config.worker.process_interval_ms as f64;
    let mut next_process_ms = interval_ms;

    for _ in 0..frame_count {
        let frame = source.next_frame();
        for message in feeder.ingest(&frame) {
            handle.send(message)?;
        }
        if frame.timestamp_ms >= next_process_ms {
            handle.process()?;
            next_process_ms += interval_ms;
        }
    }

    info!(samples = feeder.samples_sent(), "capture finished");
    Ok(())
}

fn print_report(report: &PulseReport, session: &MeasurementSession, json: bool) {
    if json {
        match serde_json::to_string(report) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("failed to encode report: {}", e),
        }
        return;
    }

    let bpm = session
        .bpm()
        .map_or_else(|| "--".to_string(), |bpm| format!("{:.0}", bpm));
    println!(
        "[{:?}] bpm {:>3}  confidence {:.2}  quality {} ({:.2})  buffer {}",
        session.state(),
        bpm,
        report.confidence,
        report.quality.level,
        report.quality.score,
        report.buffer_length
    );
}
