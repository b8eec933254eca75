//! gesture-scroll - replay a synthetic swipe through the scroll engine
//!
//! Feeds evenly spaced samples into an engine, lets momentum run out and prints every
//! record the engine posted. Useful for tuning drag presets.

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use gesture_scroll::event::wire;
use gesture_scroll::{EngineBuilder, GesturePhase, RecordingSink, ScrollSettings};
use std::path::PathBuf;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG=debug shows the engine's decisions
    env_logger::init();

    let matches = cli().get_matches();
    let settings = load_settings(&matches)?;

    let dx = *matches.get_one::<i64>("dx").unwrap_or(&0);
    let dy = *matches.get_one::<i64>("dy").unwrap_or(&0);
    let samples = *matches.get_one::<u32>("samples").unwrap_or(&8);
    let interval = Duration::from_millis(*matches.get_one::<u64>("interval-ms").unwrap_or(&8));
    let auto_momentum = !matches.get_flag("no-momentum");

    if samples == 0 {
        anyhow::bail!("--samples must be at least 1");
    }

    let sink = RecordingSink::new();
    let engine = EngineBuilder::new(settings, sink.clone())
        .name("gesture-scroll-replay")
        .spawn()
        .context("failed to start the scroll engine")?;
    let scroll = engine.handle();

    for i in 0..samples {
        let phase = if i == 0 {
            GesturePhase::Began
        } else {
            GesturePhase::Changed
        };
        let (step_x, step_y) = (share(dx, i, samples), share(dy, i, samples));
        if step_x == 0 && step_y == 0 {
            log::warn!("sample {i} has no movement and will be dropped");
        }
        scroll.report_sample(step_x, step_y, phase)?;
        tokio::time::sleep(interval).await;
    }

    let outcome = scroll.end_gesture(auto_momentum)?.await;
    scroll.momentum_idle().await?;
    engine.shutdown().await?;

    let records = sink.take();
    for record in &records {
        println!("{record}");
    }
    println!("momentum: {outcome:?}, {} records", records.len());

    if let Some(path) = matches.get_one::<PathBuf>("output") {
        let bytes = wire::encode_records(&records);
        std::fs::write(path, &bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("wrote {} bytes to {}", bytes.len(), path.display());
    }

    Ok(())
}

fn cli() -> Command {
    let command = Command::new("gesture-scroll")
        .version(gesture_scroll::VERSION)
        .about("Replay a synthetic trackpad swipe and print the synthesized scroll events")
        .arg(
            Arg::new("dx")
                .long("dx")
                .help("Total horizontal travel of the swipe, in points")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("0"),
        )
        .arg(
            Arg::new("dy")
                .long("dy")
                .help("Total vertical travel of the swipe, in points")
                .value_parser(value_parser!(i64))
                .allow_negative_numbers(true)
                .default_value("120"),
        )
        .arg(
            Arg::new("samples")
                .long("samples")
                .help("Number of Began/Changed samples the travel is split over")
                .value_parser(value_parser!(u32))
                .default_value("8"),
        )
        .arg(
            Arg::new("interval-ms")
                .long("interval-ms")
                .help("Milliseconds between samples")
                .value_parser(value_parser!(u64))
                .default_value("8"),
        )
        .arg(
            Arg::new("no-momentum")
                .long("no-momentum")
                .help("End the gesture without momentum")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("preset")
                .long("preset")
                .help("Drag preset to animate momentum with"),
        )
        .arg(
            Arg::new("output")
                .long("output")
                .short('o')
                .help("Also write the records in binary wire format to this file")
                .value_parser(value_parser!(PathBuf)),
        );

    #[cfg(feature = "config")]
    let command = command.arg(
        Arg::new("config")
            .long("config")
            .short('c')
            .help("Config file (defaults to <config dir>/gesture-scroll/config.toml)")
            .value_parser(value_parser!(PathBuf)),
    );

    command
}

fn load_settings(matches: &ArgMatches) -> Result<ScrollSettings> {
    #[cfg(feature = "config")]
    let settings = match matches.get_one::<PathBuf>("config") {
        Some(path) => gesture_scroll::config::load_from_path(path)?,
        None => gesture_scroll::config::load_or_default()?,
    };
    #[cfg(not(feature = "config"))]
    let settings = ScrollSettings::default();

    match matches.get_one::<String>("preset") {
        Some(preset) => Ok(settings.with_preset(preset.as_str())?),
        None => Ok(settings),
    }
}

/// Integer share of `total` for sample `index` of `count`; shares sum to `total`.
fn share(total: i64, index: u32, count: u32) -> i64 {
    let (index, count) = (i64::from(index), i64::from(count));
    total * (index + 1) / count - total * index / count
}
