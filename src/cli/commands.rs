use crate::cli::args::{Cli, Commands, InputArgs};
use crate::error::Result;
use crate::models::Observation;
use crate::processors::{IntegrityChecker, IntegrityReport, ParallelProcessor};
use crate::readers::{ElevationGrid, ElevationSource, FlatElevation, WrfAsciiReader, WrfRecord};
use crate::settings::Settings;
use crate::utils::filename::{default_csv_path, default_output_path};
use crate::utils::progress::ProgressReporter;
use crate::writers::{CsvWriter, WrfAsciiWriter};
use std::io::IsTerminal;
use std::path::Path;
use tracing::{info, warn};

pub async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert { input, output, csv } => {
            let settings = apply_overrides(settings, &input);
            let mut output_file = output.unwrap_or_else(|| settings.output_file.clone());
            if output_file.is_dir() {
                output_file = default_output_path(&output_file);
            }

            println!("Assembling observations for {}", input.date.format("%Y-%m-%d %H:%M UTC"));
            println!("Input: {} ({})", settings.input_dir.display(), settings.format);
            println!("Domain: {}", input.domain);
            println!("Output file: {}", output_file.display());

            let (observations, report) = assemble(&settings, &input).await?;
            println!("\n{}", IntegrityChecker::new().generate_summary(&report));

            // ob.ascii is written last: a failed CSV write leaves no artifact
            if let Some(csv_file) = csv {
                let csv_file = csv_file.unwrap_or_else(|| default_csv_path(&output_file, input.date));
                CsvWriter::new().write_file(&observations, &csv_file)?;
                println!("CSV written to {}", csv_file.display());
            }

            WrfAsciiWriter::new().write_file(&observations, &output_file)?;

            println!("Wrote {} observations to {}", observations.len(), output_file.display());
        }

        Commands::Validate { input } => {
            let settings = apply_overrides(settings, &input);

            println!("Validating observations for {}", input.date.format("%Y-%m-%d %H:%M UTC"));
            println!("Input: {} ({})", settings.input_dir.display(), settings.format);

            let (_observations, report) = assemble(&settings, &input).await?;
            println!("\n{}", IntegrityChecker::new().generate_summary(&report));

            if report.is_clean() {
                println!("✅ All observations are encodable");
            } else {
                println!("⚠️  Found {} infinite values", report.infinite_values.len());
            }
        }

        Commands::Inspect { file, sample } => {
            inspect(&file, sample)?;
        }
    }

    Ok(())
}

/// Command-line flags win over the loaded settings
fn apply_overrides(mut settings: Settings, input: &InputArgs) -> Settings {
    if let Some(dir) = &input.input {
        settings.input_dir = dir.clone();
    }
    if let Some(format) = input.format {
        settings.format = format;
    }
    if input.elevation_grid.is_some() {
        settings.elevation_grid = input.elevation_grid.clone();
    }
    if input.window_minutes.is_some() {
        settings.window_minutes = input.window_minutes;
    }
    if let Some(workers) = input.max_workers {
        settings.max_workers = workers;
    }
    settings.use_mmap |= input.mmap;
    settings
}

async fn assemble(settings: &Settings, input: &InputArgs) -> Result<(Vec<Observation>, IntegrityReport)> {
    let elevations: Box<dyn ElevationSource> = match &settings.elevation_grid {
        Some(path) => Box::new(ElevationGrid::open(path)?),
        None => {
            warn!("No elevation grid configured, all stations are placed at sea level");
            Box::new(FlatElevation(0.0))
        }
    };

    let progress = ProgressReporter::new_spinner(
        "Assembling observations...",
        !std::io::stderr().is_terminal(),
    );

    let processor = ParallelProcessor::new(settings.max_workers, input.domain)
        .with_window_minutes(settings.window_minutes)?
        .with_mmap(settings.use_mmap);

    let result = processor
        .process(
            settings.format,
            &settings.input_dir,
            input.date,
            elevations.as_ref(),
            Some(&progress),
        )
        .await?;

    info!("Pipeline finished with {} observations", result.0.len());
    Ok(result)
}

fn inspect(file: &Path, sample: usize) -> Result<()> {
    println!("Inspecting ob.ascii file: {}", file.display());

    let artifact = WrfAsciiReader::new().read_file(file)?;

    println!("\nHeader counts: TOTAL = {}, SYNOP = {}", artifact.total, artifact.synop);

    let missing = |pick: fn(&WrfRecord) -> bool| artifact.records.iter().filter(|r| pick(*r)).count();
    println!("Missing pressure: {}", missing(|r| r.pressure.is_missing()));
    println!("Missing temperature: {}", missing(|r| r.temperature.is_missing()));
    println!("Missing dewpoint: {}", missing(|r| r.dewpoint.is_missing()));
    println!("Missing wind speed: {}", missing(|r| r.wind_speed.is_missing()));
    println!("Missing humidity: {}", missing(|r| r.humidity.is_missing()));

    if sample > 0 && !artifact.records.is_empty() {
        println!("\nSample Observations (showing up to {}):", sample);
        for (i, record) in artifact.records.iter().take(sample).enumerate() {
            println!(
                "  {}. {} [{}] {} at ({:.3}, {:.3}) elev {:.1} m: T={:.2} K Td={:.2} K P={:.1} Pa wind {:.1} m/s from {:.0}° RH {:.0}%",
                i + 1,
                record.name,
                record.station_id,
                record.time.format("%Y-%m-%d %H:%M:%S"),
                record.latitude,
                record.longitude,
                record.elevation,
                record.temperature.value,
                record.dewpoint.value,
                record.pressure.value,
                record.wind_speed.value,
                record.wind_direction.value,
                record.humidity.value,
            );
        }
    }

    Ok(())
}
