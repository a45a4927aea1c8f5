use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use obs_to_wrf::models::{Reading, RegistrySet, SensorClass, StationMetadata, StationRegistry};
use obs_to_wrf::processors::{DataMerger, DerivedQuantities, NearestReadingReducer, SensorStreams};
use obs_to_wrf::writers::WrfAsciiWriter;
use std::collections::HashMap;

fn target() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 3, 30, 18, 0, 0).unwrap()
}

// Registries and raw readings (every 10 minutes around the target) per class
fn create_test_data(
    station_count: usize,
    readings_per_station: usize,
) -> (RegistrySet, HashMap<SensorClass, Vec<Reading>>) {
    let mut registries = Vec::new();
    let mut readings = HashMap::new();

    for class in SensorClass::ALL {
        let stations: Vec<StationMetadata> = (0..station_count)
            .map(|i| {
                StationMetadata::new(
                    format!("{}-{}", class.code(), i),
                    format!("Test Station {}", i),
                    40.0 + (i as f64) * 0.01,
                    9.0 + (i as f64) * 0.01,
                    (i % 2000) as f64,
                    Some("m/s".to_string()),
                )
            })
            .collect();

        let mut class_readings = Vec::with_capacity(station_count * readings_per_station);
        for station in &stations {
            for step in 0..readings_per_station {
                let offset = Duration::minutes(step as i64 * 10 - 60);
                class_readings.push(Reading::new(
                    station.key(),
                    target() + offset,
                    10.0 + step as f64,
                    station.id.clone(),
                ));
            }
        }

        readings.insert(class, class_readings);
        registries.push(StationRegistry::from_stations(class, stations).unwrap());
    }

    (RegistrySet::new(registries), readings)
}

fn reduce_all(readings: &HashMap<SensorClass, Vec<Reading>>) -> SensorStreams {
    let reducer = NearestReadingReducer::new(target());
    let mut streams = SensorStreams::new();
    for (class, class_readings) in readings {
        streams.set(*class, reducer.reduce(class_readings.iter().cloned()).into_sorted());
    }
    streams
}

fn benchmark_reducer(c: &mut Criterion) {
    let (_registries, readings) = create_test_data(100, 13);
    let temperatures = &readings[&SensorClass::Temperature];

    c.bench_function("nearest_reading_reducer", |b| {
        b.iter(|| {
            let reducer = NearestReadingReducer::new(target());
            black_box(reducer.reduce(temperatures.iter().cloned()).len())
        })
    });
}

fn benchmark_data_merger(c: &mut Criterion) {
    let (registries, readings) = create_test_data(100, 13);
    let streams = reduce_all(&readings);

    c.bench_function("data_merger", |b| {
        b.iter(|| {
            let merger = DataMerger::new(&registries);
            black_box(merger.merge(&streams).map(|o| o.len()).unwrap_or(0))
        })
    });
}

fn benchmark_wrf_encoding(c: &mut Criterion) {
    let (registries, readings) = create_test_data(100, 13);
    let streams = reduce_all(&readings);
    let observations = DataMerger::new(&registries).merge(&streams).unwrap();
    let observations = DerivedQuantities::new().apply_all(observations).unwrap();

    c.bench_function("wrf_ascii_render", |b| {
        b.iter(|| {
            let writer = WrfAsciiWriter::new();
            black_box(writer.render(&observations).len())
        })
    });
}

fn benchmark_varying_data_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline_by_size");

    for &size in &[10, 100, 1000] {
        group.bench_with_input(BenchmarkId::new("stations", size), &size, |b, &station_count| {
            let (registries, readings) = create_test_data(station_count, 13);

            b.iter(|| {
                let streams = reduce_all(&readings);
                let observations = DataMerger::new(&registries).merge(&streams).unwrap();
                let observations = DerivedQuantities::new().apply_all(observations).unwrap();
                black_box(WrfAsciiWriter::new().render(&observations).len())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_reducer,
    benchmark_data_merger,
    benchmark_wrf_encoding,
    benchmark_varying_data_sizes
);
criterion_main!(benches);
