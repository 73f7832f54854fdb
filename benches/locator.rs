use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lt_weather_parsers::{Capability, LatLon, Station, StationLocator};

/// Grid of stations roughly covering Lithuania, every third one with a rain sensor.
fn stations(count: u32) -> Vec<Station<u32>> {
    (0..count)
        .map(|i| {
            let lat = 53.9 + f64::from(i % 40) * 0.06;
            let lon = 21.0 + f64::from(i / 40) * 0.12;
            let station = Station::new(i, LatLon(lat, lon));
            if i % 3 == 0 {
                station.with_capability(Capability::RainSensor)
            } else {
                station
            }
        })
        .collect()
}

fn bench_locator(c: &mut Criterion) {
    let candidates = stations(2000);
    let origin = LatLon(54.65, 25.15);

    let plain = StationLocator::new(20.0);
    c.bench_function("resolve_nearest", |b| {
        b.iter(|| plain.resolve_nearest(black_box(origin), black_box(&candidates)))
    });

    let filtered = StationLocator::new(20.0)
        .requiring(Capability::RainSensor)
        .skipping([1164, 3, 6, 9]);
    c.bench_function("resolve_nearest_rain_sensor", |b| {
        b.iter(|| filtered.resolve_nearest(black_box(origin), black_box(&candidates)))
    });
}

criterion_group!(benches, bench_locator);
criterion_main!(benches);
