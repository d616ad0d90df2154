use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

use soil::query::{Endpoint, Location, PropertyQuery};
use soil::{Depth, SoilProperty, SoilPropertyResponse, ValueKind};

/// Body of a property query asking for every property, depth and statistic.
fn full_property_body() -> String {
    let layers: Vec<_> = SoilProperty::ALL
        .iter()
        .map(|p| {
            let depths: Vec<_> = p
                .depths()
                .iter()
                .enumerate()
                .map(|(i, d)| {
                    let base = (i as f64 + 1.0) * 10.0;
                    json!({
                        "range": {"top_depth": d.top(), "bottom_depth": d.bottom(), "unit_depth": "cm"},
                        "label": d.label(),
                        "values": {
                            "mean": base,
                            "Q0.05": base - 5.0,
                            "Q0.5": base,
                            "Q0.95": base + 5.0,
                            "uncertainty": 12.0
                        }
                    })
                })
                .collect();
            json!({
                "code": p.code(),
                "name": p.name(),
                "unit_measure": {
                    "d_factor": p.conversion_factor(),
                    "mapped_units": p.mapped_unit(),
                    "target_units": p.target_unit(),
                    "uncertainty_unit": ""
                },
                "depths": depths
            })
        })
        .collect();

    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [9.58, 60.1]},
        "properties": {"layers": layers}
    })
    .to_string()
}

fn bench_decode_full_response(c: &mut Criterion) {
    let body = full_property_body();

    c.bench_function("decode_full_property_response", |b| {
        b.iter(|| {
            let response: SoilPropertyResponse = serde_json::from_str(black_box(&body)).unwrap();
            black_box(response);
        });
    });
}

fn bench_navigate_converted(c: &mut Criterion) {
    let response: SoilPropertyResponse = serde_json::from_str(&full_property_body()).unwrap();

    c.bench_function("convert_all_means", |b| {
        b.iter(|| {
            let total: f64 = response
                .layers()
                .iter()
                .flat_map(|layer| {
                    Depth::ALL
                        .iter()
                        .filter_map(move |&d| layer.converted(d, ValueKind::Mean))
                })
                .sum();
            black_box(total);
        });
    });
}

fn bench_query_pairs(c: &mut Criterion) {
    let query = PropertyQuery::new(Location::new(60.1, 9.58))
        .depths(Depth::STANDARD)
        .properties(SoilProperty::ALL)
        .values(ValueKind::ALL);

    c.bench_function("full_query_pairs", |b| {
        b.iter(|| {
            black_box(black_box(&query).query_pairs());
        });
    });
}

criterion_group!(
    benches,
    bench_decode_full_response,
    bench_navigate_converted,
    bench_query_pairs,
);
criterion_main!(benches);
