use anyhow::{bail, Context, Result};
use geojson::{Feature, GeoJson, JsonObject};
use indicatif::{ProgressBar, ProgressStyle};
use soil::geojson::{point_location, soil_property_properties, soil_type_properties};
use soil::query::{Endpoint, Location, PropertyQuery, SoilTypeQuery};
use soil::{Depth, SoilClient, SoilProperty, ValueKind};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::ClientOptions;

/// What to look up for each input point.
pub enum Mode {
    /// Most probable soil type, optionally with the top-k probabilities.
    SoilType(SoilTypeQuery),
    /// Property statistics for every requested property/depth/value.
    Property(PropertyQuery),
}

impl Mode {
    /// Property mode when any property is given, soil type mode otherwise.
    ///
    /// Property mode falls back to the mean when no statistic is given.
    pub fn new(
        properties: Vec<SoilProperty>,
        depths: Vec<Depth>,
        values: Vec<ValueKind>,
        top_k: Option<u32>,
    ) -> Self {
        let origin = Location::new(0.0, 0.0);
        if properties.is_empty() {
            let mut query = SoilTypeQuery::new(origin);
            if let Some(k) = top_k {
                query = query.top_k(k);
            }
            Mode::SoilType(query)
        } else {
            let values = if values.is_empty() {
                vec![ValueKind::Mean]
            } else {
                values
            };
            Mode::Property(
                PropertyQuery::new(origin)
                    .depths(depths)
                    .properties(properties)
                    .values(values),
            )
        }
    }

    fn validate(&self) -> soil::Result<()> {
        match self {
            Mode::SoilType(template) => template.validate(),
            Mode::Property(template) => template.validate(),
        }
    }

    /// Requested property/depth pairs the service has no data for.
    fn unpublished_pairs(&self) -> Vec<(SoilProperty, Depth)> {
        match self {
            Mode::SoilType(_) => Vec::new(),
            Mode::Property(template) => template.unpublished_pairs(),
        }
    }

    /// Names of the CSV columns this mode appends.
    fn columns(&self) -> Vec<String> {
        match self {
            Mode::SoilType(template) => {
                let mut columns = vec!["soil_type".to_string()];
                if wants_probabilities(template) {
                    columns.push("probabilities".to_string());
                }
                columns
            }
            Mode::Property(template) => property_columns(template)
                .map(|(p, d, v)| format!("{}_{}_{}", p.code(), d.label(), v.as_str()))
                .collect(),
        }
    }

    /// CSV cells for one point, in [`Self::columns`] order.
    fn cells(&self, client: &SoilClient, location: Location) -> soil::Result<Vec<String>> {
        match self {
            Mode::SoilType(template) => {
                let response = client.soil_type(&SoilTypeQuery {
                    location,
                    ..*template
                })?;
                let mut cells = vec![response.most_probable().to_string()];
                if wants_probabilities(template) {
                    let probabilities: Vec<String> = response
                        .probabilities()
                        .iter()
                        .map(|p| format!("{}:{}", p.soil_type, p.probability))
                        .collect();
                    cells.push(probabilities.join(";"));
                }
                Ok(cells)
            }
            Mode::Property(template) => {
                let response = client.fetch(&PropertyQuery {
                    location,
                    ..template.clone()
                })?;
                Ok(property_columns(template)
                    .map(|(p, d, v)| {
                        response
                            .value(p, d, v)
                            .map(|value| value.to_string())
                            .unwrap_or_default()
                    })
                    .collect())
            }
        }
    }

    /// GeoJSON properties for one point.
    fn properties(&self, client: &SoilClient, location: Location) -> soil::Result<JsonObject> {
        match self {
            Mode::SoilType(template) => {
                let response = client.soil_type(&SoilTypeQuery {
                    location,
                    ..*template
                })?;
                Ok(soil_type_properties(&response))
            }
            Mode::Property(template) => {
                let response = client.fetch(&PropertyQuery {
                    location,
                    ..template.clone()
                })?;
                Ok(soil_property_properties(&response))
            }
        }
    }
}

fn wants_probabilities(query: &SoilTypeQuery) -> bool {
    query.top_k.is_some_and(|k| k > 0)
}

fn property_columns(
    query: &PropertyQuery,
) -> impl Iterator<Item = (SoilProperty, Depth, ValueKind)> + '_ {
    query.properties.iter().flat_map(move |&p| {
        query
            .depths
            .iter()
            .flat_map(move |&d| query.values.iter().map(move |&v| (p, d, v)))
    })
}

pub fn run(
    options: &ClientOptions,
    input: PathBuf,
    output: Option<PathBuf>,
    lat_col: String,
    lon_col: String,
    mode: Mode,
) -> Result<()> {
    mode.validate().context("Invalid batch parameters")?;
    for (property, depth) in mode.unpublished_pairs() {
        tracing::warn!(
            property = property.code(),
            depth = depth.label(),
            "Property is not published at this depth; its columns will be empty"
        );
    }
    let client = options.connect()?;

    // Detect file format
    let extension = input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let output_path = match extension.as_str() {
        "csv" => process_csv(&client, &mode, &input, output, &lat_col, &lon_col)?,
        "geojson" | "json" => process_geojson(&client, &mode, &input, output)?,
        _ => bail!(
            "Unsupported file format: {}. Use .csv or .geojson",
            extension
        ),
    };

    println!("Output written to: {}", output_path.display());
    Ok(())
}

fn progress_bar(len: u64) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

/// `<stem>_soil.<extension>` next to the input file.
fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}_soil.{}", stem, extension))
}

fn process_csv(
    client: &SoilClient,
    mode: &Mode,
    input: &Path,
    output: Option<PathBuf>,
    lat_col: &str,
    lon_col: &str,
) -> Result<PathBuf> {
    let file = File::open(input).context("Failed to open input file")?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    // Find column indices
    let headers = reader.headers()?.clone();
    let lat_idx = headers
        .iter()
        .position(|h| h == lat_col)
        .with_context(|| format!("Column '{}' not found in CSV", lat_col))?;
    let lon_idx = headers
        .iter()
        .position(|h| h == lon_col)
        .with_context(|| format!("Column '{}' not found in CSV", lon_col))?;

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
    let pb = progress_bar(records.len() as u64)?;

    let output_path = output.unwrap_or_else(|| default_output_path(input, "csv"));
    let output_file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = csv::Writer::from_writer(BufWriter::new(output_file));

    let columns = mode.columns();
    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.extend(columns.iter().map(String::as_str));
    writer.write_record(&new_headers)?;

    for (row, record) in records.iter().enumerate() {
        let lat: f64 = record
            .get(lat_idx)
            .context("Missing latitude")?
            .trim()
            .parse()
            .with_context(|| format!("Invalid latitude on row {}", row + 1))?;
        let lon: f64 = record
            .get(lon_idx)
            .context("Missing longitude")?
            .trim()
            .parse()
            .with_context(|| format!("Invalid longitude on row {}", row + 1))?;

        let cells = mode
            .cells(client, Location::new(lat, lon))
            .unwrap_or_else(|e| {
                tracing::warn!(row = row + 1, lat, lon, error = %e, "Soil lookup failed");
                vec![String::new(); columns.len()]
            });

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.extend(cells.iter().map(String::as_str));
        writer.write_record(&new_record)?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    Ok(output_path)
}

fn process_geojson(
    client: &SoilClient,
    mode: &Mode,
    input: &Path,
    output: Option<PathBuf>,
) -> Result<PathBuf> {
    let file = File::open(input).context("Failed to open input file")?;
    let reader = BufReader::new(file);

    let geojson: GeoJson = serde_json::from_reader(reader).context("Failed to parse GeoJSON")?;

    let result = match geojson {
        GeoJson::Geometry(geometry) => {
            let mut feature = Feature::from(geometry);
            enrich_feature(client, mode, &mut feature, 0);
            GeoJson::Feature(feature)
        }
        GeoJson::Feature(mut feature) => {
            enrich_feature(client, mode, &mut feature, 0);
            GeoJson::Feature(feature)
        }
        GeoJson::FeatureCollection(mut fc) => {
            let pb = progress_bar(fc.features.len() as u64)?;
            for (index, feature) in fc.features.iter_mut().enumerate() {
                enrich_feature(client, mode, feature, index);
                pb.inc(1);
            }
            pb.finish_with_message("done");
            GeoJson::FeatureCollection(fc)
        }
    };

    let output_path = output.unwrap_or_else(|| default_output_path(input, "geojson"));
    let output_file = File::create(&output_path).context("Failed to create output file")?;
    let mut writer = BufWriter::new(output_file);
    serde_json::to_writer_pretty(&mut writer, &result)?;
    writer.flush()?;

    Ok(output_path)
}

/// Merge soil properties into a Point feature. Other geometries are left untouched.
fn enrich_feature(client: &SoilClient, mode: &Mode, feature: &mut Feature, index: usize) {
    let Some(location) = feature.geometry.as_ref().and_then(point_location) else {
        tracing::debug!(feature = index, "Skipping feature without point geometry");
        return;
    };

    match mode.properties(client, location) {
        Ok(fields) => feature
            .properties
            .get_or_insert_with(JsonObject::new)
            .extend(fields),
        Err(e) => {
            tracing::warn!(
                feature = index,
                lat = location.lat,
                lon = location.lon,
                error = %e,
                "Soil lookup failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::header, http::StatusCode, http::Uri, Router};
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use tempfile::TempDir;

    /// Canned 200 bodies served in order, plus a log of every request URI.
    #[derive(Clone, Default)]
    struct Stub {
        bodies: Arc<Mutex<VecDeque<String>>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl Stub {
        fn reply(&self, body: Value) -> &Self {
            self.bodies.lock().unwrap().push_back(body.to_string());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    async fn respond(
        State(stub): State<Stub>,
        uri: Uri,
    ) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
        stub.requests.lock().unwrap().push(uri.to_string());
        let (status, body) = match stub.bodies.lock().unwrap().pop_front() {
            Some(body) => (StatusCode::OK, body),
            None => (StatusCode::INTERNAL_SERVER_ERROR, String::new()),
        };
        (status, [(header::CONTENT_TYPE, "application/json")], body)
    }

    /// Serve `stub` on a background thread, returning options that target it.
    fn stub_options(stub: &Stub) -> ClientOptions {
        let app = Router::new().fallback(respond).with_state(stub.clone());

        let rt = tokio::runtime::Runtime::new().unwrap();
        let listener = rt
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            rt.block_on(async move {
                axum::serve(listener, app).await.unwrap();
            });
        });

        ClientOptions {
            base_url: Some(format!("http://{}/soil", addr)),
            timeout: 5,
            retries: 0,
        }
    }

    fn point(lat: f64, lon: f64) -> Value {
        json!({"type": "Point", "coordinates": [lon, lat]})
    }

    fn depth(label: &str, top: u32, bottom: u32, mean: Option<u32>) -> Value {
        json!({
            "range": {"top_depth": top, "bottom_depth": bottom, "unit_depth": "cm"},
            "label": label,
            "values": {"mean": mean}
        })
    }

    /// Bulk density and clay at 0-5cm and 100-200cm.
    fn property_body(lat: f64, lon: f64, bdod: [u32; 2], clay: [Option<u32>; 2]) -> Value {
        json!({
            "type": "Feature",
            "geometry": point(lat, lon),
            "properties": {"layers": [
                {
                    "code": "bdod",
                    "name": "Bulk density",
                    "unit_measure": {
                        "d_factor": 100,
                        "mapped_units": "cg/cm³",
                        "target_units": "kg/dm³",
                        "uncertainty_unit": ""
                    },
                    "depths": [
                        depth("0-5cm", 0, 5, Some(bdod[0])),
                        depth("100-200cm", 100, 200, Some(bdod[1]))
                    ]
                },
                {
                    "code": "clay",
                    "name": "Clay",
                    "unit": "g/kg",
                    "depths": [
                        depth("0-5cm", 0, 5, clay[0]),
                        depth("100-200cm", 100, 200, clay[1])
                    ]
                }
            ]}
        })
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    /// Client pointed at a local port nobody listens on.
    fn offline_client() -> SoilClient {
        let port = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let options = ClientOptions {
            base_url: Some(format!("http://127.0.0.1:{}", port)),
            timeout: 5,
            retries: 0,
        };
        options.connect().unwrap()
    }

    #[test]
    fn test_mode_selection_and_columns() {
        let mode = Mode::new(vec![], vec![], vec![ValueKind::Mean], None);
        assert_eq!(mode.columns(), vec!["soil_type"]);

        let mode = Mode::new(vec![], vec![], vec![ValueKind::Mean], Some(3));
        assert_eq!(mode.columns(), vec!["soil_type", "probabilities"]);

        let mode = Mode::new(
            vec![SoilProperty::Bdod, SoilProperty::Clay],
            vec![Depth::D0To5],
            vec![ValueKind::Mean, ValueKind::Q95],
            None,
        );
        assert_eq!(
            mode.columns(),
            vec![
                "bdod_0-5cm_mean",
                "bdod_0-5cm_Q0.95",
                "clay_0-5cm_mean",
                "clay_0-5cm_Q0.95"
            ]
        );
    }

    #[test]
    fn test_property_mode_defaults_to_mean() {
        let mode = Mode::new(vec![SoilProperty::Soc], vec![Depth::D0To5], vec![], None);
        assert_eq!(mode.columns(), vec!["soc_0-5cm_mean"]);
        assert!(mode.validate().is_ok());
    }

    #[test]
    fn test_mode_unpublished_pairs() {
        let mode = Mode::new(
            vec![SoilProperty::Ocs, SoilProperty::Clay],
            vec![Depth::D0To30],
            vec![],
            None,
        );
        assert_eq!(
            mode.unpublished_pairs(),
            vec![(SoilProperty::Clay, Depth::D0To30)]
        );

        let mode = Mode::new(vec![], vec![Depth::D0To5], vec![], Some(3));
        assert!(mode.unpublished_pairs().is_empty());
    }

    #[test]
    fn test_mode_validation() {
        let mode = Mode::new(vec![SoilProperty::Bdod], vec![], vec![ValueKind::Mean], None);
        assert!(mode.validate().is_err());

        let mode = Mode::new(vec![], vec![], vec![ValueKind::Mean], Some(31));
        assert!(mode.validate().is_err());

        let mode = Mode::new(vec![], vec![], vec![ValueKind::Mean], Some(30));
        assert!(mode.validate().is_ok());
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/points.csv"), "csv"),
            PathBuf::from("/data/points_soil.csv")
        );
        assert_eq!(
            default_output_path(Path::new("sites.geojson"), "geojson"),
            PathBuf::from("sites_soil.geojson")
        );
    }

    #[test]
    fn test_process_csv_failed_rows_get_empty_cells() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("points.csv");
        std::fs::write(&input, "name,latitude,longitude\nfarm,60.1,9.58\npole,95.0,0.0\n").unwrap();

        let mode = Mode::new(vec![], vec![], vec![ValueKind::Mean], Some(2));
        let output =
            process_csv(&offline_client(), &mode, &input, None, "latitude", "longitude").unwrap();

        assert_eq!(output, tmp.path().join("points_soil.csv"));
        let written = std::fs::read_to_string(output).unwrap();
        assert_eq!(
            written,
            "name,latitude,longitude,soil_type,probabilities\nfarm,60.1,9.58,,\npole,95.0,0.0,,\n"
        );
    }

    #[test]
    fn test_process_csv_missing_column() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("points.csv");
        std::fs::write(&input, "name,y,x\nfarm,60.1,9.58\n").unwrap();

        let mode = Mode::new(vec![], vec![], vec![ValueKind::Mean], None);
        let err = process_csv(&offline_client(), &mode, &input, None, "lat", "lon").unwrap_err();
        assert!(err.to_string().contains("Column 'lat' not found"));
    }

    #[test]
    fn test_process_geojson_keeps_features_on_failure() {
        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("sites.geojson");
        std::fs::write(
            &input,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.0, 95.0]}, "properties": {"name": "pole"}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}, "properties": {"name": "road"}}
            ]}"#,
        )
        .unwrap();

        let mode = Mode::new(vec![], vec![], vec![ValueKind::Mean], None);
        let output = process_geojson(&offline_client(), &mode, &input, None).unwrap();
        assert_eq!(output, tmp.path().join("sites_soil.geojson"));

        let geojson: GeoJson = std::fs::read_to_string(output).unwrap().parse().unwrap();
        let GeoJson::FeatureCollection(fc) = geojson else {
            panic!("expected a feature collection");
        };
        assert_eq!(fc.features.len(), 2);
        for feature in &fc.features {
            let props = feature.properties.as_ref().unwrap();
            assert_eq!(props.len(), 1);
            assert!(!props.contains_key("soil_type"));
        }
    }

    #[test]
    fn test_process_csv_property_values() {
        let stub = Stub::default();
        stub.reply(property_body(60.1, 9.58, [72, 141], [Some(220), None]))
            .reply(property_body(60.2, 9.6, [118, 150], [Some(95), Some(310)]));
        let client = stub_options(&stub).connect().unwrap();

        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("points.csv");
        std::fs::write(&input, "name,lat,lon\nfarm,60.1,9.58\nfield,60.2,9.6\n").unwrap();
        let output = tmp.path().join("enriched.csv");

        let mode = Mode::new(
            vec![SoilProperty::Bdod, SoilProperty::Clay],
            vec![Depth::D0To5, Depth::D100To200],
            vec![],
            None,
        );
        let written =
            process_csv(&client, &mode, &input, Some(output.clone()), "lat", "lon").unwrap();
        assert_eq!(written, output);

        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "name,lat,lon,bdod_0-5cm_mean,bdod_100-200cm_mean,clay_0-5cm_mean,clay_100-200cm_mean\n\
             farm,60.1,9.58,72,141,220,\n\
             field,60.2,9.6,118,150,95,310\n"
        );
        assert_eq!(
            stub.requests(),
            vec![
                "/soil/property?lon=9.58&lat=60.1&depths=0-5cm&depths=100-200cm\
                 &properties=bdod&properties=clay&values=mean",
                "/soil/property?lon=9.6&lat=60.2&depths=0-5cm&depths=100-200cm\
                 &properties=bdod&properties=clay&values=mean",
            ]
        );
    }

    #[test]
    fn test_process_csv_soil_type_probabilities() {
        let stub = Stub::default();
        stub.reply(json!({
            "type": "Feature",
            "geometry": point(60.1, 9.58),
            "properties": {
                "most_probable_soil_type": "Podzols",
                "probabilities": [
                    {"soil_type": "Podzols", "probability": 42},
                    {"soil_type": "Histosols", "probability": 17}
                ]
            }
        }));
        let client = stub_options(&stub).connect().unwrap();

        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("points.csv");
        std::fs::write(&input, "lat,lon\n60.1,9.58\n").unwrap();

        let mode = Mode::new(vec![], vec![], vec![], Some(2));
        let output = process_csv(&client, &mode, &input, None, "lat", "lon").unwrap();

        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "lat,lon,soil_type,probabilities\n60.1,9.58,Podzols,Podzols:42;Histosols:17\n"
        );
        assert_eq!(stub.requests(), vec!["/soil/type?lon=9.58&lat=60.1&top_k=2"]);
    }

    #[test]
    fn test_process_geojson_merges_soil_type() {
        let stub = Stub::default();
        stub.reply(json!({
            "type": "Feature",
            "geometry": point(60.1, 9.58),
            "properties": {
                "most_probable_soil_type": "Cambisols",
                "probabilities": [
                    {"soil_type": "Cambisols", "probability": 55},
                    {"soil_type": "Podzols", "probability": 20}
                ]
            }
        }));
        let client = stub_options(&stub).connect().unwrap();

        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("sites.geojson");
        std::fs::write(
            &input,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [9.58, 60.1]}, "properties": {"name": "farm"}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}, "properties": {"name": "road"}}
            ]}"#,
        )
        .unwrap();

        let mode = Mode::new(vec![], vec![], vec![], Some(2));
        let output = process_geojson(&client, &mode, &input, None).unwrap();

        let geojson: GeoJson = std::fs::read_to_string(output).unwrap().parse().unwrap();
        let GeoJson::FeatureCollection(fc) = geojson else {
            panic!("expected a feature collection");
        };

        let farm = fc.features[0].properties.as_ref().unwrap();
        assert_eq!(farm["name"], "farm");
        assert_eq!(farm["soil_type"], "Cambisols");
        assert_eq!(farm["probability_Cambisols"], 55);
        assert_eq!(farm["probability_Podzols"], 20);

        let road = fc.features[1].properties.as_ref().unwrap();
        assert_eq!(road.len(), 1);

        // The line feature is never looked up
        assert_eq!(stub.requests(), vec!["/soil/type?lon=9.58&lat=60.1&top_k=2"]);
    }

    #[test]
    fn test_run_warns_about_unpublished_depth_once() {
        let stub = Stub::default();
        for _ in 0..3 {
            stub.reply(json!({
                "type": "Feature",
                "geometry": point(60.1, 9.58),
                "properties": {"layers": [{
                    "code": "ocs",
                    "name": "Organic carbon stocks",
                    "unit": "t/ha",
                    "depths": [
                        depth("0-30cm", 0, 30, Some(61)),
                        {
                            "range": {"top_depth": 0, "bottom_depth": 5, "unit_depth": "cm"},
                            "label": "0-5cm",
                            "values": {}
                        }
                    ]
                }]}
            }));
        }
        let options = stub_options(&stub);

        let tmp = TempDir::new().unwrap();
        let input = tmp.path().join("points.csv");
        std::fs::write(&input, "lat,lon\n60.1,9.58\n60.1,9.58\n60.1,9.58\n").unwrap();
        let output = tmp.path().join("points_soil.csv");

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let mode = Mode::new(
            vec![SoilProperty::Ocs],
            vec![Depth::D0To30, Depth::D0To5],
            vec![],
            None,
        );
        tracing::subscriber::with_default(subscriber, || {
            run(
                &options,
                input,
                None,
                "lat".to_string(),
                "lon".to_string(),
                mode,
            )
            .unwrap();
        });

        assert_eq!(stub.requests().len(), 3);
        assert_eq!(captured.text().matches("not published").count(), 1);
        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "lat,lon,ocs_0-30cm_mean,ocs_0-5cm_mean\n\
             60.1,9.58,61,\n60.1,9.58,61,\n60.1,9.58,61,\n"
        );
    }
}
