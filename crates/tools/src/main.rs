use std::path::PathBuf;

use clap::{Parser, Subcommand};
use foundation::Unit;
use foundation::math::{Vec3, canonical_f64};
use navigation::{CameraNavigator, DisplayConfig, DisplayRenderer, OffscreenDisplay};
use runtime::Frame;
use scene::geo::GeoPoint;
use scene::mapping::CoordinateMapper;
use serde_json::json;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless probe for globe navigation")]
struct Args {
    /// Display config (JSON); defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Geographic point under a pixel, optionally after centering
    Pick {
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,

        /// Center on this latitude first (needs --lon)
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        #[arg(long, default_value_t = 1.0)]
        zoom: f64,

        /// Use perspective projection
        #[arg(long)]
        perspective: bool,
    },

    /// Center and zoom on a location and report the resulting camera
    Center {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        #[arg(long, default_value_t = 1.0)]
        zoom: f64,

        /// Put south at the top of the view
        #[arg(long)]
        south_up: bool,

        /// Play the animation frame by frame instead of jumping
        #[arg(long)]
        animate: bool,
    },

    /// Pixel where a location appears in the default view
    Locate {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Use perspective projection
        #[arg(long)]
        perspective: bool,
    },

    /// Altitude of a display radius for a vertical range
    Radial {
        /// Radial display coordinate (0 = range minimum, 2 = maximum)
        #[arg(long)]
        value: f64,
        #[arg(long, default_value_t = -16_000.0, allow_hyphen_values = true)]
        min: f64,
        #[arg(long, default_value_t = 16_000.0, allow_hyphen_values = true)]
        max: f64,
        /// Vertical unit symbol (m, km, ft)
        #[arg(long, default_value = "m", value_parser = parse_unit)]
        unit: Unit,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => DisplayConfig::load(path)?,
        None => DisplayConfig::default(),
    };

    let out = match args.command {
        Command::Pick {
            x,
            y,
            lat,
            lon,
            zoom,
            perspective,
        } => pick(&config, x, y, lat.zip(lon), zoom, perspective)?,
        Command::Center {
            lat,
            lon,
            zoom,
            south_up,
            animate,
        } => center(&config, lat, lon, zoom, !south_up, animate)?,
        Command::Locate { lat, lon, perspective } => locate(&config, lat, lon, perspective)?,
        Command::Radial {
            value,
            min,
            max,
            unit,
        } => radial(value, min, max, unit)?,
    };

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn parse_unit(s: &str) -> Result<Unit, String> {
    serde_json::from_value(json!(s)).map_err(|_| format!("unknown unit: {s}"))
}

fn navigator(config: &DisplayConfig) -> Result<CameraNavigator<OffscreenDisplay>, Box<dyn std::error::Error>> {
    Ok(CameraNavigator::new(OffscreenDisplay::from_config(config), config)?)
}

fn geo_json(g: Option<GeoPoint>) -> serde_json::Value {
    match g {
        Some(g) => json!({
            "latitude": canonical_f64(g.latitude),
            "longitude": canonical_f64(g.longitude),
            "altitude": canonical_f64(g.altitude),
            "unit": g.altitude_unit,
        }),
        None => serde_json::Value::Null,
    }
}

fn pick(
    config: &DisplayConfig,
    x: f64,
    y: f64,
    target: Option<(f64, f64)>,
    zoom: f64,
    perspective: bool,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let mut nav = navigator(config)?;
    nav.set_perspective(perspective);
    if let Some((lat, lon)) = target {
        nav.center_and_zoom(GeoPoint::surface(lat, lon), zoom, false, true)?;
    }
    let hit = nav.screen_to_geo(x, y);
    info!(x, y, hit = hit.is_some(), "pick");
    Ok(json!({
        "pixel": [x, y],
        "projection": if nav.is_perspective() { "perspective" } else { "parallel" },
        "hit": geo_json(hit),
    }))
}

fn center(
    config: &DisplayConfig,
    lat: f64,
    lon: f64,
    zoom: f64,
    north_up: bool,
    animate: bool,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let mut nav = navigator(config)?;
    nav.center_and_zoom(GeoPoint::surface(lat, lon), zoom, animate, north_up)?;

    let mut frame = Frame::from_interval_ms(0, config.animation.step_interval_ms);
    let mut frames = 0u64;
    while nav.is_animating() {
        nav.tick(frame)?;
        frame = frame.next();
        frames += 1;
    }

    let rotation = nav.rotation()?;
    let (cx, cy) = nav.display().viewport().center();
    let b = nav.lat_lon_box();
    Ok(json!({
        "frames": frames,
        "matrix": nav.projection_matrix().to_row_major(),
        "scale": nav.scale()?,
        "rotation_deg": [
            canonical_f64(rotation.x_deg),
            canonical_f64(rotation.y_deg),
            canonical_f64(rotation.z_deg),
        ],
        "center_pixel": geo_json(nav.screen_to_geo(cx, cy)),
        "viewpoint": geo_json(nav.viewpoint_location()),
        "lat_lon_box": {"west": b.west, "south": b.south, "east": b.east, "north": b.north},
    }))
}

fn locate(
    config: &DisplayConfig,
    lat: f64,
    lon: f64,
    perspective: bool,
) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let mut nav = navigator(config)?;
    nav.set_perspective(perspective);
    let point = nav.mapper().geo_to_scene(GeoPoint::surface(lat, lon))?;
    let pixel = nav.screen_coordinates(point);
    info!(lat, lon, visible = pixel.is_some(), "locate");
    Ok(json!({
        "location": [lat, lon],
        "pixel": pixel.map(|(x, y)| [x, y]),
    }))
}

fn radial(value: f64, min: f64, max: f64, unit: Unit) -> Result<serde_json::Value, Box<dyn std::error::Error>> {
    let mapper = CoordinateMapper::new(min, max, unit)?;
    let geo = mapper.scene_to_geo(Vec3::new(value, 0.0, 0.0));
    Ok(json!({
        "radial": value,
        "range": [min, max],
        "altitude": geo.altitude,
        "unit": geo.altitude_unit,
        "exaggeration": mapper.vertical_exaggeration(),
    }))
}
