//! SVG heatmap: one circle per located IP over land outlines on a Mercator
//! world grid.

use std::f64::consts::FRAC_PI_4;
use std::fmt::Write;

use super::escape_html;
use super::land::land_path;
use crate::config::{
    MAP_MAX_LAT, MAP_MAX_LON, MAP_MIN_LAT, MAP_MIN_LON, MARKER_MAX_SIZE, MARKER_MIN_SIZE,
    MARKER_SIZE_FACTOR,
};
use crate::storage::LocatedIp;

const WIDTH: f64 = 1600.0;
const GRID_STEP_DEG: f64 = 30.0;

fn mercator_y(lat_deg: f64) -> f64 {
    (FRAC_PI_4 + lat_deg.to_radians() / 2.0).tan().ln()
}

fn map_height() -> f64 {
    let lon_span = (MAP_MAX_LON - MAP_MIN_LON).to_radians();
    WIDTH * (mercator_y(MAP_MAX_LAT) - mercator_y(MAP_MIN_LAT)) / lon_span
}

/// Projects a coordinate to SVG pixels, or `None` outside the map bounds.
pub fn project(latitude: f64, longitude: f64) -> Option<(f64, f64)> {
    if !(MAP_MIN_LAT..=MAP_MAX_LAT).contains(&latitude)
        || !(MAP_MIN_LON..=MAP_MAX_LON).contains(&longitude)
    {
        return None;
    }
    Some(project_clamped(latitude, longitude))
}

/// Projects a coordinate, pulling it onto the map edge when it lies outside.
pub(super) fn project_clamped(latitude: f64, longitude: f64) -> (f64, f64) {
    let latitude = latitude.clamp(MAP_MIN_LAT, MAP_MAX_LAT);
    let longitude = longitude.clamp(MAP_MIN_LON, MAP_MAX_LON);
    let x = (longitude - MAP_MIN_LON) / (MAP_MAX_LON - MAP_MIN_LON) * WIDTH;
    let top = mercator_y(MAP_MAX_LAT);
    let bottom = mercator_y(MAP_MIN_LAT);
    let y = (top - mercator_y(latitude)) / (top - bottom) * map_height();
    (x, y)
}

/// Circle radius for an IP seen in `session_count` sessions.
///
/// Marker area grows with the square root of the count so one busy IP does
/// not swamp the map, and is clamped to a fixed range.
pub fn marker_radius(session_count: i64) -> f64 {
    let size = ((session_count.max(0) as f64).sqrt() * MARKER_SIZE_FACTOR)
        .clamp(MARKER_MIN_SIZE, MARKER_MAX_SIZE);
    size.sqrt() / 2.0
}

/// Renders the standalone heatmap document.
pub fn render_heatmap_svg(rows: &[LocatedIp]) -> String {
    let height = map_height();
    let mut svg = String::new();

    // write! into a String cannot fail
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w:.0} {h:.0}" width="100%" role="img" aria-label="Shared IP addresses heatmap">"#,
        w = WIDTH,
        h = height
    );
    svg.push_str("<title>Shared IP Addresses Heatmap</title>");
    let _ = write!(
        svg,
        "<rect width=\"{:.0}\" height=\"{:.0}\" fill=\"#dbeaf5\"/>",
        WIDTH, height
    );

    let _ = write!(
        svg,
        r##"<path class="land" d="{}" fill="#efe9d9" stroke="#6b7b8c" stroke-width="0.8" stroke-linejoin="round"/>"##,
        land_path()
    );

    svg.push_str(r##"<g stroke="#9ab" stroke-width="0.6" fill="none">"##);
    let mut lon = MAP_MIN_LON;
    while lon <= MAP_MAX_LON {
        if let Some((x, _)) = project(0.0, lon) {
            let _ = write!(svg, "<line x1=\"{x:.1}\" y1=\"0\" x2=\"{x:.1}\" y2=\"{height:.1}\"/>");
        }
        lon += GRID_STEP_DEG;
    }
    let mut lat = (MAP_MIN_LAT / GRID_STEP_DEG).ceil() * GRID_STEP_DEG;
    while lat <= MAP_MAX_LAT {
        if let Some((_, y)) = project(lat, 0.0) {
            let _ = write!(svg, "<line x1=\"0\" y1=\"{y:.1}\" x2=\"{WIDTH:.1}\" y2=\"{y:.1}\"/>");
        }
        lat += GRID_STEP_DEG;
    }
    svg.push_str("</g>");

    svg.push_str(r##"<g fill="red" fill-opacity="0.6" stroke="black" stroke-width="1">"##);
    // Smallest markers last so they stay visible on top of big ones
    let mut ordered: Vec<&LocatedIp> = rows.iter().collect();
    ordered.sort_by(|a, b| b.session_count.cmp(&a.session_count));
    for row in ordered {
        let Some((x, y)) = project(row.latitude, row.longitude) else {
            continue;
        };
        let _ = write!(
            svg,
            "<circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"{r:.2}\"><title>{ip} ({count} sessions)</title></circle>",
            r = marker_radius(row.session_count),
            ip = escape_html(&row.ip),
            count = row.session_count
        );
    }
    svg.push_str("</g></svg>");
    svg
}
