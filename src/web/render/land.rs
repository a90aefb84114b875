//! Basemap land layer.
//!
//! Outlines come from `static/land.txt`, compiled into the binary. They are
//! projected once and reused as a single SVG path.

use std::fmt::Write;
use std::sync::OnceLock;

use super::heatmap::project_clamped;

const LAND_OUTLINES: &str = include_str!("../../../static/land.txt");

/// Parses outline text: one ring per line of `lon,lat` pairs, `#` comments.
///
/// Malformed pairs are skipped, and rings left with fewer than three points
/// are dropped.
pub(super) fn parse_rings(text: &str) -> Vec<Vec<(f64, f64)>> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            line.split_whitespace()
                .filter_map(|pair| {
                    let (lon, lat) = pair.split_once(',')?;
                    Some((lon.parse().ok()?, lat.parse().ok()?))
                })
                .collect::<Vec<(f64, f64)>>()
        })
        .filter(|ring| ring.len() >= 3)
        .collect()
}

fn build_path(rings: &[Vec<(f64, f64)>]) -> String {
    let mut d = String::new();
    for ring in rings {
        for (i, &(lon, lat)) in ring.iter().enumerate() {
            let (x, y) = project_clamped(lat, lon);
            let command = if i == 0 { 'M' } else { 'L' };
            // write! into a String cannot fail
            let _ = write!(d, "{command}{x:.1} {y:.1}");
        }
        d.push('Z');
    }
    d
}

/// SVG path data for every land outline.
pub(super) fn land_path() -> &'static str {
    static PATH: OnceLock<String> = OnceLock::new();
    PATH.get_or_init(|| build_path(&parse_rings(LAND_OUTLINES)))
}
