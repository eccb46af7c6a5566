// crates/archiver/src/render.rs
//! Stacked line-plot SVG, one panel per signal column.

use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use signal_view_core::SignalTable;
use tracing::info;

use crate::capability::Renderer;
use crate::error::ArchiveError;

const WIDTH: f64 = 1500.0;
const PANEL_HEIGHT: f64 = 200.0;
const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 30.0;
const MARGIN_TOP: f64 = 30.0;
const MARGIN_BOTTOM: f64 = 40.0;

/// Participant id used in plot titles: the last `_`-separated segment of
/// the file stem (`sine_waves_42.txt` -> `42`).
pub fn participant(source: &Path) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.rsplit('_').next().unwrap_or_default().to_string()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the recording as SVG text.
///
/// Time is normalised to start at zero and each panel's x axis spans
/// `[0, duration]`. Each panel's y axis fits that channel's min..max.
pub fn render_svg(source: &Path, table: &SignalTable) -> String {
    let panels = table.channels.len().max(1);
    let height = PANEL_HEIGHT * panels as f64;
    let plot_w = WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_h = PANEL_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM;
    let duration = table.duration();
    let time = table.normalized_time();
    let who = escape_xml(&participant(source));

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}" font-family="sans-serif" font-size="12">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);

    for (i, channel) in table.channels.iter().enumerate() {
        let top = i as f64 * PANEL_HEIGHT + MARGIN_TOP;
        let bottom = top + plot_h;
        let (lo, hi) = channel
            .samples
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        let (lo, hi) = if lo.is_finite() && hi > lo {
            (lo, hi)
        } else if lo.is_finite() {
            (lo - 1.0, lo + 1.0)
        } else {
            (-1.0, 1.0)
        };

        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="{y}" text-anchor="middle" font-size="14">Signal {n} from Participant: {who}</text>"#,
            x = MARGIN_LEFT + plot_w / 2.0,
            y = top - 10.0,
            n = i + 1,
        );
        let _ = writeln!(
            svg,
            r##"<rect x="{MARGIN_LEFT}" y="{top}" width="{plot_w}" height="{plot_h}" fill="none" stroke="#999"/>"##
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="{y}" text-anchor="middle" transform="rotate(-90 {x} {y})">{name}</text>"#,
            x = MARGIN_LEFT - 50.0,
            y = top + plot_h / 2.0,
            name = escape_xml(&channel.name),
        );
        let _ = writeln!(
            svg,
            r#"<text x="{MARGIN_LEFT}" y="{y}" text-anchor="start">0</text><text x="{xr}" y="{y}" text-anchor="end">{duration:.2}</text><text x="{xm}" y="{y}" text-anchor="middle">Time (seconds)</text>"#,
            y = bottom + 16.0,
            xr = MARGIN_LEFT + plot_w,
            xm = MARGIN_LEFT + plot_w / 2.0,
        );
        let _ = writeln!(
            svg,
            r#"<text x="{x}" y="{top}" text-anchor="end" dominant-baseline="hanging">{hi:.2}</text><text x="{x}" y="{bottom}" text-anchor="end">{lo:.2}</text>"#,
            x = MARGIN_LEFT - 6.0,
        );

        let mut points = String::new();
        for (t, v) in time.iter().zip(&channel.samples) {
            // NaN/inf cells parse fine but have no coordinate.
            if !(t.is_finite() && v.is_finite()) {
                continue;
            }
            let px = if duration > 0.0 {
                MARGIN_LEFT + (t / duration) * plot_w
            } else {
                MARGIN_LEFT
            };
            let py = bottom - (v - lo) / (hi - lo) * plot_h;
            let _ = write!(points, "{px:.1},{py:.1} ");
        }
        let _ = writeln!(
            svg,
            r##"<polyline fill="none" stroke="#1f77b4" stroke-width="1" points="{}"/>"##,
            points.trim_end()
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Writes `<stem>.svg` next to other plots.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

#[async_trait]
impl Renderer for SvgRenderer {
    async fn render(
        &self,
        source: &Path,
        table: &SignalTable,
        out_dir: &Path,
    ) -> Result<PathBuf, ArchiveError> {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "plot".to_string());
        let target = out_dir.join(format!("{stem}.svg"));
        let svg = render_svg(source, table);

        let dir = out_dir.to_path_buf();
        let dest = target.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &dest, svg.as_bytes()))
            .await
            .map_err(|e| ArchiveError::Render {
                path: source.to_path_buf(),
                source: std::io::Error::other(e),
            })?
            .map_err(|e| ArchiveError::Render {
                path: source.to_path_buf(),
                source: e,
            })?;

        info!(plot = %target.display(), "Plot saved");
        Ok(target)
    }
}

/// Write through a temp file in the same directory, then rename into place,
/// so readers never see a half-written artifact.
fn write_atomically(dir: &Path, dest: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}
