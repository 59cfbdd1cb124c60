//! SVG rendering of a [`SankeyDiagram`]: nodes stacked in columns, joined by
//! bands whose thickness is proportional to the flow.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;

use super::SankeyDiagram;

const SIZE: (u32, u32) = (1200, 650);
const MARGIN: i32 = 40;
const TOP: i32 = 70;
const NODE_WIDTH: i32 = 20;
const NODE_PAD: i32 = 15;
/// Room on the right for the labels of the last column.
const LABEL_SPACE: i32 = 260;
const BAND_STEPS: usize = 24;

const NODE_FILL: RGBColor = RGBColor(0x1a, 0x98, 0x50);
const BAND: RGBColor = RGBColor(0x78, 0x90, 0x9c);

/// Pixel rectangle of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    pub column: usize,
    pub x: i32,
    pub y: f64,
    pub height: f64,
}

/// Column of every node: the longest link path reaching it from a node
/// with no inflow. Cycles stop growing once a column reaches the node count.
pub fn node_columns(diagram: &SankeyDiagram) -> Vec<usize> {
    let n = diagram.nodes().len();
    let mut columns = vec![0usize; n];
    for _ in 0..n {
        let mut changed = false;
        for link in diagram.links() {
            let next = columns[link.source] + 1;
            if next > columns[link.target] && next < n {
                columns[link.target] = next;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    columns
}

/// Places nodes in their columns with a shared value-to-pixel scale chosen
/// so the fullest column fits the drawing height.
pub fn layout(diagram: &SankeyDiagram, size: (u32, u32)) -> Vec<NodeBox> {
    let columns = node_columns(diagram);
    let column_count = columns.iter().max().map_or(1, |&c| c + 1);
    let (width, height) = (size.0 as i32, size.1 as i32);
    let usable = f64::from(height - TOP - MARGIN);

    let scale = (0..column_count)
        .filter_map(|c| {
            let members: Vec<usize> = (0..columns.len()).filter(|&i| columns[i] == c).collect();
            let total: f64 = members.iter().map(|&i| diagram.node_value(i)).sum();
            let pad = f64::from(NODE_PAD) * members.len().saturating_sub(1) as f64;
            (total > 0.0).then(|| ((usable - pad) / total).max(0.0))
        })
        .fold(f64::INFINITY, f64::min);
    let scale = if scale.is_finite() { scale } else { 0.0 };

    let span = width - 2 * MARGIN - NODE_WIDTH - LABEL_SPACE;
    let step = if column_count > 1 {
        span / (column_count as i32 - 1)
    } else {
        0
    };

    let mut cursor = vec![f64::from(TOP); column_count];
    columns
        .iter()
        .enumerate()
        .map(|(i, &column)| {
            let height = diagram.node_value(i) * scale;
            let node = NodeBox {
                column,
                x: MARGIN + step * column as i32,
                y: cursor[column],
                height,
            };
            cursor[column] += height + f64::from(NODE_PAD);
            node
        })
        .collect()
}

/// Outline of a band from `(x0, y0)` to `(x1, y1)` (top edges) with the
/// given thickness, eased so it leaves and enters nodes horizontally.
fn band_outline(x0: i32, y0: f64, x1: i32, y1: f64, thickness: f64) -> Vec<(i32, i32)> {
    let point = |t: f64, offset: f64| {
        let ease = t * t * (3.0 - 2.0 * t);
        let x = f64::from(x0) + f64::from(x1 - x0) * t;
        let y = y0 + (y1 - y0) * ease + offset;
        (x.round() as i32, y.round() as i32)
    };
    let ts: Vec<f64> = (0..=BAND_STEPS).map(|s| s as f64 / BAND_STEPS as f64).collect();
    ts.iter()
        .map(|&t| point(t, 0.0))
        .chain(ts.iter().rev().map(|&t| point(t, thickness)))
        .collect()
}

/// Renders the diagram to an SVG string.
///
/// # Errors
///
/// Returns an error if the diagram has no links or drawing fails.
pub fn render_sankey_svg(diagram: &SankeyDiagram) -> Result<String> {
    if diagram.is_empty() {
        anyhow::bail!("cannot draw a Sankey diagram without links");
    }
    let boxes = layout(diagram, SIZE);
    let total: f64 = diagram.links().iter().map(|l| l.value).sum();
    let scale = boxes
        .iter()
        .enumerate()
        .find(|(i, b)| b.height > 0.0 && diagram.node_value(*i) > 0.0)
        .map_or(0.0, |(i, b)| b.height / diagram.node_value(i));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, SIZE).into_drawing_area();
        root.fill(&WHITE)?;
        root.draw(&Text::new(
            diagram.title.clone(),
            (MARGIN, 20),
            ("sans-serif", 24).into_font(),
        ))?;

        let mut out_offset = vec![0.0; boxes.len()];
        let mut in_offset = vec![0.0; boxes.len()];
        for link in diagram.links() {
            let thickness = link.value * scale;
            let (src, tgt) = (boxes[link.source], boxes[link.target]);
            if thickness > 0.0 {
                root.draw(&Polygon::new(
                    band_outline(
                        src.x + NODE_WIDTH,
                        src.y + out_offset[link.source],
                        tgt.x,
                        tgt.y + in_offset[link.target],
                        thickness,
                    ),
                    BAND.mix(0.45).filled(),
                ))?;
            }
            out_offset[link.source] += thickness;
            in_offset[link.target] += thickness;
        }

        let font = ("sans-serif", 13).into_font();
        for (i, node) in boxes.iter().enumerate() {
            let (top, bottom) = (node.y.round() as i32, (node.y + node.height).round() as i32);
            root.draw(&Rectangle::new(
                [(node.x, top), (node.x + NODE_WIDTH, bottom.max(top + 1))],
                NODE_FILL.filled(),
            ))?;
            root.draw(&Rectangle::new(
                [(node.x, top), (node.x + NODE_WIDTH, bottom.max(top + 1))],
                BLACK.stroke_width(1),
            ))?;
            let label = format!(
                "{} ({:.0})",
                diagram.label(i).unwrap_or_default(),
                diagram.node_value(i)
            );
            root.draw(&Text::new(
                label,
                (node.x + NODE_WIDTH + 6, (top + bottom) / 2 - 7),
                font.clone(),
            ))?;
        }

        root.draw(&Text::new(
            format!("Total flow: {total:.0}"),
            (MARGIN, SIZE.1 as i32 - 25),
            font,
        ))?;
        root.present()?;
    }
    Ok(svg)
}

/// Renders the diagram and writes it to `path`.
///
/// # Errors
///
/// Returns an error if rendering or writing the file fails.
pub fn export_sankey_svg(diagram: &SankeyDiagram, path: &Path) -> Result<()> {
    let svg = render_sankey_svg(diagram)?;
    fs::write(path, svg)
        .with_context(|| format!("cannot write Sankey diagram to {}", path.display()))
}
