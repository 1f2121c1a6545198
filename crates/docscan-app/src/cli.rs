// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments for the headless scanner driver.

use std::path::PathBuf;

use clap::Parser;
use docscan_core::types::{Point, Quad, Viewport};

/// Run one document scan against a photo file and print the overlay as JSON.
#[derive(Parser, Debug)]
#[command(name = "docscan", author, version, about, long_about = None)]
pub struct Args {
    /// Photo the desktop camera returns when a capture is requested
    #[arg(short = 'i', long = "image", value_name = "FILE")]
    pub image: PathBuf,

    /// Overlay layout, applied in order before the capture (can be specified multiple times)
    #[arg(short = 'l', long = "layout", value_name = "WxH[+X+Y]", value_parser = parse_layout)]
    pub layouts: Vec<Viewport>,

    /// Corners the desktop detector reports, in photo pixels
    #[arg(short = 'c', long = "corners", value_name = "x,y;x,y;x,y;x,y", value_parser = parse_corners)]
    pub corners: Option<Quad>,

    /// Drag a corner by a display-space displacement (can be specified multiple times)
    #[arg(short = 'd', long = "drag", value_name = "INDEX:DX,DY", value_parser = parse_drag)]
    pub drags: Vec<DragStep>,

    /// Stop after editing; do not crop
    #[arg(long = "no-crop")]
    pub no_crop: bool,

    /// Directory for captured and cropped photos (default: configured output dir)
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Directory holding config.json (overrides the platform data directory)
    #[arg(long = "config-dir", value_name = "DIR")]
    pub config_dir: Option<PathBuf>,
}

/// One complete drag gesture on a corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStep {
    pub index: usize,
    pub dx: f64,
    pub dy: f64,
}

fn number(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|e| format!("invalid number {s:?}: {e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("invalid number {s:?}: not finite"))
    }
}

fn pair(s: &str) -> Result<(f64, f64), String> {
    let (a, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected \"a,b\", got {s:?}"))?;
    Ok((number(a)?, number(b)?))
}

/// `400x300` or `400x300+0+64`.
pub fn parse_layout(s: &str) -> Result<Viewport, String> {
    let (size, offset) = match s.split_once('+') {
        Some((size, offset)) => (size, Some(offset)),
        None => (s, None),
    };
    let (w, h) = size
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH[+X+Y], got {s:?}"))?;
    let (x, y) = match offset {
        Some(offset) => {
            let (x, y) = offset
                .split_once('+')
                .ok_or_else(|| format!("expected WxH+X+Y, got {s:?}"))?;
            (number(x)?, number(y)?)
        }
        None => (0.0, 0.0),
    };
    Ok(Viewport::new(number(w)?, number(h)?, x, y))
}

/// Four `x,y` pairs separated by `;`.
pub fn parse_corners(s: &str) -> Result<Quad, String> {
    let points = s
        .split(';')
        .map(|p| pair(p).map(Point::from))
        .collect::<Result<Vec<_>, _>>()?;
    let corners: [Point; 4] = points
        .try_into()
        .map_err(|p: Vec<Point>| format!("expected 4 corners, got {}", p.len()))?;
    Ok(Quad(corners))
}

/// `INDEX:DX,DY`.
pub fn parse_drag(s: &str) -> Result<DragStep, String> {
    let (index, delta) = s
        .split_once(':')
        .ok_or_else(|| format!("expected INDEX:DX,DY, got {s:?}"))?;
    let index = index
        .trim()
        .parse()
        .map_err(|e| format!("invalid corner index {index:?}: {e}"))?;
    let (dx, dy) = pair(delta)?;
    Ok(DragStep { index, dx, dy })
}
