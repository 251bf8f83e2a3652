//! Binary skeleton grid and pixel neighborhoods.
//!
//! Two adjacency regimes are used throughout the crate:
//! - [`Adjacency::Strong`]: the two pixels share an edge (4-neighborhood).
//! - [`Adjacency::Weak`]: the two pixels share only a corner (diagonal).
//!
//! A diagonal step is *bridged* when one of the two pixels flanking it is
//! foreground. The curve then really runs through that flanking pixel, so
//! the diagonal is not counted as a connection of its own.

use image::GrayImage;
use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::error::VectorizeError;

/// Integer pixel coordinate. Orders row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pixel {
    pub row: usize,
    pub col: usize,
}

impl Pixel {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Image-space point: x = column, y = row.
    pub fn to_point(self) -> Point {
        Point::new(self.col as f64, self.row as f64)
    }

    pub fn distance(self, other: Pixel) -> f64 {
        self.to_point().distance(other.to_point())
    }

    pub fn distance_sq(self, other: Pixel) -> i64 {
        let dr = self.row as i64 - other.row as i64;
        let dc = self.col as i64 - other.col as i64;
        dr * dr + dc * dc
    }

    /// True when the pixels are distinct and touch by edge or corner.
    pub fn touches(self, other: Pixel) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        dr <= 1 && dc <= 1 && (dr + dc) > 0
    }

    /// Adjacency regime between two touching pixels.
    pub fn adjacency(self, other: Pixel) -> Option<Adjacency> {
        if !self.touches(other) {
            return None;
        }
        if self.row == other.row || self.col == other.col {
            Some(Adjacency::Strong)
        } else {
            Some(Adjacency::Weak)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Adjacency {
    Strong,
    Weak,
}

/// Neighbor offsets as (d_row, d_col); the four strong ones come first.
const OFFSETS: [(isize, isize); 8] = [
    (0, 1),
    (-1, 0),
    (0, -1),
    (1, 0),
    (-1, 1),
    (-1, -1),
    (1, -1),
    (1, 1),
];

/// Dense per-pixel storage, used for vertex and link label grids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn new(width: usize, height: usize, fill: T) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn get(&self, p: Pixel) -> &T {
        &self.cells[p.row * self.width + p.col]
    }

    #[inline]
    pub(crate) fn set(&mut self, p: Pixel, value: T) {
        let i = p.row * self.width + p.col;
        self.cells[i] = value;
    }
}

/// A binary skeleton: 1-pixel-wide foreground curves on a zero background.
///
/// Stored as a `GrayImage` with foreground normalized to 255.
#[derive(Debug, Clone)]
pub struct Skeleton {
    image: GrayImage,
}

impl Skeleton {
    /// Wrap a grayscale image. Any non-zero pixel is foreground.
    pub fn from_gray(gray: &GrayImage) -> Self {
        let mut image = gray.clone();
        for pixel in image.pixels_mut() {
            if pixel.0[0] != 0 {
                pixel.0[0] = 255;
            }
        }
        Self { image }
    }

    /// Build from row-major cells. Any non-zero cell is foreground.
    pub fn from_vec(width: usize, height: usize, data: Vec<u8>) -> Result<Self, VectorizeError> {
        let expected = width * height;
        if data.len() != expected {
            return Err(VectorizeError::SizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        let data = data.into_iter().map(|v| if v != 0 { 255 } else { 0 }).collect();
        let image = GrayImage::from_raw(width as u32, height as u32, data).ok_or(
            VectorizeError::SizeMismatch {
                expected,
                actual: expected,
            },
        )?;
        Ok(Self { image })
    }

    /// Parse an ASCII picture: `#` or `1` is foreground, `.` or `0` is
    /// background. Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(text: &str) -> Result<Self, VectorizeError> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());

        let mut data = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(VectorizeError::InvalidGrid(format!(
                    "row {y} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            for ch in row.chars() {
                let v = match ch {
                    '#' | '1' => 1,
                    '.' | '0' => 0,
                    other => {
                        return Err(VectorizeError::InvalidGrid(format!(
                            "unexpected character '{other}' in row {y}"
                        )))
                    }
                };
                data.push(v);
            }
        }

        Self::from_vec(width, height, data)
    }

    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.image
    }

    #[inline]
    pub fn is_set(&self, p: Pixel) -> bool {
        p.row < self.height()
            && p.col < self.width()
            && self.image.get_pixel(p.col as u32, p.row as u32).0[0] != 0
    }

    /// Foreground pixels in row-major order.
    pub fn foreground(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.image
            .enumerate_pixels()
            .filter(|(_, _, v)| v.0[0] != 0)
            .map(|(x, y, _)| Pixel::new(y as usize, x as usize))
    }

    pub fn is_empty(&self) -> bool {
        self.image.pixels().all(|v| v.0[0] == 0)
    }

    /// In-bounds neighbors of `p` with their adjacency regime, strong first.
    pub fn neighbors(&self, p: Pixel) -> impl Iterator<Item = (Pixel, Adjacency)> + '_ {
        let (w, h) = (self.width() as isize, self.height() as isize);
        OFFSETS.iter().filter_map(move |&(dr, dc)| {
            let r = p.row as isize + dr;
            let c = p.col as isize + dc;
            if r < 0 || c < 0 || r >= h || c >= w {
                return None;
            }
            let adjacency = if dr == 0 || dc == 0 {
                Adjacency::Strong
            } else {
                Adjacency::Weak
            };
            Some((Pixel::new(r as usize, c as usize), adjacency))
        })
    }

    /// Whether the diagonal step `a`–`b` is flanked by a foreground pixel.
    /// Always false for strong steps.
    pub fn is_bridged(&self, a: Pixel, b: Pixel) -> bool {
        if a.row == b.row || a.col == b.col {
            return false;
        }
        self.is_set(Pixel::new(a.row, b.col)) || self.is_set(Pixel::new(b.row, a.col))
    }

    /// Foreground neighbors that are real curve connections: every strong
    /// neighbor and each diagonal neighbor that is not bridged.
    pub fn linked_neighbors(&self, p: Pixel) -> impl Iterator<Item = (Pixel, Adjacency)> + '_ {
        self.neighbors(p).filter(move |&(q, adjacency)| {
            self.is_set(q) && (adjacency == Adjacency::Strong || !self.is_bridged(p, q))
        })
    }

    /// Number of curve directions leaving `p`.
    pub fn degree(&self, p: Pixel) -> usize {
        self.linked_neighbors(p).count()
    }
}
