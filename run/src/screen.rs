//! A screen drawn by a program that outputs `(x, y, tile)` triples.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Display;

/// The position that holds the score instead of a tile.
const SCORE: (i64, i64) = (-1, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Wall,
    Block,
    Paddle,
    Ball,
}

#[derive(Debug, Clone, Default)]
pub struct Screen {
    /// Tiles keyed by `(y, x)` so that iteration is in drawing order.
    tiles: BTreeMap<(i64, i64), i64>,
    score: Option<i64>,
    /// Values of an incomplete triple.
    pending: Vec<i64>,
}

impl Tile {
    pub fn from_value(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Empty),
            1 => Some(Self::Wall),
            2 => Some(Self::Block),
            3 => Some(Self::Paddle),
            4 => Some(Self::Ball),
            _ => None,
        }
    }

    fn as_char(&self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Wall => '#',
            Self::Block => '=',
            Self::Paddle => '-',
            Self::Ball => 'o',
        }
    }
}

impl Screen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a batch of output values.
    ///
    /// Values that do not complete a triple are held until the next update.
    pub fn update(&mut self, output: impl IntoIterator<Item = i64>) {
        self.pending.extend(output);
        let whole = self.pending.len() - self.pending.len() % 3;
        let values: Vec<_> = self.pending.drain(..whole).collect();
        for triple in values.chunks(3) {
            let (x, y, value) = (triple[0], triple[1], triple[2]);
            if (x, y) == SCORE {
                self.score = Some(value);
            } else {
                self.tiles.insert((y, x), value);
            }
        }
    }

    pub fn score(&self) -> Option<i64> {
        self.score
    }

    pub fn get(&self, x: i64, y: i64) -> Option<Tile> {
        self.tiles.get(&(y, x)).copied().and_then(Tile::from_value)
    }

    /// The number of positions currently showing the given tile.
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles
            .values()
            .filter(|value| Tile::from_value(**value) == Some(tile))
            .count()
    }

    /// The `(x, y)` position of the first occurrence of the given tile.
    pub fn find(&self, tile: Tile) -> Option<(i64, i64)> {
        self.tiles
            .iter()
            .find(|(_, value)| Tile::from_value(**value) == Some(tile))
            .map(|((y, x), _)| (*x, *y))
    }
}

impl Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let xs = self.tiles.keys().map(|(_, x)| *x);
        let (min_x, max_x) = match (xs.clone().min(), xs.max()) {
            (Some(min), Some(max)) => (min, max),
            _ => return Ok(()),
        };
        let ys = self.tiles.keys().map(|(y, _)| *y);
        let (min_y, max_y) = (ys.clone().min().unwrap_or(0), ys.max().unwrap_or(0));
        for y in min_y..=max_y {
            let row: String = (min_x..=max_x)
                .map(|x| match self.tiles.get(&(y, x)) {
                    Some(value) => Tile::from_value(*value).map_or('?', |t| t.as_char()),
                    None => ' ',
                })
                .collect();
            writeln!(f, "{}", row.trim_end())?;
        }
        Ok(())
    }
}
