//! 16-point compass directions.

use std::fmt;

use crate::error::GridError;

/// A compass direction, ordered clockwise from north.
///
/// Squares use the 8 principal and diagonal points, hexagons use 6 of
/// them, and triangles with vertex neighbours also need the intermediate
/// points (NNE, ENE, ...). [`level`](Self::level) tells the three groups
/// apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompassDirection {
    /// North.
    N,
    /// North-northeast.
    NNE,
    /// Northeast.
    NE,
    /// East-northeast.
    ENE,
    /// East.
    E,
    /// East-southeast.
    ESE,
    /// Southeast.
    SE,
    /// South-southeast.
    SSE,
    /// South.
    S,
    /// South-southwest.
    SSW,
    /// Southwest.
    SW,
    /// West-southwest.
    WSW,
    /// West.
    W,
    /// West-northwest.
    WNW,
    /// Northwest.
    NW,
    /// North-northwest.
    NNW,
}

const POINTS: usize = 16;

impl CompassDirection {
    /// All directions, clockwise from north.
    pub const ALL: [CompassDirection; POINTS] = [
        Self::N,
        Self::NNE,
        Self::NE,
        Self::ENE,
        Self::E,
        Self::ESE,
        Self::SE,
        Self::SSE,
        Self::S,
        Self::SSW,
        Self::SW,
        Self::WSW,
        Self::W,
        Self::WNW,
        Self::NW,
        Self::NNW,
    ];

    /// Position on the 16-point rose (N = 0, clockwise).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Direction at `index` modulo 16.
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % POINTS]
    }

    /// 0 for N/E/S/W, 1 for the diagonals, 2 for intermediate points.
    pub const fn level(self) -> u8 {
        let i = self.index();
        if i % 4 == 0 {
            0
        } else if i % 2 == 0 {
            1
        } else {
            2
        }
    }

    /// Rotate by `steps` points; positive is clockwise.
    pub const fn rotate(self, steps: i32) -> Self {
        let i = (self.index() as i32 + steps).rem_euclid(POINTS as i32);
        Self::ALL[i as usize]
    }

    /// The direction 180 degrees away.
    pub const fn opposite(self) -> Self {
        self.rotate(8)
    }

    /// One point clockwise.
    pub const fn next_clockwise(self) -> Self {
        self.rotate(1)
    }

    /// One point counter-clockwise.
    pub const fn next_counter_clockwise(self) -> Self {
        self.rotate(-1)
    }

    /// All 16 directions clockwise, starting with `self`.
    pub fn all_clockwise(self) -> impl Iterator<Item = CompassDirection> + Clone {
        (0..POINTS as i32).map(move |step| self.rotate(step))
    }

    /// Fewest single-point rotations from `self` to `other` (0..=8).
    pub const fn distance(self, other: Self) -> usize {
        let d = (self.index() as i32 - other.index() as i32).rem_euclid(POINTS as i32) as usize;
        if d <= POINTS - d {
            d
        } else {
            POINTS - d
        }
    }

    /// Fewest ring steps from `self` to `other` on an ordered `ring`.
    ///
    /// The ring is the clockwise list of directions a shape actually uses
    /// (for example the 6 hexagon directions), so a hexagon's NE and SE are
    /// one step apart even though they are four compass points apart.
    ///
    /// # Errors
    ///
    /// [`GridError::DirectionNotOnRing`] if either direction is missing.
    pub fn distance_on_ring(self, other: Self, ring: &[CompassDirection]) -> Result<usize, GridError> {
        let a = ring_position(self, ring)?;
        let b = ring_position(other, ring)?;
        let d = a.abs_diff(b);
        Ok(d.min(ring.len() - d))
    }

    /// Rotate by `steps` positions along an ordered `ring`.
    ///
    /// # Errors
    ///
    /// [`GridError::DirectionNotOnRing`] if `self` is missing.
    pub fn rotate_on_ring(self, steps: i32, ring: &[CompassDirection]) -> Result<Self, GridError> {
        let position = ring_position(self, ring)? as i64;
        let len = ring.len() as i64;
        let target = (position + i64::from(steps)).rem_euclid(len);
        Ok(ring[target as usize])
    }

    /// Short upper-case name (`"NNE"`).
    pub const fn abbreviation(self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NNE => "NNE",
            Self::NE => "NE",
            Self::ENE => "ENE",
            Self::E => "E",
            Self::ESE => "ESE",
            Self::SE => "SE",
            Self::SSE => "SSE",
            Self::S => "S",
            Self::SSW => "SSW",
            Self::SW => "SW",
            Self::WSW => "WSW",
            Self::W => "W",
            Self::WNW => "WNW",
            Self::NW => "NW",
            Self::NNW => "NNW",
        }
    }

    /// Arrow glyphs; intermediate points combine their two neighbours.
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::N => "↑",
            Self::NNE => "↑↗",
            Self::NE => "↗",
            Self::ENE => "→↗",
            Self::E => "→",
            Self::ESE => "→↘",
            Self::SE => "↘",
            Self::SSE => "↓↘",
            Self::S => "↓",
            Self::SSW => "↓↙",
            Self::SW => "↙",
            Self::WSW => "←↙",
            Self::W => "←",
            Self::WNW => "←↖",
            Self::NW => "↖",
            Self::NNW => "↑↖",
        }
    }
}

fn ring_position(direction: CompassDirection, ring: &[CompassDirection]) -> Result<usize, GridError> {
    ring.iter()
        .position(|&d| d == direction)
        .ok_or(GridError::DirectionNotOnRing { direction })
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}
