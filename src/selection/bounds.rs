use bevy::prelude::IVec2;

/// Inclusive axis-aligned rectangle of grid coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRect {
    pub min: IVec2,
    pub max: IVec2,
}

impl GridRect {
    /// Rectangle spanned by two corners, in any drag direction
    pub fn spanning(a: IVec2, b: IVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Fixed-size footprint around `target`.
    ///
    /// The target sits `length / 2` cells from the left edge and
    /// `(width - 1) / 2` cells from the bottom edge, so even footprints
    /// extend one further left than right and one further up than down.
    pub fn footprint(target: IVec2, length: i32, width: i32) -> Self {
        let length = length.max(1);
        let width = width.max(1);
        let offset_x = length.div_euclid(2);
        let offset_y = (width - 1).div_euclid(2);

        Self {
            min: IVec2::new(target.x - offset_x, target.y - offset_y),
            max: IVec2::new(
                target.x + (length - offset_x - 1),
                target.y + (width - offset_y - 1),
            ),
        }
    }

    /// Smallest rectangle containing every coordinate, if any
    pub fn enclosing(coords: impl IntoIterator<Item = IVec2>) -> Option<Self> {
        coords.into_iter().fold(None, |acc, c| match acc {
            None => Some(Self { min: c, max: c }),
            Some(r) => Some(Self {
                min: r.min.min(c),
                max: r.max.max(c),
            }),
        })
    }

    pub fn contains(&self, coord: IVec2) -> bool {
        coord.x >= self.min.x
            && coord.x <= self.max.x
            && coord.y >= self.min.y
            && coord.y <= self.max.y
    }

    pub fn length_x(&self) -> usize {
        (self.max.x - self.min.x).unsigned_abs() as usize + 1
    }

    pub fn length_y(&self) -> usize {
        (self.max.y - self.min.y).unsigned_abs() as usize + 1
    }

    pub fn area(&self) -> usize {
        self.length_x() * self.length_y()
    }
}
