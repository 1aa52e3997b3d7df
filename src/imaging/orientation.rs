//! The eight EXIF orientations and how rotate/flip operations compose with them.
//!
//! Raw values follow EXIF tag 0x0112:
//!
//! | Raw | Variant | Displayed as |
//! |---|---|---|
//! | 1 | `Up` | as stored |
//! | 2 | `UpMirrored` | mirrored horizontally |
//! | 3 | `Down` | rotated 180° |
//! | 4 | `DownMirrored` | mirrored vertically |
//! | 5 | `LeftMirrored` | mirrored, rotated 90° CCW |
//! | 6 | `Right` | rotated 90° CW |
//! | 7 | `RightMirrored` | mirrored, rotated 90° CW |
//! | 8 | `Left` | rotated 90° CCW |

/// One of the 4 rotations × {plain, mirrored}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    #[default]
    Up,
    UpMirrored,
    Down,
    DownMirrored,
    LeftMirrored,
    Right,
    RightMirrored,
    Left,
}

/// A metadata-only transform requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationOp {
    Rotate { clockwise: bool },
    FlipHorizontal,
}

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::Up,
        Orientation::UpMirrored,
        Orientation::Down,
        Orientation::DownMirrored,
        Orientation::LeftMirrored,
        Orientation::Right,
        Orientation::RightMirrored,
        Orientation::Left,
    ];

    /// Parse an EXIF orientation value. Anything outside 1..=8 is `None`.
    pub fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            1 => Some(Orientation::Up),
            2 => Some(Orientation::UpMirrored),
            3 => Some(Orientation::Down),
            4 => Some(Orientation::DownMirrored),
            5 => Some(Orientation::LeftMirrored),
            6 => Some(Orientation::Right),
            7 => Some(Orientation::RightMirrored),
            8 => Some(Orientation::Left),
            _ => None,
        }
    }

    pub fn raw(self) -> u16 {
        match self {
            Orientation::Up => 1,
            Orientation::UpMirrored => 2,
            Orientation::Down => 3,
            Orientation::DownMirrored => 4,
            Orientation::LeftMirrored => 5,
            Orientation::Right => 6,
            Orientation::RightMirrored => 7,
            Orientation::Left => 8,
        }
    }

    pub fn is_mirrored(self) -> bool {
        matches!(
            self,
            Orientation::UpMirrored
                | Orientation::DownMirrored
                | Orientation::LeftMirrored
                | Orientation::RightMirrored
        )
    }

    /// True for the 90°/270° orientations, whose displayed width and height
    /// are the stored height and width.
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Left
                | Orientation::LeftMirrored
                | Orientation::Right
                | Orientation::RightMirrored
        )
    }

    /// Orientation after applying `op` on top of `self`.
    pub fn apply(self, op: OrientationOp) -> Self {
        match op {
            OrientationOp::Rotate { clockwise: true } => self.rotated_clockwise(),
            OrientationOp::Rotate { clockwise: false } => self.rotated_counter_clockwise(),
            OrientationOp::FlipHorizontal => self.flipped_horizontally(),
        }
    }

    fn rotated_clockwise(self) -> Self {
        use Orientation::*;
        match self {
            Up => Right,
            Right => Down,
            Down => Left,
            Left => Up,

            UpMirrored => RightMirrored,
            RightMirrored => DownMirrored,
            DownMirrored => LeftMirrored,
            LeftMirrored => UpMirrored,
        }
    }

    fn rotated_counter_clockwise(self) -> Self {
        use Orientation::*;
        match self {
            Up => Left,
            Left => Down,
            Down => Right,
            Right => Up,

            UpMirrored => LeftMirrored,
            LeftMirrored => DownMirrored,
            DownMirrored => RightMirrored,
            RightMirrored => UpMirrored,
        }
    }

    // Not an in-place toggle of the mirror bit: the sideways states also swap
    // left and right.
    fn flipped_horizontally(self) -> Self {
        use Orientation::*;
        match self {
            Up => UpMirrored,
            UpMirrored => Up,
            Down => DownMirrored,
            DownMirrored => Down,
            Left => RightMirrored,
            RightMirrored => Left,
            Right => LeftMirrored,
            LeftMirrored => Right,
        }
    }
}

/// Compose the current orientation with a requested operation.
pub fn compose(current: Orientation, op: OrientationOp) -> Orientation {
    current.apply(op)
}
