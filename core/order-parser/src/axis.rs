//! FILENAME: core/order-parser/src/axis.rs
//! PURPOSE: The axes of the logical data space and the two table dimensions.
//! CONTEXT: Every cell of a projected table is addressed by one index per
//! axis. The order string distributes the axes over the row and column
//! dimension of the table.

use smallvec::SmallVec;

/// Number of distinct axes (and of slots in a tuple).
pub const AXIS_COUNT: usize = 6;

/// Short list of axes; an order never holds more than five.
pub type AxisList = SmallVec<[Axis; 5]>;

/// One dimension of the logical data space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    /// `H`: the data set (histogram) index.
    Dataset,
    /// `G`: the index into the selected groups.
    Group,
    /// `I`: detector row of a group on an area detector.
    DetectorRow,
    /// `J`: detector column of a group on an area detector.
    DetectorColumn,
    /// `T`: the time sample.
    Time,
    /// `F`: the index into the selected fields.
    Field,
}

impl Axis {
    pub const ALL: [Axis; AXIS_COUNT] = [
        Axis::Dataset,
        Axis::Group,
        Axis::DetectorRow,
        Axis::DetectorColumn,
        Axis::Time,
        Axis::Field,
    ];

    /// Natural nesting order when groups are addressed directly ("HGTF").
    pub const NATURAL_GROUPED: [Axis; 4] = [Axis::Dataset, Axis::Group, Axis::Time, Axis::Field];

    /// Natural nesting order for the detector decomposition ("HIJTF").
    pub const NATURAL_DETECTOR: [Axis; 5] = [
        Axis::Dataset,
        Axis::DetectorRow,
        Axis::DetectorColumn,
        Axis::Time,
        Axis::Field,
    ];

    /// The letter used for this axis in order strings.
    pub fn code(self) -> char {
        match self {
            Axis::Dataset => 'H',
            Axis::Group => 'G',
            Axis::DetectorRow => 'I',
            Axis::DetectorColumn => 'J',
            Axis::Time => 'T',
            Axis::Field => 'F',
        }
    }

    pub fn from_code(code: char) -> Option<Axis> {
        match code {
            'H' => Some(Axis::Dataset),
            'G' => Some(Axis::Group),
            'I' => Some(Axis::DetectorRow),
            'J' => Some(Axis::DetectorColumn),
            'T' => Some(Axis::Time),
            'F' => Some(Axis::Field),
            _ => None,
        }
    }

    /// Stable slot of this axis inside a tuple.
    pub fn slot(self) -> usize {
        match self {
            Axis::Dataset => 0,
            Axis::Group => 1,
            Axis::DetectorRow => 2,
            Axis::DetectorColumn => 3,
            Axis::Time => 4,
            Axis::Field => 5,
        }
    }

    /// True for the axes that pick a group (G, or one half of I/J).
    pub fn selects_group(self) -> bool {
        matches!(self, Axis::Group | Axis::DetectorRow | Axis::DetectorColumn)
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The two halves of a table: axes enumerated down the rows, and axes
/// enumerated across the columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Rows,
    Columns,
}

impl Dimension {
    pub fn other(self) -> Dimension {
        match self {
            Dimension::Rows => Dimension::Columns,
            Dimension::Columns => Dimension::Rows,
        }
    }
}
