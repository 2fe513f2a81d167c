// =====================
// ===== Constants =====
// =====================

/// World up axis. The cave lies in the XZ plane at `y = 0`.
pub const UP: [f32; 3] = [0.0, 1.0, 0.0];

/// Arena slots per control node: the corner itself plus its two companions.
pub(super) const NODES_PER_CONTROL: usize = 3;

pub(super) const CONFIG_TOP_LEFT: u8 = 8;
pub(super) const CONFIG_TOP_RIGHT: u8 = 4;
pub(super) const CONFIG_BOTTOM_RIGHT: u8 = 2;
pub(super) const CONFIG_BOTTOM_LEFT: u8 = 1;

// =====================
// ===== Types  ========
// =====================

/// Index into the square grid's node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// What a node in the arena stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Lattice point at a grid cell; `active` mirrors Wall occupancy.
    Control { active: bool },
    /// Midpoint towards the control node directly above (+Z).
    Above,
    /// Midpoint towards the control node to the right (+X).
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    pub position: [f32; 3],
    pub kind: NodeKind,
}

impl Node {
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.kind, NodeKind::Control { active: true })
    }
}

/// The eight points of a square a triangulation case can reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SquarePoint {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
    CenterTop,
    CenterRight,
    CenterBottom,
    CenterLeft,
}

impl SquarePoint {
    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            SquarePoint::TopLeft
                | SquarePoint::TopRight
                | SquarePoint::BottomRight
                | SquarePoint::BottomLeft
        )
    }
}

/// 4-bit corner pattern: bit 3 = top-left, bit 2 = top-right,
/// bit 1 = bottom-right, bit 0 = bottom-left.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Configuration(u8);

impl Configuration {
    #[must_use]
    pub fn from_corners(
        top_left: bool,
        top_right: bool,
        bottom_right: bool,
        bottom_left: bool,
    ) -> Self {
        let mut bits = 0;
        if top_left {
            bits += CONFIG_TOP_LEFT;
        }
        if top_right {
            bits += CONFIG_TOP_RIGHT;
        }
        if bottom_right {
            bits += CONFIG_BOTTOM_RIGHT;
        }
        if bottom_left {
            bits += CONFIG_BOTTOM_LEFT;
        }
        Self(bits)
    }

    /// `None` for values above 15.
    #[must_use]
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits <= 15).then_some(Self(bits))
    }

    #[must_use]
    pub fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn active_corners(self) -> u32 {
        self.0.count_ones()
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub fn is_solid(self) -> bool {
        self.0 == 15
    }

    /// Diagonal pairs (5 and 10), triangulated with a fixed fan.
    #[must_use]
    pub fn is_saddle(self) -> bool {
        self.0 == 5 || self.0 == 10
    }
}

/// One 2x2 unit of the control-node lattice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Square {
    pub top_left: NodeId,
    pub top_right: NodeId,
    pub bottom_right: NodeId,
    pub bottom_left: NodeId,

    pub center_top: NodeId,
    pub center_right: NodeId,
    pub center_bottom: NodeId,
    pub center_left: NodeId,

    pub configuration: Configuration,
}

impl Square {
    #[must_use]
    pub fn node(&self, point: SquarePoint) -> NodeId {
        match point {
            SquarePoint::TopLeft => self.top_left,
            SquarePoint::TopRight => self.top_right,
            SquarePoint::BottomRight => self.bottom_right,
            SquarePoint::BottomLeft => self.bottom_left,
            SquarePoint::CenterTop => self.center_top,
            SquarePoint::CenterRight => self.center_right,
            SquarePoint::CenterBottom => self.center_bottom,
            SquarePoint::CenterLeft => self.center_left,
        }
    }

    #[must_use]
    pub fn corners(&self) -> [NodeId; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }
}
