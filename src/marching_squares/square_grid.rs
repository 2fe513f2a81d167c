use crate::cave_grid::OccupancyGrid;
use crate::error::{CaveError, CaveResult};

use super::types::*;

/// Control-node lattice plus the squares built over it.
///
/// All nodes live in one flat arena. Control node `(x, y)` owns three
/// consecutive slots: the corner, its `above` midpoint and its `right`
/// midpoint. Squares refer to nodes by `NodeId`, so a midpoint bordered by
/// two squares is the same arena entry for both.
#[derive(Clone, Debug)]
pub struct SquareGrid {
    nodes: Vec<Node>,
    squares: Vec<Square>,
    node_count_x: usize,
    node_count_y: usize,
    square_size: f32,
}

impl SquareGrid {
    /// Build the lattice for `grid` with `square_size` world units per cell.
    /// The map is centered on the origin in the XZ plane.
    pub fn build(grid: &OccupancyGrid, square_size: f32) -> CaveResult<Self> {
        if grid.is_empty() {
            return Err(CaveError::EmptyGrid);
        }
        if !(square_size.is_finite() && square_size > 0.0) {
            return Err(CaveError::InvalidCellSize(square_size));
        }
        let node_count_x = grid.width();
        let node_count_y = grid.height();
        if node_count_x < 2 || node_count_y < 2 {
            return Err(CaveError::GridTooSmall {
                width: node_count_x,
                height: node_count_y,
            });
        }

        let map_width = node_count_x as f32 * square_size;
        let map_height = node_count_y as f32 * square_size;
        let half = square_size / 2.0;

        let mut nodes = Vec::with_capacity(node_count_x * node_count_y * NODES_PER_CONTROL);
        for x in 0..node_count_x {
            for y in 0..node_count_y {
                let position = [
                    -map_width / 2.0 + x as f32 * square_size + half,
                    0.0,
                    -map_height / 2.0 + y as f32 * square_size + half,
                ];
                nodes.push(Node {
                    position,
                    kind: NodeKind::Control {
                        active: grid.is_wall(x, y),
                    },
                });
                nodes.push(Node {
                    position: [position[0], position[1], position[2] + half],
                    kind: NodeKind::Above,
                });
                nodes.push(Node {
                    position: [position[0] + half, position[1], position[2]],
                    kind: NodeKind::Right,
                });
            }
        }

        let mut lattice = Self {
            nodes,
            squares: Vec::with_capacity((node_count_x - 1) * (node_count_y - 1)),
            node_count_x,
            node_count_y,
            square_size,
        };

        for x in 0..node_count_x - 1 {
            for y in 0..node_count_y - 1 {
                let square = lattice.make_square(x, y);
                lattice.squares.push(square);
            }
        }

        Ok(lattice)
    }

    fn control_slot(&self, x: usize, y: usize) -> usize {
        (x * self.node_count_y + y) * NODES_PER_CONTROL
    }

    /// Corner node of control point `(x, y)`.
    pub fn control(&self, x: usize, y: usize) -> NodeId {
        NodeId(self.control_slot(x, y))
    }

    /// Midpoint between `(x, y)` and `(x, y + 1)`.
    pub fn above(&self, x: usize, y: usize) -> NodeId {
        NodeId(self.control_slot(x, y) + 1)
    }

    /// Midpoint between `(x, y)` and `(x + 1, y)`.
    pub fn right(&self, x: usize, y: usize) -> NodeId {
        NodeId(self.control_slot(x, y) + 2)
    }

    fn make_square(&self, x: usize, y: usize) -> Square {
        let top_left = self.control(x, y + 1);
        let top_right = self.control(x + 1, y + 1);
        let bottom_right = self.control(x + 1, y);
        let bottom_left = self.control(x, y);

        let configuration = Configuration::from_corners(
            self.node(top_left).is_active(),
            self.node(top_right).is_active(),
            self.node(bottom_right).is_active(),
            self.node(bottom_left).is_active(),
        );

        Square {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
            center_top: self.right(x, y + 1),
            center_right: self.above(x + 1, y),
            center_bottom: self.right(x, y),
            center_left: self.above(x, y),
            configuration,
        }
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Squares in x-outer, y-inner order.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    pub fn squares_x(&self) -> usize {
        self.node_count_x - 1
    }

    pub fn squares_y(&self) -> usize {
        self.node_count_y - 1
    }

    pub fn square(&self, x: usize, y: usize) -> &Square {
        &self.squares[x * self.squares_y() + y]
    }

    pub fn square_size(&self) -> f32 {
        self.square_size
    }
}
