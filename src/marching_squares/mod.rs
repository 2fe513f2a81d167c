// Marching squares over a Floor/Wall occupancy grid
mod cases;
mod square_grid;
mod triangulator;
mod types;
mod validator;
mod vertex;

pub use cases::*;
pub use square_grid::*;
pub use triangulator::*;
pub use types::*;
pub use validator::*;
pub use vertex::*;
