//! A collection of neighborhood operators.

mod swap;
pub use self::swap::{SwapMove, SwapOperator};

mod two_opt;
pub use self::two_opt::{InterRouteTwoOptMove, InterRouteTwoOptOperator};

mod station_insert;
pub use self::station_insert::{InsertStationMove, InsertStationOperator};

mod station_remove;
pub use self::station_remove::{RemoveStationMove, RemoveStationOperator};

pub(crate) use self::station_insert::SolutionArcPosition;
