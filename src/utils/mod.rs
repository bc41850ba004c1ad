//! A collection of utilities which are used by other modules.

mod comparison;
pub use self::comparison::compare_floats;

mod environment;
pub use self::environment::{Environment, InfoLogger};

mod error;
pub use self::error::{GenericError, GenericResult};

mod permutation;
pub use self::permutation::apply_permutation;

mod random;
pub use self::random::{choose, DefaultRandom, Random};
