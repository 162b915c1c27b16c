mod board;
mod equipment;
mod interaction;
mod range;
mod roster;
mod session;
mod snapshot;
#[cfg(test)]
pub(crate) mod test_support;

pub(crate) use session::{InputOutcome, MapSession};
