mod trailed_change;
mod trailed_integer;
mod trailed_values;

pub(crate) use trailed_change::TrailedChange;
pub use trailed_integer::TrailedInteger;
pub(crate) use trailed_values::TrailedValues;
