pub(crate) mod cp;
pub(crate) mod notifications;
mod store;
mod store_options;
pub(crate) mod variables;

pub(crate) use cp::Assignments;
pub(crate) use cp::PropagatorQueue;
pub use cp::TrailedInteger;
pub use notifications::Watchers;
pub use store::Store;
pub use store_options::StoreOptions;
