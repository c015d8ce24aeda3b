pub mod bootstrap;
pub mod completions;
pub mod propagate;
pub mod reconcile;
pub mod session;
