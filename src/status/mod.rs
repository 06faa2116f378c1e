mod status_synchronizer;
pub use status_synchronizer::*;
