mod track_registry;

pub use track_registry::{TrackBinding, TrackRegistry};
