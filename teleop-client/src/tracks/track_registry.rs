use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

/// A track resolved to its camera name.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackBinding<T> {
    pub stream_id: String,
    pub track: T,
}

/// Joins inbound tracks with the camera names announced over signaling.
///
/// Either half may arrive first. A track whose name is not known yet waits
/// in the pending table until its `CameraInfo` entry shows up.
#[derive(Debug)]
pub struct TrackRegistry<T> {
    names: HashMap<String, String>,
    pending: HashMap<String, T>,
    bound: BTreeMap<String, TrackBinding<T>>,
}

impl<T> Default for TrackRegistry<T> {
    fn default() -> Self {
        Self {
            names: HashMap::new(),
            pending: HashMap::new(),
            bound: BTreeMap::new(),
        }
    }
}

impl<T> TrackRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_track(&mut self, stream_id: &str, track: T) {
        match self.names.get(stream_id).cloned() {
            Some(name) => self.bind(name, stream_id.to_owned(), track),
            None => {
                debug!(stream_id, "Track arrived before its camera name");
                self.pending.insert(stream_id.to_owned(), track);
            }
        }
    }

    pub fn bind_name(&mut self, stream_id: &str, name: &str) {
        let previous = self.names.insert(stream_id.to_owned(), name.to_owned());
        if previous.as_deref() == Some(name) {
            return;
        }

        if let Some(old) = previous {
            // The stream was renamed; move its binding.
            if let Some(binding) = self.bound.remove(&old) {
                self.bind(name.to_owned(), binding.stream_id, binding.track);
            }
            return;
        }

        if let Some(track) = self.pending.remove(stream_id) {
            self.bind(name.to_owned(), stream_id.to_owned(), track);
        }
    }

    /// Applies a whole `CameraInfo` table.
    pub fn bind_all<'a>(&mut self, streams: impl IntoIterator<Item = (&'a String, &'a String)>) {
        for (stream_id, name) in streams {
            self.bind_name(stream_id, name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&TrackBinding<T>> {
        self.bound.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.bound.keys().map(String::as_str).collect()
    }

    pub fn pending_tracks(&self) -> Vec<&str> {
        self.pending.keys().map(String::as_str).collect()
    }

    fn bind(&mut self, name: String, stream_id: String, track: T) {
        info!(camera = %name, stream_id = %stream_id, "Camera track bound");
        self.bound.insert(name, TrackBinding { stream_id, track });
    }
}
