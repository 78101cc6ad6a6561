use std::path::{Component, Path};
use wavepipe_core::{CapabilityRegistry, Config, Song, TranscoderFactory};

/// Shared application state
pub struct AppState {
    config: Config,
    transcoders: TranscoderFactory,
}

impl AppState {
    pub fn new(config: Config, transcoders: TranscoderFactory) -> Self {
        Self {
            config,
            transcoders,
        }
    }

    pub fn transcoders(&self) -> &TranscoderFactory {
        &self.transcoders
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        self.transcoders.registry()
    }

    /// Resolves a library-relative path to a song.
    ///
    /// Returns `None` for paths that escape the library root or do not name a file.
    pub fn resolve_song(&self, relative: &str) -> Option<Song> {
        let relative = Path::new(relative);
        if relative.as_os_str().is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)))
        {
            return None;
        }

        let path = self.config.library.root.join(relative);
        path.is_file().then(|| Song::from_path(path))
    }
}
