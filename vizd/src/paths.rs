//! Cross-platform application paths

use std::fs;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn new() -> io::Result<Self> {
        let config_dir = Self::base(dirs::config_dir())?;
        let data_dir = Self::base(dirs::data_dir())?;
        Ok(Self {
            config_dir,
            data_dir,
        })
    }

    fn base(dir: Option<PathBuf>) -> io::Result<PathBuf> {
        dir.map(|d| d.join("nengo_viz")).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "could not determine app directory")
        })
    }

    /// Create the data directory on first write.
    pub fn ensure_data_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }

    pub fn data_dir(&self) -> &PathBuf {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.json")
    }

    pub fn views_file(&self) -> PathBuf {
        self.data_dir.join("views.json")
    }
}
