use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Local directory holding uploaded originals, voice notes and enhanced
/// images. Every write gets a fresh uuid name, so writers never collide.
#[derive(Debug, Clone)]
pub struct Uploads {
    dir: PathBuf,
}

impl Uploads {
    pub async fn open(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stores an upload, keeping the extension of the client's file name.
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty() && e.len() <= 10 && e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        self.write(format!("{}{}", Uuid::new_v4(), ext), bytes).await
    }

    pub async fn save_enhanced(&self, png: &[u8]) -> io::Result<PathBuf> {
        self.write(format!("{}_enhanced.png", Uuid::new_v4()), png).await
    }

    async fn write(&self, name: String, bytes: &[u8]) -> io::Result<PathBuf> {
        let path = self.dir.join(name);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

/// URL under which `path` is served by the `/uploads` route.
pub fn public_url(base: &str, path: &Path) -> String {
    let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
    format!("{}/uploads/{}", base.trim_end_matches('/'), name)
}
