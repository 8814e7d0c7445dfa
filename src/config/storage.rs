use crate::core::Storage;
use crate::utils::error::{PoiError, Result};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);
        fs::write(full_path, data)?;
        Ok(())
    }

    fn ensure_ready(&self) -> Result<()> {
        if Path::new(&self.base_path).is_dir() {
            Ok(())
        } else {
            Err(PoiError::OutputDirMissing {
                path: self.base_path.clone(),
            })
        }
    }

    fn location(&self, path: &str) -> String {
        Path::new(&self.base_path).join(path).display().to_string()
    }
}
