//! Servicio de almacenamiento de ficheros
//!
//! Guarda y elimina los bytes de los documentos bajo un directorio de
//! uploads con nombres únicos; la base de datos solo conoce la ruta opaca.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::EnvironmentConfig;
use crate::utils::errors::{validation_error, AppError};

const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "txt", "zip", "rar", "jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp",
];

pub struct FileStorageService {
    upload_dir: PathBuf,
    max_file_size: usize,
}

impl FileStorageService {
    pub fn new(upload_dir: impl Into<PathBuf>, max_file_size: usize) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            max_file_size,
        }
    }

    pub fn from_config(config: &EnvironmentConfig) -> Self {
        Self::new(config.upload_dir.clone(), config.max_file_size)
    }

    /// Validar la extensión del fichero contra la allow-list
    pub fn validate_filename(&self, filename: &str) -> Result<(), AppError> {
        if filename.is_empty() {
            return Err(validation_error("No filename provided", None));
        }

        let extension = extension_of(filename);
        match extension {
            Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(()),
            _ => Err(validation_error(
                format!(
                    "File type not allowed. Allowed types: {}",
                    ALLOWED_EXTENSIONS.join(", ")
                ),
                None,
            )),
        }
    }

    /// Nombre único que conserva la extensión original
    pub fn unique_filename(filename: &str) -> String {
        match extension_of(filename) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        }
    }

    /// Guardar los bytes y devolver (ruta, tamaño)
    pub async fn store(&self, filename: &str, content: &[u8]) -> Result<(String, i64), AppError> {
        self.validate_filename(filename)?;

        if content.len() > self.max_file_size {
            return Err(validation_error(
                format!(
                    "File size ({} bytes) exceeds maximum allowed size ({} bytes)",
                    content.len(),
                    self.max_file_size
                ),
                None,
            ));
        }

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {}", e)))?;

        let stored_name = Self::unique_filename(filename);
        let path = self.upload_dir.join(&stored_name);

        tokio::fs::write(&path, content)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store file: {}", e)))?;

        Ok((path.to_string_lossy().into_owned(), content.len() as i64))
    }

    /// Leer los bytes de una ruta previamente guardada
    pub async fn read(&self, path: &str) -> Result<Vec<u8>, AppError> {
        tokio::fs::read(path)
            .await
            .map_err(|_| AppError::NotFound("Document file not found".to_string()))
    }

    /// Borrar un fichero; devuelve false si no existía
    pub async fn delete(&self, path: &str) -> bool {
        match tokio::fs::remove_file(path).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to delete file {}: {}", path, e);
                false
            }
        }
    }
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> FileStorageService {
        let dir = std::env::temp_dir().join(format!("fleet-uploads-{}", Uuid::new_v4()));
        FileStorageService::new(dir, 1024)
    }

    #[test]
    fn test_validate_filename_allow_list() {
        let storage = service();
        assert!(storage.validate_filename("invoice.pdf").is_ok());
        assert!(storage.validate_filename("photo.JPG").is_ok());
        assert!(storage.validate_filename("malware.exe").is_err());
        assert!(storage.validate_filename("no_extension").is_err());
        assert!(storage.validate_filename("").is_err());
    }

    #[test]
    fn test_unique_filename_preserves_extension() {
        let name = FileStorageService::unique_filename("scan.pdf");
        assert!(name.ends_with(".pdf"));
        assert_ne!(name, FileStorageService::unique_filename("scan.pdf"));
    }

    #[tokio::test]
    async fn test_store_read_delete_roundtrip() {
        let storage = service();
        let (path, size) = storage.store("note.txt", b"refuel receipt").await.unwrap();

        assert_eq!(size, 14);
        assert_eq!(storage.read(&path).await.unwrap(), b"refuel receipt");
        assert!(storage.delete(&path).await);
        assert!(storage.read(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_store_rejects_oversized_content() {
        let storage = service();
        let big = vec![0u8; 2048];
        assert!(storage.store("big.txt", &big).await.is_err());
    }
}
