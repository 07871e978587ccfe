// src/core/server_catalog.rs

use crate::core::error::CatalogError;
use crate::core::models::ServerDetail;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// The catalog compiled into the binary, used when no override path is configured.
const EMBEDDED_CATALOG: &str = include_str!("../../resources/web_servers.json");

/// One `Server` header signature.
#[derive(Debug, Clone, Deserialize)]
struct ServerSignature {
    prefix: String,
    server_detail: ServerDetail,
}

/// Maps `Server` header prefixes to descriptive metadata.
///
/// Loaded once at start; a malformed catalog is a startup error, never a
/// per-request one.
#[derive(Debug, Clone)]
pub struct ServerCatalog {
    signatures: Vec<ServerSignature>,
}

impl ServerCatalog {
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_CATALOG)
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let signatures: Vec<ServerSignature> = serde_json::from_str(json)?;
        if let Some(index) = signatures.iter().position(|s| s.prefix.trim().is_empty()) {
            return Err(CatalogError::EmptyPrefix { index });
        }
        Ok(Self { signatures })
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Loads the catalog at `path` if given, otherwise the embedded one.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        let catalog = match path {
            Some(path) => {
                debug!(path = %path.display(), "Loading server catalog from file.");
                Self::from_path(path)?
            }
            None => Self::embedded()?,
        };
        info!(signatures = catalog.len(), "Server catalog loaded.");
        Ok(catalog)
    }

    /// The first signature whose prefix starts the header value, in catalog order.
    pub fn lookup(&self, server_header: &str) -> Option<&ServerDetail> {
        self.signatures
            .iter()
            .find(|signature| server_header.starts_with(&signature.prefix))
            .map(|signature| &signature.server_detail)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}
