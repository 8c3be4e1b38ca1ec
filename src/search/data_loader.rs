use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::CatalogError;

/// Catalog compiled into the binary.
const BUNDLED_CATALOG: &str = include_str!("../../data/ingredientes.json");

/// One catalog entry. Its identity is its position in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRecord {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "sinonimos")]
    pub synonyms: Vec<String>,
}

impl IngredientRecord {
    /// Text that gets embedded: `"<name> | <synonyms space-joined>"`.
    pub fn document(&self) -> String {
        format!("{} | {}", self.name, self.synonyms.join(" "))
    }
}

pub fn load_bundled_catalog() -> Result<Vec<IngredientRecord>, CatalogError> {
    parse_catalog(BUNDLED_CATALOG)
}

pub fn load_catalog_file(path: &Path) -> Result<Vec<IngredientRecord>, CatalogError> {
    if !path.exists() {
        return Err(CatalogError::NotFound(path.to_path_buf()));
    }
    let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&contents)
}

pub fn parse_catalog(json: &str) -> Result<Vec<IngredientRecord>, CatalogError> {
    serde_json::from_str(json).map_err(CatalogError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_document_format() {
        let leite = IngredientRecord {
            name: "leite".into(),
            synonyms: vec!["leite de vaca".into(), "leite integral".into()],
        };
        assert_eq!(leite.document(), "leite | leite de vaca leite integral");

        let coco = IngredientRecord {
            name: "leite de coco".into(),
            synonyms: vec![],
        };
        assert_eq!(coco.document(), "leite de coco | ");
    }

    #[test]
    fn test_load_catalog_file_success() -> Result<()> {
        let mut file = NamedTempFile::new()?;
        write!(
            file,
            r#"[{{"nome":"leite","sinonimos":["leite de vaca"]}},{{"nome":"leite de coco","sinonimos":[]}}]"#
        )?;
        file.flush()?;

        let records = load_catalog_file(file.path())?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "leite");
        assert_eq!(records[0].synonyms, vec!["leite de vaca"]);
        assert!(records[1].synonyms.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_required_field() {
        let err = parse_catalog(r#"[{"nome":"sal"}]"#).unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
        assert!(err.to_string().contains("sinonimos"));
    }

    #[test]
    fn test_not_json() {
        let err = parse_catalog("nome,sinonimos\nsal,").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[test]
    fn test_file_not_found() {
        let path = Path::new("this_file_does_not_exist.json");
        let err = load_catalog_file(path).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_empty_catalog_is_valid() -> Result<()> {
        assert!(parse_catalog("[]")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_bundled_catalog_parses() -> Result<()> {
        let records = load_bundled_catalog()?;
        assert!(!records.is_empty());
        assert!(records.iter().all(|r| !r.name.trim().is_empty()));
        Ok(())
    }
}
