use crate::error::FileError;
use crate::models::catalog::{Catalog, InvalidScopeKey};
#[cfg(test)]
use crate::models::catalog::ScopeKey;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

/// 目录文件结构
///
/// ```toml
/// [entries]
/// "TR-07" = "Antalya"
/// "TR-06" = "Ankara"
/// ```
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    entries: BTreeMap<String, String>,
}

/// 从 TOML 文件加载目录
pub async fn load_catalog(path: &Path) -> Result<Catalog, FileError> {
    let origin = path.display().to_string();

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| FileError::read(&origin, e))?;

    let catalog = parse_catalog(&content, &origin)?;
    tracing::info!("成功加载 {} 条目录项: {}", catalog.len(), origin);

    Ok(catalog)
}

/// 解析目录内容，`origin` 只用于错误信息
pub fn parse_catalog(content: &str, origin: &str) -> Result<Catalog, FileError> {
    let file: CatalogFile =
        toml::from_str(content).map_err(|e| FileError::parse(origin, e.to_string()))?;

    Catalog::from_pairs(file.entries)
        .map_err(|InvalidScopeKey(key)| FileError::parse(origin, format!("无效的目录键: {}", key)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_entries_table() {
        let catalog = parse_catalog(
            r#"
            [entries]
            "TR-07" = "Antalya"
            "TR-06" = "Ankara"
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.display_name(&ScopeKey::new("TR", "07")),
            Some("Antalya")
        );
    }

    #[test]
    fn rejects_key_without_separator() {
        let err = parse_catalog("[entries]\nTR07 = \"Antalya\"\n", "inline").unwrap_err();
        assert!(matches!(err, FileError::Parse { ref message, .. } if message.contains("TR07")));
    }

    #[test]
    fn rejects_key_that_would_escape_directory() {
        let err = parse_catalog(r#"[entries]
"TR-../../x" = "Antalya"
"#, "inline").unwrap_err();
        assert!(matches!(err, FileError::Parse { .. }));
    }

    #[test]
    fn missing_table_yields_empty_catalog() {
        let catalog = parse_catalog("", "inline").unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn loads_catalog_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[entries]\n\"ZZ-01\" = \"Nowhere\"").unwrap();

        let catalog = load_catalog(file.path()).await.unwrap();
        assert_eq!(catalog.scope_keys(), vec![ScopeKey::new("ZZ", "01")]);
    }

    #[tokio::test]
    async fn missing_file_is_read_error() {
        let err = load_catalog(Path::new("/nonexistent/catalog.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, FileError::Read { .. }));
    }
}
