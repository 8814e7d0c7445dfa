use crate::core::{ExportOutcome, NormalizedPoiRecord, Storage};
use crate::utils::error::Result;

/// UTF-8 byte-order mark; spreadsheet tools use it to detect the encoding.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// `{city}_{keywords}_pois.csv`, with path separators replaced.
pub fn output_file_name(city: &str, keywords: &str) -> String {
    let clean = |s: &str| s.replace(['/', '\\'], "_");
    format!("{}_{}_pois.csv", clean(city), clean(keywords))
}

/// BOM, header row, then one row per record.
pub fn render_csv(records: &[NormalizedPoiRecord]) -> Result<Vec<u8>> {
    let mut buffer = UTF8_BOM.to_vec();
    {
        let mut writer = csv::Writer::from_writer(&mut buffer);
        writer.write_record(NormalizedPoiRecord::HEADERS)?;
        for record in records {
            writer.write_record(record.fields())?;
        }
        writer.flush()?;
    }
    Ok(buffer)
}

pub struct CsvExporter<S: Storage> {
    storage: S,
}

impl<S: Storage> CsvExporter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn export(
        &self,
        records: &[NormalizedPoiRecord],
        file_name: &str,
    ) -> Result<ExportOutcome> {
        // 沒有資料就完全不寫檔，連表頭都不產生
        if records.is_empty() {
            tracing::warn!("📭 Nothing to export, skipping {}", file_name);
            return Ok(ExportOutcome::NothingToExport);
        }

        let data = render_csv(records)?;
        tracing::debug!(
            "Writing {} rows ({} bytes) to {}",
            records.len(),
            data.len(),
            file_name
        );
        self.storage.write_file(file_name, &data).await?;

        Ok(ExportOutcome::Written {
            path: self.storage.location(file_name),
            rows: records.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::PoiError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn file_count(&self) -> usize {
            self.files.lock().await.len()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        fn ensure_ready(&self) -> Result<()> {
            Ok(())
        }

        fn location(&self, path: &str) -> String {
            format!("mem://{}", path)
        }
    }

    fn sample(name: &str, address: &str) -> NormalizedPoiRecord {
        NormalizedPoiRecord {
            name: name.to_string(),
            longitude: "116.4".to_string(),
            latitude: "39.9".to_string(),
            poi_type: "餐饮服务".to_string(),
            province: "北京市".to_string(),
            city: "北京市".to_string(),
            district: "朝阳区".to_string(),
            address: address.to_string(),
        }
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(output_file_name("北京", "咖啡"), "北京_咖啡_pois.csv");
        assert_eq!(
            output_file_name("Beijing", "coffee/tea"),
            "Beijing_coffee_tea_pois.csv"
        );
        assert_eq!(output_file_name("..\\x", "y"), ".._x_y_pois.csv");
    }

    #[test]
    fn test_render_csv_layout() {
        let data = render_csv(&[sample("A", "addr")]).unwrap();

        assert!(data.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&data[UTF8_BOM.len()..]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "名称,经度,纬度,类型,省份,城市,区县,详细地址");
        assert_eq!(lines[1], "A,116.4,39.9,餐饮服务,北京市,北京市,朝阳区,addr");
    }

    #[test]
    fn test_render_csv_quotes_embedded_delimiters() {
        let data = render_csv(&[sample("Café, \"Bar\"", "line1\nline2")]).unwrap();

        let mut reader = csv::Reader::from_reader(&data[UTF8_BOM.len()..]);
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "Café, \"Bar\"");
        assert_eq!(&rows[0][7], "line1\nline2");
    }

    #[tokio::test]
    async fn test_export_empty_input_writes_nothing() {
        let storage = MockStorage::new();
        let exporter = CsvExporter::new(storage.clone());

        let outcome = exporter.export(&[], "北京_咖啡_pois.csv").await.unwrap();

        assert_eq!(outcome, ExportOutcome::NothingToExport);
        assert_eq!(storage.file_count().await, 0);
    }

    #[tokio::test]
    async fn test_export_writes_rows() {
        let storage = MockStorage::new();
        let exporter = CsvExporter::new(storage.clone());
        let records = vec![sample("A", "a"), sample("B", "b"), sample("C", "c")];

        let outcome = exporter.export(&records, "out.csv").await.unwrap();

        assert_eq!(
            outcome,
            ExportOutcome::Written {
                path: "mem://out.csv".to_string(),
                rows: 3
            }
        );
        let data = storage.get_file("out.csv").await.unwrap();
        assert!(data.starts_with(UTF8_BOM));
        assert_eq!(
            std::str::from_utf8(&data[UTF8_BOM.len()..])
                .unwrap()
                .lines()
                .count(),
            4
        );
    }

    #[tokio::test]
    async fn test_export_propagates_storage_errors() {
        struct ReadOnlyStorage;

        impl Storage for ReadOnlyStorage {
            async fn write_file(&self, _path: &str, _data: &[u8]) -> Result<()> {
                Err(PoiError::IoError(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                )))
            }

            fn ensure_ready(&self) -> Result<()> {
                Ok(())
            }

            fn location(&self, path: &str) -> String {
                path.to_string()
            }
        }

        let exporter = CsvExporter::new(ReadOnlyStorage);
        let err = exporter
            .export(&[sample("A", "a")], "out.csv")
            .await
            .unwrap_err();

        assert!(matches!(err, PoiError::IoError(_)));
    }
}
