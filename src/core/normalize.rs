use crate::core::{NormalizedPoiRecord, RawPoiRecord};

pub fn normalize(records: &[RawPoiRecord]) -> Vec<NormalizedPoiRecord> {
    records.iter().map(normalize_record).collect()
}

pub fn normalize_record(raw: &RawPoiRecord) -> NormalizedPoiRecord {
    let (longitude, latitude) = split_location(&raw.text("location"));

    NormalizedPoiRecord {
        name: raw.text("name"),
        longitude,
        latitude,
        poi_type: raw.text("type"),
        province: raw.text("pname"),
        city: raw.text("cityname"),
        district: raw.text("adname"),
        address: raw.text("address"),
    }
}

/// Splits `"lon,lat"` into its first two comma-separated parts.
///
/// Values stay textual. A location without a comma keeps the whole string as
/// longitude and leaves latitude empty.
pub fn split_location(location: &str) -> (String, String) {
    if location.is_empty() {
        return (String::new(), String::new());
    }

    let mut parts = location.split(',');
    let longitude = parts.next().unwrap_or_default();
    let latitude = parts.next().unwrap_or_default();
    (longitude.to_string(), latitude.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawPoiRecord {
        RawPoiRecord::from(value)
    }

    #[test]
    fn test_normalize_complete_record() {
        let record = normalize_record(&raw(json!({
            "name": "星巴克(国贸店)",
            "location": "116.4,39.9",
            "type": "餐饮服务;咖啡厅;星巴克咖啡",
            "pname": "北京市",
            "cityname": "北京市",
            "adname": "朝阳区",
            "address": "建国门外大街1号",
            "id": "B000A7BD6C"
        })));

        assert_eq!(
            record,
            NormalizedPoiRecord {
                name: "星巴克(国贸店)".to_string(),
                longitude: "116.4".to_string(),
                latitude: "39.9".to_string(),
                poi_type: "餐饮服务;咖啡厅;星巴克咖啡".to_string(),
                province: "北京市".to_string(),
                city: "北京市".to_string(),
                district: "朝阳区".to_string(),
                address: "建国门外大街1号".to_string(),
            }
        );
    }

    #[test]
    fn test_normalize_is_total_for_empty_record() {
        let record = normalize_record(&RawPoiRecord::default());
        assert_eq!(record, NormalizedPoiRecord::default());
        assert!(record.fields().iter().all(|f| f.is_empty()));
    }

    #[test]
    fn test_missing_location_gives_empty_coordinates() {
        let record = normalize_record(&raw(json!({"name": "无坐标"})));
        assert_eq!(record.longitude, "");
        assert_eq!(record.latitude, "");
        assert_eq!(record.name, "无坐标");
    }

    #[test]
    fn test_empty_array_fields_become_empty_strings() {
        let record = normalize_record(&raw(json!({
            "name": "某店",
            "location": [],
            "address": []
        })));
        assert_eq!(record.longitude, "");
        assert_eq!(record.latitude, "");
        assert_eq!(record.address, "");
    }

    #[test]
    fn test_array_location_is_joined_not_split() {
        let record = normalize_record(&raw(json!({"location": ["116.4", "39.9"]})));
        assert_eq!(record.longitude, "116.4;39.9");
        assert_eq!(record.latitude, "");
    }

    #[test]
    fn test_split_location_edge_cases() {
        assert_eq!(
            split_location("116.397128,39.916527"),
            ("116.397128".to_string(), "39.916527".to_string())
        );
        assert_eq!(split_location(""), (String::new(), String::new()));
        assert_eq!(
            split_location("116.4"),
            ("116.4".to_string(), String::new())
        );
        assert_eq!(
            split_location("1,2,3"),
            ("1".to_string(), "2".to_string())
        );
        assert_eq!(split_location(","), (String::new(), String::new()));
        // 不做數值解析
        assert_eq!(
            split_location("abc, def"),
            ("abc".to_string(), " def".to_string())
        );
    }

    #[test]
    fn test_normalize_preserves_order_and_length() {
        let records: Vec<RawPoiRecord> = (0..5)
            .map(|i| raw(json!({"name": format!("poi-{}", i)})))
            .collect();

        let normalized = normalize(&records);

        assert_eq!(normalized.len(), 5);
        for (i, record) in normalized.iter().enumerate() {
            assert_eq!(record.name, format!("poi-{}", i));
        }
    }
}
