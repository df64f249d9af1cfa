use serde::Serialize;
use serde_json::Value;

/// Sheet range holding the bonus table. Row 1 is the header, so reading starts at row 2.
pub const BONUS_RANGE: &str = "Entries!A2:G";

/// One promotional offer, taken from a single spreadsheet row.
///
/// Every field is always serialised; a missing cell becomes an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusRecord {
    pub brand_name: String,
    pub logo: String,
    pub welcome_bonus: String,
    pub bonus_details: String,
    pub wager: String,
    pub min_deposit: String,
    pub tracking_link: String,
}

impl BonusRecord {
    /// Maps columns A-G of a row onto a record.
    ///
    /// Returns `None` when column A is absent or empty, which is how blank
    /// rows and rows without a brand are skipped. Columns past G are ignored.
    pub fn from_row(row: &[Value]) -> Option<Self> {
        let cell = |index: usize| row.get(index).map(cell_text).unwrap_or_default();

        let brand_name = cell(0);
        if brand_name.is_empty() {
            return None;
        }

        Some(Self {
            brand_name,
            logo: cell(1),
            welcome_bonus: cell(2),
            bonus_details: cell(3),
            wager: cell(4),
            min_deposit: cell(5),
            tracking_link: cell(6),
        })
    }
}

/// Turns the raw rows of [`BONUS_RANGE`] into records, keeping sheet order.
pub fn map_rows(rows: &[Vec<Value>]) -> Vec<BonusRecord> {
    rows.iter()
        .filter_map(|row| BonusRecord::from_row(row))
        .collect()
}

/// Text of a single cell as the API reports it.
///
/// Formatted values arrive as strings; numbers and booleans only show up
/// with unformatted render options and keep their JSON text.
fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(cells: &[&str]) -> Vec<Value> {
        cells.iter().map(|c| json!(c)).collect()
    }

    #[test]
    fn test_maps_full_row_positionally() {
        let record =
            BonusRecord::from_row(&row(&["A", "l1", "b1", "d1", "w1", "m1", "t1"])).unwrap();

        assert_eq!(record.brand_name, "A");
        assert_eq!(record.logo, "l1");
        assert_eq!(record.welcome_bonus, "b1");
        assert_eq!(record.bonus_details, "d1");
        assert_eq!(record.wager, "w1");
        assert_eq!(record.min_deposit, "m1");
        assert_eq!(record.tracking_link, "t1");
    }

    #[test]
    fn test_short_row_defaults_missing_columns() {
        let record = BonusRecord::from_row(&row(&["Brand", "logo.png"])).unwrap();

        assert_eq!(record.brand_name, "Brand");
        assert_eq!(record.logo, "logo.png");
        assert_eq!(record.welcome_bonus, "");
        assert_eq!(record.tracking_link, "");
    }

    #[test]
    fn test_rows_without_brand_are_skipped() {
        assert!(BonusRecord::from_row(&[]).is_none());
        assert!(BonusRecord::from_row(&row(&["", "x", "x"])).is_none());
        assert!(BonusRecord::from_row(&[Value::Null, json!("x")]).is_none());
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let record =
            BonusRecord::from_row(&row(&["A", "l", "b", "d", "w", "m", "t", "extra"])).unwrap();
        assert_eq!(record.tracking_link, "t");
    }

    #[test]
    fn test_non_string_cells_use_their_text() {
        let record = BonusRecord::from_row(&[json!("A"), json!(null), json!(100), json!(true)])
            .unwrap();

        assert_eq!(record.logo, "");
        assert_eq!(record.welcome_bonus, "100");
        assert_eq!(record.bonus_details, "true");
    }

    #[test]
    fn test_map_rows_filters_and_keeps_order() {
        let rows = vec![
            row(&["A", "l1", "b1", "d1", "w1", "m1", "t1"]),
            row(&["", "x", "x", "x", "x", "x", "x"]),
            row(&["B", "l2", "", "", "", "", ""]),
        ];

        let records = map_rows(&rows);

        assert_eq!(
            records,
            vec![
                BonusRecord {
                    brand_name: "A".into(),
                    logo: "l1".into(),
                    welcome_bonus: "b1".into(),
                    bonus_details: "d1".into(),
                    wager: "w1".into(),
                    min_deposit: "m1".into(),
                    tracking_link: "t1".into(),
                },
                BonusRecord {
                    brand_name: "B".into(),
                    logo: "l2".into(),
                    ..Default::default()
                },
            ]
        );
    }

    #[test]
    fn test_map_rows_empty_range() {
        assert!(map_rows(&[]).is_empty());
    }

    #[test]
    fn test_serializes_every_field_in_camel_case() {
        let record = BonusRecord {
            brand_name: "B".into(),
            ..Default::default()
        };

        let value = serde_json::to_value(&record).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object.len(), 7);
        assert_eq!(object["brandName"], "B");
        for key in [
            "logo",
            "welcomeBonus",
            "bonusDetails",
            "wager",
            "minDeposit",
            "trackingLink",
        ] {
            assert_eq!(object[key], "", "{key} should default to an empty string");
        }
    }
}
