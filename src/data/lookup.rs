use super::model::{Dataset, Row};
use crate::error::{Result, SheetError};

/// First row (in dataset order) whose `key_column` equals `key_value`.
///
/// The key column is expected to be unique; when it is not, the earliest
/// row wins. The returned reference points into `dataset`, so repeated
/// lookups of the same key yield the same row.
pub fn find_by_key<'a>(dataset: &'a Dataset, key_column: &str, key_value: &str) -> Result<&'a Row> {
    let idx = dataset.column_index(key_column)?;
    dataset
        .rows()
        .iter()
        .find(|row| row.value_at(idx) == Some(key_value))
        .ok_or_else(|| SheetError::NotFound {
            column: key_column.to_string(),
            value: key_value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        let raw = [
            ["Entidad", "Estado"],
            ["Alcaldía", "Vigente"],
            ["Fundación", "En trámite"],
            ["Alcaldía", "Vencido"],
        ];
        Dataset::build(
            raw.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn finds_exact_match() {
        let ds = dataset();
        let row = find_by_key(&ds, "Entidad", "Fundación").unwrap();
        assert_eq!(row.get("Estado"), Some("En trámite"));
    }

    #[test]
    fn duplicate_key_returns_first_row() {
        let ds = dataset();
        let row = find_by_key(&ds, "Entidad", "Alcaldía").unwrap();
        assert_eq!(row.get("Estado"), Some("Vigente"));
        assert!(std::ptr::eq(row, &ds.rows()[0]));
        assert!(std::ptr::eq(row, find_by_key(&ds, "Entidad", "Alcaldía").unwrap()));
    }

    #[test]
    fn missing_key_is_not_found() {
        let ds = dataset();
        assert_eq!(
            find_by_key(&ds, "Entidad", "alcaldía").unwrap_err(),
            SheetError::NotFound {
                column: "Entidad".into(),
                value: "alcaldía".into()
            }
        );
    }

    #[test]
    fn unknown_key_column_fails() {
        let ds = dataset();
        assert_eq!(
            find_by_key(&ds, "Logos", "x").unwrap_err(),
            SheetError::UnknownColumn("Logos".into())
        );
    }
}
