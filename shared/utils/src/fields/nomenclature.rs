//! Nomenclature composition
//!
//! Joins the value picked for each field into a single name, skipping
//! fields that have no name or no pick.

use fieldmark_models::FieldSelection;

pub fn compose_nomenclature(selections: &[FieldSelection], separator: &str) -> String {
    selections
        .iter()
        .filter_map(FieldSelection::picked_value)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_picked_values_in_order() {
        let selections = vec![
            FieldSelection::new("Brand", Some("ACME")),
            FieldSelection::new("Size", Some("XL")),
            FieldSelection::new("Color", Some("Red")),
        ];

        assert_eq!(compose_nomenclature(&selections, "-"), "ACME-XL-Red");
    }

    #[test]
    fn test_skips_incomplete_selections() {
        let selections = vec![
            FieldSelection::new("", Some("orphan")),
            FieldSelection::new("Size", None),
            FieldSelection::new("Color", Some("Red")),
            FieldSelection::new("Finish", Some("Matte")),
        ];

        assert_eq!(compose_nomenclature(&selections, "_"), "Red_Matte");
    }

    #[test]
    fn test_nothing_picked() {
        assert_eq!(compose_nomenclature(&[], "-"), "");
        assert_eq!(
            compose_nomenclature(&[FieldSelection::new("Size", None)], "-"),
            ""
        );
    }
}
