//! Closed-set enum lookup tables mirroring the catalog schema's integer
//! encodings (`hydro_find/database/enums.py` in the original service). Each
//! function returns the integer id the catalog schema stores the value as,
//! or `None` if the value isn't recognized — an unrecognized value skips the
//! filter rather than erroring.

/// `Standard` (enums.py): BSP, BSPT, JIC, DKOL, DKOS, NPTF, ORFS, BANJO.
pub fn standard_id(value: &str) -> Option<i32> {
    match value.trim().to_uppercase().as_str() {
        "BSP" => Some(1),
        "BSPT" => Some(2),
        "JIC" => Some(3),
        "DKOL" => Some(4),
        "DKOS" => Some(5),
        "NPTF" => Some(6),
        "ORFS" => Some(7),
        "BANJO" => Some(8),
        _ => None,
    }
}

/// `Thread` (enums.py's `from_string` mapping).
pub fn thread_id(value: &str) -> Option<i32> {
    match value.trim() {
        "1/8" => Some(1),
        "1/4" => Some(2),
        "3/8" => Some(3),
        "1/2" => Some(4),
        "3/4" => Some(5),
        "1" => Some(6),
        "1.1/4" => Some(7),
        "1.1/2" => Some(8),
        "2" => Some(9),
        "14\u{445}1.5" => Some(10),
        "16\u{445}1.5" => Some(11),
        "18\u{445}1.5" => Some(12),
        "1,3/16" => Some(13),
        "1,5/16" => Some(14),
        "1,5/8" => Some(15),
        "1,7/8" => Some(16),
        "2,1/2" => Some(17),
        "5/8" => Some(18),
        "7/8" => Some(19),
        "9/16" => Some(20),
        "5/16" => Some(21),
        "7/16" => Some(22),
        "3/4''" => Some(23),
        _ => None,
    }
}

/// `Armature` (enums.py), keyed by the catalog vocabulary also used by
/// `hydrofind_shared::extracted::ArmatureType`'s serde tags.
pub fn armature_id(value: &str) -> Option<i32> {
    match value.trim() {
        "\u{433}\u{430}\u{439}\u{43a}\u{430}" => Some(1),
        "\u{448}\u{442}\u{443}\u{446}\u{435}\u{440}" => Some(2),
        "\u{448}\u{442}\u{443}\u{446}\u{435}\u{440} \u{43a}\u{43e}\u{43d}\u{443}\u{441}\u{43d}\u{44b}\u{439}" => Some(3),
        _ => None,
    }
}

/// `Angle` (enums.py): the stored value is the degree amount itself, but
/// only 0/45/90 are valid — anything else is treated as unrecognized.
pub fn angle_value(value: i32) -> Option<i32> {
    match value {
        0 | 45 | 90 => Some(value),
        _ => None,
    }
}

/// `Series` (enums.py): LIGHT, HEAVY, INTERLOCK.
pub fn series_id(value: &str) -> Option<i32> {
    match value.trim().to_lowercase().as_str() {
        "light" => Some(1),
        "heavy" => Some(2),
        "interlock" => Some(3),
        _ => None,
    }
}

/// Accepted truthy spellings for boolean filters.
pub fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes" | "y")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_lookup_is_case_insensitive() {
        assert_eq!(standard_id("dkol"), Some(4));
        assert_eq!(standard_id(" DKOL "), Some(4));
    }

    #[test]
    fn standard_lookup_rejects_unknown_values() {
        assert_eq!(standard_id("XYZ"), None);
    }

    #[test]
    fn angle_rejects_values_outside_the_closed_set() {
        assert_eq!(angle_value(90), Some(90));
        assert_eq!(angle_value(30), None);
    }

    #[test]
    fn truthy_accepts_the_documented_spellings_only() {
        assert!(is_truthy("Yes"));
        assert!(is_truthy("1"));
        assert!(!is_truthy("no"));
        assert!(!is_truthy("2"));
    }
}
