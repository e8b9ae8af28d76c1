//! Product category from a design number

/// Category prefixes in lookup order. The first one contained in the design
/// number wins, so `SP` shadows `SPE`.
pub const CATEGORIES: &[&str] = &[
    "CM", "CL", "CN", "CZ", "EX", "FR", "FS", "GL", "GT", "OP", "PL", "LN", "LO", "MD", "MV", "NA", "SP", "SPE",
    "UN",
];

pub const OTHER: &str = "Other";

/// Category code found anywhere in `design_no`, else `Other`
pub fn extract_category(design_no: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|c| design_no.contains(*c))
        .copied()
        .unwrap_or(OTHER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_listed_category_wins() {
        assert_eq!(extract_category("CM1042"), "CM");
        assert_eq!(extract_category("X-FR-22"), "FR");
        // contains both CL and GL; CL is listed first
        assert_eq!(extract_category("GLCL9"), "CL");
        assert_eq!(extract_category("SPE12"), "SP");
    }

    #[test]
    fn test_unknown_and_lowercase_are_other() {
        assert_eq!(extract_category("cm1042"), "Other");
        assert_eq!(extract_category(""), "Other");
        assert_eq!(extract_category("1234"), "Other");
    }
}
