/// Canonical spelling of a column header: no BOM, lowercase, words joined by `_`.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let lowered = cleaned.trim().to_lowercase();
    lowered
        .split(|c: char| c.is_whitespace() || matches!(c, '-' | '_' | '.'))
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_header_strips_bom_and_joins_words() {
        assert_eq!(normalize_header("\u{feff} Total  Apartments "), "total_apartments");
        assert_eq!(normalize_header("floors-max"), "floors_max");
        assert_eq!(normalize_header("Всего квартир"), "всего_квартир");
    }
}
