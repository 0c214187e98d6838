use crate::constants::DEMO_SOURCE;
use crate::domain::CompanyRecord;

#[allow(clippy::too_many_arguments)]
fn demo(
    tax_id: &str,
    name: &str,
    revenue: f64,
    site: &str,
    evidence: &str,
    product: &str,
    employees: u32,
    okved: &str,
) -> CompanyRecord {
    CompanyRecord {
        tax_id: tax_id.to_string(),
        name: name.to_string(),
        revenue: Some(revenue),
        site: site.to_string(),
        cat_evidence: evidence.to_string(),
        source: DEMO_SOURCE.to_string(),
        cat_product: Some(product.to_string()),
        employees: Some(employees),
        okved_main: Some(okved.to_string()),
        country: Some("Россия".to_string()),
    }
}

/// Fixed demonstration output written when a run produces nothing usable.
pub fn demo_records() -> Vec<CompanyRecord> {
    vec![
        demo(
            "7701234567",
            "ООО Локализация Про",
            150_000_000.0,
            "localization-pro.ru",
            "mention of Trados Studio",
            "Trados Studio",
            25,
            "62.01",
        ),
        demo(
            "7712345678",
            "АО Транслейт Тех",
            200_000_000.0,
            "translatetech.ru",
            "use of TMS",
            "In-house TMS",
            45,
            "62.02",
        ),
        demo(
            "7812345678",
            "ООО Глобал Транслейт",
            300_000_000.0,
            "global-translate.com",
            "use of MemoQ; mention of translation memory",
            "MemoQ",
            80,
            "74.30",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_records_are_valid() {
        let records = demo_records();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.is_valid() && r.has_product()));
        assert!(records.iter().all(|r| r.source == DEMO_SOURCE));
    }
}
