use crate::domain::model::{Category, MarkerStyle};

/// 依優先順序比對的關鍵字（皆為小寫）
const KEYWORDS: [(Category, &[&str]); 4] = [
    (
        Category::Hospital,
        &["hospital", "clínica", "clinica", "clinic", "médic", "medic"],
    ),
    (Category::Pharmacy, &["farmacia", "pharmacy"]),
    (Category::Police, &["policía", "policia", "police"]),
    (Category::Fire, &["bomberos", "firefighter", "fire"]),
];

/// 由地點名稱推斷類別。
///
/// 與實際搜尋的類別無關：名稱中找不到任何關鍵字時一律回傳 `Hospital`。
pub fn classify(name: &str) -> Category {
    let lowered = name.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(_, words)| words.iter().any(|w| lowered.contains(w)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Hospital)
}

pub fn marker_style(name: &str) -> MarkerStyle {
    let category = classify(name);
    MarkerStyle {
        icon: category.icon(),
        color: category.color(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::MarkerColor;

    #[test]
    fn test_hospital_name() {
        assert_eq!(classify("Hospital Civil"), Category::Hospital);
        assert_eq!(marker_style("Hospital Civil").color, MarkerColor::Red);
    }

    #[test]
    fn test_pharmacy_name() {
        assert_eq!(classify("Farmacia Guadalajara"), Category::Pharmacy);
        assert_eq!(marker_style("Farmacia Guadalajara").color, MarkerColor::Green);
    }

    #[test]
    fn test_case_insensitive_matching() {
        assert_eq!(classify("ESTACIÓN DE BOMBEROS"), Category::Fire);
        assert_eq!(classify("Comisaría de POLICÍA"), Category::Police);
        assert_eq!(classify("CLÍNICA del Norte"), Category::Hospital);
    }

    #[test]
    fn test_priority_order() {
        // hospital keywords win over pharmacy keywords
        assert_eq!(classify("Farmacia del Hospital"), Category::Hospital);
        assert_eq!(classify("Police & Fire Dept"), Category::Police);
    }

    #[test]
    fn test_unmatched_name_defaults_to_hospital() {
        assert_eq!(classify("Oxxo Centro"), Category::Hospital);
        let style = marker_style("Oxxo Centro");
        assert_eq!(style.color, MarkerColor::Red);
        assert_eq!(style.icon, Category::Hospital.icon());
    }
}
