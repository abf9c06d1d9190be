use serde::Serialize;

/// Coarse label for the dominant dietary pattern in a set of assessments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HabitLabel {
    #[serde(rename = "High Protein")]
    HighProtein,
    #[serde(rename = "High Carbs")]
    HighCarbs,
    #[serde(rename = "Sweet Patterns")]
    SweetPatterns,
    Balanced,
    #[serde(rename = "No Data")]
    NoData,
}

// Substring evidence per category, matched against lower-cased text. The
// rule order is the priority order; the first hit wins.
const PROTEIN_KEYWORDS: &[&str] = &["protein"];
const CARB_KEYWORDS: &[&str] = &["carb"];
const SUGAR_KEYWORDS: &[&str] = &["sugar"];

const RULES: &[(HabitLabel, &[&str])] = &[
    (HabitLabel::HighProtein, PROTEIN_KEYWORDS),
    (HabitLabel::HighCarbs, CARB_KEYWORDS),
    (HabitLabel::SweetPatterns, SUGAR_KEYWORDS),
];

/// Classify the concatenated assessment text of a (possibly filtered) meal
/// set. Empty input yields the `NoData` sentinel, no keyword hit `Balanced`.
pub fn dominant_habit<'a>(assessments: impl IntoIterator<Item = &'a str>) -> HabitLabel {
    let mut text = String::new();
    let mut any = false;
    for a in assessments {
        any = true;
        text.push_str(&a.to_lowercase());
        text.push(' ');
    }
    if !any {
        return HabitLabel::NoData;
    }
    for (label, keywords) in RULES {
        if keywords.iter().any(|k| text.contains(k)) {
            return *label;
        }
    }
    HabitLabel::Balanced
}
