//! Tractate catalog: the canonical traversal order and display labels.
//!
//! The catalog is data, not logic. The built-in table lists the six orders
//! with their tractates in traditional sequence; a replacement can be loaded
//! from JSON at startup.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TractateEntry {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub name: String,
    pub tractates: Vec<TractateEntry>,
}

/// Ordered divisions of ordered tractates, with an id index built on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "CatalogData", into = "CatalogData")]
pub struct Catalog {
    divisions: Vec<Division>,
    index: HashMap<String, Slot>,
}

#[derive(Debug, Clone)]
struct Slot {
    position: usize,
    label: String,
}

#[derive(Serialize, Deserialize)]
struct CatalogData {
    divisions: Vec<Division>,
}

impl From<CatalogData> for Catalog {
    fn from(data: CatalogData) -> Self {
        Catalog::new(data.divisions)
    }
}

impl From<Catalog> for CatalogData {
    fn from(catalog: Catalog) -> Self {
        CatalogData {
            divisions: catalog.divisions,
        }
    }
}

const TRACTATE_PREFIX: &str = "Mishnah_";

impl Catalog {
    pub fn new(divisions: Vec<Division>) -> Self {
        let mut index = HashMap::new();
        let mut position = 0usize;
        for division in &divisions {
            for tractate in &division.tractates {
                // First occurrence wins if a table lists a tractate twice.
                index.entry(tractate.id.clone()).or_insert_with(|| Slot {
                    position,
                    label: tractate.label.clone(),
                });
                position += 1;
            }
        }
        Self { divisions, index }
    }

    /// The six orders of the Mishnah with Hebrew tractate names.
    pub fn standard() -> Self {
        let divisions = STANDARD_DIVISIONS
            .iter()
            .map(|(name, tractates)| Division {
                name: (*name).to_string(),
                tractates: tractates
                    .iter()
                    .map(|(id, label)| TractateEntry {
                        id: (*id).to_string(),
                        label: (*label).to_string(),
                    })
                    .collect(),
            })
            .collect();
        Self::new(divisions)
    }

    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    /// Position of a tractate in canonical order, or `None` if unknown.
    pub fn position(&self, tractate_id: &str) -> Option<usize> {
        self.index.get(tractate_id).map(|slot| slot.position)
    }

    /// Display label; unknown ids fall back to the id without its
    /// `Mishnah_` prefix and with underscores read as spaces.
    pub fn label_for(&self, tractate_id: &str) -> String {
        match self.index.get(tractate_id) {
            Some(slot) => slot.label.clone(),
            None => fallback_label(tractate_id),
        }
    }

    /// All tractates in canonical order.
    pub fn tractates(&self) -> impl Iterator<Item = &TractateEntry> {
        self.divisions.iter().flat_map(|d| d.tractates.iter())
    }

    pub fn tractate_count(&self) -> usize {
        self.index.len()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn fallback_label(tractate_id: &str) -> String {
    tractate_id
        .strip_prefix(TRACTATE_PREFIX)
        .unwrap_or(tractate_id)
        .replace('_', " ")
}

type StaticDivision = (&'static str, &'static [(&'static str, &'static str)]);

static STANDARD_DIVISIONS: &[StaticDivision] = &[
    (
        "זרעים",
        &[
            ("Mishnah_Berakhot", "ברכות"),
            ("Mishnah_Peah", "פאה"),
            ("Mishnah_Demai", "דמאי"),
            ("Mishnah_Kilayim", "כלאים"),
            ("Mishnah_Sheviit", "שביעית"),
            ("Mishnah_Terumot", "תרומות"),
            ("Mishnah_Maasrot", "מעשרות"),
            ("Mishnah_Maaser_Sheni", "מעשר שני"),
            ("Mishnah_Challah", "חלה"),
            ("Mishnah_Orlah", "ערלה"),
            ("Mishnah_Bikkurim", "ביכורים"),
        ],
    ),
    (
        "מועד",
        &[
            ("Mishnah_Shabbat", "שבת"),
            ("Mishnah_Eruvin", "עירובין"),
            ("Mishnah_Pesachim", "פסחים"),
            ("Mishnah_Shekalim", "שקלים"),
            ("Mishnah_Yoma", "יומא"),
            ("Mishnah_Sukkah", "סוכה"),
            ("Mishnah_Beitzah", "ביצה"),
            ("Mishnah_Rosh_Hashanah", "ראש השנה"),
            ("Mishnah_Taanit", "תענית"),
            ("Mishnah_Megillah", "מגילה"),
            ("Mishnah_Moed_Katan", "מועד קטן"),
            ("Mishnah_Chagigah", "חגיגה"),
        ],
    ),
    (
        "נשים",
        &[
            ("Mishnah_Yevamot", "יבמות"),
            ("Mishnah_Ketubot", "כתובות"),
            ("Mishnah_Nedarim", "נדרים"),
            ("Mishnah_Nazir", "נזיר"),
            ("Mishnah_Sotah", "סוטה"),
            ("Mishnah_Gittin", "גיטין"),
            ("Mishnah_Kiddushin", "קידושין"),
        ],
    ),
    (
        "נזיקין",
        &[
            ("Mishnah_Bava_Kamma", "בבא קמא"),
            ("Mishnah_Bava_Metzia", "בבא מציעא"),
            ("Mishnah_Bava_Batra", "בבא בתרא"),
            ("Mishnah_Sanhedrin", "סנהדרין"),
            ("Mishnah_Makkot", "מכות"),
            ("Mishnah_Shevuot", "שבועות"),
            ("Mishnah_Eduyot", "עדיות"),
            ("Mishnah_Avodah_Zarah", "עבודה זרה"),
            ("Mishnah_Avot", "אבות"),
            ("Mishnah_Horayot", "הוריות"),
        ],
    ),
    (
        "קדשים",
        &[
            ("Mishnah_Zevachim", "זבחים"),
            ("Mishnah_Menachot", "מנחות"),
            ("Mishnah_Chullin", "חולין"),
            ("Mishnah_Bekhorot", "בכורות"),
            ("Mishnah_Arakhin", "ערכין"),
            ("Mishnah_Temurah", "תמורה"),
            ("Mishnah_Keritot", "כריתות"),
            ("Mishnah_Meilah", "מעילה"),
            ("Mishnah_Tamid", "תמיד"),
            ("Mishnah_Middot", "מידות"),
            ("Mishnah_Kinnim", "קינים"),
        ],
    ),
    (
        "טהרות",
        &[
            ("Mishnah_Kelim", "כלים"),
            ("Mishnah_Oholot", "אהלות"),
            ("Mishnah_Negaim", "נגעים"),
            ("Mishnah_Parah", "פרה"),
            ("Mishnah_Tahorot", "טהרות"),
            ("Mishnah_Mikvaot", "מקואות"),
            ("Mishnah_Niddah", "נדה"),
            ("Mishnah_Makhshirin", "מכשירין"),
            ("Mishnah_Zavim", "זבים"),
            ("Mishnah_Tevul_Yom", "טבול יום"),
            ("Mishnah_Yadayim", "ידיים"),
            ("Mishnah_Oktzin", "עוקצין"),
        ],
    ),
];
