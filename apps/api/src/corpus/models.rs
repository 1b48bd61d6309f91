use serde::{Deserialize, Serialize};

/// One display-numbered text unit. `ordinal` is 1-based within its chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextUnit {
    pub ordinal: u32,
    pub raw_text: String,
}

/// A chapter of one tractate. `units` are in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub tractate_id: String,
    pub chapter_number: u32,
    pub units: Vec<TextUnit>,
}

impl Chapter {
    /// Builds a chapter from raw unit strings, numbering them from 1.
    pub fn from_texts<I, S>(tractate_id: impl Into<String>, chapter_number: u32, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let units = texts
            .into_iter()
            .enumerate()
            .map(|(i, raw)| TextUnit {
                ordinal: i as u32 + 1,
                raw_text: raw.into(),
            })
            .collect();
        Self {
            tractate_id: tractate_id.into(),
            chapter_number,
            units,
        }
    }

    pub fn reference(&self) -> ChapterRef {
        ChapterRef {
            tractate_id: self.tractate_id.clone(),
            chapter_number: self.chapter_number,
        }
    }
}

/// Identifies a chapter without its text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChapterRef {
    pub tractate_id: String,
    pub chapter_number: u32,
}

/// Wire shape of a chapter: the unit list is plain strings, numbered on receipt.
#[derive(Debug, Clone, Deserialize)]
pub struct ChapterInput {
    pub tractate_id: String,
    pub chapter_number: u32,
    #[serde(default)]
    pub units: Vec<String>,
}

impl From<ChapterInput> for Chapter {
    fn from(input: ChapterInput) -> Self {
        Chapter::from_texts(input.tractate_id, input.chapter_number, input.units)
    }
}
