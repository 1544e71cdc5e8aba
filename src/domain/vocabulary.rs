// ============================================================
// Layer 3 — Fixed Vocabularies and Category Maps
// ============================================================
// The price model was trained with one-hot encodings of the
// sale month and the listing agent. The slot for a category
// is its position in the alphabetically sorted vocabulary,
// so these lists must match the training run exactly.
//
// A CategoryMap sorts its vocabulary once, at construction,
// and is immutable afterwards.

use std::collections::BTreeMap;

use crate::error::PredictError;

/// Month names as written in the listing feed.
pub const MONTHS: [&str; 12] = [
    "jan", "feb", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// A listing agent known to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agent {
    pub id:   &'static str,
    pub name: &'static str,
}

pub const AGENTS: [Agent; 24] = [
    Agent { id: "6c5ec2f26798484fb1031a7a31c08d73", name: "Alice Vadasy" },
    Agent { id: "3a547da007e04cbdb8ed7e36a5920ab5", name: "Rhonda Bowers" },
    Agent { id: "795dc3219c4548de8a06babe17e5312c", name: "Pedro Sasser" },
    Agent { id: "8e6475f796cd425cafc497e1a5c9474f", name: "Porfirio Wueste" },
    Agent { id: "32b554b9e556415b9c1a5f429cb86ea4", name: "Donna Mcclintock" },
    Agent { id: "19a0b5650c4d43619cbaeeac9cc7a20a", name: "Frank Schmidt" },
    Agent { id: "efef30ab07cd407a88aa48c424d5171a", name: "John Rios" },
    Agent { id: "b07e66765f334ca9970aaee99cffc5a8", name: "Michael Hanners" },
    Agent { id: "fff5808fd1564d4fafd32ae748479a2c", name: "John Jimenez" },
    Agent { id: "c4a0f434295d4e4e972b2512823d6c4a", name: "Frank Scheetz" },
    Agent { id: "d2bd04c4a79d409d8d692ca8eea96c7a", name: "Donald Campbell" },
    Agent { id: "f80b78e84ee54bdd9aff519346ba2f19", name: "Kirsten Webb" },
    Agent { id: "4ecaa44743f145529c682799a4ff7100", name: "Michael Rowland" },
    Agent { id: "5f0b7975f5bc42cd8a46f8c2cc0a7bc8", name: "Charlotte Nodine" },
    Agent { id: "9656ed14d6ea47fd84503af7e1be3e4e", name: "Ann Perez" },
    Agent { id: "48589954489f46239de57d1846b9c79b", name: "Shirley Delrio" },
    Agent { id: "cb7d8976bd0a4c98826b3344ac18cdea", name: "Lucy Moffatt" },
    Agent { id: "ebb2ffc4234b40ebb7bf9bdd9c92ad98", name: "Gonzalo Ramos" },
    Agent { id: "63f3d4cadbf944dca0e586711d33a70f", name: "Cheryl Dunlap" },
    Agent { id: "defb7dd2db4845baa9e94f9a38000913", name: "Mary Chavez" },
    Agent { id: "ef141ba69bf94741aa575623c7abc6d8", name: "Pat Daniels" },
    Agent { id: "fc8bd0d643b94de58c36d221f27b6f66", name: "Johnnie Stanley" },
    Agent { id: "36e5c7e1c1a5478287fc3c4ad91bc72c", name: "Misty Wallace" },
    Agent { id: "90ac6055bfd045adaf501fad965c6ea3", name: "Gregory Dixon" },
];

/// Display name of an agent id, if the id is known.
pub fn agent_name(id: &str) -> Option<&'static str> {
    AGENTS.iter().find(|a| a.id == id).map(|a| a.name)
}

/// Ordered mapping category → one-hot slot.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    /// Column the categories come from, used in error messages
    field:      &'static str,
    /// Vocabulary in slot order (sorted, deduplicated)
    categories: Vec<String>,
    index:      BTreeMap<String, usize>,
}

impl CategoryMap {
    pub fn new<I, S>(field: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut categories: Vec<String> = values.into_iter().map(Into::into).collect();
        categories.sort();
        categories.dedup();

        let index = categories
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();

        Self { field, categories, index }
    }

    /// Sale month map: `april` is slot 0, `september` slot 11.
    pub fn months() -> Self {
        Self::new(crate::domain::listing::fields::SOLD_IN_MONTH, MONTHS)
    }

    pub fn agents() -> Self {
        Self::new(
            crate::domain::listing::fields::AGENT_ID,
            AGENTS.iter().map(|a| a.id),
        )
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Categories in slot order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn index_of(&self, value: &str) -> Result<usize, PredictError> {
        self.index
            .get(value)
            .copied()
            .ok_or_else(|| PredictError::UnknownCategory {
                field: self.field,
                value: value.to_string(),
            })
    }

    /// One-hot vector for `value`: all zeros except a single 1.0.
    pub fn one_hot(&self, value: &str) -> Result<Vec<f64>, PredictError> {
        let idx = self.index_of(value)?;
        let mut slots = vec![0.0; self.len()];
        slots[idx] = 1.0;
        Ok(slots)
    }

    /// Inverse of `one_hot`. Returns None unless `slots` has the
    /// map's length and exactly one slot equal to 1 with the rest 0.
    pub fn decode(&self, slots: &[f64]) -> Option<&str> {
        if slots.len() != self.len() {
            return None;
        }
        let mut hot = None;
        for (i, &v) in slots.iter().enumerate() {
            if v == 1.0 {
                if hot.is_some() {
                    return None;
                }
                hot = Some(i);
            } else if v != 0.0 {
                return None;
            }
        }
        hot.map(|i| self.categories[i].as_str())
    }
}
