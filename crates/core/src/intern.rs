use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StrId(u32);

/// Intern-once string table. Each transaction owns one so that segment
/// names are stored as small ids instead of repeated allocations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StringTable {
    ids: HashMap<String, StrId>,
    strings: Vec<String>,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, value: &str) -> StrId {
        if let Some(id) = self.ids.get(value) {
            return *id;
        }
        let id = StrId(self.strings.len() as u32);
        self.strings.push(value.to_string());
        self.ids.insert(value.to_string(), id);
        id
    }

    pub fn get(&self, id: StrId) -> Option<&str> {
        self.strings.get(id.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}
