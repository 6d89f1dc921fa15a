use serde::{Deserialize, Serialize};

/// One harvested tag. `count` is `None` when the page showed no usable counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRecord {
    pub name: String,
    pub id: String,
    pub count: Option<u64>,
}

impl TagRecord {
    pub fn new(name: impl Into<String>, id: impl Into<String>, count: Option<u64>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            count,
        }
    }
}

/// Ordered tag records of a single harvest run, in discovery order.
///
/// Serializes as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    records: Vec<TagRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record: TagRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TagRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[TagRecord] {
        &self.records
    }

    /// Number of records that carry a count.
    pub fn counted(&self) -> usize {
        self.records.iter().filter(|r| r.count.is_some()).count()
    }

    /// Number of records whose count could not be read.
    pub fn missing_counts(&self) -> usize {
        self.len() - self.counted()
    }
}

impl From<Vec<TagRecord>> for Catalog {
    fn from(records: Vec<TagRecord>) -> Self {
        Self { records }
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TagRecord;
    type IntoIter = std::slice::Iter<'a, TagRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counted_and_missing_add_up() {
        let catalog = Catalog::from(vec![
            TagRecord::new("Action", "19", Some(1502)),
            TagRecord::new("Indie", "4", None),
            TagRecord::new("Puzzle", "1664", Some(0)),
        ]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.counted(), 2);
        assert_eq!(catalog.missing_counts(), 1);
    }

    #[test]
    fn push_keeps_insertion_order() {
        let mut catalog = Catalog::with_capacity(2);
        catalog.push(TagRecord::new("Zombies", "1659", None));
        catalog.push(TagRecord::new("Action", "19", None));
        let names: Vec<_> = catalog.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Zombies", "Action"]);
    }
}
