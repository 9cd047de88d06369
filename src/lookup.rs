//! Static descriptions of enumerated field values.
//!
//! Tables annotate decoded values for presentation and never steer decoding.
//! A value outside every entry describes as [`NOT_SPECIFIED`].

/// Description of a value not covered by any entry of a table.
pub const NOT_SPECIFIED: &str = "not specified";

/// A single value or inclusive range of values with a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub first: u32,
    pub last: u32,
    pub description: &'static str,
}

impl Entry {
    pub const fn single(value: u32, description: &'static str) -> Self {
        Self::range(value, value, description)
    }

    pub const fn range(first: u32, last: u32, description: &'static str) -> Self {
        Self {
            first,
            last,
            description,
        }
    }
}

/// An ordered set of non-overlapping entries.
#[derive(Debug, Clone, Copy)]
pub struct LookupTable {
    entries: &'static [Entry],
}

impl LookupTable {
    /// Build a table from entries in ascending order.
    ///
    /// # Panics
    ///
    /// If the entries are out of order or overlap. Tables are built in
    /// `static` items, so this is caught at compile time.
    pub const fn new(entries: &'static [Entry]) -> Self {
        let mut i = 0;
        while i < entries.len() {
            assert!(entries[i].first <= entries[i].last, "entry range is reversed");
            if i > 0 {
                assert!(entries[i - 1].last < entries[i].first, "entries overlap or are unordered");
            }
            i += 1;
        }

        Self { entries }
    }

    /// Describe a value.
    pub fn get(&self, value: u32) -> &'static str {
        self.find(value).map_or(NOT_SPECIFIED, |e| e.description)
    }

    /// Find the entry covering a value, if any.
    pub fn find(&self, value: u32) -> Option<&'static Entry> {
        let i = self.entries.partition_point(|e| e.last < value);
        self.entries.get(i).filter(|e| e.first <= value)
    }

    pub fn entries(&self) -> &'static [Entry] {
        self.entries
    }
}
