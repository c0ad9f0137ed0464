use feed::Region;
use rustc_hash::FxHashMap;

/// National aggregate; its shareable location is the bare root.
pub const NATIONAL: &str = "US";

#[derive(Debug, Clone, Default)]
pub struct RegionList {
    regions: Vec<Region>,
    index: FxHashMap<String, usize>,
}

impl RegionList {
    pub fn new(regions: Vec<Region>) -> Self {
        let index = regions
            .iter()
            .enumerate()
            .map(|(i, region)| (region.value.clone(), i))
            .collect();

        Self { regions, index }
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn get(&self, code: &str) -> Option<&Region> {
        self.index.get(code).and_then(|&i| self.regions.get(i))
    }

    /// Display label, or the code itself for an unknown region.
    pub fn label_of<'a>(&'a self, code: &'a str) -> &'a str {
        self.get(code).map_or(code, |region| region.label.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChanged {
    pub code: String,
    pub share_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    code: String,
}

impl Selection {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            code: initial.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// `None` when `code` is already selected.
    pub fn select(&mut self, code: &str) -> Option<SelectionChanged> {
        if self.code == code {
            return None;
        }
        self.code = code.to_string();

        Some(SelectionChanged {
            code: self.code.clone(),
            share_path: share_path(code),
        })
    }
}

pub fn share_path(code: &str) -> String {
    if code == NATIONAL {
        "/".to_string()
    } else {
        format!("/?state={code}")
    }
}
