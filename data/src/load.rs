/// Identifies one in-flight region load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub generation: u64,
    pub region: String,
}

/// Last load wins: results carrying an older ticket are dropped.
#[derive(Debug, Default)]
pub struct LoadGuard {
    generation: u64,
}

impl LoadGuard {
    pub fn begin(&mut self, region: &str) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        LoadTicket {
            generation: self.generation,
            region: region.to_string(),
        }
    }

    pub fn accept(&self, ticket: &LoadTicket) -> bool {
        let current = ticket.generation == self.generation;
        if !current {
            log::debug!(
                "Dropping superseded load for {} (generation {}, current {})",
                ticket.region,
                ticket.generation,
                self.generation
            );
        }
        current
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Loaded {
    #[default]
    Loading,
    Failed(String),
    Ready,
}
