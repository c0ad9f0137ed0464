use feed::{Metric, RawRecord};

/// Most recent reported value per "current status" metric.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatestStatus {
    pub death_increase: Option<f64>,
    pub icu: Option<f64>,
    pub hospitalized: Option<f64>,
    pub positive_increase: Option<f64>,
}

impl LatestStatus {
    pub fn extract(records: &[RawRecord]) -> Self {
        let mut latest = Self::default();

        for record in records {
            let slots = [
                (&mut latest.death_increase, Metric::DeathIncrease),
                (&mut latest.icu, Metric::InIcuCurrently),
                (&mut latest.hospitalized, Metric::HospitalizedCurrently),
                (&mut latest.positive_increase, Metric::PositiveIncrease),
            ];
            for (slot, metric) in slots {
                if let Some(value) = record.metric(metric).actual {
                    *slot = Some(value);
                }
            }
        }

        latest
    }

    /// Cumulative deaths have no "latest" slot.
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Death => None,
            Metric::DeathIncrease => self.death_increase,
            Metric::InIcuCurrently => self.icu,
            Metric::HospitalizedCurrently => self.hospitalized,
            Metric::PositiveIncrease => self.positive_increase,
        }
    }
}

pub fn extract(records: &[RawRecord]) -> LatestStatus {
    LatestStatus::extract(records)
}
