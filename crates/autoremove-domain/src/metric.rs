//! Metric module - scalar extractors over item snapshots

use crate::Item;

/// A scalar that can be read off an item snapshot
///
/// Each kind has a persisted name (the key used in configuration documents)
/// and a display name used by configuration front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum MetricKind {
    /// Raw upload / download ratio
    #[default]
    Ratio,

    /// Hours since the item was added
    AgeHours,

    /// Hours spent seeding
    SeedTimeHours,

    /// Number of seeders, as a float
    SeederCount,

    /// Payload size in GB (bytes / 2^30)
    SizeGb,
}

impl MetricKind {
    /// Every metric kind, in catalog order
    pub const ALL: [MetricKind; 5] = [
        MetricKind::SizeGb,
        MetricKind::Ratio,
        MetricKind::AgeHours,
        MetricKind::SeedTimeHours,
        MetricKind::SeederCount,
    ];

    /// Get the persisted name of the metric
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Ratio => "func_ratio",
            MetricKind::AgeHours => "func_added",
            MetricKind::SeedTimeHours => "func_seed_time",
            MetricKind::SeederCount => "func_seeders",
            MetricKind::SizeGb => "func_size",
        }
    }

    /// Get the human readable name of the metric
    pub fn display_name(&self) -> &'static str {
        match self {
            MetricKind::Ratio => "Ratio",
            MetricKind::AgeHours => "Date Added",
            MetricKind::SeedTimeHours => "Seed Time",
            MetricKind::SeederCount => "Seeders",
            MetricKind::SizeGb => "Size",
        }
    }

    /// Parse a persisted metric name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "func_ratio" => Some(MetricKind::Ratio),
            "func_added" => Some(MetricKind::AgeHours),
            "func_seed_time" => Some(MetricKind::SeedTimeHours),
            "func_seeders" => Some(MetricKind::SeederCount),
            "func_size" => Some(MetricKind::SizeGb),
            _ => None,
        }
    }

    /// Parse a persisted metric name, falling back to [`MetricKind::Ratio`]
    ///
    /// Unknown names are not an error: older configuration documents and
    /// hand-edited ones keep working with the ratio extractor.
    ///
    /// # Examples
    ///
    /// ```
    /// use autoremove_domain::MetricKind;
    ///
    /// assert_eq!(MetricKind::parse_or_default("func_size"), MetricKind::SizeGb);
    /// assert_eq!(MetricKind::parse_or_default("func_bogus"), MetricKind::Ratio);
    /// ```
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Read this metric off an item
    pub fn extract(&self, item: &Item) -> f64 {
        match self {
            MetricKind::Ratio => item.ratio,
            MetricKind::AgeHours => item.age_hours,
            MetricKind::SeedTimeHours => item.seeding_hours,
            MetricKind::SeederCount => f64::from(item.seeder_count),
            MetricKind::SizeGb => item.size_gb(),
        }
    }
}

impl std::str::FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid metric: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Item {
        Item::new("a")
            .with_ratio(1.5)
            .with_age_hours(10.0)
            .with_seeding_hours(7.5)
            .with_seeders(4)
            .with_size_bytes(2 * 1_073_741_824)
    }

    #[test]
    fn test_extractors() {
        let item = sample();
        assert_eq!(MetricKind::Ratio.extract(&item), 1.5);
        assert_eq!(MetricKind::AgeHours.extract(&item), 10.0);
        assert_eq!(MetricKind::SeedTimeHours.extract(&item), 7.5);
        assert_eq!(MetricKind::SeederCount.extract(&item), 4.0);
        assert_eq!(MetricKind::SizeGb.extract(&item), 2.0);
    }

    #[test]
    fn test_name_roundtrip() {
        for kind in MetricKind::ALL {
            assert_eq!(MetricKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_falls_back_to_ratio() {
        assert_eq!(MetricKind::parse("ratio"), None);
        assert_eq!(MetricKind::parse_or_default("ratio"), MetricKind::Ratio);
        assert!("nope".parse::<MetricKind>().is_err());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(MetricKind::AgeHours.display_name(), "Date Added");
        assert_eq!(MetricKind::SeedTimeHours.display_name(), "Seed Time");
    }
}
