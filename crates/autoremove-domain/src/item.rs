//! Item module - the managed entities the engine decides about

use std::fmt;

/// Stable, opaque identifier of an item in the host registry
///
/// Torrent hosts use the info-hash hex string; the engine never interprets it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap a host identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Read-only snapshot of an item, refreshed at the start of every pass
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Host identifier
    pub id: ItemId,

    /// Human readable name, only used for logging
    pub name: String,

    /// Whether the item finished downloading; unfinished items are never candidates
    pub finished: bool,

    /// Tracker URLs in host order
    pub trackers: Vec<String>,

    /// Labels attached to the item (zero or one with the usual label plugin)
    pub labels: Vec<String>,

    /// Upload / download ratio
    pub ratio: f64,

    /// Hours since the item was added
    pub age_hours: f64,

    /// Hours spent seeding
    pub seeding_hours: f64,

    /// Number of seeders currently known for the item
    pub seeder_count: u32,

    /// Total size of the payload in bytes
    pub size_bytes: u64,
}

/// Bytes in one gibibyte; all "GB" values in this workspace use this base
pub const BYTES_PER_GB: f64 = 1_073_741_824.0;

impl Item {
    /// Create a finished item with zeroed metrics
    ///
    /// # Examples
    ///
    /// ```
    /// use autoremove_domain::Item;
    ///
    /// let item = Item::new("abc").with_ratio(2.5);
    /// assert!(item.finished);
    /// assert_eq!(item.ratio, 2.5);
    /// ```
    pub fn new(id: impl Into<ItemId>) -> Self {
        let id = id.into();
        Self {
            name: id.to_string(),
            id,
            finished: true,
            trackers: Vec::new(),
            labels: Vec::new(),
            ratio: 0.0,
            age_hours: 0.0,
            seeding_hours: 0.0,
            seeder_count: 0,
            size_bytes: 0,
        }
    }

    /// Set the ratio
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.ratio = ratio;
        self
    }

    /// Set the seeding time in hours
    pub fn with_seeding_hours(mut self, hours: f64) -> Self {
        self.seeding_hours = hours;
        self
    }

    /// Set the age in hours
    pub fn with_age_hours(mut self, hours: f64) -> Self {
        self.age_hours = hours;
        self
    }

    /// Set the seeder count
    pub fn with_seeders(mut self, seeders: u32) -> Self {
        self.seeder_count = seeders;
        self
    }

    /// Set the payload size in bytes
    pub fn with_size_bytes(mut self, bytes: u64) -> Self {
        self.size_bytes = bytes;
        self
    }

    /// Append a tracker URL
    pub fn with_tracker(mut self, url: impl Into<String>) -> Self {
        self.trackers.push(url.into());
        self
    }

    /// Append a label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Mark the item as finished or not
    pub fn with_finished(mut self, finished: bool) -> Self {
        self.finished = finished;
        self
    }

    /// Payload size in GB (bytes / 2^30)
    pub fn size_gb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_GB
    }
}
