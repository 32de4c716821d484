//! Rule module - combinators and per-item override rules

use crate::{Item, MetricKind};

/// Boolean reducer merging two rule results
///
/// The derived ordering puts `And` before `Or`; rule folding relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Combinator {
    /// Logical conjunction
    #[default]
    And,

    /// Logical disjunction
    Or,
}

impl Combinator {
    /// Get the persisted name of the combinator
    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }

    /// Parse a persisted combinator name
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "and" => Some(Combinator::And),
            "or" => Some(Combinator::Or),
            _ => None,
        }
    }

    /// Parse a persisted combinator name, falling back to [`Combinator::And`]
    pub fn parse_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Merge two results
    pub fn combine(&self, a: bool, b: bool) -> bool {
        match self {
            Combinator::And => a && b,
            Combinator::Or => a || b,
        }
    }
}

impl std::str::FromStr for Combinator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid combinator: {}", s))
    }
}

/// A tracker- or label-specific removal rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    /// How this rule merges with the running result
    pub combinator: Combinator,

    /// Metric the threshold applies to
    pub metric: MetricKind,

    /// Inclusive lower bound; the rule holds when `metric >= threshold`
    pub threshold: f64,
}

impl Rule {
    /// Create a rule
    pub fn new(combinator: Combinator, metric: MetricKind, threshold: f64) -> Self {
        Self {
            combinator,
            metric,
            threshold,
        }
    }

    /// Evaluate the threshold test against an item
    pub fn test(&self, item: &Item) -> bool {
        self.metric.extract(item) >= self.threshold
    }

    /// Evaluate an ordered rule list against an item
    ///
    /// Rules are stable-sorted so every AND rule is applied before any OR rule,
    /// then folded left: the first rule seeds the result and each following
    /// rule merges its own test into it. Returns `None` for an empty list.
    ///
    /// # Examples
    ///
    /// ```
    /// use autoremove_domain::{Combinator, Item, MetricKind, Rule};
    ///
    /// let item = Item::new("a").with_ratio(3.0).with_seeding_hours(1.0);
    /// let rules = [
    ///     Rule::new(Combinator::Or, MetricKind::Ratio, 2.0),
    ///     Rule::new(Combinator::And, MetricKind::SeedTimeHours, 48.0),
    /// ];
    /// assert_eq!(Rule::evaluate_all(&rules, &item), Some(true));
    /// ```
    pub fn evaluate_all(rules: &[Rule], item: &Item) -> Option<bool> {
        let mut ordered = rules.to_vec();
        ordered.sort_by_key(|rule| rule.combinator);

        let (first, rest) = ordered.split_first()?;
        let result = rest.iter().fold(first.test(item), |acc, rule| {
            rule.combinator.combine(rule.test(item), acc)
        });
        Some(result)
    }
}
