//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Hull class of a ship group
///
/// Variants are declared in alphabetical order so the derived `Ord`
/// matches lexicographic name order. Stack traversal relies on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShipType {
    Ballista,
    Bomber,
    Carrier,
    Corvette,
    Cruiser,
    Destroyer,
    Drone,
    Fighter,
    Frigate,
    Ghost,
    Scout,
    /// Any hull class this build does not know about
    #[serde(other)]
    Unknown,
}

impl ShipType {
    /// Every known hull class, in traversal order
    pub const ALL: [ShipType; 11] = [
        ShipType::Ballista,
        ShipType::Bomber,
        ShipType::Carrier,
        ShipType::Corvette,
        ShipType::Cruiser,
        ShipType::Destroyer,
        ShipType::Drone,
        ShipType::Fighter,
        ShipType::Frigate,
        ShipType::Ghost,
        ShipType::Scout,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ShipType::Ballista => "Ballista",
            ShipType::Bomber => "Bomber",
            ShipType::Carrier => "Carrier",
            ShipType::Corvette => "Corvette",
            ShipType::Cruiser => "Cruiser",
            ShipType::Destroyer => "Destroyer",
            ShipType::Drone => "Drone",
            ShipType::Fighter => "Fighter",
            ShipType::Frigate => "Frigate",
            ShipType::Ghost => "Ghost",
            ShipType::Scout => "Scout",
            ShipType::Unknown => "Unknown",
        }
    }

    /// Base hull speed before formation multipliers
    pub fn base_speed(&self) -> u32 {
        match self {
            ShipType::Ballista => 3,
            ShipType::Bomber => 4,
            ShipType::Carrier => 3,
            ShipType::Corvette => 6,
            ShipType::Cruiser => 4,
            ShipType::Destroyer => 6,
            ShipType::Drone => 8,
            ShipType::Fighter => 7,
            ShipType::Frigate => 5,
            ShipType::Ghost => 8,
            ShipType::Scout => 9,
            ShipType::Unknown => 0,
        }
    }
}

impl std::fmt::Display for ShipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.name())
    }
}

/// A homogeneous group of ships sharing per-ship hit points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HpBucket {
    #[serde(rename = "perShipHP")]
    pub per_ship_hp: u64,
    pub count: u32,
}

impl HpBucket {
    pub fn new(per_ship_hp: u64, count: u32) -> Self {
        Self { per_ship_hp, count }
    }

    /// Aggregate hit points of the whole group
    pub fn total_hp(&self) -> u64 {
        self.per_ship_hp.saturating_mul(self.count as u64)
    }

    /// Buckets with no ships or no hit points are never placed
    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.per_ship_hp == 0
    }
}

/// A fleet's ship groups keyed by hull class
///
/// Bucket order within a hull class is significant: assignments refer back
/// to buckets by index. When decoding, names that map to the same hull
/// class (several unrecognized names all become `Unknown`) have their
/// buckets appended in document order instead of replacing each other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShipStack {
    groups: BTreeMap<ShipType, Vec<HpBucket>>,
}

impl ShipStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bucket for a hull class, returning its bucket index
    pub fn push_bucket(&mut self, ship_type: ShipType, bucket: HpBucket) -> usize {
        let buckets = self.groups.entry(ship_type).or_default();
        buckets.push(bucket);
        buckets.len() - 1
    }

    /// Builder form of `push_bucket`
    pub fn with_bucket(mut self, ship_type: ShipType, per_ship_hp: u64, count: u32) -> Self {
        self.push_bucket(ship_type, HpBucket::new(per_ship_hp, count));
        self
    }

    pub fn buckets(&self, ship_type: ShipType) -> &[HpBucket] {
        self.groups.get(&ship_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn bucket(&self, ship_type: ShipType, bucket_index: usize) -> Option<&HpBucket> {
        self.groups.get(&ship_type).and_then(|b| b.get(bucket_index))
    }

    /// Iterate hull classes in name order, then buckets in index order
    pub fn iter(&self) -> impl Iterator<Item = (ShipType, usize, &HpBucket)> + '_ {
        self.groups.iter().flat_map(|(ship_type, buckets)| {
            buckets
                .iter()
                .enumerate()
                .map(move |(index, bucket)| (*ship_type, index, bucket))
        })
    }

    /// Number of buckets that would be considered for placement
    pub fn bucket_count(&self) -> usize {
        self.iter().filter(|(_, _, b)| !b.is_empty()).count()
    }

    pub fn total_hp(&self) -> u64 {
        self.iter().map(|(_, _, b)| b.total_hp()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bucket_count() == 0
    }

    /// Slowest hull class present with at least one live bucket
    pub fn slowest_speed(&self) -> Option<u32> {
        self.iter()
            .filter(|(_, _, b)| !b.is_empty())
            .map(|(ship_type, _, _)| ship_type.base_speed())
            .min()
    }
}

// Custom deserialize so colliding keys merge instead of overwriting
impl<'de> Deserialize<'de> for ShipStack {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{MapAccess, Visitor};
        use std::fmt;

        struct StackVisitor;

        impl<'de> Visitor<'de> for StackVisitor {
            type Value = ShipStack;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("map of hull class to HP buckets")
            }

            fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut stack = ShipStack::new();
                while let Some((ship_type, buckets)) =
                    map.next_entry::<ShipType, Vec<HpBucket>>()?
                {
                    stack.groups.entry(ship_type).or_default().extend(buckets);
                }
                Ok(stack)
            }
        }

        deserializer.deserialize_map(StackVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ship_type_order_is_alphabetical() {
        let mut names: Vec<_> = ShipType::ALL.iter().map(|s| s.name()).collect();
        let declared = names.clone();
        names.sort();
        assert_eq!(names, declared);
    }

    #[test]
    fn test_unrecognized_ship_decodes_to_unknown() {
        let ship: ShipType = serde_json::from_str("\"Dreadnought\"").unwrap();
        assert_eq!(ship, ShipType::Unknown);
    }

    #[test]
    fn test_stack_iterates_in_fixed_order() {
        let stack = ShipStack::new()
            .with_bucket(ShipType::Scout, 10, 2)
            .with_bucket(ShipType::Bomber, 40, 1)
            .with_bucket(ShipType::Bomber, 35, 3);

        let order: Vec<_> = stack.iter().map(|(s, i, _)| (s, i)).collect();
        assert_eq!(
            order,
            vec![
                (ShipType::Bomber, 0),
                (ShipType::Bomber, 1),
                (ShipType::Scout, 0),
            ]
        );
    }

    #[test]
    fn test_empty_buckets_not_counted() {
        let stack = ShipStack::new()
            .with_bucket(ShipType::Fighter, 0, 5)
            .with_bucket(ShipType::Fighter, 20, 0)
            .with_bucket(ShipType::Fighter, 20, 1);

        assert_eq!(stack.bucket_count(), 1);
        assert_eq!(stack.total_hp(), 20);
    }

    #[test]
    fn test_bucket_json_field_names() {
        let json = serde_json::to_string(&HpBucket::new(12, 3)).unwrap();
        assert_eq!(json, r#"{"perShipHP":12,"count":3}"#);
    }

    #[test]
    fn test_unrecognized_hulls_merge_on_decode() {
        let json = r#"{
            "Dreadnought": [{"perShipHP": 900, "count": 1}],
            "Fighter": [{"perShipHP": 20, "count": 4}],
            "Titan": [{"perShipHP": 1200, "count": 2}]
        }"#;

        let stack: ShipStack = serde_json::from_str(json).unwrap();
        assert_eq!(
            stack.buckets(ShipType::Unknown),
            &[HpBucket::new(900, 1), HpBucket::new(1200, 2)]
        );
        assert_eq!(stack.buckets(ShipType::Fighter), &[HpBucket::new(20, 4)]);
        assert_eq!(stack.bucket_count(), 3);
    }

    #[test]
    fn test_stack_json_shape_round_trips() {
        let stack = ShipStack::new()
            .with_bucket(ShipType::Scout, 10, 2)
            .with_bucket(ShipType::Scout, 12, 1);
        let json = serde_json::to_string(&stack).unwrap();
        assert_eq!(
            json,
            r#"{"Scout":[{"perShipHP":10,"count":2},{"perShipHP":12,"count":1}]}"#
        );
        assert_eq!(serde_json::from_str::<ShipStack>(&json).unwrap(), stack);
    }

    #[test]
    fn test_slowest_speed() {
        let stack = ShipStack::new()
            .with_bucket(ShipType::Scout, 10, 2)
            .with_bucket(ShipType::Carrier, 300, 1);
        assert_eq!(stack.slowest_speed(), Some(3));
        assert_eq!(ShipStack::new().slowest_speed(), None);
    }
}
