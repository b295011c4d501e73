//! Per-person compliance classification.
//!
//! A `ComplianceMap` always carries exactly the six wearable categories,
//! regardless of what was detected. The worker-vs-alert decision looks only
//! at the categories named by the `AlertPolicy` — by default safety vest and
//! helmet, reproducing the source policy that ignores the other four. That
//! asymmetry is configuration, not a defect.

use std::collections::BTreeSet;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::detect::{BoundingBox, ObjectClass};

/// The six wearable PPE categories (every detector class except Person).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PpeCategory {
    Boots,
    DustMask,
    Glasses,
    Gloves,
    Helmet,
    SafetyVest,
}

impl PpeCategory {
    pub const ALL: [PpeCategory; 6] = [
        PpeCategory::Boots,
        PpeCategory::DustMask,
        PpeCategory::Glasses,
        PpeCategory::Gloves,
        PpeCategory::Helmet,
        PpeCategory::SafetyVest,
    ];

    pub fn object_class(self) -> ObjectClass {
        match self {
            PpeCategory::Boots => ObjectClass::Boots,
            PpeCategory::DustMask => ObjectClass::DustMask,
            PpeCategory::Glasses => ObjectClass::Glasses,
            PpeCategory::Gloves => ObjectClass::Gloves,
            PpeCategory::Helmet => ObjectClass::Helmet,
            PpeCategory::SafetyVest => ObjectClass::SafetyVest,
        }
    }

    pub fn label(self) -> &'static str {
        self.object_class().label()
    }

    /// Parse a config-file category name ("safety_vest", "Helmet", ...).
    pub fn parse(name: &str) -> Result<Self> {
        let normalized = name.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "boots" => Ok(PpeCategory::Boots),
            "dust_mask" => Ok(PpeCategory::DustMask),
            "glasses" => Ok(PpeCategory::Glasses),
            "gloves" => Ok(PpeCategory::Gloves),
            "helmet" => Ok(PpeCategory::Helmet),
            "safety_vest" => Ok(PpeCategory::SafetyVest),
            _ => Err(anyhow!("unknown PPE category: {}", name)),
        }
    }
}

/// Fixed-schema presence record: exactly six entries, always.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComplianceMap {
    present: [bool; 6],
}

impl ComplianceMap {
    /// Build the map from the set of item classes overlapping a person.
    /// Non-wearable classes in the set are ignored.
    pub fn from_items(items: &BTreeSet<ObjectClass>) -> Self {
        let mut map = Self::default();
        for (slot, category) in PpeCategory::ALL.iter().enumerate() {
            map.present[slot] = items.contains(&category.object_class());
        }
        map
    }

    pub fn is_present(&self, category: PpeCategory) -> bool {
        let slot = PpeCategory::ALL
            .iter()
            .position(|c| *c == category)
            .unwrap_or(0);
        self.present[slot]
    }

    /// Iterate the six categories in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (PpeCategory, bool)> + '_ {
        PpeCategory::ALL
            .iter()
            .zip(self.present.iter())
            .map(|(category, present)| (*category, *present))
    }
}

/// Which categories decide worker-vs-alert.
///
/// A person is a non-compliant alert case iff *none* of the required
/// categories is present.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlertPolicy {
    required: Vec<PpeCategory>,
}

impl Default for AlertPolicy {
    fn default() -> Self {
        Self {
            required: vec![PpeCategory::SafetyVest, PpeCategory::Helmet],
        }
    }
}

impl AlertPolicy {
    pub fn new(required: Vec<PpeCategory>) -> Result<Self> {
        if required.is_empty() {
            return Err(anyhow!("alert policy requires at least one category"));
        }
        Ok(Self { required })
    }

    pub fn required(&self) -> &[PpeCategory] {
        &self.required
    }

    pub fn is_alert(&self, compliance: &ComplianceMap) -> bool {
        self.required
            .iter()
            .all(|category| !compliance.is_present(*category))
    }
}

/// A person observed in one frame, with their compliance record.
/// The box is the only identity and it does not survive the frame.
#[derive(Clone, Copy, Debug)]
pub struct PersonRecord {
    pub bounds: BoundingBox,
    pub compliance: ComplianceMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(classes: &[ObjectClass]) -> BTreeSet<ObjectClass> {
        classes.iter().copied().collect()
    }

    #[test]
    fn map_always_has_exactly_six_entries() {
        let empty = ComplianceMap::from_items(&items(&[]));
        assert_eq!(empty.entries().count(), 6);
        assert!(empty.entries().all(|(_, present)| !present));

        let full = ComplianceMap::from_items(&items(&[
            ObjectClass::Boots,
            ObjectClass::DustMask,
            ObjectClass::Glasses,
            ObjectClass::Gloves,
            ObjectClass::Helmet,
            ObjectClass::SafetyVest,
        ]));
        assert_eq!(full.entries().count(), 6);
        assert!(full.entries().all(|(_, present)| present));
    }

    #[test]
    fn person_class_in_item_set_is_ignored() {
        let map = ComplianceMap::from_items(&items(&[ObjectClass::Person]));
        assert!(map.entries().all(|(_, present)| !present));
    }

    #[test]
    fn alert_requires_both_vest_and_helmet_missing() {
        let policy = AlertPolicy::default();

        let bare = ComplianceMap::from_items(&items(&[ObjectClass::Gloves]));
        assert!(policy.is_alert(&bare));

        // Helmet alone makes a worker even with everything else missing.
        let helmet_only = ComplianceMap::from_items(&items(&[ObjectClass::Helmet]));
        assert!(!policy.is_alert(&helmet_only));

        let vest_only = ComplianceMap::from_items(&items(&[ObjectClass::SafetyVest]));
        assert!(!policy.is_alert(&vest_only));
    }

    #[test]
    fn custom_policy_checks_its_own_categories() {
        let policy = AlertPolicy::new(vec![PpeCategory::Gloves]).unwrap();
        let no_gloves = ComplianceMap::from_items(&items(&[ObjectClass::Helmet]));
        assert!(policy.is_alert(&no_gloves));
        let gloves = ComplianceMap::from_items(&items(&[ObjectClass::Gloves]));
        assert!(!policy.is_alert(&gloves));
    }

    #[test]
    fn empty_policy_is_rejected() {
        assert!(AlertPolicy::new(Vec::new()).is_err());
    }

    #[test]
    fn category_names_parse_case_insensitively() {
        assert_eq!(
            PpeCategory::parse("Safety Vest").unwrap(),
            PpeCategory::SafetyVest
        );
        assert_eq!(
            PpeCategory::parse("dust_mask").unwrap(),
            PpeCategory::DustMask
        );
        assert!(PpeCategory::parse("cape").is_err());
    }
}
