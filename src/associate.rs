//! Spatial association of PPE items to persons.
//!
//! Filtered detections are split into person boxes and item boxes; every
//! person collects the deduplicated set of item classes whose boxes overlap
//! it (inclusive boundary). Every detected person yields exactly one
//! association record, even with no overlapping items.

use std::collections::BTreeSet;

use crate::detect::{BoundingBox, Detection, ObjectClass};

/// One person box with the item classes overlapping it this frame.
#[derive(Clone, Debug)]
pub struct PersonAssociation {
    pub bounds: BoundingBox,
    pub items: BTreeSet<ObjectClass>,
}

/// Associate item detections to person detections by rectangle overlap.
///
/// Detections with unknown class ids are dropped here.
pub fn associate(detections: &[Detection]) -> Vec<PersonAssociation> {
    let mut persons: Vec<BoundingBox> = Vec::new();
    let mut items: Vec<(BoundingBox, ObjectClass)> = Vec::new();

    for det in detections {
        match det.object_class() {
            Some(ObjectClass::Person) => persons.push(det.bounds),
            Some(class) => items.push((det.bounds, class)),
            None => {}
        }
    }

    persons
        .into_iter()
        .map(|person| {
            let overlapping = items
                .iter()
                .filter(|(bounds, _)| person.overlaps(bounds))
                .map(|(_, class)| *class)
                .collect();
            PersonAssociation {
                bounds: person,
                items: overlapping,
            }
        })
        .collect()
}
