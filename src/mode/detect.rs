//! Detect mode: whole-frame worker/alert tally. Counts reset every frame;
//! nothing is carried across ticks.

use super::tally_persons;
use crate::compliance::{AlertPolicy, PersonRecord};
use crate::render::{FramePayload, TextLine};

pub(super) fn run(persons: &[PersonRecord], policy: &AlertPolicy) -> FramePayload {
    let mut payload = FramePayload::default();
    let (worker_count, alert_count) = tally_persons(persons, policy, &mut payload);
    payload
        .lines
        .push(TextLine::neutral(format!("Number of workers: {}", worker_count)));
    payload.lines.push(TextLine::pass_fail(
        format!("Number of normal persons: {}", alert_count),
        alert_count == 0,
    ));
    payload
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance::ComplianceMap;
    use crate::detect::{BoundingBox, ObjectClass};
    use std::collections::BTreeSet;

    fn person(classes: &[ObjectClass]) -> PersonRecord {
        let items: BTreeSet<ObjectClass> = classes.iter().copied().collect();
        PersonRecord {
            bounds: BoundingBox::new(0, 0, 50, 100),
            compliance: ComplianceMap::from_items(&items),
        }
    }

    #[test]
    fn tally_splits_workers_and_alerts() {
        let persons = vec![
            person(&[ObjectClass::Helmet]),
            person(&[ObjectClass::SafetyVest]),
            person(&[ObjectClass::Gloves]),
            person(&[]),
        ];
        let payload = run(&persons, &AlertPolicy::default());

        assert_eq!(payload.lines[0].text, "Number of workers: 2");
        assert_eq!(payload.lines[1].text, "Number of normal persons: 2");
        let workers = payload
            .overlays
            .iter()
            .filter(|o| o.label == "Worker")
            .count();
        let alerts = payload
            .overlays
            .iter()
            .filter(|o| o.label == "ALERT !!!")
            .count();
        assert_eq!(workers, 2);
        assert_eq!(alerts, 2);
    }

    #[test]
    fn empty_frame_reports_zero_counts() {
        let payload = run(&[], &AlertPolicy::default());
        assert_eq!(payload.lines[0].text, "Number of workers: 0");
        assert!(payload.overlays.is_empty());
    }
}
