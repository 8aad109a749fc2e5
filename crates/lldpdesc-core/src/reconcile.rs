// ── Reconciliation engine ──
//
// Diffs the live neighbor table against the state recorded in descriptions
// and decides, per port, whether the description must be rewritten. Pure:
// no I/O, inputs untouched. Applying the resulting change set and running
// again yields no events and no changes.

use serde::Serialize;

use crate::codec;
use crate::model::{
    ChangeEvent, DescriptionChangeSet, NeighborTable, RecordedTable, RemoteIdentity,
};

/// Everything one reconciliation pass decided.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Reconciliation {
    /// Transitions in port order: live ports first, then lost ones.
    pub events: Vec<ChangeEvent>,
    pub changes: DescriptionChangeSet,
}

impl Reconciliation {
    /// `true` when the device already matches what LLDP reports.
    pub fn is_steady(&self) -> bool {
        self.events.is_empty() && self.changes.is_empty()
    }
}

pub fn reconcile(current: &NeighborTable, previous: &RecordedTable) -> Reconciliation {
    let mut events = Vec::new();
    let mut seen: Vec<(&str, &RemoteIdentity)> = Vec::new();

    for (port, now) in current.iter() {
        let recorded = previous.get(port);
        let event = match recorded.and_then(|state| state.identity().map(|id| (id, state.down))) {
            None => ChangeEvent::up(port, None, now.clone()),
            // Recovery is always reported as Up, even when the neighbor
            // that came back is not the one that went away.
            Some((was, true)) => ChangeEvent::up(port, Some(was), now.clone()),
            Some((was, false)) if was != *now => ChangeEvent::change(port, was, now.clone()),
            Some(_) => continue,
        };
        events.push(event);
        seen.push((port, now));
    }

    let mut lost = Vec::new();
    for (port, state) in previous.iter() {
        if current.contains(port) || state.down {
            continue;
        }
        if let Some(was) = state.identity() {
            events.push(ChangeEvent::down(port, was.clone()));
            lost.push((port, was));
        }
    }

    let mut changes = DescriptionChangeSet::new();
    let user_text = |port: &str| previous.get(port).map_or("", |state| state.user_text.as_str());
    for (port, remote) in seen {
        changes.insert(port, codec::encode(user_text(port), remote, false));
    }
    for (port, remote) in &lost {
        changes.insert(*port, codec::encode(user_text(port), remote, true));
    }

    Reconciliation { events, changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DescriptionTable, NeighborRecord, RecordedState};
    use pretty_assertions::assert_eq;

    fn neighbors(rows: &[(&str, &str, &str)]) -> NeighborTable {
        rows.iter()
            .map(|(port, system, remote_port)| {
                NeighborRecord::new(*port, RemoteIdentity::new(*system, *remote_port))
            })
            .collect()
    }

    fn recorded(rows: &[(&str, &str)]) -> RecordedTable {
        let descriptions: DescriptionTable = rows.iter().copied().collect();
        RecordedTable::from_descriptions(&descriptions)
    }

    fn lines(result: &Reconciliation) -> Vec<String> {
        result.events.iter().map(ToString::to_string).collect()
    }

    fn changes(rows: &[(&str, &str)]) -> DescriptionChangeSet {
        rows.iter().copied().collect()
    }

    /// Descriptions after publishing `result` on top of `before`.
    fn applied(before: &[(&str, &str)], result: &Reconciliation) -> RecordedTable {
        let mut descriptions: DescriptionTable = before.iter().copied().collect();
        for (port, text) in result.changes.iter() {
            descriptions.insert(port, text);
        }
        RecordedTable::from_descriptions(&descriptions)
    }

    #[test]
    fn up_from_nothing() {
        let result = reconcile(&neighbors(&[("A", "sysX", "p1")]), &RecordedTable::new());

        assert_eq!(lines(&result), vec!["A LLDP Up. Now: sysX p1"]);
        assert_eq!(result.changes, changes(&[("A", "LLDP: sysX p1")]));
    }

    #[test]
    fn down_detection() {
        let result = reconcile(&NeighborTable::new(), &recorded(&[("A", "LLDP: sysX p1")]));

        assert_eq!(lines(&result), vec!["A LLDP Down. Was: sysX p1"]);
        assert_eq!(result.changes, changes(&[("A", "LLDP: sysX p1(DOWN)")]));
    }

    #[test]
    fn recovery_from_down() {
        let result = reconcile(
            &neighbors(&[("A", "sysX", "p1")]),
            &recorded(&[("A", "LLDP: sysX p1(DOWN)")]),
        );

        assert_eq!(lines(&result), vec!["A LLDP Up. Was: sysX p1 Now: sysX p1"]);
        assert_eq!(result.changes, changes(&[("A", "LLDP: sysX p1")]));
    }

    #[test]
    fn change_detection() {
        let result = reconcile(
            &neighbors(&[("A", "sysY", "p2")]),
            &recorded(&[("A", "LLDP: sysX p1")]),
        );

        assert_eq!(lines(&result), vec!["A LLDP Change. Was: sysX p1 Now: sysY p2"]);
        assert_eq!(result.changes, changes(&[("A", "LLDP: sysY p2")]));
    }

    #[test]
    fn no_op() {
        let result = reconcile(
            &neighbors(&[("A", "sysX", "p1")]),
            &recorded(&[("A", "LLDP: sysX p1")]),
        );

        assert!(result.is_steady());
    }

    #[test]
    fn user_text_preserved() {
        let previous: RecordedTable = [(
            "A".to_string(),
            RecordedState {
                user_text: "mgmt link".into(),
                system: Some("sysX".into()),
                port: Some("p1".into()),
                down: false,
            },
        )]
        .into_iter()
        .collect();

        let result = reconcile(&neighbors(&[("A", "sysY", "p2")]), &previous);

        assert_eq!(result.changes, changes(&[("A", "mgmt link LLDP: sysY p2")]));
    }

    #[test]
    fn user_text_preserved_on_first_sighting_and_down() {
        let result = reconcile(
            &neighbors(&[("A", "sysX", "p1")]),
            &recorded(&[("A", "to rack 12"), ("B", "core LLDP: sysZ p9")]),
        );

        assert_eq!(
            lines(&result),
            vec!["A LLDP Up. Now: sysX p1", "B LLDP Down. Was: sysZ p9"]
        );
        assert_eq!(
            result.changes,
            changes(&[
                ("A", "to rack 12 LLDP: sysX p1"),
                ("B", "core LLDP: sysZ p9(DOWN)"),
            ])
        );
    }

    #[test]
    fn already_down_stays_quiet() {
        let result = reconcile(&NeighborTable::new(), &recorded(&[("A", "LLDP: sysX p1(DOWN)")]));
        assert!(result.is_steady());
    }

    #[test]
    fn unusable_record_is_treated_as_absent() {
        let result = reconcile(
            &neighbors(&[("A", "sysX", "p1")]),
            &recorded(&[("A", "LLDP: sysX"), ("B", "LLDP: ")]),
        );

        assert_eq!(lines(&result), vec!["A LLDP Up. Now: sysX p1"]);
        assert_eq!(result.changes, changes(&[("A", "LLDP: sysX p1")]));
    }

    /// Recovery with a different neighbor than the one that went down is
    /// reported as Up (old vs. new), never as Change. Kept as-is on purpose.
    #[test]
    fn recovery_with_new_neighbor_reports_up() {
        let result = reconcile(
            &neighbors(&[("A", "sysY", "p2")]),
            &recorded(&[("A", "LLDP: sysX p1(DOWN)")]),
        );

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].kind, crate::model::ChangeKind::Up);
        assert_eq!(lines(&result), vec!["A LLDP Up. Was: sysX p1 Now: sysY p2"]);
        assert_eq!(result.changes, changes(&[("A", "LLDP: sysY p2")]));
    }

    #[test]
    fn every_port_is_processed() {
        let result = reconcile(
            &neighbors(&[("A", "s1", "p1"), ("B", "s2", "p2"), ("C", "s3", "p3")]),
            &recorded(&[
                ("A", "LLDP: s1 p1"),
                ("B", "LLDP: old p0"),
                ("D", "LLDP: s4 p4"),
                ("E", "no lldp here"),
            ]),
        );

        assert_eq!(
            lines(&result),
            vec![
                "B LLDP Change. Was: old p0 Now: s2 p2",
                "C LLDP Up. Now: s3 p3",
                "D LLDP Down. Was: s4 p4",
            ]
        );
        assert_eq!(result.changes.len(), 3);
        assert_eq!(result.changes.get("A"), None);
        assert_eq!(result.changes.get("E"), None);
    }

    #[test]
    fn steady_after_one_pass() {
        let before = [
            ("A", "LLDP: s1 p1"),
            ("B", "uplink LLDP: old p0"),
            ("C", "LLDP: s3 p3(DOWN)"),
            ("D", "spare LLDP: s4 p4"),
            ("E", "plain text"),
        ];
        let current = neighbors(&[
            ("A", "s1", "p1"),
            ("B", "s2", "p2"),
            ("C", "s3", "p3"),
            ("F", "s6", "p6"),
        ]);

        let first = reconcile(&current, &recorded(&before));
        assert!(!first.is_steady());

        let second = reconcile(&current, &applied(&before, &first));
        assert!(second.is_steady(), "second pass not steady: {second:?}");
    }

    #[test]
    fn inputs_are_not_mutated() {
        let current = neighbors(&[("A", "sysY", "p2")]);
        let previous = recorded(&[("A", "LLDP: sysX p1"), ("B", "LLDP: s p")]);
        let (current_before, previous_before) = (current.clone(), previous.clone());

        let _ = reconcile(&current, &previous);

        assert_eq!(current, current_before);
        assert_eq!(previous, previous_before);
    }
}
