//! One grouping key for punch aggregation, shared by the single-employee and organization views.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::punch_event::PunchEvent;
use crate::types::EmployeeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grouping {
    Employee,
    EmployeeDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    pub employee_id: EmployeeId,
    /// Set only for [`Grouping::EmployeeDate`].
    pub date: Option<NaiveDate>,
}

impl GroupKey {
    pub fn for_event(event: &PunchEvent, grouping: Grouping) -> Self {
        Self {
            employee_id: event.employee_id,
            date: match grouping {
                Grouping::Employee => None,
                Grouping::EmployeeDate => Some(event.date),
            },
        }
    }
}

pub fn group_punches<'a, I>(events: I, grouping: Grouping) -> BTreeMap<GroupKey, Vec<&'a PunchEvent>>
where
    I: IntoIterator<Item = &'a PunchEvent>,
{
    let mut groups: BTreeMap<GroupKey, Vec<&'a PunchEvent>> = BTreeMap::new();
    for event in events {
        groups
            .entry(GroupKey::for_event(event, grouping))
            .or_default()
            .push(event);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn punch(employee: EmployeeId, day: u32, hour: u32) -> PunchEvent {
        let at = NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap();
        PunchEvent::open(employee, at, None, Utc::now())
    }

    #[test]
    fn employee_date_grouping_splits_days() {
        let a = EmployeeId::new();
        let b = EmployeeId::new();
        let events = vec![punch(a, 3, 9), punch(a, 3, 13), punch(a, 4, 9), punch(b, 3, 9)];

        let groups = group_punches(&events, Grouping::EmployeeDate);
        assert_eq!(groups.len(), 3);
        let key = GroupKey {
            employee_id: a,
            date: NaiveDate::from_ymd_opt(2024, 6, 3),
        };
        assert_eq!(groups[&key].len(), 2);
    }

    #[test]
    fn employee_grouping_merges_days() {
        let a = EmployeeId::new();
        let b = EmployeeId::new();
        let events = vec![punch(a, 3, 9), punch(a, 4, 9), punch(b, 3, 9)];

        let groups = group_punches(&events, Grouping::Employee);
        assert_eq!(groups.len(), 2);
        assert!(groups.keys().all(|key| key.date.is_none()));
    }
}
