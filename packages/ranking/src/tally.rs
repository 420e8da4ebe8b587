//! Aggregates linked records into per-officer counters.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use accountability_records_models::{
    Allegation, Award, ComplainantKind, Officer, OfficerCounters, RecordId, UseOfForceIncident,
};
use chrono::Datelike as _;

/// Whole years between the appointment year and `as_of_year`.
///
/// Appointments dated after `as_of_year` count as 0.
#[must_use]
pub fn service_years(appointment_year: i32, as_of_year: i32) -> u32 {
    u32::try_from(as_of_year.saturating_sub(appointment_year)).unwrap_or(0)
}

/// The calendar year used when the caller does not pin one.
#[must_use]
pub fn current_year() -> i32 {
    chrono::Utc::now().year()
}

/// Counts each officer's linked allegations, use-of-force reports, and
/// awards, and derives years of service as of `as_of_year`.
///
/// The result is parallel to `officers`. Records naming an officer that is
/// not in `officers` are skipped. When several officers share an id, the
/// first of them receives every linked record. An officer without an appointment date
/// gets `service_years = 0` and `appointment_known = false`, which places
/// them at the concerning end of the inverted service metric.
#[must_use]
pub fn tally_counters(
    officers: &[Officer],
    allegations: &[Allegation],
    use_of_force: &[UseOfForceIncident],
    awards: &[Award],
    as_of_year: i32,
) -> Vec<OfficerCounters> {
    let mut counters: Vec<OfficerCounters> = officers
        .iter()
        .map(|officer| {
            let mut entry = OfficerCounters::empty(officer.id.clone());
            if let Some(date) = officer.appointment_date {
                entry.service_years = service_years(date.year(), as_of_year);
                entry.appointment_known = true;
            }
            entry
        })
        .collect();

    let mut index: BTreeMap<&RecordId, usize> = BTreeMap::new();
    let mut duplicates = 0_usize;
    for (i, officer) in officers.iter().enumerate() {
        match index.entry(&officer.id) {
            Entry::Vacant(slot) => {
                slot.insert(i);
            }
            Entry::Occupied(_) => duplicates += 1,
        }
    }

    if duplicates > 0 {
        log::warn!(
            "{duplicates} officers share an id with an earlier officer; \
             linked records are credited to the first"
        );
    }

    let mut orphaned = 0_usize;

    for allegation in allegations {
        let Some(&i) = index.get(&allegation.officer_id) else {
            orphaned += 1;
            continue;
        };
        counters[i].officer_allegations += 1;
        if allegation.complainant == ComplainantKind::Civilian {
            counters[i].civilian_allegations += 1;
        }
    }

    for incident in use_of_force {
        match index.get(&incident.officer_id) {
            Some(&i) => counters[i].use_of_force += 1,
            None => orphaned += 1,
        }
    }

    for award in awards {
        match index.get(&award.officer_id) {
            Some(&i) => counters[i].awards += 1,
            None => orphaned += 1,
        }
    }

    if orphaned > 0 {
        log::debug!("Skipped {orphaned} linked records referencing unknown officers");
    }

    let missing_appointment = counters.iter().filter(|c| !c.appointment_known).count();
    if missing_appointment > 0 {
        log::warn!(
            "{missing_appointment} of {} officers have no appointment date; \
             their service years are treated as 0",
            counters.len()
        );
    }

    counters
}
