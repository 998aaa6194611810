use crate::arena::IntersectionZone;
use crate::{VehicleId, VehicleSet};
use cgmath::prelude::*;
use log::trace;
use smallvec::SmallVec;

/// The vehicles holding back a single vehicle.
pub(crate) type Blockers = SmallVec<[VehicleId; 4]>;

/// Finds the vehicles `subject_id` must give way to, given their current positions.
///
/// A vehicle gives way to another when the other lies strictly within
/// `radius` of it, lies inside the `zone`, and is heading in a direction of
/// higher priority. Only the other vehicle needs to be in the zone.
///
/// Blockers are listed in slot order.
pub(crate) fn find_blockers(
    vehicles: &VehicleSet,
    subject_id: VehicleId,
    zone: &IntersectionZone,
    radius: f64,
) -> Blockers {
    let subject = &vehicles[subject_id];
    let mut out = Blockers::new();

    for other in vehicles.values() {
        if other.id() == subject_id {
            continue;
        }
        let dist = subject.position().distance(other.position());
        if !(dist > 0.0 && dist < radius) {
            continue;
        }
        if !zone.contains(other.position()) {
            continue;
        }
        if subject.direction().yields_to(other.direction()) {
            trace!(
                "{:?} ({:?}) yields to {:?} ({:?}) at distance {:.1}",
                subject_id,
                subject.direction(),
                other.id(),
                other.direction(),
                dist
            );
            out.push(other.id());
        }
    }

    out
}
