//! Per-tick punch intents
//!
//! One value per fighter per tick, used only to arbitrate two punches
//! thrown in the same tick. `contact_t` is the ray parameter at which the
//! arm would first touch the target; smaller resolves first. Fighters that
//! did not start a punch (or whose ray misses) carry `f32::INFINITY`.

use super::fighter::{Arm, PunchKind, Side};
use super::policy::Action;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PunchIntent {
    pub actor: Side,
    pub action: Action,
    pub started: bool,
    pub arm: Option<Arm>,
    pub kind: Option<PunchKind>,
    pub contact_t: f32,
    pub canceled: bool,
}

impl PunchIntent {
    /// An intent that throws nothing this tick.
    pub fn idle(actor: Side, action: Action) -> Self {
        Self {
            actor,
            action,
            started: false,
            arm: None,
            kind: None,
            contact_t: f32::INFINITY,
            canceled: false,
        }
    }

    pub fn started(actor: Side, action: Action, kind: PunchKind, arm: Arm, contact_t: f32) -> Self {
        Self {
            actor,
            action,
            started: true,
            arm: Some(arm),
            kind: Some(kind),
            contact_t,
            canceled: false,
        }
    }

    /// Started, not canceled, and carrying an arm.
    pub fn is_live(&self) -> bool {
        self.started && !self.canceled && self.arm.is_some()
    }
}

/// Sort two intents by contact order. Ties keep the given order.
pub fn order_intents(first: PunchIntent, second: PunchIntent) -> [PunchIntent; 2] {
    if second.contact_t.total_cmp(&first.contact_t).is_lt() {
        [second, first]
    } else {
        [first, second]
    }
}

/// Both intents started with the same arm designation.
pub fn is_same_side(a: &PunchIntent, b: &PunchIntent) -> bool {
    a.started && b.started && a.arm.is_some() && a.arm == b.arm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smaller_contact_resolves_first() {
        let red = PunchIntent::started(Side::Red, Action::PunchLongL, PunchKind::Long, Arm::Left, 40.0);
        let blue = PunchIntent::started(Side::Blue, Action::PunchShortL, PunchKind::Short, Arm::Left, 12.0);

        let ordered = order_intents(red, blue);
        assert_eq!(ordered[0].actor, Side::Blue);
        assert!(is_same_side(&ordered[0], &ordered[1]));
    }

    #[test]
    fn test_infinite_ties_keep_order() {
        let red = PunchIntent::idle(Side::Red, Action::Idle);
        let blue = PunchIntent::idle(Side::Blue, Action::MoveUp);
        let ordered = order_intents(red, blue);
        assert_eq!(ordered[0].actor, Side::Red);
        assert!(!is_same_side(&red, &blue));
        assert!(!red.is_live());
    }

    #[test]
    fn test_missed_ray_sorts_after_contact() {
        let red = PunchIntent::started(Side::Red, Action::PunchShortR, PunchKind::Short, Arm::Right, f32::INFINITY);
        let blue = PunchIntent::started(Side::Blue, Action::PunchShortR, PunchKind::Short, Arm::Right, 80.0);
        let ordered = order_intents(red, blue);
        assert_eq!(ordered[0].actor, Side::Blue);
        assert!(ordered[0].is_live() && !ordered[1].canceled);
    }
}
