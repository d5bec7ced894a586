//! Bout statistics, accumulated per side from tick outcomes.

use serde::{Deserialize, Serialize};

use super::fighter::Side;
use super::resolver::{SideOutcome, TickOutcome};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideStats {
    pub punches_thrown: u32,
    pub punches_landed: u32,
    pub damage_dealt: f32,
    pub super_punches: u32,
    pub knockout_punches: u32,
    pub sameside_counters: u32,
    pub real_dodges: u32,
    pub counter_attack_hits: u32,
    pub knockouts_suffered: u32,
    pub rounds_won: u32,
    pub total_reward: f64,
}

impl SideStats {
    pub fn record(&mut self, out: &SideOutcome) {
        let p = &out.punch;
        self.punches_thrown += out.punch_started as u32;
        self.punches_landed += p.landed as u32;
        self.damage_dealt += p.damage_dealt;
        self.super_punches += p.super_punch as u32;
        self.knockout_punches += p.knockout_punch as u32;
        self.sameside_counters += p.did_counter as u32;
        self.real_dodges += p.real_dodge as u32;
        self.counter_attack_hits += p.counter_attack_hit as u32;
        self.total_reward += out.reward as f64;
    }

    /// Landed / thrown, 0 when nothing was thrown.
    pub fn accuracy(&self) -> f32 {
        if self.punches_thrown == 0 {
            0.0
        } else {
            self.punches_landed as f32 / self.punches_thrown as f32
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoutStats {
    pub red: SideStats,
    pub blue: SideStats,
    pub ticks: u64,
}

impl BoutStats {
    pub fn record_tick(&mut self, out: &TickOutcome) {
        self.red.record(&out.red);
        self.blue.record(&out.blue);
        self.ticks += 1;
    }

    pub fn side(&self, side: Side) -> &SideStats {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideStats {
        match side {
            Side::Red => &mut self.red,
            Side::Blue => &mut self.blue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::policy::Action;
    use crate::engine::resolver::PunchReport;

    fn outcome(started: bool, report: PunchReport, reward: f32) -> SideOutcome {
        SideOutcome {
            action: Action::PunchShortL,
            reward,
            damage_taken: 0.0,
            punch_started: started,
            punch: report,
        }
    }

    #[test]
    fn test_record_accumulates() {
        let mut stats = BoutStats::default();
        let landed = PunchReport { damage_dealt: 12.5, landed: true, did_counter: true, ..Default::default() };
        let tick = TickOutcome {
            done: false,
            red: outcome(true, landed, 5.0),
            blue: outcome(true, PunchReport::default(), -4.0),
        };

        stats.record_tick(&tick);
        stats.record_tick(&tick);

        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.red.punches_thrown, 2);
        assert_eq!(stats.red.punches_landed, 2);
        assert_eq!(stats.red.sameside_counters, 2);
        assert!((stats.red.damage_dealt - 25.0).abs() < 1e-6);
        assert!((stats.blue.total_reward + 8.0).abs() < 1e-9);
        assert_eq!(stats.red.accuracy(), 1.0);
        assert_eq!(stats.blue.accuracy(), 0.0);
    }

    #[test]
    fn test_accuracy_without_punches() {
        assert_eq!(SideStats::default().accuracy(), 0.0);
    }
}
