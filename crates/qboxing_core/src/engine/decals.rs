//! Ground decals
//!
//! Impact marks and motion-trail drops. The core decides where and when a
//! decal appears and carries its cosmetic jitter; fading and drawing belong
//! to the renderer. Storage is a bounded deque, oldest evicted first.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::config::FxConfig;
use super::geometry::Vec2;
use super::rng::CombatRng;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decal {
    pub pos: Vec2,
    pub born_ms: u64,
    pub die_ms: u64,
    /// Index into the asset provider's impact images
    pub variant: usize,
    /// Degrees
    pub rotation: f32,
    pub scale: f32,
}

impl Decal {
    pub fn alive(&self, now_ms: u64) -> bool {
        now_ms < self.die_ms
    }

    /// Opacity in `[0, 1]`: full until the fade tail, then linear to zero.
    pub fn alpha(&self, now_ms: u64, fade_ms: u64) -> f32 {
        let remaining = self.die_ms.saturating_sub(now_ms);
        if fade_ms == 0 || remaining > fade_ms {
            1.0
        } else {
            remaining as f32 / fade_ms as f32
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecalBuffer {
    decals: VecDeque<Decal>,
    capacity: usize,
}

impl DecalBuffer {
    pub fn new(capacity: usize) -> Self {
        Self { decals: VecDeque::with_capacity(capacity.min(1024)), capacity }
    }

    /// Roll cosmetics and append a decal. Returns `None` (and draws
    /// nothing) when no impact images are available.
    pub fn spawn(
        &mut self,
        pos: Vec2,
        now_ms: u64,
        fx: &FxConfig,
        rng: &mut dyn CombatRng,
    ) -> Option<Decal> {
        if fx.impact_variants == 0 {
            return None;
        }

        let decal = Decal {
            pos,
            born_ms: now_ms,
            die_ms: now_ms + fx.decal_lifetime_ms,
            variant: rng.index(fx.impact_variants),
            rotation: rng.uniform(0.0, 360.0),
            scale: rng.uniform(fx.decal_scale_min, fx.decal_scale_max),
        };
        self.push(decal);
        Some(decal)
    }

    pub fn push(&mut self, decal: Decal) {
        self.decals.push_back(decal);
        while self.decals.len() > self.capacity {
            self.decals.pop_front();
        }
    }

    /// Drop expired decals from the front.
    pub fn prune_expired(&mut self, now_ms: u64) {
        while self.decals.front().is_some_and(|d| !d.alive(now_ms)) {
            self.decals.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.decals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decal> {
        self.decals.iter()
    }

    pub fn clear(&mut self) {
        self.decals.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::rng::ScriptedEntropy;

    fn decal(born: u64) -> Decal {
        Decal {
            pos: Vec2::ZERO,
            born_ms: born,
            die_ms: born + 100,
            variant: 0,
            rotation: 0.0,
            scale: 1.0,
        }
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut buf = DecalBuffer::new(3);
        for i in 0..5 {
            buf.push(decal(i));
        }
        assert_eq!(buf.len(), 3);
        let born: Vec<u64> = buf.iter().map(|d| d.born_ms).collect();
        assert_eq!(born, vec![2, 3, 4]);
    }

    #[test]
    fn test_prune_expired() {
        let mut buf = DecalBuffer::new(10);
        buf.push(decal(0));
        buf.push(decal(50));
        buf.prune_expired(100);
        assert_eq!(buf.len(), 1);
        buf.prune_expired(150);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_spawn_rolls_cosmetics() {
        let fx = FxConfig::default();
        let mut buf = DecalBuffer::new(fx.max_decals);
        let mut rng = ScriptedEntropy::new(vec![0.6, 0.5, 0.0]);

        let d = buf.spawn(Vec2::new(10.0, 20.0), 1_000, &fx, &mut rng).unwrap();
        assert_eq!(d.variant, 2);
        assert!((d.rotation - 180.0).abs() < 1e-3);
        assert!((d.scale - 0.85).abs() < 1e-6);
        assert_eq!(d.die_ms, 13_000);
        assert_eq!(buf.len(), 1);
    }

    #[test]
    fn test_spawn_skipped_without_assets() {
        let fx = FxConfig { impact_variants: 0, ..FxConfig::default() };
        let mut buf = DecalBuffer::new(fx.max_decals);
        let mut rng = ScriptedEntropy::constant(0.5);
        assert!(buf.spawn(Vec2::ZERO, 0, &fx, &mut rng).is_none());
        assert!(buf.is_empty());
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_alpha_fades_in_tail() {
        let d = Decal { die_ms: 12_000, ..decal(0) };
        assert_eq!(d.alpha(1_000, 2_500), 1.0);
        assert!((d.alpha(11_000, 2_500) - 0.4).abs() < 1e-6);
        assert_eq!(d.alpha(12_000, 2_500), 0.0);
    }
}
