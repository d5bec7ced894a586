/// timestep.rs
/// Frame and round-clock timing constants
///
/// Two clocks run side by side:
/// - Frame tick (1000 / fps ms): one resolve + learning update per frame
/// - Round second (1000 ms): the round timer, independent of frame rate
///
/// A slow host therefore plays fewer ticks per round second, never a
/// longer round.

/// Round timer granularity in milliseconds.
pub const ROUND_SECOND_MS: u64 = 1000;

/// Reference frame rate.
pub const DEFAULT_FPS: u32 = 90;

/// Frame duration at the reference rate (11 ms).
pub const DEFAULT_FRAME_MS: u64 = ROUND_SECOND_MS / DEFAULT_FPS as u64;

// Compile-time validation
const _: () = assert!(DEFAULT_FRAME_MS > 0);

/// Whole milliseconds per frame at `fps` (at least 1).
pub fn frame_ms(fps: u32) -> u64 {
    (ROUND_SECOND_MS / fps.max(1) as u64).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestep_consistency() {
        assert_eq!(DEFAULT_FRAME_MS, 11);
        assert_eq!(frame_ms(DEFAULT_FPS), DEFAULT_FRAME_MS);
        assert_eq!(frame_ms(0), 1000);
        assert_eq!(frame_ms(5000), 1);
    }
}
