//! Tracks in-flight tile animations and fires their completion signals.
//!
//! The UI loop pushes a request whenever the controller starts an
//! animation, then calls [`Animations::advance`] once per render tick.
//! Signals fire from the tick loop, never from a timer thread, so the
//! controller resumes in lockstep with what is on screen.

use std::time::{Duration, Instant};

use crate::game::{AnimationDone, Coord, TileId};

const SLIDE_DURATION: Duration = Duration::from_millis(110);
const SPAWN_DURATION: Duration = Duration::from_millis(150);
const MERGE_DURATION: Duration = Duration::from_millis(120);

/// What a tile is visually doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Slide { from: Coord, to: Coord },
    Spawn,
    Merge,
}

/// An animation start, handed over from the presenter seam.
#[derive(Debug)]
pub struct AnimationRequest {
    pub tile: TileId,
    pub kind: AnimationKind,
    pub done: AnimationDone,
}

struct Active {
    tile: TileId,
    kind: AnimationKind,
    since: Instant,
    duration: Duration,
    done: Option<AnimationDone>,
}

/// Animation driver advanced once per render tick.
#[derive(Default)]
pub struct Animations {
    active: Vec<Active>,
}

impl Animations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: AnimationRequest, now: Instant) {
        let duration = match request.kind {
            AnimationKind::Slide { .. } => SLIDE_DURATION,
            AnimationKind::Spawn => SPAWN_DURATION,
            AnimationKind::Merge => MERGE_DURATION,
        };
        self.active.push(Active {
            tile: request.tile,
            kind: request.kind,
            since: now,
            duration,
            done: Some(request.done),
        });
    }

    /// Fire the completion signal of every elapsed animation and drop it.
    pub fn advance(&mut self, now: Instant) {
        self.active.retain_mut(|anim| {
            if now.saturating_duration_since(anim.since) < anim.duration {
                return true;
            }
            if let Some(done) = anim.done.take() {
                done.finish();
            }
            false
        });
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Slide interpolation for a tile: endpoints plus eased progress.
    pub fn slide(&self, tile: TileId, now: Instant) -> Option<(Coord, Coord, f32)> {
        self.active.iter().find_map(|anim| match anim.kind {
            AnimationKind::Slide { from, to } if anim.tile == tile => {
                Some((from, to, ease_out(anim.progress(now))))
            }
            _ => None,
        })
    }

    /// Placement pop progress for a tile.
    pub fn spawning(&self, tile: TileId, now: Instant) -> Option<f32> {
        self.active.iter().find_map(|anim| match anim.kind {
            AnimationKind::Spawn if anim.tile == tile => Some(anim.progress(now)),
            _ => None,
        })
    }

    /// Merge flash progress for a tile.
    pub fn merging(&self, tile: TileId, now: Instant) -> Option<f32> {
        self.active.iter().find_map(|anim| match anim.kind {
            AnimationKind::Merge if anim.tile == tile => Some(anim.progress(now)),
            _ => None,
        })
    }
}

impl Active {
    fn progress(&self, now: Instant) -> f32 {
        let elapsed = now.saturating_duration_since(self.since).as_secs_f32();
        (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

/// Quadratic ease-out: fast start, soft landing.
fn ease_out(t: f32) -> f32 {
    t * (2.0 - t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::AnimationSignal;

    fn slide_request(id: u32) -> (AnimationRequest, AnimationSignal) {
        let (done, signal) = AnimationSignal::channel();
        let request = AnimationRequest {
            tile: TileId(id),
            kind: AnimationKind::Slide {
                from: Coord::new(0, 3),
                to: Coord::new(0, 0),
            },
            done,
        };
        (request, signal)
    }

    #[tokio::test]
    async fn test_signal_fires_once_the_duration_elapses() {
        let mut animations = Animations::new();
        let start = Instant::now();
        let (request, signal) = slide_request(1);
        animations.push(request, start);

        animations.advance(start + Duration::from_millis(50));
        assert!(!animations.is_idle(), "still mid-flight");

        animations.advance(start + Duration::from_millis(200));
        assert!(animations.is_idle());
        signal.wait().await;
    }

    #[test]
    fn test_slide_progress_interpolates() {
        let mut animations = Animations::new();
        let start = Instant::now();
        let (request, _signal) = slide_request(2);
        animations.push(request, start);

        let (from, to, early) = animations
            .slide(TileId(2), start + Duration::from_millis(10))
            .unwrap();
        assert_eq!(from, Coord::new(0, 3));
        assert_eq!(to, Coord::new(0, 0));
        let (_, _, late) = animations
            .slide(TileId(2), start + Duration::from_millis(100))
            .unwrap();
        assert!(early < late);
        assert!((0.0..=1.0).contains(&early));
        assert!((0.0..=1.0).contains(&late));

        // A different tile has no slide in flight
        assert!(animations.slide(TileId(3), start).is_none());
    }

    #[test]
    fn test_finished_animations_stop_reporting() {
        let mut animations = Animations::new();
        let start = Instant::now();
        let (request, _signal) = slide_request(4);
        animations.push(request, start);

        animations.advance(start + Duration::from_secs(1));
        assert!(animations.slide(TileId(4), start + Duration::from_secs(1)).is_none());
    }

    #[test]
    fn test_ease_out_is_monotonic_and_clamped() {
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(ease_out(1.0), 1.0);
        assert!(ease_out(0.25) < ease_out(0.5));
        assert!(ease_out(0.5) > 0.5, "ease-out front-loads motion");
    }
}
