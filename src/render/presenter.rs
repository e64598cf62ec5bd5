//! Channel bridge from the controller task to the UI task.

use tokio::sync::mpsc;

use crate::game::{
    AnimationSignal, GameView, MergeEvent, Presenter, SlideMove, SpawnEvent, TileId,
};

use super::animation::{AnimationKind, AnimationRequest};

/// Everything the UI task hears from the controller.
#[derive(Debug)]
pub enum UiCmd {
    View(GameView),
    Animate(AnimationRequest),
    Defeat,
}

/// [`Presenter`] that forwards over an mpsc channel into the UI task.
///
/// Sends are infallible from the controller's point of view: when the UI
/// is gone the command is dropped, and dropping an animation request drops
/// its emitter, which resolves the pending signal. The controller unwinds
/// instead of hanging.
pub struct TuiPresenter {
    tx: mpsc::UnboundedSender<UiCmd>,
}

impl TuiPresenter {
    pub fn new(tx: mpsc::UnboundedSender<UiCmd>) -> Self {
        Self { tx }
    }

    fn animate(&mut self, tile: TileId, kind: AnimationKind) -> AnimationSignal {
        let (done, signal) = AnimationSignal::channel();
        let _ = self.tx.send(UiCmd::Animate(AnimationRequest { tile, kind, done }));
        signal
    }
}

impl Presenter for TuiPresenter {
    fn show_view(&mut self, view: GameView) {
        let _ = self.tx.send(UiCmd::View(view));
    }

    fn begin_slide(&mut self, slide: &SlideMove) -> AnimationSignal {
        self.animate(
            slide.tile,
            AnimationKind::Slide {
                from: slide.from,
                to: slide.to,
            },
        )
    }

    fn begin_merge(&mut self, merge: &MergeEvent) -> AnimationSignal {
        self.animate(merge.tile, AnimationKind::Merge)
    }

    fn begin_spawn(&mut self, spawn: &SpawnEvent) -> AnimationSignal {
        self.animate(spawn.tile, AnimationKind::Spawn)
    }

    fn announce_defeat(&mut self) {
        let _ = self.tx.send(UiCmd::Defeat);
    }
}
