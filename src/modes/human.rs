use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::game::{Direction, GameConfig, GameController, GameView, Presenter};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Animations, Renderer, TuiPresenter, UiCmd};

/// Messages the UI task sends to the controller task.
#[derive(Debug)]
enum ControllerMsg {
    Shift(Direction),
    Restart,
}

pub struct HumanMode {
    config: GameConfig,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    animations: Animations,
    view: GameView,
    defeated: bool,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            animations: Animations::new(),
            view: GameView::default(),
            defeated: false,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let (ui_tx, mut ui_rx) = mpsc::unbounded_channel();
        // Capacity 1 plus the ready gate: moves are never queued up
        let (move_tx, move_rx) = mpsc::channel(1);
        let ready = Arc::new(AtomicBool::new(true));
        let cancel = CancellationToken::new();

        let rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let controller = GameController::new(self.config.clone(), TuiPresenter::new(ui_tx), rng);
        let controller_task = tokio::spawn(drive_controller(
            controller,
            move_rx,
            Arc::clone(&ready),
            cancel.clone(),
        ));

        let mut event_stream = EventStream::new();

        // Render at 30 FPS (33ms per frame); animations advance here too
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &move_tx, &ready);
                    }
                }

                // Apply whatever the controller published
                Some(cmd) = ui_rx.recv() => {
                    match cmd {
                        UiCmd::View(view) => self.view = view,
                        UiCmd::Animate(request) => self.animations.push(request, Instant::now()),
                        UiCmd::Defeat => {
                            self.defeated = true;
                            self.metrics.on_game_over(self.view.highest_tile());
                        }
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    let now = Instant::now();
                    self.animations.advance(now);
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(
                            frame,
                            &self.view,
                            &self.metrics,
                            &self.animations,
                            self.defeated,
                            now,
                        );
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        cancel.cancel();
        drop(move_tx);
        // Dropping the UI channel and the pending animations resolves any
        // signals the controller is still waiting on, so it can unwind.
        drop(ui_rx);
        self.animations = Animations::new();
        controller_task.await.context("Controller task panicked")?;

        Ok(())
    }

    fn handle_event(
        &mut self,
        event: Event,
        moves: &mpsc::Sender<ControllerMsg>,
        ready: &Arc<AtomicBool>,
    ) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Move(direction) => {
                    // Keys pressed while a move resolves are dropped, not
                    // queued; the flag re-arms when the controller is done
                    if ready.load(Ordering::Acquire) && !self.defeated {
                        let _ = moves.try_send(ControllerMsg::Shift(direction));
                    }
                }
                KeyAction::Restart => {
                    if moves.try_send(ControllerMsg::Restart).is_ok() {
                        self.defeated = false;
                        self.metrics.on_game_start();
                    }
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

/// Owns the controller for the lifetime of the session and resolves moves
/// one at a time. The ready flag is lowered for the whole of a move, so
/// the UI task knows when input would be ignored.
async fn drive_controller<P: Presenter>(
    mut controller: GameController<P>,
    mut moves: mpsc::Receiver<ControllerMsg>,
    ready: Arc<AtomicBool>,
    cancel: CancellationToken,
) {
    loop {
        let msg = tokio::select! {
            _ = cancel.cancelled() => break,
            msg = moves.recv() => match msg {
                Some(msg) => msg,
                None => break,
            },
        };

        match msg {
            ControllerMsg::Shift(direction) => {
                ready.store(false, Ordering::Release);
                let outcome = controller.shift(direction).await;
                debug!(?direction, ?outcome, "input resolved");
                ready.store(true, Ordering::Release);
            }
            ControllerMsg::Restart => controller.restart(),
        }
    }
}
