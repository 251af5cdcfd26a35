use egui::{Context, Event, PointerButton, Pos2, Rect};

/// Phase of a pointer sample within a stroke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// One pointer sample in surface coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub phase: PointerPhase,
    pub pos: Pos2,
}

impl PointerSample {
    pub fn down(pos: Pos2) -> Self {
        Self { phase: PointerPhase::Down, pos }
    }

    pub fn moved(pos: Pos2) -> Self {
        Self { phase: PointerPhase::Move, pos }
    }

    pub fn up(pos: Pos2) -> Self {
        Self { phase: PointerPhase::Up, pos }
    }
}

/// Converts raw egui pointer events into [`PointerSample`]s for one canvas.
///
/// A press only starts a stroke inside the canvas rect. Once pressed, every
/// move is forwarded (also outside the rect) until the button is released
/// or the pointer leaves the window.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    canvas_rect: Rect,
    pressed: bool,
    last_pos: Option<Pos2>,
}

impl PointerTracker {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            canvas_rect,
            pressed: false,
            last_pos: None,
        }
    }

    /// Update the canvas rectangle (e.g. if the window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Screen position relative to the canvas' top-left corner
    fn to_surface(&self, pos: Pos2) -> Pos2 {
        (pos - self.canvas_rect.min).to_pos2()
    }

    /// Translate events in arrival order
    pub fn translate(&mut self, events: &[Event]) -> Vec<PointerSample> {
        let mut samples = Vec::new();

        for event in events {
            match event {
                Event::PointerMoved(pos) => {
                    self.last_pos = Some(*pos);
                    if self.pressed {
                        samples.push(PointerSample::moved(self.to_surface(*pos)));
                    }
                }
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed: true,
                    ..
                } => {
                    self.last_pos = Some(*pos);
                    if !self.pressed && self.canvas_rect.contains(*pos) {
                        self.pressed = true;
                        samples.push(PointerSample::down(self.to_surface(*pos)));
                    }
                }
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed: false,
                    ..
                } => {
                    self.last_pos = Some(*pos);
                    if self.pressed {
                        self.pressed = false;
                        samples.push(PointerSample::up(self.to_surface(*pos)));
                    }
                }
                Event::PointerGone => {
                    if self.pressed {
                        self.pressed = false;
                        let pos = self.last_pos.unwrap_or(self.canvas_rect.min);
                        samples.push(PointerSample::up(self.to_surface(pos)));
                    }
                    self.last_pos = None;
                }
                _ => {}
            }
        }

        samples
    }

    /// Process this frame's egui input
    pub fn process_input(&mut self, ctx: &Context) -> Vec<PointerSample> {
        ctx.input(|input| self.translate(&input.events))
    }
}
