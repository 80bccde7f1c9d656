use egui::{Pos2, Rect, TouchId, TouchPhase};

/// Where a pointer event came from, in client (screen) coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum PointerSource {
    /// A mouse-style event with a single position
    Mouse { client: Pos2 },
    /// A touch-style event listing the active touch points, oldest first
    Touch { touches: Vec<Pos2> },
}

impl PointerSource {
    pub fn mouse(x: f32, y: f32) -> Self {
        Self::Mouse {
            client: Pos2::new(x, y),
        }
    }

    /// The client position that drives drawing: the mouse position, or the
    /// first touch point. Further touch points are ignored.
    pub fn primary(&self) -> Option<Pos2> {
        match self {
            Self::Mouse { client } => Some(*client),
            Self::Touch { touches } => touches.first().copied(),
        }
    }
}

/// Convert a pointer event into surface-local coordinates.
///
/// The result is `client - surface.min` with no scaling: the surface's
/// backing resolution must match its displayed size. `None` when a touch
/// event carries no touch points.
pub fn map_to_surface(source: &PointerSource, surface_rect: Rect) -> Option<Pos2> {
    let client = source.primary()?;
    Some(Pos2::new(client.x - surface_rect.min.x, client.y - surface_rect.min.y))
}

/// Pointer events as the whiteboard consumes them
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { source: PointerSource },
    PointerMove { source: PointerSource },
    PointerUp,
    /// The pointer moved onto the surface
    PointerEnter { source: PointerSource },
    /// The pointer left the surface or the window
    PointerLeave,
}

/// Turns raw egui events into [`InputEvent`]s for one surface.
///
/// egui reports the primary finger both as touch events and as emulated
/// pointer events; when a frame contains touch events the pointer events of
/// that frame are dropped so a finger never draws twice.
///
/// A press only becomes [`InputEvent::PointerDown`] when it lands inside the
/// surface rect and the surface owns the pointer there, so popups, windows
/// and panel resize handles on top of the canvas never start a stroke.
#[derive(Debug)]
pub struct InputHandler {
    surface_rect: Rect,
    pointer_inside: bool,
    touches: Vec<(TouchId, Pos2)>,
}

impl InputHandler {
    pub fn new(surface_rect: Rect) -> Self {
        Self {
            surface_rect,
            pointer_inside: false,
            touches: Vec::new(),
        }
    }

    /// Update the surface rectangle (e.g. if the window is resized)
    pub fn set_surface_rect(&mut self, rect: Rect) {
        self.surface_rect = rect;
    }

    pub fn surface_rect(&self) -> Rect {
        self.surface_rect
    }

    /// Process this frame's raw input for the widget `canvas` shows the
    /// surface in
    pub fn process_input(&mut self, ctx: &egui::Context, canvas: &egui::Response) -> Vec<InputEvent> {
        let events = ctx.input(|i| i.events.clone());
        let hovered = canvas.hovered();
        self.process_events(&events, |pos| hovered && ctx.layer_id_at(pos) == Some(canvas.layer_id))
    }

    /// `owns_pointer` tells whether a press at that position is meant for the
    /// surface rather than something drawn over it
    pub fn process_events(&mut self, events: &[egui::Event], owns_pointer: impl Fn(Pos2) -> bool) -> Vec<InputEvent> {
        let has_touch = events.iter().any(|e| matches!(e, egui::Event::Touch { .. }));
        let mut out = Vec::new();

        for event in events {
            match event {
                egui::Event::Touch { id, phase, pos, .. } => {
                    self.touch(*id, *phase, *pos, &owns_pointer, &mut out);
                }
                _ if has_touch => {}
                egui::Event::PointerMoved(pos) => self.pointer_moved(*pos, &mut out),
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if *pressed {
                        if self.accepts_press(*pos, &owns_pointer) {
                            out.push(InputEvent::PointerDown {
                                source: PointerSource::Mouse { client: *pos },
                            });
                        }
                    } else {
                        out.push(InputEvent::PointerUp);
                    }
                }
                egui::Event::PointerGone => {
                    if std::mem::take(&mut self.pointer_inside) {
                        out.push(InputEvent::PointerLeave);
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn pointer_moved(&mut self, pos: Pos2, out: &mut Vec<InputEvent>) {
        let inside = self.surface_rect.contains(pos);
        let source = PointerSource::Mouse { client: pos };
        match (self.pointer_inside, inside) {
            (false, true) => {
                out.push(InputEvent::PointerEnter { source: source.clone() });
                out.push(InputEvent::PointerMove { source });
            }
            (true, true) => out.push(InputEvent::PointerMove { source }),
            (true, false) => out.push(InputEvent::PointerLeave),
            (false, false) => {}
        }
        self.pointer_inside = inside;
    }

    fn accepts_press(&self, pos: Pos2, owns_pointer: &impl Fn(Pos2) -> bool) -> bool {
        self.surface_rect.contains(pos) && owns_pointer(pos)
    }

    fn touch(
        &mut self,
        id: TouchId,
        phase: TouchPhase,
        pos: Pos2,
        owns_pointer: &impl Fn(Pos2) -> bool,
        out: &mut Vec<InputEvent>,
    ) {
        match phase {
            TouchPhase::Start => {
                let first = self.touches.is_empty();
                self.touches.push((id, pos));
                if first && self.accepts_press(pos, owns_pointer) {
                    out.push(InputEvent::PointerDown {
                        source: self.touch_source(),
                    });
                }
            }
            TouchPhase::Move => {
                if let Some(entry) = self.touches.iter_mut().find(|(t, _)| *t == id) {
                    entry.1 = pos;
                }
                out.push(InputEvent::PointerMove {
                    source: self.touch_source(),
                });
            }
            TouchPhase::End | TouchPhase::Cancel => {
                self.touches.retain(|(t, _)| *t != id);
                if self.touches.is_empty() {
                    out.push(InputEvent::PointerUp);
                }
            }
        }
    }

    fn touch_source(&self) -> PointerSource {
        PointerSource::Touch {
            touches: self.touches.iter().map(|(_, p)| *p).collect(),
        }
    }
}
