use std::time::Duration;

use crate::app::WhiteboardApp;

/// The drawing area. Sizes the surface to the panel, routes pointer input
/// and shows the surface texture.
pub fn central_panel(app: &mut WhiteboardApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::drag());
        let canvas_rect = response.rect;
        let now = ctx.input(|i| i.time);

        app.whiteboard.request_resize(
            canvas_rect.width().max(1.0) as u32,
            canvas_rect.height().max(1.0) as u32,
            now,
        );

        app.input.set_surface_rect(canvas_rect);
        for event in app.input.process_input(ctx, &response) {
            app.whiteboard.handle_input(&event, canvas_rect);
        }
        app.whiteboard.poll(now);

        if app.whiteboard.is_resize_pending() || app.whiteboard.is_restore_pending() {
            let wait = app.whiteboard.config().resize_debounce_secs;
            ctx.request_repaint_after(Duration::from_secs_f64(wait));
        }

        let cursor = app.whiteboard.eraser_cursor();
        if cursor.is_some() {
            ctx.set_cursor_icon(egui::CursorIcon::None);
        }

        app.renderer.sync(ctx, app.whiteboard.surface());
        app.renderer.paint(&painter, canvas_rect, cursor);
    });
}
