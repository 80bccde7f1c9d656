use egui::Slider;

use crate::app::WhiteboardApp;
use crate::components::ToolButton;
use crate::tools::ToolKind;

pub fn tools_panel(app: &mut WhiteboardApp, ctx: &egui::Context) {
    egui::TopBottomPanel::top("tools_panel").show(ctx, |ui| {
        ui.horizontal(|ui| {
            let active = app.whiteboard.tools().active();
            for tool in [ToolKind::Pen, ToolKind::Eraser] {
                if ToolButton::new(tool, active == tool).show(ui).clicked() {
                    log::info!("Tool selected from UI: {}", tool.name());
                    app.whiteboard.select_tool(tool);
                }
            }
            ui.separator();

            match app.whiteboard.tools().active() {
                ToolKind::Pen => pen_options(app, ui),
                ToolKind::Eraser => eraser_options(app, ui),
            }
            ui.separator();

            if ui.button("Clear All").clicked() {
                app.whiteboard.clear_active_sheet();
            }
        });
    });
}

fn pen_options(app: &mut WhiteboardApp, ui: &mut egui::Ui) {
    ui.label("Color:");
    let before = app.picker_color;
    egui::color_picker::color_edit_button_srgba(ui, &mut app.picker_color, egui::color_picker::Alpha::Opaque);
    if app.picker_color != before {
        let [r, g, b, _] = app.picker_color.to_srgba_unmultiplied();
        if let Err(e) = app.whiteboard.set_pen_color(&format!("#{r:02x}{g:02x}{b:02x}")) {
            log::warn!("{e}");
        }
    }

    let range = app.whiteboard.tools().limits().pen_range();
    let mut width = app.whiteboard.tools().pen_width();
    ui.label("Size:");
    if ui.add(Slider::new(&mut width, range)).changed() {
        app.whiteboard.set_pen_width(width);
    }
}

fn eraser_options(app: &mut WhiteboardApp, ui: &mut egui::Ui) {
    let range = app.whiteboard.tools().limits().eraser_range();
    let mut width = app.whiteboard.tools().eraser_width();
    ui.label("Eraser size:");
    if ui.add(Slider::new(&mut width, range)).changed() {
        app.whiteboard.set_eraser_width(width);
    }
}
