use crate::whiteboard::Whiteboard;

/// Sidebar listing the notebooks, and the sheets of the active one
pub fn notebooks_panel(whiteboard: &mut Whiteboard, ctx: &egui::Context) {
    egui::SidePanel::left("notebooks_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            // clicks are collected first; the document is borrowed while listing
            let mut switch_notebook = None;
            let mut switch_sheet = None;

            ui.horizontal(|ui| {
                ui.heading("Notebooks");
                if ui.small_button("+ New").clicked() {
                    whiteboard.create_notebook();
                }
            });

            let document = whiteboard.document();
            for notebook in document.notebooks() {
                let selected = notebook.id == document.active_notebook_id();
                if ui.selectable_label(selected, &notebook.name).clicked() && !selected {
                    switch_notebook = Some(notebook.id.clone());
                }
            }

            ui.separator();
            ui.heading("Sheets");
            if let Some(notebook) = document.active_notebook() {
                for sheet in &notebook.sheets {
                    let selected = sheet.id == document.active_sheet_id();
                    if ui.selectable_label(selected, &sheet.name).clicked() && !selected {
                        switch_sheet = Some(sheet.id.clone());
                    }
                }
            }

            let add_sheet = ui.small_button("+ New Sheet").clicked();

            let result = if let Some(id) = switch_notebook {
                whiteboard.switch_notebook(&id)
            } else if let Some(id) = switch_sheet {
                whiteboard.switch_sheet(&id)
            } else if add_sheet {
                whiteboard.create_sheet().map(|_| ())
            } else {
                Ok(())
            };
            if let Err(e) = result {
                log::warn!("{e}");
            }
        });
}
