use eframe::egui;

use crate::engine::advice_parser::{parse_advice, AdviceBlock, Span};
use crate::model::session::AdviceAction;
use crate::ui::app::{banner, card, loading_row, CoachApp};

pub fn draw_coaching_panel(ctx: &egui::Context, app: &mut CoachApp) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_space(6.0);

        // ---------- Suggest ----------
        card(ui, "What should I do this turn?", |ui| {
            let thinking =
                app.session.loading && app.session.last_action == Some(AdviceAction::Suggest);
            let label = if thinking { "Thinking..." } else { "Suggest Top 3 Moves" };

            if ui
                .add_enabled(!app.session.loading, egui::Button::new(label))
                .clicked()
            {
                app.suggest_moves();
            }
        });

        // ---------- Evaluate ----------
        card(ui, "Evaluate a specific move", |ui| {
            let response = ui.add(
                egui::TextEdit::multiline(&mut app.session.proposed_move)
                    .hint_text("Describe the move you are considering, e.g. \"Draft Code of Laws from the card row\"")
                    .desired_rows(3)
                    .desired_width(f32::INFINITY),
            );

            // Ctrl+Enter submits
            let submit_keys =
                response.has_focus() && ui.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::Enter));

            let thinking =
                app.session.loading && app.session.last_action == Some(AdviceAction::Evaluate);
            let label = if thinking { "Thinking..." } else { "Evaluate This Move" };

            let clicked = ui
                .add_enabled(app.session.can_evaluate(), egui::Button::new(label))
                .clicked();

            if clicked || submit_keys {
                app.evaluate_move();
            }
        });

        // ---------- Response ----------
        card(ui, "Coach Response", |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if app.session.loading {
                        loading_row(ui, "Consulting strategy knowledge base...");
                    } else if let Some(error) = &app.session.advice_error {
                        banner(ui, egui::Color32::from_rgb(150, 50, 50), &format!("Error: {error}"));
                    } else if app.session.advice.is_empty() {
                        ui.weak("Enter your game state and click a button above to get coaching advice.");
                    } else {
                        render_advice(ui, &app.session.advice);
                    }
                });
        });
    });
}

/* =========================
   Advice rendering
   ========================= */

fn render_advice(ui: &mut egui::Ui, advice: &str) {
    for block in parse_advice(advice) {
        match block {
            AdviceBlock::Heading { level, spans } => {
                let size = match level {
                    1 => 22.0,
                    2 => 19.0,
                    _ => 16.0,
                };
                ui.add_space(6.0);
                spans_line(ui, None, &spans, Some(size));
            }
            AdviceBlock::Bullet(spans) => spans_line(ui, Some("  • ".into()), &spans, None),
            AdviceBlock::Numbered { number, spans } => {
                spans_line(ui, Some(format!("  {number}. ")), &spans, None)
            }
            AdviceBlock::Paragraph(spans) => spans_line(ui, None, &spans, None),
            AdviceBlock::Rule => {
                ui.separator();
            }
        }
    }
}

fn spans_line(ui: &mut egui::Ui, prefix: Option<String>, spans: &[Span], heading_size: Option<f32>) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;

        if let Some(prefix) = prefix {
            ui.label(prefix);
        }

        for span in spans {
            let mut text = egui::RichText::new(&span.text);
            if let Some(size) = heading_size {
                text = text.size(size).strong();
            } else if span.strong {
                text = text.strong();
            }
            ui.label(text);
        }
    });
}
