use eframe::egui;

use crate::model::form_state::{parse_count, Age, FormAction, OPPONENT_SLOTS};
use crate::model::presets::PRESETS;
use crate::ui::app::{banner, card, loading_row, CoachApp};

pub fn draw_form_panel(ctx: &egui::Context, app: &mut CoachApp) {
    egui::SidePanel::left("game_state")
        .resizable(true)
        .default_width(440.0)
        .min_width(360.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(6.0);
                draw_screenshot(ui, app);
                draw_presets(ui, app);
                draw_situation(ui, app);
                draw_civilization(ui, app);
                draw_opponents(ui, app);
                draw_context(ui, app);
            });
        });
}

/* =========================
   Field helpers
   ========================= */

/// Drag and typed input stay inside `range`; a value set from elsewhere
/// (a parsed screenshot) is shown and sent as it is.
fn count_drag(value: &mut u32, range: std::ops::RangeInclusive<u32>) -> egui::DragValue<'_> {
    egui::DragValue::new(value)
        .speed(0.1)
        .range(range)
        .clamp_existing_to_range(false)
        .custom_parser(|text| Some(f64::from(parse_count(text))))
}

fn count_field(ui: &mut egui::Ui, label: &str, value: &mut u32, range: std::ops::RangeInclusive<u32>) {
    ui.label(label);
    ui.add(count_drag(value, range));
    ui.end_row();
}

fn text_field(ui: &mut egui::Ui, label: &str, value: &mut String, hint: &str) {
    ui.label(label);
    ui.add(
        egui::TextEdit::singleline(value)
            .hint_text(hint)
            .desired_width(f32::INFINITY),
    );
    ui.end_row();
}

/* =========================
   Sections
   ========================= */

fn draw_screenshot(ui: &mut egui::Ui, app: &mut CoachApp) {
    card(ui, "Parse Screenshot", |ui| {
        if let Some(texture) = &app.screenshot {
            ui.add(egui::Image::from_texture(texture).max_width(ui.available_width()));
        } else {
            ui.label("📷 Drop a screenshot on the window or choose a file.");
            ui.weak("The coach will read your board and fill in the form.");
        }

        ui.add_space(4.0);
        if ui
            .add_enabled(!app.session.parsing, egui::Button::new("Choose screenshot…"))
            .clicked()
        {
            app.pick_screenshot();
        }

        if app.session.parsing {
            loading_row(ui, "Analyzing screenshot...");
        } else if let Some(notes) = &app.session.parse_notes {
            ui.colored_label(egui::Color32::from_rgb(90, 160, 90), format!("✓ {notes}"));
        } else if let Some(error) = &app.session.parse_error {
            banner(ui, egui::Color32::from_rgb(150, 50, 50), error);
        }
    });
}

fn draw_presets(ui: &mut egui::Ui, app: &mut CoachApp) {
    card(ui, "Examples", |ui| {
        egui::ComboBox::from_label("Or load example")
            .selected_text("— select —")
            .show_ui(ui, |ui| {
                for preset in PRESETS.iter() {
                    if ui.selectable_label(false, preset.name).clicked() {
                        app.session.load_preset(preset);
                    }
                }
            });

        if ui.button("Reset form").clicked() {
            app.session.form.apply(FormAction::Reset);
        }
    });
}

fn draw_situation(ui: &mut egui::Ui, app: &mut CoachApp) {
    let form = &mut app.session.form;

    card(ui, "Situation", |ui| {
        ui.horizontal(|ui| {
            ui.label("Age");
            for age in Age::ALL {
                if ui.selectable_label(form.age == age, age.label()).clicked() {
                    form.apply(FormAction::SetAge(age));
                }
            }
        });

        egui::Grid::new("situation_grid").num_columns(2).show(ui, |ui| {
            count_field(ui, "Round", &mut form.round, 1..=99);
            count_field(ui, "Player Count", &mut form.player_count, 2..=4);
        });
    });
}

fn draw_civilization(ui: &mut egui::Ui, app: &mut CoachApp) {
    let form = &mut app.session.form;

    card(ui, "Your Civilization", |ui| {
        egui::Grid::new("civilization_grid").num_columns(2).show(ui, |ui| {
            count_field(ui, "Civil Actions", &mut form.civil_actions, 0..=99);
            count_field(ui, "Military Actions", &mut form.military_actions, 0..=99);
            count_field(ui, "Food / turn", &mut form.food_production, 0..=999);
            count_field(ui, "Ore / turn", &mut form.ore_production, 0..=999);
            count_field(ui, "Science / turn", &mut form.science_production, 0..=999);
            count_field(ui, "Culture / turn", &mut form.culture_production, 0..=999);
            count_field(ui, "Military Strength", &mut form.military_strength, 0..=999);
            count_field(ui, "Culture Points", &mut form.culture_points, 0..=999);

            text_field(ui, "Leader", &mut form.leader, "e.g. Shakespeare");
            text_field(ui, "Hand Cards", &mut form.hand_cards, "e.g. Drama, Knights");
            text_field(ui, "Technologies", &mut form.technologies, "e.g. Chivalry, Printing Press");
            text_field(ui, "Wonders Complete", &mut form.wonders_complete, "e.g. Pyramids");
            text_field(ui, "Wonders In Progress", &mut form.wonders_in_progress, "e.g. Hanging Gardens");
        });
    });
}

fn draw_opponents(ui: &mut egui::Ui, app: &mut CoachApp) {
    let status = app.session.military_status();
    let status_color = app.settings.status_color(status.level);
    let form = &mut app.session.form;

    card(ui, "Opponents", |ui| {
        egui::Grid::new("opponents_grid").num_columns(4).show(ui, |ui| {
            ui.label("");
            ui.label("Military");
            ui.label("Cult/turn");
            ui.label("Cult Pts");
            ui.end_row();

            for slot in 0..OPPONENT_SLOTS {
                let opponent = &mut form.opponents[slot];
                ui.label(format!("Opp {}", slot + 1));
                for value in [
                    &mut opponent.military_strength,
                    &mut opponent.culture_production,
                    &mut opponent.culture_points,
                ] {
                    ui.add(count_drag(value, 0..=999));
                }
                ui.end_row();
            }
        });

        ui.weak("Set an opponent's military to 0 to leave them out.");
        ui.add_space(4.0);
        banner(ui, status_color, &status.message);
    });
}

fn draw_context(ui: &mut egui::Ui, app: &mut CoachApp) {
    let form = &mut app.session.form;

    card(ui, "Context", |ui| {
        egui::Grid::new("context_grid").num_columns(2).show(ui, |ui| {
            text_field(ui, "Cards in Row", &mut form.card_row, "e.g. Knights, Tactics, Drama");
            text_field(ui, "Next Visible Event", &mut form.next_event, "e.g. Military Dominance");
        });
        ui.weak(format!("Cards are sent as {} cards.", form.age.label()));
    });
}
