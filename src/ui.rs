use crate::catalog::{Advance, Catalog};
use crate::filter::{Filters, SortKey};
use crate::loader::{self, ShardError, ShardLoader};
use crate::model::{Skin, Tradeup};
use eframe::egui;
use egui::{
    Color32, Context, FontFamily, FontId, Margin, RichText, Visuals, Stroke, Vec2
};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::debug;

pub fn set_custom_style(ctx: &Context) {
    // Dark armory theme
    let mut visuals = Visuals::dark();

    visuals.panel_fill = Color32::from_rgb(16, 18, 24);          // Deep slate panel
    visuals.window_fill = Color32::from_rgb(22, 25, 32);         // Window background
    visuals.extreme_bg_color = Color32::from_rgb(32, 36, 46);    // hover highlight
    visuals.faint_bg_color = Color32::from_rgb(27, 30, 39);      // subtle background

    // Widget colors with orange accents
    visuals.widgets.inactive.bg_fill = Color32::from_rgb(36, 40, 52);
    visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, Color32::from_rgb(60, 66, 84));

    visuals.widgets.hovered.bg_fill  = Color32::from_rgb(48, 54, 70);
    visuals.widgets.hovered.bg_stroke = Stroke::new(2.0, Color32::from_rgb(230, 140, 60));

    visuals.widgets.active.bg_fill   = Color32::from_rgb(58, 64, 82);
    visuals.widgets.active.bg_stroke = Stroke::new(2.0, Color32::from_rgb(255, 170, 80));

    visuals.selection.bg_fill = Color32::from_rgb(70, 60, 40);
    visuals.selection.stroke = Stroke::new(1.0, Color32::from_rgb(255, 190, 90));

    ctx.set_visuals(visuals);

    let mut style = (*ctx.style()).clone();

    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.window_margin = Margin::same(12);
    style.spacing.button_padding = egui::vec2(12.0, 8.0);
    style.spacing.indent = 16.0;

    style.text_styles.insert(
        egui::TextStyle::Body,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Heading,
        FontId::new(22.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Button,
        FontId::new(15.0, FontFamily::Proportional),
    );
    style.text_styles.insert(
        egui::TextStyle::Monospace,
        FontId::new(14.0, FontFamily::Monospace),
    );

    ctx.set_style(style);
}

/// Min/max text per filterable field; empty or unparsable text leaves the
/// endpoint unbounded.
#[derive(Default)]
struct FilterInputs {
    cost_min: String,
    cost_max: String,
    profit_min: String,
    profit_max: String,
    odds_min: String,
    odds_max: String,
    float_min: String,
    float_max: String,
}

fn parse_bound(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

impl FilterInputs {
    fn to_filters(&self) -> Filters {
        Filters {
            cost_min: parse_bound(&self.cost_min),
            cost_max: parse_bound(&self.cost_max),
            profit_min: parse_bound(&self.profit_min),
            profit_max: parse_bound(&self.profit_max),
            odds_min: parse_bound(&self.odds_min),
            odds_max: parse_bound(&self.odds_max),
            float_min: parse_bound(&self.float_min),
            float_max: parse_bound(&self.float_max),
        }
    }

    fn clear(&mut self) {
        *self = FilterInputs::default();
    }
}

pub struct TradeupApp {
    catalog: Catalog,
    fetch_rx: Option<Receiver<Result<Vec<Tradeup>, ShardError>>>,
    started: bool,
    initial_load_failed: bool,

    sort_key: SortKey,
    filter_inputs: FilterInputs,
}

impl TradeupApp {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            catalog: Catalog::new(ShardLoader::discover(data_dir)),
            fetch_rx: None,
            started: false,
            initial_load_failed: false,

            sort_key: SortKey::default(),
            filter_inputs: FilterInputs::default(),
        }
    }

    /// Single entry point for both the manual button and the automatic
    /// scroll trigger. While a fetch is in flight the catalog answers
    /// `Busy` and the call is dropped.
    fn trigger_load(&mut self) {
        match self.catalog.request_more() {
            Advance::Batch { start, count } => {
                debug!(start, count, "surfaced batch");
            }
            Advance::Fetch(path) => {
                let (tx, rx) = mpsc::channel();
                self.fetch_rx = Some(rx);
                thread::spawn(move || {
                    let _ = tx.send(loader::fetch_shard(&path));
                });
            }
            Advance::Exhausted | Advance::Busy => {}
        }
    }

    fn poll_fetch(&mut self) {
        let Some(rx) = &self.fetch_rx else { return };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err(ShardError::WorkerGone),
        };
        self.fetch_rx = None;

        let failed = result.is_err();
        self.catalog.complete_fetch(result);

        if failed && self.catalog.record_count() == 0 {
            self.initial_load_failed = true;
        } else if !failed {
            // Surface the first batch of the rebuilt view right away.
            self.trigger_load();
        }
    }

    fn apply_filters(&mut self) {
        self.catalog.set_filters(self.filter_inputs.to_filters());
        self.trigger_load();
    }

    fn clear_filters(&mut self) {
        self.filter_inputs.clear();
        self.apply_filters();
    }

    fn filter_row(ui: &mut egui::Ui, label: &str, min: &mut String, max: &mut String) {
        ui.label(RichText::new(label).strong());
        ui.horizontal(|ui| {
            ui.add(
                egui::TextEdit::singleline(min)
                    .hint_text("min")
                    .desired_width(70.0),
            );
            ui.add(
                egui::TextEdit::singleline(max)
                    .hint_text("max")
                    .desired_width(70.0),
            );
        });
        ui.add_space(6.0);
    }

    fn side_panel(&mut self, ctx: &Context) {
        egui::SidePanel::right("filters")
            .min_width(220.0)
            .max_width(300.0)
            .show(ctx, |ui| {
                ui.heading(RichText::new("Sort & Filters")
                    .color(Color32::from_rgb(255, 180, 90)));
                ui.separator();

                ui.label(RichText::new("Sort by").strong());
                egui::ComboBox::from_id_salt("sort_by")
                    .selected_text(self.sort_key.label())
                    .show_ui(ui, |ui| {
                        for key in SortKey::ALL {
                            if ui
                                .selectable_value(&mut self.sort_key, key, key.label())
                                .clicked()
                            {
                                self.catalog.set_sort_key(key);
                                self.trigger_load();
                            }
                        }
                    });

                ui.add_space(10.0);
                ui.separator();

                Self::filter_row(
                    ui,
                    "Cost ($)",
                    &mut self.filter_inputs.cost_min,
                    &mut self.filter_inputs.cost_max,
                );
                Self::filter_row(
                    ui,
                    "Avg profit ($)",
                    &mut self.filter_inputs.profit_min,
                    &mut self.filter_inputs.profit_max,
                );
                Self::filter_row(
                    ui,
                    "Odds (%)",
                    &mut self.filter_inputs.odds_min,
                    &mut self.filter_inputs.odds_max,
                );
                Self::filter_row(
                    ui,
                    "Avg input float",
                    &mut self.filter_inputs.float_min,
                    &mut self.filter_inputs.float_max,
                );

                ui.horizontal(|ui| {
                    if ui.button(RichText::new("Apply").strong()).clicked() {
                        self.apply_filters();
                    }
                    if ui.button("Clear").clicked() {
                        self.clear_filters();
                    }
                });
            });
    }

    fn skin_frame(ui: &mut egui::Ui, skin: &Skin, is_output: bool, tradeup_cost: Option<f64>) {
        let fill = if is_output {
            output_tint(skin.sell_price, tradeup_cost)
        } else {
            Color32::from_rgba_unmultiplied(255, 255, 255, 5)
        };

        egui::Frame::new()
            .fill(fill)
            .stroke(Stroke::new(1.0, Color32::from_rgb(55, 60, 75)))
            .inner_margin(Margin::same(6))
            .show(ui, |ui| {
                ui.set_width(150.0);
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(&skin.name)
                            .color(Color32::from_rgb(220, 220, 230))
                            .strong(),
                    )
                    .on_hover_text(&skin.name);
                    ui.label(format!(
                        "Coll: {}",
                        skin.collection_name.as_deref().unwrap_or("N/A")
                    ));
                    ui.label(format!("Float: {}", fmt_float(skin.float)));
                    let price = if is_output { skin.sell_price } else { skin.buy_price };
                    let price_label = if is_output && skin.chance.is_some() {
                        "Sell Price"
                    } else {
                        "Price"
                    };
                    ui.label(format!("{}: {}", price_label, fmt_money(price)));
                    if is_output {
                        if let Some(chance) = skin.chance {
                            ui.label(format!("Chance: {:.2}%", chance * 100.0));
                        }
                    }
                });
            });
    }

    fn skins_section(
        ui: &mut egui::Ui,
        title: &str,
        skins: &[Skin],
        is_output: bool,
        tradeup_cost: Option<f64>,
    ) {
        ui.vertical(|ui| {
            ui.label(
                RichText::new(title)
                    .color(Color32::from_rgb(200, 200, 215))
                    .strong(),
            );
            if skins.is_empty() {
                ui.label("No skin data available.");
                return;
            }
            ui.horizontal_wrapped(|ui| {
                for skin in skins {
                    // Inputs expand into one frame per copy.
                    let copies = if is_output { 1 } else { skin.copies() };
                    for _ in 0..copies {
                        Self::skin_frame(ui, skin, is_output, tradeup_cost);
                    }
                }
            });
        });
    }

    fn tradeup_card(ui: &mut egui::Ui, tradeup: &Tradeup, index: usize) {
        egui::Frame::new()
            .fill(Color32::from_rgb(27, 30, 39))
            .stroke(Stroke::new(1.0, Color32::from_rgb(60, 66, 84)))
            .inner_margin(Margin::same(10))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(
                        RichText::new(format!("Tradeup #{}", index + 1))
                            .color(Color32::from_rgb(255, 180, 90)),
                    );
                    ui.separator();
                    ui.label(format!("Odds: {} %", fmt_num(tradeup.odds_to_profit)));
                    ui.label(format!("Cost: {}", fmt_money(tradeup.tradeup_cost)));
                    ui.label(format!("Profit %: {} %", fmt_num(tradeup.profitability)));
                    ui.label(format!("Avg Profit: {}", fmt_money(tradeup.mean_profit)));
                });
                ui.separator();
                Self::skins_section(ui, "Inputs", &tradeup.input_skins, false, None);
                ui.add_space(6.0);
                Self::skins_section(
                    ui,
                    "Outputs",
                    &tradeup.output_skins,
                    true,
                    tradeup.tradeup_cost,
                );
            });
        ui.add_space(8.0);
    }
}

impl eframe::App for TradeupApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        if !self.started {
            self.started = true;
            self.trigger_load();
        }
        self.poll_fetch();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading(RichText::new("Tradeup Explorer")
                    .color(Color32::from_rgb(255, 180, 90))
                    .strong()
                    .size(24.0)
                );
                ui.separator();
                ui.label(format!(
                    "{} of {} matching ({} loaded)",
                    self.catalog.visible().len(),
                    self.catalog.view_len(),
                    self.catalog.record_count()
                ));
                if self.catalog.is_loading() {
                    ui.spinner();
                }
            });
            ui.add_space(4.0);
        });

        self.side_panel(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.initial_load_failed && self.catalog.record_count() == 0 {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("Failed to load initial tradeup data.")
                            .size(20.0)
                            .color(Color32::from_rgb(255, 120, 120)),
                    );
                });
                return;
            }

            if self.catalog.view_len() == 0 && self.catalog.record_count() > 0 {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        RichText::new("No tradeups match the current filters.")
                            .size(20.0)
                            .color(Color32::from_rgb(180, 180, 195)),
                    );
                });
                return;
            }

            let mut wants_more = false;
            egui::ScrollArea::vertical().show(ui, |ui| {
                for (i, tradeup) in self.catalog.visible().iter().enumerate() {
                    Self::tradeup_card(ui, tradeup, i);
                }

                if !self.catalog.exhausted() {
                    let button = ui.add_sized(
                        Vec2::new(140.0, 32.0),
                        egui::Button::new(RichText::new("Load more").strong()),
                    );
                    // Scrolling the button into view keeps loading without a
                    // click, like the page's intersection observer did.
                    if button.clicked() || ui.is_rect_visible(button.rect) {
                        wants_more = true;
                    }
                }
            });
            if wants_more {
                self.trigger_load();
            }
        });

        ctx.request_repaint();
    }
}

fn output_tint(sell_price: Option<f64>, tradeup_cost: Option<f64>) -> Color32 {
    match (sell_price, tradeup_cost) {
        (Some(sell), Some(cost)) if cost != 0.0 => {
            if sell > cost {
                Color32::from_rgba_unmultiplied(144, 238, 144, 50)
            } else if sell < cost {
                Color32::from_rgba_unmultiplied(250, 128, 114, 50)
            } else {
                Color32::from_rgba_unmultiplied(255, 255, 255, 12)
            }
        }
        _ => Color32::from_rgba_unmultiplied(255, 255, 255, 5),
    }
}

fn fmt_money(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("${v:.2}"),
        None => "N/A".to_string(),
    }
}

fn fmt_num(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "N/A".to_string(),
    }
}

fn fmt_float(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.8}"),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_parse_empty_and_garbage_as_unbounded() {
        assert_eq!(parse_bound(""), None);
        assert_eq!(parse_bound("  "), None);
        assert_eq!(parse_bound("abc"), None);
        assert_eq!(parse_bound("2.5"), Some(2.5));
        assert_eq!(parse_bound(" -3 "), Some(-3.0));
    }

    #[test]
    fn formatting_falls_back_to_placeholder() {
        assert_eq!(fmt_money(Some(3.456)), "$3.46");
        assert_eq!(fmt_money(None), "N/A");
        assert_eq!(fmt_num(Some(41.237)), "41.24");
        assert_eq!(fmt_float(Some(0.15)), "0.15000000");
        assert_eq!(fmt_float(None), "N/A");
    }

    #[test]
    fn output_tint_compares_sell_price_against_cost() {
        let profit = output_tint(Some(20.0), Some(10.0));
        let loss = output_tint(Some(5.0), Some(10.0));
        let unknown = output_tint(None, Some(10.0));
        assert_ne!(profit, loss);
        assert_ne!(profit, unknown);
        assert_ne!(loss, unknown);
    }
}
