//! egui overlays: the parameter panel and a small status HUD.

use pixcloud::params::{
    AUTO_ROTATE_SPEED_RANGE, CHANNEL_MULTIPLIER_RANGE, COLOR_INTENSITY_RANGE, DEPTH_SCALE_RANGE,
    HEIGHT_RANGE, HEIGHT_STEP, POINT_SIZE_RANGE, ROTATION_SPEED_RANGE, WIDTH_RANGE, WIDTH_STEP,
};
use pixcloud::{Resolution, VisualizationMode, VisualizationParams};

/// Read-only numbers shown in the HUD.
pub struct HudStats {
    pub points: usize,
    pub resolution: Resolution,
    pub source: String,
    pub video_live: bool,
    pub z_distance: f32,
}

pub fn draw_hud(ctx: &egui::Context, stats: &HudStats) {
    egui::Area::new(egui::Id::new("hud"))
        .anchor(egui::Align2::RIGHT_BOTTOM, [-12.0, -12.0])
        .interactable(false)
        .show(ctx, |ui| {
            let status = if stats.video_live { "live" } else { "waiting" };
            ui.label(format!("{} ({})", stats.source, status));
            ui.label(format!("{} points @ {}", stats.points, stats.resolution));
            ui.label(format!("camera z {:.0}", stats.z_distance));
        });
}

/// The live-bound parameter panel. Edits take effect on the next frame.
pub fn draw_parameter_panel(ctx: &egui::Context, params: &mut VisualizationParams) {
    egui::Window::new("Parameters")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            egui::CollapsingHeader::new("Resolution")
                .default_open(true)
                .show(ui, |ui| resolution_controls(ui, params));

            egui::CollapsingHeader::new("Controls")
                .default_open(true)
                .show(ui, |ui| {
                    ui.checkbox(&mut params.auto_rotate, "Auto Rotate");
                    ui.add(
                        egui::Slider::new(&mut params.auto_rotate_speed, AUTO_ROTATE_SPEED_RANGE)
                            .text("Auto Rotate Speed"),
                    );
                    ui.checkbox(&mut params.lock_rotation, "Lock Rotation");
                });

            ui.separator();

            ui.add(egui::Slider::new(&mut params.point_size, POINT_SIZE_RANGE).text("Point Size"));
            ui.add(egui::Slider::new(&mut params.depth_scale, DEPTH_SCALE_RANGE).text("Depth Scale"));
            ui.add(
                egui::Slider::new(&mut params.rotation_speed, ROTATION_SPEED_RANGE)
                    .text("Rotation Speed"),
            );
            ui.add(
                egui::Slider::new(&mut params.color_intensity, COLOR_INTENSITY_RANGE)
                    .text("Color Intensity"),
            );
            ui.add(egui::Slider::new(&mut params.red_multiplier, CHANNEL_MULTIPLIER_RANGE).text("Red"));
            ui.add(egui::Slider::new(&mut params.green_multiplier, CHANNEL_MULTIPLIER_RANGE).text("Green"));
            ui.add(egui::Slider::new(&mut params.blue_multiplier, CHANNEL_MULTIPLIER_RANGE).text("Blue"));

            egui::CollapsingHeader::new("View Mode")
                .default_open(true)
                .show(ui, |ui| {
                    egui::ComboBox::from_label("Mode")
                        .selected_text(params.visualization_mode.as_str())
                        .show_ui(ui, |ui| {
                            for mode in VisualizationMode::ALL {
                                ui.selectable_value(&mut params.visualization_mode, mode, mode.as_str());
                            }
                        });
                });
        });
}

/// Width and height sliders linked at 4:3.
fn resolution_controls(ui: &mut egui::Ui, params: &mut VisualizationParams) {
    let mut width = params.resolution.width;
    let width_changed = ui
        .add(
            egui::Slider::new(&mut width, WIDTH_RANGE)
                .step_by(WIDTH_STEP as f64)
                .text("Width"),
        )
        .changed();
    if width_changed {
        params.resolution = Resolution::from_width(width);
    }

    let mut height = params.resolution.height;
    let height_changed = ui
        .add(
            egui::Slider::new(&mut height, HEIGHT_RANGE)
                .step_by(HEIGHT_STEP as f64)
                .text("Height"),
        )
        .changed();
    if height_changed {
        params.resolution = Resolution::from_height(height);
    }
}
