use cave_swarm::drone::Drone;
use cave_swarm::types::CellState;
use eframe::egui;
use eframe::App;

pub fn visualize(history: &Vec<Vec<Drone>>, map_width: usize, map_height: usize) {
    let app = VisualizeApp::new(history.clone(), map_width, map_height);
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Drone Swarm Cave Exploration",
        native_options,
        Box::new(|_cc| Box::new(app)),
    )
    .unwrap();
}

struct VisualizeApp {
    history: Vec<Vec<Drone>>,
    map_width: usize,
    map_height: usize,
    tick: usize,
    playing: bool,
    frame_counter: usize,
    frames_per_tick: usize,
}

impl VisualizeApp {
    pub fn new(history: Vec<Vec<Drone>>, map_width: usize, map_height: usize) -> Self {
        Self {
            history,
            map_width,
            map_height,
            tick: 0,
            playing: false, // User must hit Play
            frame_counter: 0,
            frames_per_tick: 4,
        }
    }
}

impl App for VisualizeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(format!("Tick: {}", self.tick));
            ui.horizontal(|ui| {
                if ui.button(if self.playing { "Pause" } else { "Play" }).clicked() {
                    self.playing = !self.playing;
                }
                ui.add(
                    egui::Slider::new(&mut self.tick, 0..=self.history.len().saturating_sub(1))
                        .text("Tick"),
                );
            });
            ui.add_space(10.0);

            if self.playing && self.tick < self.history.len().saturating_sub(1) {
                self.frame_counter += 1;
                if self.frame_counter >= self.frames_per_tick {
                    self.tick += 1;
                    self.frame_counter = 0;
                }
                ctx.request_repaint();
            } else {
                self.frame_counter = 0;
            }

            let n_maps = self.history[self.tick].len().max(1);
            // Fit all internal maps side by side in the available space.
            let gap = 16.0;
            let avail = ui.available_size();
            let cell_size = ((avail.x - gap * (n_maps as f32 - 1.0)) / (n_maps * self.map_width) as f32)
                .min((avail.y - 30.0) / self.map_height as f32)
                .max(1.0);
            let map_pixel_width = self.map_width as f32 * cell_size;
            let map_pixel_height = self.map_height as f32 * cell_size;
            let total_width = map_pixel_width * n_maps as f32 + gap * (n_maps as f32 - 1.0);

            let (_rect, _response) = ui.allocate_exact_size(
                egui::vec2(total_width, map_pixel_height + 30.0),
                egui::Sense::hover(),
            );

            let available_rect = ui.max_rect();
            let origin_x = available_rect.center().x - total_width / 2.0;
            let origin_y = available_rect.center().y - map_pixel_height / 2.0;

            for (i, drone) in self.history[self.tick].iter().enumerate() {
                let x = origin_x + i as f32 * (map_pixel_width + gap);
                let map_rect = egui::Rect::from_min_max(
                    egui::pos2(x, origin_y),
                    egui::pos2(x + map_pixel_width, origin_y + map_pixel_height),
                );
                let painter = ui.painter_at(map_rect);

                let map = drone.internal_map();
                for cy in 0..self.map_height {
                    for cx in 0..self.map_width {
                        let colour = match map.at(cx as i32, cy as i32) {
                            CellState::Unknown => egui::Color32::from_gray(40),
                            CellState::Free => egui::Color32::WHITE,
                            CellState::Occupied => egui::Color32::BLACK,
                            CellState::Frontier => egui::Color32::from_rgb(255, 170, 0),
                        };
                        let x0 = map_rect.left_top().x + cx as f32 * cell_size;
                        let y0 = map_rect.left_top().y + cy as f32 * cell_size;
                        painter.rect_filled(
                            egui::Rect::from_min_max(
                                egui::pos2(x0, y0),
                                egui::pos2(x0 + cell_size, y0 + cell_size),
                            ),
                            0.0,
                            colour,
                        );
                    }
                }

                // Drone marker at its continuous pose.
                let pose = drone.pose();
                let center = egui::pos2(
                    map_rect.left_top().x + pose.x as f32 * cell_size + cell_size / 2.0,
                    map_rect.left_top().y + pose.y as f32 * cell_size + cell_size / 2.0,
                );
                let colour = DRONE_COLOURS[i % DRONE_COLOURS.len()];
                painter.circle_filled(center, (cell_size * 0.8).max(3.0), colour);

                let label_pos = egui::pos2(map_rect.center().x, map_rect.top() - 12.0);
                painter.text(
                    label_pos,
                    egui::Align2::CENTER_CENTER,
                    drone.name(),
                    egui::FontId::proportional(14.0),
                    egui::Color32::DARK_GRAY,
                );
            }
        });
    }
}

const DRONE_COLOURS: [egui::Color32; 4] = [
    egui::Color32::from_rgb(0, 120, 255),
    egui::Color32::from_rgb(255, 80, 0),
    egui::Color32::from_rgb(0, 180, 90),
    egui::Color32::from_rgb(200, 0, 200),
];
