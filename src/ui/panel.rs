use crate::config::TextureChoice;

/// Something the user did in the overlay this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    ExtensionChanged(f32),
    ExtensionReset,
    ExtensionResetAll,
    TextureSelected(String),
    TextureReset,
    GravityToggled,
}

/// Everything the overlay shows. Components write into it; `draw` only
/// reads it, apart from the live slider value.
pub struct PanelState {
    pub visible: bool,
    pub model_name: String,
    pub extension: f32,
    pub active_texture: Option<String>,
    pub gravity_enabled: bool,
    pub extension_range: (f32, f32),
    texture_choices: Vec<TextureChoice>,
}

impl PanelState {
    pub fn new(texture_choices: Vec<TextureChoice>, extension_range: (f32, f32)) -> Self {
        if texture_choices.is_empty() {
            log::warn!("No texture choices configured; texture selector disabled");
        }

        Self {
            visible: false,
            model_name: String::new(),
            extension: extension_range.0.max(0.0).min(extension_range.1),
            active_texture: None,
            gravity_enabled: false,
            extension_range,
            texture_choices,
        }
    }

    pub fn show(&mut self, model_name: &str, extension: f32, active_texture: Option<&str>) {
        self.visible = true;
        self.model_name = model_name.to_string();
        self.extension = extension;
        self.active_texture = active_texture.map(String::from);
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn texture_selector_enabled(&self) -> bool {
        !self.texture_choices.is_empty()
    }

    pub fn draw(&mut self, ui: &imgui::Ui) -> Vec<UiEvent> {
        let mut events = Vec::new();

        ui.window("Viewer")
            .position([10.0, 10.0], imgui::Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                let label = if self.gravity_enabled {
                    "Gravity: on"
                } else {
                    "Gravity: off"
                };
                if ui.button(label) {
                    events.push(UiEvent::GravityToggled);
                }
                ui.same_line();
                if ui.button("Reset all shapes") {
                    events.push(UiEvent::ExtensionResetAll);
                }
                ui.text_disabled("Right click a model to select it");
            });

        if !self.visible {
            return events;
        }

        ui.window("Selection")
            .position([10.0, 90.0], imgui::Condition::FirstUseEver)
            .always_auto_resize(true)
            .build(|| {
                ui.text(&self.model_name);
                ui.separator();

                let (min, max) = self.extension_range;
                let mut extension = self.extension;
                if ui
                    .slider_config("Extension", min, max)
                    .display_format("%.2f")
                    .build(&mut extension)
                {
                    self.extension = extension;
                    events.push(UiEvent::ExtensionChanged(extension));
                }
                ui.same_line();
                ui.text(format!("{:.2}", self.extension));
                if ui.button("Reset shape") {
                    events.push(UiEvent::ExtensionReset);
                }

                if !self.texture_selector_enabled() {
                    return;
                }

                ui.separator();
                ui.text("Texture");

                for (index, choice) in self.texture_choices.iter().enumerate() {
                    if index > 0 {
                        ui.same_line();
                    }

                    let active = self.active_texture.as_deref() == Some(choice.path.as_str());
                    // Popped when dropped at the end of the iteration.
                    let _highlight = active.then(|| {
                        ui.push_style_color(imgui::StyleColor::Button, [0.9, 0.6, 0.1, 1.0])
                    });

                    if ui.button(&choice.label) {
                        events.push(UiEvent::TextureSelected(choice.path.clone()));
                    }
                }

                if ui.button("Reset texture") {
                    events.push(UiEvent::TextureReset);
                }
            });

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn choices() -> Vec<TextureChoice> {
        vec![TextureChoice {
            label: "Wood".to_string(),
            path: "wood.png".to_string(),
        }]
    }

    #[test]
    fn show_and_hide_track_selection() {
        let mut panel = PanelState::new(choices(), (0.0, 2.0));
        assert!(!panel.visible);

        panel.show("Chair", 0.4, Some("wood.png"));
        assert!(panel.visible);
        assert_eq!(panel.model_name, "Chair");
        assert_eq!(panel.extension, 0.4);
        assert_eq!(panel.active_texture.as_deref(), Some("wood.png"));

        panel.hide();
        assert!(!panel.visible);
    }

    #[test]
    fn empty_choices_disable_texture_selector() {
        let panel = PanelState::new(Vec::new(), (0.0, 2.0));
        assert!(!panel.texture_selector_enabled());
        assert!(PanelState::new(choices(), (0.0, 2.0)).texture_selector_enabled());
    }
}
