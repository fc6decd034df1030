use std::time::{Duration, Instant};

use crate::viewer::ViewerState;

/// One frame of viewer logic: overlay input first, then everything that
/// animates, so the renderer sees this frame's edits.
pub fn update(state: &mut ViewerState, ui: &imgui::Ui, delta: Duration) -> anyhow::Result<()> {
    let now = Instant::now();

    for event in state.panel.draw(ui) {
        state.handle_ui_event(event, now);
    }

    state.update(delta, now);

    Ok(())
}
