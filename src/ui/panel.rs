// src/ui/panel.rs
//! Parameter panel
//!
//! One "Parameters" window with a folder per concern. Every numeric widget
//! passes its result through the field's [`ParamRange`], so values outside
//! the declared domain never reach the scene.

use crate::gfx::resources::MaterialManager;
use crate::showcase::params::{
    apply_color, ParamRange, Parameters, CAMERA_STEP, COLOR_COMPONENT, METALNESS, ROUGHNESS,
    TARGET_AXIS,
};
use crate::showcase::SceneBindings;

/// Draws the parameter window
///
/// Material folders are only shown once the scene has been populated.
pub fn parameters_panel(
    ui: &imgui::Ui,
    parameters: &mut Parameters,
    materials: &mut MaterialManager,
    bindings: Option<&SceneBindings>,
) {
    let display_size = ui.io().display_size;
    // Guard against invalid display size that could cause crashes
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return;
    }
    let panel_width = (display_size[0] * 0.3).clamp(320.0, 420.0);

    ui.window("Parameters")
        .size([panel_width, 0.0], imgui::Condition::FirstUseEver)
        .position(
            [display_size[0] - panel_width - 20.0, 20.0],
            imgui::Condition::FirstUseEver,
        )
        .always_auto_resize(true)
        .collapsible(true)
        .build(|| match bindings {
            Some(bindings) => {
                metallic_forms(ui, materials, bindings);
                colored_forms(ui, parameters, materials, bindings);
                camera_controls(ui, parameters);
            }
            None => {
                ui.text_disabled("Waiting for font...");
                camera_controls(ui, parameters);
            }
        });
}

fn metallic_forms(ui: &imgui::Ui, materials: &mut MaterialManager, bindings: &SceneBindings) {
    if !ui.collapsing_header("Metallic Forms", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }
    let Some(text) = materials.get_material_mut(bindings.text_material) else {
        return;
    };

    snapped_slider(ui, "metalness", METALNESS, "%.4f", &mut text.metallic);
    snapped_slider(ui, "roughness", ROUGHNESS, "%.4f", &mut text.roughness);
}

fn colored_forms(
    ui: &imgui::Ui,
    parameters: &mut Parameters,
    materials: &mut MaterialManager,
    bindings: &SceneBindings,
) {
    if !ui.collapsing_header("Colored Forms", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }

    if let Some(colored) = materials.get_material_mut(bindings.colored_material) {
        ui.checkbox("wireframe", &mut colored.wireframe);
    }

    let Some(_colors) = ui.tree_node("Colors") else {
        return;
    };

    let color = &mut parameters.color;
    let mut changed = false;
    changed |= component_slider(ui, "red", &mut color.red);
    changed |= component_slider(ui, "green", &mut color.green);
    changed |= component_slider(ui, "blue", &mut color.blue);

    if changed {
        log::debug!("Colored forms set to {}", color.css());
        if let Err(err) = apply_color(materials, bindings.colored_material, color) {
            log::warn!("Ignoring color edit: {}", err);
        }
    }
}

fn camera_controls(ui: &imgui::Ui, parameters: &mut Parameters) {
    if !ui.collapsing_header("Camera", imgui::TreeNodeFlags::DEFAULT_OPEN) {
        return;
    }
    let camera = &mut parameters.camera;

    ui.checkbox("moving", &mut camera.moving);
    snapped_slider(ui, "x", TARGET_AXIS, "%.2f", &mut camera.target.x);
    snapped_slider(ui, "y", TARGET_AXIS, "%.2f", &mut camera.target.y);
    snapped_slider(ui, "z", TARGET_AXIS, "%.2f", &mut camera.target.z);
    snapped_slider(ui, "speed", CAMERA_STEP, "%.3f", &mut camera.step);
}

/// Float slider whose result is clamped and snapped to `range`
fn snapped_slider(
    ui: &imgui::Ui,
    label: &str,
    range: ParamRange,
    format: &str,
    value: &mut f32,
) -> bool {
    let mut edited = *value;
    let changed = ui
        .slider_config(label, range.min, range.max)
        .display_format(format)
        .build(&mut edited);
    if changed {
        *value = range.apply(edited);
    }
    changed
}

/// Integer slider over one 0..=255 color component
fn component_slider(ui: &imgui::Ui, label: &str, component: &mut u8) -> bool {
    let mut edited = i32::from(*component);
    if !ui.slider(label, 0, 255, &mut edited) {
        return false;
    }
    let snapped = COLOR_COMPONENT.apply(edited as f32) as u8;
    let changed = snapped != *component;
    *component = snapped;
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_domain_covers_byte_range() {
        assert_eq!(COLOR_COMPONENT.apply(-3.0) as u8, 0);
        assert_eq!(COLOR_COMPONENT.apply(255.0) as u8, 255);
    }
}
