use pixcloud::InputEvent;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Pixels per wheel "line", matching the browser's `deltaY` scale.
pub const WHEEL_LINE_PX: f32 = 100.0;

/// Translates raw window events into point cloud input events.
///
/// winit reports button presses without a position, so the last cursor
/// position is tracked here.
#[derive(Debug, Default)]
pub struct InputTranslator {
    cursor: (f64, f64),
}

impl InputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn translate(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => Some(match state {
                ElementState::Pressed => InputEvent::PointerDown {
                    x: self.cursor.0,
                    y: self.cursor.1,
                },
                ElementState::Released => InputEvent::PointerUp,
            }),
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x, position.y);
                Some(InputEvent::PointerMove {
                    x: position.x,
                    y: position.y,
                })
            }
            WindowEvent::MouseWheel { delta, .. } => Some(InputEvent::Wheel {
                delta_y: wheel_delta_px(delta),
            }),
            WindowEvent::Resized(size) => Some(InputEvent::Resize {
                width: size.width,
                height: size.height,
            }),
            _ => None,
        }
    }
}

/// Browser convention: positive when scrolling down (camera moves away).
/// winit reports scrolling up as positive, hence the sign flip.
pub fn wheel_delta_px(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * WHEEL_LINE_PX,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn scrolling_down_zooms_out() {
        assert_eq!(wheel_delta_px(&MouseScrollDelta::LineDelta(0.0, -1.0)), 100.0);
        assert_eq!(wheel_delta_px(&MouseScrollDelta::LineDelta(0.0, 2.0)), -200.0);
        assert_eq!(
            wheel_delta_px(&MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -35.0))),
            35.0
        );
    }
}
