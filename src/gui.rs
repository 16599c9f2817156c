mod button;
pub(crate) mod editor;
mod knob;
mod palette;

pub(crate) use editor::create_gui;
