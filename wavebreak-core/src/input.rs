/// One tick's worth of player input, sampled by the presentation layer from
/// its keys-pressed map and pointer position. Aim coordinates are in arena
/// space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    pub aim_x: f32,
    pub aim_y: f32,
}

impl FrameInput {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn aimed_at(aim_x: f32, aim_y: f32) -> Self {
        Self {
            aim_x,
            aim_y,
            ..Self::default()
        }
    }

    pub fn firing_at(aim_x: f32, aim_y: f32) -> Self {
        Self {
            fire: true,
            aim_x,
            aim_y,
            ..Self::default()
        }
    }
}
