/// Color representation for dial elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const RED: Color = Color::new(0xff, 0x00, 0x00);
    pub const GREEN: Color = Color::new(0x00, 0x80, 0x00);
    pub const BLUE: Color = Color::new(0x00, 0x00, 0xff);
    pub const YELLOW: Color = Color::new(0xff, 0xff, 0x00);
    pub const ORANGE: Color = Color::new(0xff, 0xa5, 0x00);
    pub const GRAY: Color = Color::new(0x80, 0x80, 0x80);
    pub const PANEL: Color = Color::new(0xd9, 0xd9, 0xd9);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Colors used by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub foreground: Color,
    pub elapsed_arc: Color,
    pub warning: Color,
    pub alert: Color,
    pub battery_arc: Color,
    pub mission_arc: Color,
    pub pointer: Color,
    pub sunrise: Color,
    pub sunset: Color,
    pub waypoint_fill: Color,
    pub waypoint_outline: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::BLACK,
            foreground: Color::WHITE,
            elapsed_arc: Color::GREEN,
            warning: Color::ORANGE,
            alert: Color::RED,
            battery_arc: Color::BLUE,
            mission_arc: Color::RED,
            pointer: Color::RED,
            sunrise: Color::YELLOW,
            sunset: Color::ORANGE,
            waypoint_fill: Color::YELLOW,
            waypoint_outline: Color::BLACK,
        }
    }
}
