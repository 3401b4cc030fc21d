//! Override controls drawn below the clock face.
//!
//! The panel is a small immediate hit-test widget set: two single-line
//! entries, four buttons and a status line. It never touches the clock
//! directly; clicks and key presses turn into [`ClockCommand`]s which the
//! host applies and then reports back with [`ControlPanel::acknowledge`].

use crate::color::Color;
use crate::command::ClockCommand;
use crate::error::OverrideError;
use crate::geometry::Point;
use crate::scene::{DrawCommand, Scene};
use crate::text::points;

/// Longest text an entry accepts.
pub const ENTRY_MAX_CHARS: usize = 16;

const TEXT: Color = Color::BLACK;
const ENTRY_FILL: Color = Color::WHITE;
const BUTTON_FILL: Color = Color::new(0xee, 0xee, 0xee);
const FOCUS: Color = Color::BLUE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Time,
    Elapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OverrideTime,
    LiveTime,
    OverrideElapsed,
    StartMission,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::OverrideTime => "Override Time",
            Action::LiveTime => "Live Time",
            Action::OverrideElapsed => "Override Elapsed Time",
            Action::StartMission => "Start Mission",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Entry(Field),
    Button(Action),
}

/// Axis-aligned rectangle in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

const TITLE_AT: Point = Point::new(135.0, 632.0);
const TIME_LABEL_AT: Point = Point::new(135.0, 662.0);
const ELAPSED_LABEL_AT: Point = Point::new(135.0, 702.0);
const STATUS_AT: Point = Point::new(400.0, 780.0);

const TARGETS: [(Target, Bounds); 6] = [
    (Target::Entry(Field::Time), Bounds::new(250.0, 650.0, 150.0, 24.0)),
    (Target::Button(Action::OverrideTime), Bounds::new(410.0, 650.0, 150.0, 24.0)),
    (Target::Button(Action::LiveTime), Bounds::new(570.0, 650.0, 110.0, 24.0)),
    (Target::Entry(Field::Elapsed), Bounds::new(250.0, 690.0, 150.0, 24.0)),
    (Target::Button(Action::OverrideElapsed), Bounds::new(410.0, 690.0, 210.0, 24.0)),
    (Target::Button(Action::StartMission), Bounds::new(330.0, 730.0, 140.0, 30.0)),
];

/// Last message shown on the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlPanel {
    focus: Option<Field>,
    time_entry: String,
    elapsed_entry: String,
    status: Option<Status>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit_test(&self, at: Point) -> Option<Target> {
        TARGETS
            .iter()
            .find(|(_, bounds)| bounds.contains(at))
            .map(|(target, _)| *target)
    }

    /// Handle a click in window coordinates. Entries take focus; buttons
    /// produce their command. Anywhere else drops focus.
    pub fn click(&mut self, at: Point) -> Option<ClockCommand> {
        match self.hit_test(at) {
            Some(Target::Entry(field)) => {
                self.focus = Some(field);
                None
            }
            Some(Target::Button(action)) => Some(self.command_for(action)),
            None => {
                self.blur();
                None
            }
        }
    }

    pub fn focus(&self) -> Option<Field> {
        self.focus
    }

    pub fn entry(&self, field: Field) -> &str {
        match field {
            Field::Time => &self.time_entry,
            Field::Elapsed => &self.elapsed_entry,
        }
    }

    /// Append typed text to the focused entry. Control characters are
    /// dropped and entries stop growing at [`ENTRY_MAX_CHARS`].
    pub fn type_text(&mut self, text: &str) {
        let Some(entry) = self.focused_entry() else {
            return;
        };
        for c in text.chars().filter(|c| !c.is_control()) {
            if entry.chars().count() >= ENTRY_MAX_CHARS {
                break;
            }
            entry.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(entry) = self.focused_entry() {
            entry.pop();
        }
    }

    /// Enter: submit the focused entry.
    pub fn submit(&mut self) -> Option<ClockCommand> {
        match self.focus? {
            Field::Time => Some(self.command_for(Action::OverrideTime)),
            Field::Elapsed => Some(self.command_for(Action::OverrideElapsed)),
        }
    }

    /// Tab: time entry, elapsed entry, and back.
    pub fn cycle_focus(&mut self) {
        self.focus = Some(match self.focus {
            Some(Field::Time) => Field::Elapsed,
            Some(Field::Elapsed) | None => Field::Time,
        });
    }

    pub fn blur(&mut self) {
        self.focus = None;
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn report(&mut self, status: Status) {
        self.status = Some(status);
    }

    /// Show the outcome of an applied command on the status line.
    /// `outcome` carries whether the command changed anything.
    pub fn acknowledge(&mut self, command: &ClockCommand, outcome: &Result<bool, OverrideError>) {
        let info = |text: &str| Status::Info(text.to_string());
        let status = match (command, outcome) {
            (ClockCommand::Click { .. }, _) => return,
            (_, Err(e)) => Status::Error(e.to_string()),
            (ClockCommand::Start, Ok(true)) => info("Mission started."),
            (ClockCommand::Start, Ok(false)) => info("Mission already started."),
            (ClockCommand::OverrideTime(input), Ok(_)) => {
                Status::Info(format!("Time overridden to {}.", input.trim()))
            }
            (ClockCommand::ClearTimeOverride, Ok(true)) => info("Showing live time."),
            (ClockCommand::ClearTimeOverride, Ok(false)) => info("Already showing live time."),
            (ClockCommand::OverrideElapsed(input), Ok(_)) => {
                Status::Info(format!("Elapsed time set to {} minutes.", input.trim()))
            }
        };
        self.report(status);
    }

    fn focused_entry(&mut self) -> Option<&mut String> {
        match self.focus? {
            Field::Time => Some(&mut self.time_entry),
            Field::Elapsed => Some(&mut self.elapsed_entry),
        }
    }

    fn command_for(&self, action: Action) -> ClockCommand {
        match action {
            Action::OverrideTime => ClockCommand::OverrideTime(self.time_entry.clone()),
            Action::LiveTime => ClockCommand::ClearTimeOverride,
            Action::OverrideElapsed => ClockCommand::OverrideElapsed(self.elapsed_entry.clone()),
            Action::StartMission => ClockCommand::Start,
        }
    }

    pub fn scene(&self) -> Scene {
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Text {
            position: TITLE_AT,
            text: "Override".to_string(),
            font_size: points(14.0),
            color: TEXT,
        });
        for (position, text) in [
            (TIME_LABEL_AT, "Override Current Time (HH:MM):"),
            (ELAPSED_LABEL_AT, "Override Elapsed Time (Minutes):"),
        ] {
            scene.add_command(DrawCommand::Text {
                position,
                text: text.to_string(),
                font_size: points(10.0),
                color: TEXT,
            });
        }

        for (target, bounds) in TARGETS {
            let (fill, outline, text) = match target {
                Target::Entry(field) => {
                    let focused = self.focus == Some(field);
                    let mut text = self.entry(field).to_string();
                    if focused {
                        text.push('_');
                    }
                    (ENTRY_FILL, if focused { FOCUS } else { Color::GRAY }, text)
                }
                Target::Button(action) => (BUTTON_FILL, TEXT, action.label().to_string()),
            };
            scene.add_command(DrawCommand::Rect {
                top_left: Point::new(bounds.x, bounds.y),
                size: (bounds.width, bounds.height),
                fill: Some(fill),
                outline,
            });
            scene.add_command(DrawCommand::Text {
                position: bounds.center(),
                text,
                font_size: points(10.0),
                color: TEXT,
            });
        }

        if let Some(status) = &self.status {
            let (text, color) = match status {
                Status::Info(text) => (text, TEXT),
                Status::Error(text) => (text, Color::RED),
            };
            scene.add_command(DrawCommand::Text {
                position: STATUS_AT,
                text: text.clone(),
                font_size: points(10.0),
                color,
            });
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center_of(target: Target) -> Point {
        TARGETS
            .iter()
            .find(|(t, _)| *t == target)
            .map(|(_, b)| b.center())
            .unwrap()
    }

    #[test]
    fn targets_do_not_overlap() {
        for (i, (_, a)) in TARGETS.iter().enumerate() {
            for (_, b) in TARGETS.iter().skip(i + 1) {
                let disjoint = a.x + a.width <= b.x
                    || b.x + b.width <= a.x
                    || a.y + a.height <= b.y
                    || b.y + b.height <= a.y;
                assert!(disjoint, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn typing_goes_to_the_focused_entry() {
        let mut panel = ControlPanel::new();
        panel.type_text("ignored");
        assert_eq!(panel.entry(Field::Time), "");

        assert_eq!(panel.click(center_of(Target::Entry(Field::Time))), None);
        panel.type_text("09:3");
        panel.type_text("0\r");
        assert_eq!(panel.entry(Field::Time), "09:30");
        assert_eq!(
            panel.submit(),
            Some(ClockCommand::OverrideTime("09:30".into()))
        );

        panel.cycle_focus();
        assert_eq!(panel.focus(), Some(Field::Elapsed));
        panel.type_text("456");
        panel.backspace();
        assert_eq!(
            panel.submit(),
            Some(ClockCommand::OverrideElapsed("45".into()))
        );
    }

    #[test]
    fn entries_are_bounded() {
        let mut panel = ControlPanel::new();
        panel.cycle_focus();
        panel.type_text(&"9".repeat(40));
        assert_eq!(panel.entry(Field::Time).len(), ENTRY_MAX_CHARS);
    }

    #[test]
    fn buttons_produce_commands() {
        let mut panel = ControlPanel::new();
        assert_eq!(
            panel.click(center_of(Target::Button(Action::StartMission))),
            Some(ClockCommand::Start)
        );
        assert_eq!(
            panel.click(center_of(Target::Button(Action::LiveTime))),
            Some(ClockCommand::ClearTimeOverride)
        );
        assert_eq!(
            panel.click(center_of(Target::Button(Action::OverrideElapsed))),
            Some(ClockCommand::OverrideElapsed(String::new()))
        );
    }

    #[test]
    fn clicking_elsewhere_drops_focus() {
        let mut panel = ControlPanel::new();
        panel.cycle_focus();
        assert_eq!(panel.click(Point::new(20.0, 790.0)), None);
        assert_eq!(panel.focus(), None);
        assert_eq!(panel.submit(), None);
    }

    #[test]
    fn acknowledge_shows_errors_in_red() {
        let mut panel = ControlPanel::new();
        let command = ClockCommand::OverrideElapsed("61".into());
        panel.acknowledge(&command, &Err(OverrideError::ElapsedOutOfRange(61)));
        assert!(matches!(panel.status(), Some(Status::Error(_))));
        let scene = panel.scene();
        assert!(scene.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Text { color, text, .. } if *color == Color::RED && text.contains("between 0 and 60")
        )));

        panel.acknowledge(&ClockCommand::Click { x: 0.0, y: 0.0 }, &Ok(true));
        assert!(matches!(panel.status(), Some(Status::Error(_))));

        panel.acknowledge(&ClockCommand::Start, &Ok(true));
        assert_eq!(panel.status(), Some(&Status::Info("Mission started.".into())));
    }

    #[test]
    fn acknowledge_distinguishes_ignored_commands() {
        let mut panel = ControlPanel::new();
        panel.acknowledge(&ClockCommand::Start, &Ok(false));
        assert_eq!(
            panel.status(),
            Some(&Status::Info("Mission already started.".into()))
        );

        panel.acknowledge(&ClockCommand::ClearTimeOverride, &Ok(false));
        assert_eq!(
            panel.status(),
            Some(&Status::Info("Already showing live time.".into()))
        );

        panel.acknowledge(&ClockCommand::ClearTimeOverride, &Ok(true));
        assert_eq!(panel.status(), Some(&Status::Info("Showing live time.".into())));
    }
}
