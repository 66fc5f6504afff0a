//! Interactive editing session.
//!
//! A [`Session`] couples a [`Diagram`] with its [`Canvas`] and an explicit
//! interaction [`Mode`]. Input arrives as discrete [`Event`]s (the same
//! vocabulary a pointer-and-keyboard front end produces) and each event
//! yields an [`Outcome`] or a [`RelationshipError`] describing why the
//! diagram rejected it.
//!
//! # State machine
//!
//! | Mode                   | Event                   | Next mode                          |
//! |------------------------|-------------------------|------------------------------------|
//! | any                    | `BeginInsert`           | `PlacingElement`                   |
//! | `PlacingElement`       | `Click`                 | `Idle`, element added at the click |
//! | `Idle` / `Selected`    | `Click` on an element   | `Selected`                         |
//! | `Idle` / `Selected`    | `Click` on empty space  | `Idle`                             |
//! | any                    | `BeginConnect`          | `ConnectingFirstPick`              |
//! | `ConnectingFirstPick`  | `Click` on a relational | `ConnectingSecondPick`             |
//! | `ConnectingSecondPick` | `Click` on an element   | `Idle`, relationship attempted     |
//! | `Selected`             | `Delete`                | `Idle`, element removed            |
//! | `Selected`             | `Move`                  | `Selected`, element moved          |
//! | any                    | `Cancel`                | `Idle`                             |
//! | any                    | `New`                   | `Idle`, diagram cleared            |

use std::{fmt, str::FromStr};

use log::{debug, info, warn};

use qoc_core::{
    Diagram, Element, ElementId, ElementKind, Relationship, RelationshipError, geometry::Point,
};

use crate::{canvas::Canvas, config::CanvasConfig};

/// Current interaction mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Idle,
    /// Waiting for a click that says where the new element goes.
    PlacingElement {
        kind: ElementKind,
        description: String,
    },
    ConnectingFirstPick,
    ConnectingSecondPick {
        source: ElementId,
    },
    Selected(ElementId),
}

/// Arrow-key direction for moving the selected element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Offset of one move of `step` units in this direction.
    pub fn delta(self, step: f32) -> Point {
        match self {
            Direction::Up => Point::new(0.0, -step),
            Direction::Down => Point::new(0.0, step),
            Direction::Left => Point::new(-step, 0.0),
            Direction::Right => Point::new(step, 0.0),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(format!(
                "unknown direction `{s}` (expected up, down, left or right)"
            )),
        }
    }
}

/// A discrete input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Start placing a new element of `kind`.
    BeginInsert {
        kind: ElementKind,
        description: String,
    },
    /// Start picking the two endpoints of a relationship.
    BeginConnect,
    /// Pointer click. `favors` is the polarity used when the click completes
    /// a relationship (primary button favors, secondary opposes).
    Click { point: Point, favors: bool },
    Delete,
    Move(Direction),
    Cancel,
    /// Discard the whole diagram.
    New,
}

impl FromStr for Event {
    type Err = String;

    /// Parses one line of an event script.
    ///
    /// ```text
    /// insert <kind> <description...>
    /// connect
    /// click <x> <y> [favors|opposes]
    /// delete
    /// move <up|down|left|right>
    /// cancel
    /// new
    /// ```
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(command, rest)| (command, rest.trim()));

        let no_arguments = |event: Event| {
            if rest.is_empty() {
                Ok(event)
            } else {
                Err(format!("`{command}` takes no arguments"))
            }
        };

        match command {
            "insert" => {
                let (kind, description) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| "usage: insert <kind> <description>".to_string())?;
                Ok(Event::BeginInsert {
                    kind: kind.parse()?,
                    description: description.trim().to_string(),
                })
            }
            "connect" => no_arguments(Event::BeginConnect),
            "click" => {
                let mut args = rest.split_whitespace();
                let mut coordinate = |axis: &str| -> Result<f32, String> {
                    args.next()
                        .ok_or_else(|| "usage: click <x> <y> [favors|opposes]".to_string())?
                        .parse::<f32>()
                        .map_err(|err| format!("invalid {axis} coordinate: {err}"))
                };
                let x = coordinate("x")?;
                let y = coordinate("y")?;
                let favors = match args.next() {
                    None | Some("favors") => true,
                    Some("opposes") => false,
                    Some(other) => {
                        return Err(format!(
                            "unknown polarity `{other}` (expected favors or opposes)"
                        ));
                    }
                };
                if args.next().is_some() {
                    return Err("too many arguments to `click`".to_string());
                }
                Ok(Event::Click {
                    point: Point::new(x, y),
                    favors,
                })
            }
            "delete" => no_arguments(Event::Delete),
            "move" => Ok(Event::Move(rest.parse()?)),
            "cancel" => no_arguments(Event::Cancel),
            "new" => no_arguments(Event::New),
            "" => Err("empty event".to_string()),
            _ => Err(format!("unknown event `{command}`")),
        }
    }
}

/// What an accepted event did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The event does not apply in the current mode.
    Ignored,
    ModeChanged,
    ElementAdded(ElementId),
    Selected(ElementId),
    SourcePicked(ElementId),
    RelationshipAdded(Relationship),
    ElementRemoved(ElementId),
    ElementMoved(ElementId),
    Cleared,
}

/// A diagram being edited.
#[derive(Debug, Clone)]
pub struct Session {
    diagram: Diagram,
    canvas: Canvas,
    mode: Mode,
}

impl Session {
    pub fn new(config: CanvasConfig) -> Self {
        Self::from_parts(Diagram::new(), Canvas::new(config))
    }

    /// Resumes editing an existing diagram, e.g. one loaded from a document.
    pub fn from_parts(diagram: Diagram, canvas: Canvas) -> Self {
        Self {
            diagram,
            canvas,
            mode: Mode::Idle,
        }
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Status bar text for the current mode.
    pub fn status(&self) -> String {
        match &self.mode {
            Mode::Idle => String::new(),
            Mode::PlacingElement { kind, .. } => {
                format!("Inserting new {}. Press \"Esc\" to cancel.", Title(*kind))
            }
            Mode::ConnectingFirstPick | Mode::ConnectingSecondPick { .. } => {
                "Select two elements to insert a new Relationship. Press \"Esc\" to cancel."
                    .to_string()
            }
            Mode::Selected(_) => "Selected element. Press \"Esc\" to cancel.".to_string(),
        }
    }

    /// Feeds one input event through the state machine.
    ///
    /// # Errors
    ///
    /// Returns the diagram's [`RelationshipError`] when the event completes
    /// a relationship the diagram rejects, or when the first pick of a
    /// connection is not relational. The session is back in [`Mode::Idle`]
    /// afterwards and the diagram is unchanged.
    pub fn handle(&mut self, event: Event) -> Result<Outcome, RelationshipError> {
        debug!(event:?, mode:? = self.mode; "Handling event");

        match event {
            Event::Cancel => Ok(self.cancel()),
            Event::New => {
                self.clear();
                Ok(Outcome::Cleared)
            }
            Event::BeginInsert { kind, description } => {
                if description.trim().is_empty() {
                    return Ok(Outcome::Ignored);
                }
                self.mode = Mode::PlacingElement { kind, description };
                Ok(Outcome::ModeChanged)
            }
            Event::BeginConnect => {
                self.mode = Mode::ConnectingFirstPick;
                Ok(Outcome::ModeChanged)
            }
            Event::Click { point, favors } => self.click(point, favors),
            Event::Delete => match self.mode {
                Mode::Selected(id) => {
                    self.remove(id);
                    self.mode = Mode::Idle;
                    Ok(Outcome::ElementRemoved(id))
                }
                _ => Ok(Outcome::Ignored),
            },
            Event::Move(direction) => match self.mode {
                Mode::Selected(id) => {
                    self.move_element(id, direction);
                    Ok(Outcome::ElementMoved(id))
                }
                _ => Ok(Outcome::Ignored),
            },
        }
    }

    fn cancel(&mut self) -> Outcome {
        if self.mode == Mode::Idle {
            return Outcome::Ignored;
        }
        self.mode = Mode::Idle;
        Outcome::ModeChanged
    }

    fn click(&mut self, point: Point, favors: bool) -> Result<Outcome, RelationshipError> {
        let hit = self.diagram.select_element_at(point, &self.canvas);

        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::PlacingElement { kind, description } => {
                let id = self.insert(Element::new(kind, description), point)?;
                Ok(Outcome::ElementAdded(id))
            }
            Mode::Idle | Mode::Selected(_) => match hit {
                Some(id) => {
                    self.mode = Mode::Selected(id);
                    Ok(Outcome::Selected(id))
                }
                None => Ok(Outcome::Ignored),
            },
            Mode::ConnectingFirstPick => {
                let Some(id) = hit else {
                    return Ok(Outcome::ModeChanged);
                };
                let element = self
                    .diagram
                    .element(id)
                    .ok_or(RelationshipError::UnknownElement(id))?;
                if element.relational().is_none() {
                    warn!(element:% = id; "First element of a relationship must be relational");
                    return Err(RelationshipError::NotRelational {
                        element: id,
                        kind: element.kind(),
                    });
                }
                self.mode = Mode::ConnectingSecondPick { source: id };
                Ok(Outcome::SourcePicked(id))
            }
            Mode::ConnectingSecondPick { source } => match hit {
                Some(target) => self
                    .connect(source, target, favors)
                    .map(Outcome::RelationshipAdded),
                None => {
                    self.mode = Mode::ConnectingSecondPick { source };
                    Ok(Outcome::Ignored)
                }
            },
        }
    }

    /// Adds `element` to the diagram and places it at `top_left`.
    pub fn insert(
        &mut self,
        element: Element,
        top_left: Point,
    ) -> Result<ElementId, RelationshipError> {
        let id = self.diagram.add_element(element)?;
        if let Some(element) = self.diagram.element(id) {
            self.canvas.place(element, top_left);
        }
        info!(element:% = id, x = top_left.x(), y = top_left.y(); "Element inserted");
        Ok(id)
    }

    /// Adds a relationship from `source` to `target`.
    pub fn connect(
        &mut self,
        source: ElementId,
        target: ElementId,
        favors: bool,
    ) -> Result<Relationship, RelationshipError> {
        let relationship = self
            .diagram
            .add_relationship(source, target, favors)
            .inspect_err(|err| {
                warn!(source:% = source, target:% = target, err:%; "Relationship rejected")
            })?;
        info!(source:% = source, target:% = target, favors; "Relationship inserted");
        Ok(relationship)
    }

    /// Removes an element, its relationships and its placement.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let removed = self.diagram.remove_element(id)?;
        self.canvas.forget(id);
        if matches!(self.mode, Mode::Selected(selected) if selected == id)
            || matches!(self.mode, Mode::ConnectingSecondPick { source } if source == id)
        {
            self.mode = Mode::Idle;
        }
        info!(element:% = id; "Element removed");
        Some(removed)
    }

    /// Moves an element one configured step. Returns false if it is not placed.
    pub fn move_element(&mut self, id: ElementId, direction: Direction) -> bool {
        let delta = direction.delta(self.canvas.config().move_step());
        self.canvas.move_by(id, delta)
    }

    /// Discards every element and relationship.
    pub fn clear(&mut self) {
        self.diagram.clear();
        self.canvas.clear();
        self.mode = Mode::Idle;
        info!("Diagram cleared");
    }
}

/// Displays a kind with a leading capital, as in status messages.
struct Title(ElementKind);

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.0.as_str();
        let mut chars = name.chars();
        if let Some(first) = chars.next() {
            write!(f, "{}{}", first.to_ascii_uppercase(), chars.as_str())?;
        }
        Ok(())
    }
}
