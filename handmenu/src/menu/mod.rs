//! Headless menu session.
//!
//! Holds which menu is open, what the cursor hovers, and the sub-menu
//! state (channel list, volume).  Updated once per frame with the frame
//! size, cursor and debounced actions; drawing is left to the caller.
//!
//! Hit tests run in frame space: the cursor's y includes the band added
//! above the camera image, which is removed before testing.

pub mod channels;
pub mod radial;
pub mod volume;

use tracing::{debug, info};

use crate::pipeline::CursorPosition;
use crate::sexp::{bool_sexp, format_event, quote_string};
use crate::tracking::ActionSet;

use channels::ChannelList;
use radial::{RadialButton, RadialMenu, MENU_BUTTON};
use volume::VolumeControl;

/// Exit button shown in every sub-menu.
pub const EXIT_BUTTON: Rect = Rect::new(20, 20, 200, 100);

// ── Geometry ───────────────────────────────────────────────

/// Axis-aligned rectangle; edges are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        self.x <= px && px <= self.x + self.w && self.y <= py && py <= self.y + self.h
    }
}

// ── Views ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubMenu {
    Channels,
    ChangeSound,
    Settings,
}

impl SubMenu {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Channels => "channels",
            Self::ChangeSound => "change-sound",
            Self::Settings => "settings",
        }
    }
}

/// What is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuView {
    /// Only the corner menu button.
    Closed,
    Radial,
    Sub(SubMenu),
}

impl MenuView {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Radial => "radial",
            Self::Sub(s) => s.as_str(),
        }
    }
}

/// Element under the cursor this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hover {
    MenuButton,
    Wedge(RadialButton),
    ExitButton,
    /// Channel index of a visible row.
    Channel(usize),
}

impl Hover {
    fn sexp(&self) -> String {
        match self {
            Self::MenuButton => ":menu-button".to_string(),
            Self::Wedge(b) => format!("(:wedge :{})", b.as_str()),
            Self::ExitButton => ":exit-button".to_string(),
            Self::Channel(i) => format!("(:channel {})", i),
        }
    }
}

// ── Events ─────────────────────────────────────────────────

/// State changes produced by one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    MenuOpened,
    MenuClosed,
    SubMenuOpened(SubMenu),
    SubMenuClosed(SubMenu),
    ChannelScrolled { offset: usize },
    ChannelSelected { index: usize, label: String },
    VolumeChanged { level: u8 },
    ExitRequested,
}

impl MenuEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MenuOpened => "menu-opened",
            Self::MenuClosed => "menu-closed",
            Self::SubMenuOpened(_) => "submenu-opened",
            Self::SubMenuClosed(_) => "submenu-closed",
            Self::ChannelScrolled { .. } => "channel-scrolled",
            Self::ChannelSelected { .. } => "channel-selected",
            Self::VolumeChanged { .. } => "volume-changed",
            Self::ExitRequested => "exit-requested",
        }
    }

    /// Render as an event s-expression.
    pub fn to_sexp(&self) -> String {
        let fields: Vec<(&str, String)> = match self {
            Self::SubMenuOpened(s) | Self::SubMenuClosed(s) => {
                vec![("menu", format!(":{}", s.as_str()))]
            }
            Self::ChannelScrolled { offset } => vec![("offset", offset.to_string())],
            Self::ChannelSelected { index, label } => vec![
                ("index", index.to_string()),
                ("label", quote_string(label)),
            ],
            Self::VolumeChanged { level } => vec![("level", level.to_string())],
            Self::MenuOpened | Self::MenuClosed | Self::ExitRequested => Vec::new(),
        };
        let borrowed: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        format_event(self.name(), &borrowed)
    }
}

// ── Session ────────────────────────────────────────────────

pub struct MenuSession {
    view: MenuView,
    hover: Option<Hover>,
    channels: ChannelList,
    volume: VolumeControl,
    exit_requested: bool,
    /// Cursor band above the frame, subtracted before hit testing.
    offset_y: i32,
}

impl MenuSession {
    pub fn new(offset_y: i32) -> Self {
        Self {
            view: MenuView::Closed,
            hover: None,
            channels: ChannelList::new(),
            volume: VolumeControl::default(),
            exit_requested: false,
            offset_y,
        }
    }

    pub fn view(&self) -> MenuView {
        self.view
    }

    pub fn hover(&self) -> Option<Hover> {
        self.hover
    }

    pub fn channels(&self) -> &ChannelList {
        &self.channels
    }

    pub fn volume(&self) -> &VolumeControl {
        &self.volume
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Advance one frame.
    pub fn update(
        &mut self,
        width: u32,
        height: u32,
        cursor: CursorPosition,
        actions: &ActionSet,
    ) -> Vec<MenuEvent> {
        let (x, y) = cursor.in_frame(self.offset_y);
        let mut events = Vec::new();

        match self.view {
            MenuView::Closed => self.update_closed(x, y, actions, &mut events),
            MenuView::Radial => self.update_radial(width, height, x, y, actions, &mut events),
            MenuView::Sub(sub) => self.update_sub(sub, width, height, x, y, actions, &mut events),
        }

        for event in &events {
            debug!("menu event {}", event.name());
        }
        events
    }

    fn update_closed(&mut self, x: i32, y: i32, actions: &ActionSet, events: &mut Vec<MenuEvent>) {
        let hovered = MENU_BUTTON.contains(x, y);
        self.hover = hovered.then_some(Hover::MenuButton);
        if hovered && actions.click {
            self.view = MenuView::Radial;
            info!("Menu opened");
            events.push(MenuEvent::MenuOpened);
        }
    }

    fn update_radial(
        &mut self,
        width: u32,
        height: u32,
        x: i32,
        y: i32,
        actions: &ActionSet,
        events: &mut Vec<MenuEvent>,
    ) {
        let button = RadialMenu::for_frame(width, height).hit(x, y);
        self.hover = button.map(Hover::Wedge);
        let Some(button) = button.filter(|_| actions.click) else {
            return;
        };

        info!("{} clicked", button.label());
        let sub = match button {
            RadialButton::Back => {
                self.view = MenuView::Closed;
                events.push(MenuEvent::MenuClosed);
                return;
            }
            RadialButton::TurnOff => {
                self.exit_requested = true;
                events.push(MenuEvent::ExitRequested);
                return;
            }
            RadialButton::Settings => SubMenu::Settings,
            RadialButton::ChangeSound => SubMenu::ChangeSound,
            RadialButton::Channels => SubMenu::Channels,
        };
        self.view = MenuView::Sub(sub);
        events.push(MenuEvent::SubMenuOpened(sub));
    }

    #[allow(clippy::too_many_arguments)]
    fn update_sub(
        &mut self,
        sub: SubMenu,
        width: u32,
        height: u32,
        x: i32,
        y: i32,
        actions: &ActionSet,
        events: &mut Vec<MenuEvent>,
    ) {
        if EXIT_BUTTON.contains(x, y) {
            self.hover = Some(Hover::ExitButton);
            if actions.click {
                self.view = MenuView::Closed;
                info!("Returned to main menu from {}", sub.as_str());
                events.push(MenuEvent::SubMenuClosed(sub));
                return;
            }
        } else {
            self.hover = None;
        }

        match sub {
            SubMenu::Channels => {
                if actions.scroll_up.is_some() && self.channels.scroll_up() {
                    events.push(MenuEvent::ChannelScrolled {
                        offset: self.channels.offset(),
                    });
                }
                if actions.scroll_down.is_some() && self.channels.scroll_down() {
                    events.push(MenuEvent::ChannelScrolled {
                        offset: self.channels.offset(),
                    });
                }
                if let Some(index) = self.channels.hit_row(x, y, width, height) {
                    self.hover = Some(Hover::Channel(index));
                    if actions.click && self.channels.select(index) {
                        let label = ChannelList::label(index);
                        info!("Selected {}", label);
                        events.push(MenuEvent::ChannelSelected { index, label });
                    }
                }
            }
            SubMenu::ChangeSound => {
                if actions.scroll_up.is_some() {
                    if let Some(level) = self.volume.raise() {
                        events.push(MenuEvent::VolumeChanged { level });
                    }
                }
                if actions.scroll_down.is_some() {
                    if let Some(level) = self.volume.lower() {
                        events.push(MenuEvent::VolumeChanged { level });
                    }
                }
            }
            SubMenu::Settings => {}
        }
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:view :{} :hover {} :volume {} :channel-offset {} :channel {} :exit {})",
            self.view.as_str(),
            self.hover.map(|h| h.sexp()).unwrap_or_else(|| "nil".to_string()),
            self.volume.level(),
            self.channels.offset(),
            quote_string(&self.channels.selected_label()),
            bool_sexp(self.exit_requested),
        )
    }
}

// ── Tests ──────────────────────────────────────────────────
