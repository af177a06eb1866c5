/// Fraction of a section that must sit inside the inset viewport before it becomes active.
pub const VISIBILITY_THRESHOLD: f64 = 0.5;
/// Share of the viewport height trimmed from both the top and the bottom edge.
pub const VIEWPORT_INSET: f64 = 0.1;
/// Quiet period after the last scroll event before the scrolling flag clears.
pub const SCROLL_IDLE_MS: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub id: &'static str,
    pub label: &'static str,
    pub index: usize,
}

pub static SECTIONS: [Section; 5] = [
    Section {
        id: "home",
        label: "Home",
        index: 0,
    },
    Section {
        id: "about",
        label: "About",
        index: 1,
    },
    Section {
        id: "skills",
        label: "Skills",
        index: 2,
    },
    Section {
        id: "projects",
        label: "Projects",
        index: 3,
    },
    Section {
        id: "contact",
        label: "Contact",
        index: 4,
    },
];

/// Looks up a section by its fragment id, tolerating a leading `#`.
pub fn section_index_of(id: &str) -> Option<usize> {
    let id = id.strip_prefix('#').unwrap_or(id);
    SECTIONS.iter().find(|s| s.id == id).map(|s| s.index)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    Next,
    Prev,
    First,
    Last,
}

impl NavCommand {
    /// Maps a `KeyboardEvent.key` value to a command. Unhandled keys return `None`
    /// so the browser keeps its default behavior for them.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" | "PageDown" => Some(Self::Next),
            "ArrowUp" | "PageUp" => Some(Self::Prev),
            "Home" => Some(Self::First),
            "End" => Some(Self::Last),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    active: usize,
    len: usize,
}

impl NavState {
    pub fn new(len: usize) -> Self {
        Self { active: 0, len }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn clamp(&self, index: isize) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let last = (self.len - 1) as isize;
        Some(index.clamp(0, last) as usize)
    }

    /// Clamps `index` into the section range and makes it active.
    pub fn go_to(&mut self, index: isize) -> Option<usize> {
        let index = self.clamp(index)?;
        self.active = index;
        Some(index)
    }

    /// Same clamp as [`NavState::go_to`]; reports whether the active section moved.
    pub fn set_active(&mut self, index: usize) -> bool {
        let index = isize::try_from(index).unwrap_or(isize::MAX);
        match self.clamp(index) {
            Some(i) if i != self.active => {
                self.active = i;
                true
            }
            _ => false,
        }
    }

    pub fn apply(&mut self, cmd: NavCommand) -> Option<usize> {
        let current = self.active as isize;
        let target = match cmd {
            NavCommand::Next => current + 1,
            NavCommand::Prev => current - 1,
            NavCommand::First => 0,
            NavCommand::Last => isize::MAX,
        };
        self.go_to(target)
    }
}

/// Percentage of the scrollable range already scrolled, in `[0, 100]`.
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let range = scroll_height - client_height;
    if !(range > 0.0) {
        return 0.0;
    }
    (scroll_top / range * 100.0).clamp(0.0, 100.0)
}

/// Fraction of a section visible inside the container viewport after trimming
/// [`VIEWPORT_INSET`] off both edges. `section_top` is relative to the
/// container's visible top edge.
pub fn visible_ratio(section_top: f64, section_height: f64, viewport_height: f64) -> f64 {
    if !(section_height > 0.0) || !(viewport_height > 0.0) {
        return 0.0;
    }
    let window_top = viewport_height * VIEWPORT_INSET;
    let window_bottom = viewport_height * (1.0 - VIEWPORT_INSET);
    let top = section_top.max(window_top);
    let bottom = (section_top + section_height).min(window_bottom);
    ((bottom - top).max(0.0) / section_height).min(1.0)
}

/// Picks the most visible section among those meeting [`VISIBILITY_THRESHOLD`].
/// Ties go to the earlier section; `None` means the current section stays active.
pub fn active_from_ratios(ratios: &[f64]) -> Option<usize> {
    ratios
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, r)| *r >= VISIBILITY_THRESHOLD)
        .fold(None, |best: Option<(usize, f64)>, (i, r)| match best {
            Some((_, br)) if br >= r => best,
            _ => Some((i, r)),
        })
        .map(|(i, _)| i)
}

/// Tracks the "is scrolling" flag. Every scroll event pushes the deadline out,
/// so a burst of events keeps the flag set until the burst goes quiet.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollDebounce {
    last_event: Option<f64>,
    scrolling: bool,
}

impl ScrollDebounce {
    pub fn record(&mut self, now_ms: f64) {
        self.last_event = Some(now_ms);
        self.scrolling = true;
    }

    /// Clears the flag if the idle period has passed; returns the flag afterwards.
    pub fn settle(&mut self, now_ms: f64) -> bool {
        if let Some(last) = self.last_event {
            if now_ms - last >= SCROLL_IDLE_MS {
                self.scrolling = false;
            }
        }
        self.scrolling
    }

    pub fn is_scrolling(&self) -> bool {
        self.scrolling
    }
}
