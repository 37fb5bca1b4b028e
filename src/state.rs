/// Motion mode of the ornaments, derived from [`InteractionState`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionMode {
    Idle,
    Exploding,
    Frozen,
    Reviving,
}

/// Interaction state shared by the input handlers and the frame driver
#[derive(Clone, Debug, PartialEq)]
pub struct InteractionState {
    /// Ornaments have been blown off the tree
    pub exploded: bool,
    /// Ornaments are flying back to their rest positions
    pub reviving: bool,
    /// Ticks since the last explosion started
    pub explode_frames: u32,
    /// Ticks since the photos were last revealed
    pub photo_reveal_frames: u32,
    /// Shared, slowly increasing carousel offset
    pub orbit_angle_offset: f32,
    selected_photo: Option<usize>,
    photos_visible: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionState {
    pub fn new() -> Self {
        InteractionState {
            exploded: false,
            reviving: false,
            explode_frames: 0,
            photo_reveal_frames: 0,
            orbit_angle_offset: 0.0,
            selected_photo: None,
            photos_visible: false,
        }
    }

    /// Returns to the startup state
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Current ornament motion mode
    ///
    /// `frozen` reports whether the ornaments have stopped after an explosion.
    pub fn motion_mode(&self, frozen: bool) -> MotionMode {
        match (self.exploded, self.reviving) {
            (true, _) if frozen => MotionMode::Frozen,
            (true, _) => MotionMode::Exploding,
            (false, true) => MotionMode::Reviving,
            (false, false) => MotionMode::Idle,
        }
    }

    pub fn photos_visible(&self) -> bool {
        self.photos_visible
    }

    pub fn selected_photo(&self) -> Option<usize> {
        self.selected_photo
    }

    /// Shows the photo carousel and restarts its reveal phase
    pub fn show_photos(&mut self) {
        self.photos_visible = true;
        self.photo_reveal_frames = 0;
    }

    /// Hides the photo carousel, dropping any selection
    pub fn hide_photos(&mut self) {
        self.photos_visible = false;
        self.selected_photo = None;
    }

    /// Commits a picking result. Ignored while the photos are hidden.
    pub fn select_photo(&mut self, photo: Option<usize>) {
        if self.photos_visible {
            self.selected_photo = photo;
        }
    }
}
