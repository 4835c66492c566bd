use bitflags::bitflags;

bitflags! {
    /// Capabilities an AR session may offer.
    ///
    /// Each capability is queried independently. Operations for capabilities
    /// the session does not offer fail with
    /// [`ArError::Unsupported`](crate::ArError::Unsupported).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u32 {
        /// Single-view rendering.
        const MONO = 1 << 0;
        /// Two-view rendering.
        const STEREO = 1 << 1;
        /// Camera-feed augmented reality.
        const AR = 1 << 2;
        /// Anchor tracking.
        const ANCHORS = 1 << 3;
        const PLANE_DETECTION = 1 << 4;
        const LIGHT_ESTIMATION = 1 << 5;
        const IMAGE_TRACKING = 1 << 6;
        /// Environment cubemaps from light probes.
        const ENVIRONMENT_PROBES = 1 << 7;
        /// Camera image planes for feed display.
        const CAMERA_FEED = 1 << 8;
        const PASSTHROUGH = 1 << 9;
        const PLAY_AREA = 1 << 10;
        const HAPTICS = 1 << 11;
    }
}

impl Capabilities {
    /// What a typical handheld AR session offers.
    pub fn handheld_ar() -> Self {
        Self::MONO
            | Self::AR
            | Self::ANCHORS
            | Self::PLANE_DETECTION
            | Self::LIGHT_ESTIMATION
            | Self::IMAGE_TRACKING
            | Self::ENVIRONMENT_PROBES
            | Self::CAMERA_FEED
    }
}
